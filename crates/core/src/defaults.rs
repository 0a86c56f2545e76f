//! The bundled default dataset.
//!
//! These nine projects ship with the application and are always present in
//! the catalog: remote data may shadow or archive them, never remove them.

use crate::project::{Galleries, Project, ProjectKind, SubCategory};

/// Stock covers offered to the operator as cover suggestions.
pub const STOCK_COVER_POOL: [&str; 12] = [
    "https://images.unsplash.com/photo-1505693415763-3ed5e04ba4cd?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1465805139202-a644e217f00b?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1449158743715-0a90ebb6d2d8?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1497366216548-37526070297c?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1469474968028-56623f02e42e?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1473181488821-2d23949a045a?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1491553895911-0055eca6402d?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1497366754035-f200968a6e72?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1505692069463-5e3405e01f4b?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1505691938895-1758d7feb511?auto=format&fit=crop&w=1800&q=80",
    "https://images.unsplash.com/photo-1505692270181-d6cb0f3c52f1?auto=format&fit=crop&w=1800&q=80",
];

/// Suggest three distinct stock covers for a project, derived from a stable
/// hash of its id so the suggestions do not shuffle between requests.
pub fn suggest_covers(project_id: &str) -> Vec<&'static str> {
    if STOCK_COVER_POOL.len() < 3 {
        return STOCK_COVER_POOL.to_vec();
    }
    let hash: usize = project_id.bytes().map(usize::from).sum();
    let mut picks: Vec<&'static str> = Vec::with_capacity(3);
    let mut idx = hash % STOCK_COVER_POOL.len();
    while picks.len() < 3 {
        let candidate = STOCK_COVER_POOL[idx % STOCK_COVER_POOL.len()];
        if !picks.contains(&candidate) {
            picks.push(candidate);
        }
        idx = (idx + 5) % STOCK_COVER_POOL.len();
    }
    picks
}

fn project(
    id: &str,
    title: &str,
    location: &str,
    category: &str,
    kind: ProjectKind,
    sub_category: SubCategory,
    cover_image: &str,
    finished: &[&str],
) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        category: category.to_string(),
        kind,
        sub_category,
        cover_image: cover_image.to_string(),
        galleries: Galleries {
            finished: finished.iter().map(|s| s.to_string()).collect(),
            development: Vec::new(),
        },
        published: true,
        description: None,
        display_order: None,
        created_at: None,
        updated_at: None,
        archived: false,
    }
}

/// The bundled projects, three per discipline.
pub fn default_projects() -> Vec<Project> {
    vec![
        project(
            "1",
            "JUHU VILLA",
            "Mumbai",
            "Villas",
            ProjectKind::Architecture,
            SubCategory::Residential,
            "/juhu/IMG_6992.JPG",
            &[
                "/juhu/IMG_6998.JPG",
                "/juhu/IMG_6999.JPG",
                "/juhu/IMG_7001.JPG",
                "/juhu/IMG_7005.JPG",
                "/juhu/IMG_7007.JPG",
                "/juhu/IMG_7010.JPG",
            ],
        ),
        project(
            "2",
            "JREDDY VILLA",
            "Hyderabad",
            "Villas",
            ProjectKind::Architecture,
            SubCategory::Residential,
            "https://images.unsplash.com/photo-1613490493576-7fde63acd811?w=1600&q=80&auto=format&fit=crop",
            &[
                "/matunga/GH2.jpg",
                "/matunga/GH6.jpg",
                "/matunga/GH7.jpg",
                "/matunga/GH20.jpg",
                "/matunga/GH22.jpg",
                "/matunga/GH26.jpg",
            ],
        ),
        project(
            "3",
            "ZENITH CLUB HOUSE",
            "Pune",
            "Club Houses",
            ProjectKind::Architecture,
            SubCategory::Hospitality,
            "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=1600&q=80&auto=format&fit=crop",
            &[
                "/matunga/SR1.jpg",
                "/matunga/SR3.jpg",
                "/matunga/SR4.jpg",
                "/matunga/DT1.jpg",
                "/matunga/tb1.jpg",
                "/matunga/tb2.jpg",
            ],
        ),
        project(
            "4",
            "MATUNGA RESIDENCE",
            "Mumbai",
            "Luxe Interiors",
            ProjectKind::InteriorDesign,
            SubCategory::Residential,
            "/matunga/LR3.jpg",
            &[
                "/matunga/A1.jpg",
                "/matunga/A3.jpg",
                "/matunga/A4.jpg",
                "/matunga/A6.jpg",
                "/matunga/b1.jpg",
                "/matunga/b2.jpg",
            ],
        ),
        project(
            "5",
            "BANDRA PENTHOUSE",
            "Mumbai",
            "Luxe Interiors",
            ProjectKind::InteriorDesign,
            SubCategory::Residential,
            "/bandra/IMG_7696.JPG",
            &[
                "/bandra/IMG_7699.JPG",
                "/bandra/IMG_7701.JPG",
                "/bandra/IMG_7706.JPG",
                "/bandra/IMG_7709.JPG",
                "/bandra/IMG_7715.JPG",
                "/bandra/IMG_7722.JPG",
            ],
        ),
        project(
            "6",
            "AURORA WORKSPACE",
            "Bangalore",
            "Workspaces",
            ProjectKind::InteriorDesign,
            SubCategory::Commercial,
            "https://images.unsplash.com/photo-1497366216548-37526070297c?w=1600&q=80&auto=format&fit=crop",
            &[
                "/matunga/NO1.jpg",
                "/matunga/NO6.jpg",
                "/matunga/NO9.jpg",
                "/matunga/NO20.jpg",
                "/matunga/c1.jpg",
                "/matunga/C13.jpg",
            ],
        ),
        project(
            "7",
            "CENTRAL PARK GARDENS",
            "Delhi",
            "Urban Gardens",
            ProjectKind::Landscape,
            SubCategory::Commercial,
            "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=1600&q=80&auto=format&fit=crop",
            &[
                "/matunga/s1.jpg",
                "/matunga/s3.jpg",
                "/matunga/S4.jpg",
                "/matunga/s5.jpg",
                "/matunga/S7.jpg",
                "/matunga/S8.jpg",
            ],
        ),
        project(
            "8",
            "LOTUS COURTYARD",
            "Jaipur",
            "Residential Landscape",
            ProjectKind::Landscape,
            SubCategory::Residential,
            "https://images.unsplash.com/photo-1585320806297-9794b3e4eeae?w=1600&q=80&auto=format&fit=crop",
            &[
                "/matunga/BV1.jpg",
                "/matunga/bv3.jpg",
                "/matunga/bv4.jpg",
                "/matunga/bv10.jpg",
                "/matunga/bv14.jpg",
                "/matunga/bv16.jpg",
            ],
        ),
        project(
            "9",
            "ROOFTOP OASIS",
            "Mumbai",
            "Rooftop Gardens",
            ProjectKind::Landscape,
            SubCategory::Hospitality,
            "https://images.unsplash.com/photo-1591825729269-caeb344f6df2?w=1600&q=80&auto=format&fit=crop",
            &[
                "/matunga/GHF3.jpg",
                "/matunga/GHF5.jpg",
                "/matunga/GHF18.jpg",
                "/matunga/GHF21.jpg",
                "/matunga/T5.jpg",
                "/matunga/t11.jpg",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_dataset_has_unique_ids_and_image_refs() {
        let projects = default_projects();
        assert_eq!(projects.len(), 9);

        let ids: HashSet<_> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), projects.len());

        let mut seen = HashSet::new();
        for project in &projects {
            for url in project.galleries.iter() {
                assert!(seen.insert(url.to_string()), "duplicate gallery ref: {url}");
            }
        }
    }

    #[test]
    fn suggestions_are_stable_and_distinct() {
        let first = suggest_covers("abc123");
        let second = suggest_covers("abc123");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        let unique: HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
