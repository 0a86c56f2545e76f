//! End-to-end tests against the full router, backed by the local catalog
//! blob in a temp directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use atelier_api::auth::jwt::{generate_access_token, JwtConfig};
use atelier_core::project::{Project, ProjectDoc, ProjectPatch, FALLBACK_IMAGE};
use atelier_api::config::ServerConfig;
use atelier_api::routes;
use atelier_api::service::CatalogService;
use atelier_api::state::AppState;
use atelier_api::upload::DiskImageStore;
use atelier_db::backend::{BackendError, BackendMode, CatalogBackend, LocalCatalogBackend};
use atelier_db::local::LocalStore;
use atelier_events::EventBus;

const ADMIN_EMAIL: &str = "studio@example.com";
const ADMIN_PASSWORD: &str = "atelier-pass";

struct TestApp {
    router: Router,
    service: Arc<CatalogService>,
    token: String,
    _dir: tempfile::TempDir,
}

fn test_config(dir: &Path) -> ServerConfig {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".into(),
            access_token_expiry_mins: 60,
        },
        admin_email: ADMIN_EMAIL.into(),
        admin_password_hash: password_hash,
        upload_dir: dir.join("uploads"),
        max_upload_bytes: 1024 * 1024,
        catalog_path: dir.join("catalog.json"),
    }
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let backend: Arc<dyn CatalogBackend> = Arc::new(LocalCatalogBackend::new(LocalStore::new(
        &config.catalog_path,
    )));
    let bus = Arc::new(EventBus::default());
    let service = Arc::new(CatalogService::new(backend, Arc::clone(&bus)));
    service.resync().await.expect("initial sync");

    let token = generate_access_token(ADMIN_EMAIL, &config.jwt).unwrap();
    let upload_dir = config.upload_dir.clone();
    let state = AppState {
        service: Arc::clone(&service),
        config: Arc::new(config.clone()),
        bus,
        images: Arc::new(DiskImageStore::new(&upload_dir, config.max_upload_bytes)),
    };

    TestApp {
        router: routes::app(state, &upload_dir),
        service,
        token,
        _dir: dir,
    }
}

impl TestApp {
    async fn request(&self, method: &str, path: &str, body: Option<Value>, auth: bool) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        if auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, path: &str) -> Response {
        self.request("GET", path, None, false).await
    }

    async fn admin(&self, method: &str, path: &str, body: Option<Value>) -> Response {
        self.request(method, path, body, true).await
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health & public surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthz_answers_ok() {
    let app = spawn_app().await;
    let response = app.get("/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn public_list_returns_published_defaults() {
    let app = spawn_app().await;
    let response = app.get("/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);

    let projects = body_json(response).await;
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 9);
    assert!(projects.iter().all(|p| p["type"].is_string()));
}

#[tokio::test]
async fn public_list_filters_by_discipline_and_subcategory() {
    let app = spawn_app().await;

    let response = app.get("/api/v1/projects?type=ARCHITECTURE").await;
    let projects = body_json(response).await;
    assert_eq!(projects.as_array().unwrap().len(), 3);

    // ALL is equivalent to no filter.
    let response = app.get("/api/v1/projects?type=ALL").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 9);

    let response = app.get("/api/v1/projects?type=POTTERY").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn archived_project_is_invisible_publicly() {
    let app = spawn_app().await;
    app.service.archive("1").await.unwrap();

    let response = app.get("/api/v1/projects/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/v1/projects").await;
    let projects = body_json(response).await;
    assert!(projects
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["id"] != "1"));
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_surface_requires_a_token() {
    let app = spawn_app().await;
    let response = app.get("/api/v1/admin/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_issues_a_usable_token() {
    let app = spawn_app().await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            false,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["accessToken"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/api/v1/admin/status")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_wrong_credentials() {
    let app = spawn_app().await;
    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
            false,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Creation, drafts, save
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_project_is_hidden_until_published() {
    let app = spawn_app().await;

    let response = app
        .admin(
            "POST",
            "/api/v1/admin/projects",
            Some(json!({ "title": "NEW COMMISSION", "location": "Pune" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["published"], false);
    assert!(created["displayOrder"].is_number());

    // Hidden from the public list, present in the admin list.
    let public = body_json(app.get("/api/v1/projects").await).await;
    assert!(public.as_array().unwrap().iter().all(|p| p["id"] != id));

    let admin = body_json(app.admin("GET", "/api/v1/admin/projects", None).await).await;
    assert!(admin
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == id.as_str() && p["status"] == "Hidden"));
}

#[tokio::test]
async fn created_project_carries_the_placeholder_cover() {
    let app = spawn_app().await;

    let response = app
        .admin(
            "POST",
            "/api/v1/admin/projects",
            Some(json!({ "title": "BARE COMMISSION", "location": "Nashik" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["coverImage"], FALLBACK_IMAGE);
    let id = created["id"].as_str().unwrap().to_string();

    let detail = body_json(
        app.admin("GET", &format!("/api/v1/admin/projects/{id}"), None)
            .await,
    )
    .await;
    assert_eq!(detail["project"]["coverImage"], FALLBACK_IMAGE);

    // The first gallery image takes over from the placeholder.
    let response = app
        .admin(
            "POST",
            &format!("/api/v1/admin/projects/{id}/gallery/finished"),
            Some(json!({ "url": "/new/first.jpg" })),
        )
        .await;
    assert_eq!(body_json(response).await["coverImage"], "/new/first.jpg");
}

#[tokio::test]
async fn draft_edits_stay_invisible_until_save() {
    let app = spawn_app().await;

    let response = app
        .admin(
            "PUT",
            "/api/v1/admin/projects/1/draft",
            Some(json!({ "title": "JUHU VILLA RENOVATION" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["dirty"], true);
    assert_eq!(detail["draft"]["title"], "JUHU VILLA RENOVATION");
    assert_eq!(detail["project"]["title"], "JUHU VILLA");

    // Public reads still see the committed record.
    let public = body_json(app.get("/api/v1/projects/1").await).await;
    assert_eq!(public["title"], "JUHU VILLA");

    let response = app
        .admin("POST", "/api/v1/admin/projects/1/save", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let public = body_json(app.get("/api/v1/projects/1").await).await;
    assert_eq!(public["title"], "JUHU VILLA RENOVATION");
}

#[tokio::test]
async fn save_with_blank_title_fails_and_keeps_the_draft() {
    let app = spawn_app().await;

    app.admin(
        "PUT",
        "/api/v1/admin/projects/1/draft",
        Some(json!({ "title": "   " })),
    )
    .await;

    let response = app
        .admin("POST", "/api/v1/admin/projects/1/save", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // The draft survives the failed save for the operator to fix.
    let detail = body_json(app.admin("GET", "/api/v1/admin/projects/1", None).await).await;
    assert_eq!(detail["draft"]["title"], "   ");
    assert_eq!(detail["project"]["title"], "JUHU VILLA");
}

#[tokio::test]
async fn discarding_a_draft_is_idempotent() {
    let app = spawn_app().await;
    app.admin(
        "PUT",
        "/api/v1/admin/projects/1/draft",
        Some(json!({ "location": "Goa" })),
    )
    .await;

    let first = body_json(
        app.admin("DELETE", "/api/v1/admin/projects/1/draft", None)
            .await,
    )
    .await;
    assert_eq!(first["discarded"], true);

    let second = body_json(
        app.admin("DELETE", "/api/v1/admin/projects/1/draft", None)
            .await,
    )
    .await;
    assert_eq!(second["discarded"], false);
}

// ---------------------------------------------------------------------------
// Gallery partition logic
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_image_rejects_duplicates_with_distinct_codes() {
    let app = spawn_app().await;

    // "/juhu/IMG_6998.JPG" already lives in project 1's finished gallery.
    let response = app
        .admin(
            "POST",
            "/api/v1/admin/projects/1/gallery/finished",
            Some(json!({ "url": "/juhu/IMG_6998.JPG" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "IMAGE_IN_GALLERY");

    // The same reference on a different project is a global duplicate.
    let response = app
        .admin(
            "POST",
            "/api/v1/admin/projects/4/gallery/development",
            Some(json!({ "url": "/juhu/IMG_6998.JPG" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "IMAGE_IN_USE");
}

#[tokio::test]
async fn gallery_add_and_remove_round_trip() {
    let app = spawn_app().await;

    let response = app
        .admin(
            "POST",
            "/api/v1/admin/projects/1/gallery/development",
            Some(json!({ "url": "/new/site-visit.jpg" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["galleries"]["development"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u == "/new/site-visit.jpg"));

    let response = app
        .admin(
            "DELETE",
            "/api/v1/admin/projects/1/gallery",
            Some(json!({ "url": "/new/site-visit.jpg" })),
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["removed"], true);

    // Removing it again is a no-op, not an error.
    let response = app
        .admin(
            "DELETE",
            "/api/v1/admin/projects/1/gallery",
            Some(json!({ "url": "/new/site-visit.jpg" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["removed"], false);
}

#[tokio::test]
async fn cover_override_and_reset() {
    let app = spawn_app().await;

    let response = app
        .admin(
            "PUT",
            "/api/v1/admin/projects/1/cover",
            Some(json!({ "url": "https://example.com/manual.jpg" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["coverImage"],
        "https://example.com/manual.jpg"
    );

    let response = app
        .admin("DELETE", "/api/v1/admin/projects/1/cover", None)
        .await;
    // Reset re-derives from the first finished image.
    assert_eq!(body_json(response).await["coverImage"], "/juhu/IMG_6998.JPG");
}

#[tokio::test]
async fn cover_suggestions_are_stable_and_distinct() {
    let app = spawn_app().await;

    let first = body_json(
        app.admin("GET", "/api/v1/admin/projects/1/cover/suggestions", None)
            .await,
    )
    .await;
    let second = body_json(
        app.admin("GET", "/api/v1/admin/projects/1/cover/suggestions", None)
            .await,
    )
    .await;
    assert_eq!(first, second, "suggestions must not shuffle");

    let urls = first.as_array().unwrap();
    assert_eq!(urls.len(), 3);
    assert_ne!(urls[0], urls[1]);
    assert_ne!(urls[1], urls[2]);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archive_restore_cycle_over_http() {
    let app = spawn_app().await;

    let response = app
        .admin("POST", "/api/v1/admin/projects/2/archive", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let archived = body_json(response).await;
    assert_eq!(archived["archived"], true);
    assert_eq!(archived["published"], false);

    // Archiving twice conflicts.
    let response = app
        .admin("POST", "/api/v1/admin/projects/2/archive", None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .admin("POST", "/api/v1/admin/projects/2/restore", None)
        .await;
    let restored = body_json(response).await;
    assert_eq!(restored["archived"], false);
    assert_eq!(restored["published"], false, "restore does not republish");
}

#[tokio::test]
async fn restore_discards_a_draft_staged_while_archived() {
    let app = spawn_app().await;

    app.admin("POST", "/api/v1/admin/projects/2/archive", None)
        .await;
    app.admin(
        "PUT",
        "/api/v1/admin/projects/2/draft",
        Some(json!({ "title": "STALE EDIT" })),
    )
    .await;

    let response = app
        .admin("POST", "/api/v1/admin/projects/2/restore", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = body_json(app.admin("GET", "/api/v1/admin/projects/2", None).await).await;
    assert!(detail["draft"].is_null());
    assert_eq!(detail["dirty"], false);
    assert_eq!(detail["project"]["title"], "JREDDY VILLA");
}

#[tokio::test]
async fn restore_all_over_http() {
    let app = spawn_app().await;
    app.service.archive("1").await.unwrap();
    app.service.archive("2").await.unwrap();
    app.admin(
        "PUT",
        "/api/v1/admin/projects/1/draft",
        Some(json!({ "title": "STALE EDIT" })),
    )
    .await;

    let response = app
        .admin("POST", "/api/v1/admin/projects/restore-all", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    let restored = report["restored"].as_array().unwrap();
    assert_eq!(restored.len(), 2);
    assert!(report["failed"].as_array().unwrap().is_empty());

    // Bulk restore drops drafts staged while archived, like single restore.
    let detail = body_json(app.admin("GET", "/api/v1/admin/projects/1", None).await).await;
    assert!(detail["draft"].is_null());
}

// ---------------------------------------------------------------------------
// Bulk restore with a failing backend
// ---------------------------------------------------------------------------

/// Delegates to the local backend but fails restores for one id.
struct FlakyRestoreBackend {
    inner: LocalCatalogBackend,
    fail_id: String,
}

#[async_trait::async_trait]
impl CatalogBackend for FlakyRestoreBackend {
    fn mode(&self) -> BackendMode {
        self.inner.mode()
    }

    async fn load_snapshot(
        &self,
    ) -> Result<Vec<atelier_core::project::ProjectDoc>, BackendError> {
        self.inner.load_snapshot().await
    }

    async fn write(
        &self,
        id: &str,
        patch: &atelier_core::project::ProjectPatch,
    ) -> Result<(), BackendError> {
        self.inner.write(id, patch).await
    }

    async fn archive(&self, id: &str) -> Result<bool, BackendError> {
        self.inner.archive(id).await
    }

    async fn restore(&self, id: &str) -> Result<bool, BackendError> {
        if id == self.fail_id {
            return Err(BackendError::Io(std::io::Error::other("disk full")));
        }
        self.inner.restore(id).await
    }
}

#[tokio::test]
async fn restore_all_reports_partial_failure_per_id() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FlakyRestoreBackend {
        inner: LocalCatalogBackend::new(LocalStore::new(dir.path().join("catalog.json"))),
        fail_id: "1".to_string(),
    };
    let bus = Arc::new(EventBus::default());
    let service = CatalogService::new(Arc::new(backend), bus);
    service.resync().await.unwrap();

    service.archive("1").await.unwrap();
    service.archive("2").await.unwrap();

    let report = service.restore_all().await;
    assert_eq!(report.restored, vec!["2".to_string()]);
    assert_eq!(report.failed, vec!["1".to_string()]);

    // The failed id stays archived; the successful one is active again.
    let status = service.status().await;
    assert_eq!(status.archived_count, 1);
}

// ---------------------------------------------------------------------------
// Remote-style backend with an initially empty collection
// ---------------------------------------------------------------------------

/// Behaves like the SQL backend: the collection starts empty, writes
/// upsert rows, and archive/restore only flag rows that exist.
struct UnseededRemoteBackend {
    rows: Mutex<HashMap<String, Project>>,
}

impl UnseededRemoteBackend {
    fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl CatalogBackend for UnseededRemoteBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Remote
    }

    async fn load_snapshot(&self) -> Result<Vec<ProjectDoc>, BackendError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().map(ProjectDoc::from_project).collect())
    }

    async fn write(&self, id: &str, patch: &ProjectPatch) -> Result<(), BackendError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.entry(id.to_string()).or_insert_with(|| {
            ProjectDoc {
                id: id.to_string(),
                ..Default::default()
            }
            .merge_over(None)
        });
        patch.apply_to(row);
        Ok(())
    }

    async fn archive(&self, id: &str) -> Result<bool, BackendError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(id) {
            Some(row) if !row.archived => {
                row.archived = true;
                row.published = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore(&self, id: &str) -> Result<bool, BackendError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(id) {
            Some(row) if row.archived => {
                row.archived = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[tokio::test]
async fn archiving_an_unwritten_default_survives_a_resync() {
    let backend = Arc::new(UnseededRemoteBackend::new());
    let bus = Arc::new(EventBus::default());
    let service = CatalogService::new(backend, bus);
    service.resync().await.unwrap();

    // Project "1" exists only as a bundled default; the collection has no
    // row for it yet, so a flag-only update would match nothing.
    service.archive("1").await.unwrap();
    assert_eq!(service.status().await.archived_count, 1);

    // A full re-merge must not resurrect the project.
    service.resync().await.unwrap();
    let detail = service.admin_get("1").await.unwrap();
    assert!(detail.project.archived);
    assert!(!detail.project.published);
    assert_eq!(
        detail.project.title, "JUHU VILLA",
        "the created row carries the real record, not fallback strings"
    );
}

#[tokio::test]
async fn archiving_a_written_row_stays_an_update() {
    let backend = Arc::new(UnseededRemoteBackend::new());
    let bus = Arc::new(EventBus::default());
    let service = CatalogService::new(backend, bus);
    service.resync().await.unwrap();

    // A saved draft writes the row first; archive then flags it in place.
    service
        .update_draft(
            "3",
            &atelier_core::draft::DraftPatch {
                description: Some("Clubhouse refresh".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    service.save_project("3").await.unwrap();
    service.archive("3").await.unwrap();

    service.resync().await.unwrap();
    let detail = service.admin_get("3").await.unwrap();
    assert!(detail.project.archived);
    assert_eq!(detail.project.description.as_deref(), Some("Clubhouse refresh"));
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

fn multipart_request(app: &TestApp, parts: &[(&str, &str)]) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let mut body = String::new();
    for (filename, content) in parts {
        body.push_str(&format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/v1/admin/uploads")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_stores_and_serves_the_image() {
    let app = spawn_app().await;

    let request = multipart_request(&app, &[("site.jpg", "fakeimagebytes")]);
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let url = body["files"][0]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".jpg"));

    // The stored file is served back under the same reference.
    let response = app.get(&url).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fakeimagebytes");
}

#[tokio::test]
async fn one_rejected_file_does_not_abort_the_batch() {
    let app = spawn_app().await;

    let request = multipart_request(&app, &[("notes.txt", "hello"), ("plan.png", "pngbytes")]);
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0]["error"].as_str().unwrap().contains("unsupported"));
    assert!(files[1]["url"].as_str().unwrap().ends_with(".png"));
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_reports_backend_mode_and_counts() {
    let app = spawn_app().await;
    app.service.archive("3").await.unwrap();

    let status = body_json(app.admin("GET", "/api/v1/admin/status", None).await).await;
    assert_eq!(status["backend"], "local");
    assert_eq!(status["recordCount"], 9);
    assert_eq!(status["archivedCount"], 1);
    assert!(status["syncError"].is_null());
}
