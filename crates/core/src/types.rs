/// Project identifiers are opaque strings: the bundled defaults use short
/// numeric strings, admin-created projects use UUIDs.
pub type ProjectId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
