pub mod github;

pub use github::*;

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("No vault token configured")]
    MissingToken,

    #[error("No vault repository configured")]
    MissingRepo,

    #[error("Vault unreachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Vault rejected write (status {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Malformed vault response: {0}")]
    ResponseParsing(String),
}

/// Document store: create-or-update a text file at a two-level virtual path
/// in a versioned tree.
///
/// `publish` is an upsert: re-publishing the same computed filename (two
/// dispatches producing identically-titled cards in the same second)
/// silently overwrites the previous version. Each write leaves its own
/// history entry, so nothing is lost, but the reference keeps pointing at
/// the newest content.
///
/// Failure is a value, never a panic or an error bubbling past this
/// boundary: `None` covers missing credentials, network failure, and remote
/// rejection alike, and the caller substitutes its failure sentinel.
pub trait DocVault {
    fn publish(&self, folder: &str, filename: &str, content: &str) -> Option<String>;
}

/// In-memory vault for tests: records every publish, optionally fails.
pub struct MockVault {
    files: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl MockVault {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    /// A vault where every publish fails (e.g. missing token).
    pub fn failing() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    pub fn published_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn content_of(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn publish_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Default for MockVault {
    fn default() -> Self {
        Self::new()
    }
}

impl DocVault for MockVault {
    fn publish(&self, folder: &str, filename: &str, content: &str) -> Option<String> {
        if self.fail {
            return None;
        }
        let path = format!("{folder}/{filename}");
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), content.to_string());
        Some(format!("https://vault.test/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_vault_records_publishes() {
        let vault = MockVault::new();
        let url = vault.publish("00_Inbox", "note.md", "# hello").unwrap();
        assert_eq!(url, "https://vault.test/00_Inbox/note.md");
        assert_eq!(vault.content_of("00_Inbox/note.md").unwrap(), "# hello");
    }

    #[test]
    fn mock_vault_upsert_overwrites() {
        let vault = MockVault::new();
        vault.publish("00_Inbox", "note.md", "v1").unwrap();
        vault.publish("00_Inbox", "note.md", "v2").unwrap();
        assert_eq!(vault.publish_count(), 1);
        assert_eq!(vault.content_of("00_Inbox/note.md").unwrap(), "v2");
    }

    #[test]
    fn failing_vault_returns_none() {
        let vault = MockVault::failing();
        assert!(vault.publish("00_Inbox", "note.md", "x").is_none());
        assert_eq!(vault.publish_count(), 0);
    }
}
