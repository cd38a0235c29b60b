use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use super::{DocVault, VaultError};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Document vault backed by a GitHub repository via the contents API.
/// Every publish is one commit on the configured branch.
pub struct GitHubVault {
    repo: String,
    branch: String,
    token: Option<String>,
    api_base: String,
    client: reqwest::blocking::Client,
}

impl GitHubVault {
    pub fn new(repo: &str, branch: &str, token: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            repo: repo.to_string(),
            branch: branch.to_string(),
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        }
    }

    /// Point at a non-default API host (tests, GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn try_publish(&self, path: &str, content: &str) -> Result<String, VaultError> {
        let token = self.token.as_deref().ok_or(VaultError::MissingToken)?;
        if self.repo.is_empty() {
            return Err(VaultError::MissingRepo);
        }

        let url = format!("{}/repos/{}/contents/{}", self.api_base, self.repo, path);

        // Upsert: an existing blob's SHA must be echoed back or the PUT is
        // rejected as a conflict.
        let existing_sha = self.blob_sha(&url, token)?;

        let mut body = json!({
            "message": format!("Archive {path}"),
            "content": base64::engine::general_purpose::STANDARD.encode(content),
            "branch": self.branch,
        });
        if let Some(sha) = existing_sha {
            body["sha"] = json!(sha);
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", crate::config::APP_NAME)
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VaultError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PutContentsResponse = response
            .json()
            .map_err(|e| VaultError::ResponseParsing(e.to_string()))?;

        Ok(parsed
            .content
            .and_then(|c| c.html_url)
            .unwrap_or_else(|| {
                format!(
                    "https://github.com/{}/blob/{}/{}",
                    self.repo, self.branch, path
                )
            }))
    }

    /// SHA of the existing blob at `url`, or None if the path is new.
    fn blob_sha(&self, url: &str, token: &str) -> Result<Option<String>, VaultError> {
        let response = self
            .client
            .get(url)
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", crate::config::APP_NAME)
            .send()
            .map_err(|e| self.transport_error(e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VaultError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BlobResponse = response
            .json()
            .map_err(|e| VaultError::ResponseParsing(e.to_string()))?;
        Ok(Some(parsed.sha))
    }

    fn transport_error(&self, e: reqwest::Error) -> VaultError {
        if e.is_connect() {
            VaultError::Connection(self.api_base.clone())
        } else {
            VaultError::HttpClient(e.to_string())
        }
    }
}

#[derive(Deserialize)]
struct BlobResponse {
    sha: String,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    content: Option<PutContentsFile>,
}

#[derive(Deserialize)]
struct PutContentsFile {
    html_url: Option<String>,
}

impl DocVault for GitHubVault {
    fn publish(&self, folder: &str, filename: &str, content: &str) -> Option<String> {
        let path = format!("{folder}/{filename}");
        match self.try_publish(&path, content) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Vault publish failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_reports_failure_as_value() {
        let vault = GitHubVault::new("owner/notes", "main", None, 5);
        assert!(vault.publish("00_Inbox", "a.md", "content").is_none());
    }

    #[test]
    fn missing_repo_reports_failure_as_value() {
        let vault = GitHubVault::new("", "main", Some("ghp_test".into()), 5);
        assert!(vault.publish("00_Inbox", "a.md", "content").is_none());
    }

    #[test]
    fn api_base_trims_trailing_slash() {
        let vault = GitHubVault::new("owner/notes", "main", None, 5)
            .with_api_base("http://127.0.0.1:9/");
        assert_eq!(vault.api_base, "http://127.0.0.1:9");
    }

    #[test]
    fn unreachable_host_reports_failure_as_value() {
        // Port 9 (discard) refuses connections; publish must degrade to None
        let vault = GitHubVault::new("owner/notes", "main", Some("ghp_test".into()), 1)
            .with_api_base("http://127.0.0.1:9");
        assert!(vault.publish("00_Inbox", "a.md", "content").is_none());
    }
}
