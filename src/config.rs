use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Moltboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/Moltboard on all platforms)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Moltboard")
}

/// Path of the tabular store database
pub fn database_path() -> PathBuf {
    app_data_dir().join("moltboard.db")
}

pub fn default_log_filter() -> &'static str {
    "info"
}

/// Runtime settings resolved from the environment. Missing credentials are
/// carried as `None` so the adapters can degrade instead of panicking at
/// startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model_base_url: String,
    pub model_api_key: Option<String>,
    pub candidate_models: Vec<String>,
    pub vault_repo: String,
    pub vault_branch: String,
    pub vault_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            model_base_url: env_or("MODEL_API_BASE", "https://api.deepseek.com"),
            model_api_key: non_empty(std::env::var("MODEL_API_KEY").ok()),
            candidate_models: split_models(&env_or("MODEL_CANDIDATES", "")),
            vault_repo: env_or("VAULT_REPO", ""),
            vault_branch: env_or("VAULT_BRANCH", "main"),
            vault_token: non_empty(std::env::var("GITHUB_TOKEN").ok()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "120")
                .parse()
                .unwrap_or(120),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn split_models(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
