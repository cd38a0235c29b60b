pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod vault;

pub use pipeline::decompose::{ChatClient, Decomposer, LlmClient};
pub use pipeline::dispatcher::{DispatchError, DispatchedRecord, Dispatcher};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and long-running hosts embedding the
/// pipeline. Library callers that bring their own subscriber skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Wire a dispatcher from environment settings: chat client against the
/// configured model endpoint, GitHub-backed vault, file-backed database.
pub fn dispatcher_from_env() -> Result<Dispatcher, db::DatabaseError> {
    let settings = config::Settings::from_env();

    let llm = ChatClient::new(
        &settings.model_base_url,
        settings.model_api_key.clone(),
        settings.request_timeout_secs,
    );
    let mut decomposer = Decomposer::new(Box::new(llm));
    if !settings.candidate_models.is_empty() {
        decomposer = decomposer.with_candidates(settings.candidate_models.clone());
    }

    let vault = vault::GitHubVault::new(
        &settings.vault_repo,
        &settings.vault_branch,
        settings.vault_token.clone(),
        settings.request_timeout_secs,
    );

    std::fs::create_dir_all(config::app_data_dir()).ok();
    let conn = db::sqlite::open_database(&config::database_path())?;

    Ok(Dispatcher::new(decomposer, Box::new(vault), conn))
}
