use super::llm::LlmClient;
use super::normalize::draft_from_value;
use super::parser::parse_payload;
use super::prompt::build_dispatch_prompt;
use super::sanitize::sanitize_for_model;
use super::DecomposeError;
use crate::models::RecordDraft;

/// Candidate models in order of preference. The first one that produces
/// parseable, non-empty output wins.
pub const DEFAULT_CANDIDATE_MODELS: &[&str] = &["deepseek-chat", "gemini-2.0-flash"];

/// Splits free-form text into normalized intel drafts via a generative
/// model: sanitize → prompt → candidate fallback → parse → normalize.
pub struct Decomposer {
    llm: Box<dyn LlmClient + Send + Sync>,
    candidates: Vec<String>,
}

impl Decomposer {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            llm,
            candidates: DEFAULT_CANDIDATE_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        if !candidates.is_empty() {
            self.candidates = candidates;
        }
        self
    }

    /// Decompose raw text into zero-or-more drafts.
    ///
    /// `Ok(vec![])` means every candidate that answered produced nothing
    /// usable: "nothing to dispatch", not a failure. `Err` is reserved for
    /// the case where no candidate ever answered (network/auth down across
    /// the board), which callers may surface and retry.
    pub fn decompose(&self, raw_text: &str) -> Result<Vec<RecordDraft>, DecomposeError> {
        let sanitized = sanitize_for_model(raw_text);
        if sanitized.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = build_dispatch_prompt(&sanitized);

        let mut any_answered = false;
        let mut last_error: Option<DecomposeError> = None;

        for model in &self.candidates {
            let response = match self.llm.generate(model, &prompt) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Candidate model failed");
                    last_error = Some(e);
                    continue;
                }
            };
            any_answered = true;

            let Some(items) = parse_payload(&response) else {
                tracing::warn!(model = %model, "Candidate produced unparseable output");
                continue;
            };

            let drafts: Vec<RecordDraft> = items
                .iter()
                .filter_map(|item| draft_from_value(item, &sanitized))
                .collect();

            if !drafts.is_empty() {
                tracing::info!(model = %model, count = drafts.len(), "Decomposition complete");
                return Ok(drafts);
            }
            tracing::warn!(model = %model, "Candidate produced an empty decomposition");
        }

        if any_answered {
            // Models answered but nothing parsed: nothing to do
            return Ok(Vec::new());
        }
        Err(DecomposeError::AllCandidatesUnreachable(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no candidate models configured".into()),
        ))
    }
}
