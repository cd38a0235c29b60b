pub mod decomposer;
pub mod llm;
pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod sanitize;

pub use decomposer::*;
pub use llm::*;
pub use normalize::*;
pub use parser::*;
pub use prompt::*;
pub use sanitize::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecomposeError {
    #[error("Model endpoint unreachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model provider returned error (status {status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed completion envelope: {0}")]
    ResponseParsing(String),

    #[error("No candidate model answered: {0}")]
    AllCandidatesUnreachable(String),
}
