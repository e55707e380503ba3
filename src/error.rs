use thiserror::Error;

/// Errors surfaced by the report pipeline.
///
/// Layout itself never fails: missing case data degrades to placeholders. The
/// only failures are configuration problems caught before any page exists,
/// undecodable inputs, and host-side I/O.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid report config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("invalid case record: {0}")]
    InvalidCase(#[from] serde_json::Error),

    #[error("invalid font data: {0}")]
    InvalidFont(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
