use thiserror::Error;

/// Errors raised while building a backdrop.
///
/// Nothing on the per-frame path returns these; ticks recover locally.
#[derive(Debug, Error)]
pub enum StardriftError {
    #[error("failed to parse backdrop config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid backdrop config: {0}")]
    InvalidConfig(String),

    #[error("malformed color value: {0:?}")]
    MalformedColor(String),
}
