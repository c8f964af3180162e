//! Error types for the resolution and derivation pipeline.

use chemviz_chem::ChemError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The structure oracle could not be reached or refused the request.
    /// Recoverable: the resolver falls through to the database stage.
    #[error("structure oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// The oracle answered, but no usable JSON object could be extracted.
    /// Recoverable: the resolver falls through to the database stage.
    #[error("malformed oracle response: {0}")]
    MalformedOracleResponse(String),

    /// The reference database has no compound under the queried name.
    /// Recoverable: the resolver falls through to direct parsing.
    #[error("no compound found for '{0}'")]
    CompoundNotFound(String),

    /// The text is not parseable structural notation.
    #[error("invalid chemical notation: {0}")]
    InvalidNotation(String),

    /// 3D coordinate generation failed for an otherwise valid structure.
    #[error("3D embedding failed: {0}")]
    EmbeddingFailure(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ChemError> for CoreError {
    fn from(err: ChemError) -> Self {
        match err {
            ChemError::Parse { .. } => CoreError::InvalidNotation(err.to_string()),
            ChemError::Embed(message) => CoreError::EmbeddingFailure(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chem_errors_map_to_taxonomy() {
        let parse = ChemError::parse("unexpected character '?'", 2);
        assert!(matches!(
            CoreError::from(parse),
            CoreError::InvalidNotation(_)
        ));

        let embed = ChemError::Embed("molecule has no atoms".into());
        match CoreError::from(embed) {
            CoreError::EmbeddingFailure(msg) => assert_eq!(msg, "molecule has no atoms"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_display_messages_are_specific() {
        let err = CoreError::CompoundNotFound("asdkjasd".into());
        assert_eq!(err.to_string(), "no compound found for 'asdkjasd'");
    }
}
