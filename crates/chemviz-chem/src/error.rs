use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChemError {
    #[error("SMILES parse error at byte {position}: {message}")]
    Parse { message: String, position: usize },

    #[error("3D embedding failed: {0}")]
    Embed(String),
}

impl ChemError {
    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        ChemError::Parse { message: message.into(), position }
    }
}

pub type Result<T> = std::result::Result<T, ChemError>;
