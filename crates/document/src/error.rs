#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF serialization error: {0}")]
    Serialize(String),
}
