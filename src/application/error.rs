#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to load library: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to save library: {0}")]
    Save(#[source] Box<dyn std::error::Error + Send + Sync>),
}
