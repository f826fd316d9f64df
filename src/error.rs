use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Build lookup failed: {0}")]
    Resolution(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
