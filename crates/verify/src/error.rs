//! Error types for the verification harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Dev server failed to start: {0}")]
    ServerSpawn(String),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Browser verification failed: {0}")]
    Browser(String),

    #[error("Screenshot invalid: {0}")]
    Screenshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type VerifyResult<T> = Result<T, VerifyError>;
