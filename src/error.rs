use thiserror::Error;

/// Failures a walk cycle can hit. Every variant except `Export` aborts the
/// current cycle; the next tick starts over from the active page.
#[derive(Error, Debug)]
pub enum SurfError {
    #[error("no active page loaded")]
    NoActivePage,

    #[error("page lookup failed: {0}")]
    PageLookup(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("link extraction failed: {0}")]
    Extraction(String),

    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),

    #[error("invalid seed URL: {0}")]
    InvalidSeed(String),
}

pub type Result<T> = std::result::Result<T, SurfError>;
