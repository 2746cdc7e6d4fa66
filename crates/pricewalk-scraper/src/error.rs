use pricewalk_core::CoreError;
use thiserror::Error;

use crate::browser::BrowserError;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Request(#[from] CoreError),
}
