//! Advancing a result set by clicking its "next page" control.
//!
//! The controller has two outcomes: [`NextPage::HasNext`] after it clicked
//! an enabled control and waited for the new results, or
//! [`NextPage::NoNext`] when no enabled control exists. The latter is the
//! normal end of a result set, not an error.

use std::time::Duration;

use crate::browser::{Browser, BrowserError, Readiness};
use crate::selectors::{NEXT_PAGE, PRODUCT_CONTAINER};

/// Default bound on the readiness wait after a load or click.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    HasNext,
    NoNext,
}

/// Waits until at least one product card is present.
///
/// Readiness is best-effort: a timeout is logged and reported, and the
/// caller carries on with whatever has loaded.
///
/// # Errors
///
/// Returns [`BrowserError`] only if the browser itself fails.
pub fn wait_for_products<B: Browser>(
    browser: &mut B,
    timeout: Duration,
) -> Result<Readiness, BrowserError> {
    let readiness = browser.wait_for(PRODUCT_CONTAINER, timeout)?;
    if readiness == Readiness::TimedOut {
        tracing::warn!(
            timeout_secs = timeout.as_secs(),
            "timed out waiting for product elements; continuing with whatever is currently loaded"
        );
    }
    Ok(readiness)
}

/// Clicks the enabled "next page" control, if any, and waits for the next
/// page's results.
///
/// # Errors
///
/// Returns [`BrowserError`] if the control cannot be queried or activated,
/// or the follow-up navigation fails.
pub fn advance<B: Browser>(browser: &mut B, timeout: Duration) -> Result<NextPage, BrowserError> {
    let activated = {
        let controls = browser.find_all(NEXT_PAGE)?;
        match controls.first() {
            Some(next) => {
                browser.invoke(next)?;
                true
            }
            None => false,
        }
    };

    if !activated {
        tracing::info!("no next page button found; stopping pagination");
        return Ok(NextPage::NoNext);
    }

    wait_for_products(browser, timeout)?;
    Ok(NextPage::HasNext)
}
