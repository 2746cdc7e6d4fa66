//! A [`Browser`] backed by a headless Chrome session via `headless_chrome`.
//!
//! `headless_chrome` reports a missing element as an error, so every lookup
//! first asks the page how many nodes match and only then fetches handles.
//! That keeps "not found" distinct from a real driver failure.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser as Chrome, LaunchOptions, Tab};
use pricewalk_core::AppConfig;
use serde_json::Value;

use super::{Browser, BrowserError, Element, Readiness};

/// Returns `this[name]` when it is a non-empty string (so `href` comes back
/// resolved), otherwise the raw attribute.
const READ_ATTRIBUTE_JS: &str = "function(name) { \
     const prop = this[name]; \
     if (typeof prop === 'string' && prop !== '') { return prop; } \
     return this.getAttribute(name); }";

const HAS_DESCENDANT_JS: &str = "function(sel) { return this.querySelector(sel) !== null; }";

const COUNT_DESCENDANTS_JS: &str = "function(sel) { return this.querySelectorAll(sel).length; }";

const PROGRAMMATIC_CLICK_JS: &str = "function() { this.click(); }";

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub user_agent: String,
}

impl From<&AppConfig> for ChromeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            headless: config.headless,
            window_size: config.window_size(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// One Chrome process with a single tab. Dropping it closes the tab and
/// shuts the process down.
pub struct ChromeBrowser {
    // Declared before `_chrome` so the tab is released first.
    tab: Arc<Tab>,
    _chrome: Chrome,
}

impl ChromeBrowser {
    /// Launches Chrome and opens the tab all navigation happens in.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Driver`] if Chrome cannot be found or started.
    pub fn launch(options: &ChromeOptions) -> Result<Self, BrowserError> {
        let launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .sandbox(false)
            .window_size(Some(options.window_size))
            .args(vec![
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
            ])
            .build()
            .map_err(driver("launch"))?;

        let chrome = Chrome::new(launch_options).map_err(driver("launch"))?;
        let tab = chrome.new_tab().map_err(driver("new_tab"))?;
        tab.set_user_agent(&options.user_agent, None, None)
            .map_err(driver("set_user_agent"))?;

        tracing::info!(headless = options.headless, "launched headless Chrome");
        Ok(Self {
            tab,
            _chrome: chrome,
        })
    }

    fn count(&self, selector: &str) -> Result<u64, BrowserError> {
        let expression = format!(
            "document.querySelectorAll({}).length",
            Value::String(selector.to_owned())
        );
        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(driver("find_all"))?;
        Ok(result.value.as_ref().and_then(Value::as_u64).unwrap_or(0))
    }
}

impl Drop for ChromeBrowser {
    fn drop(&mut self) {
        if let Err(err) = self.tab.close(false) {
            tracing::debug!(error = %err, "failed to close Chrome tab");
        }
    }
}

impl Browser for ChromeBrowser {
    type Element<'a> = ChromeElement<'a>;

    fn load(&mut self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| BrowserError::Navigation {
                url: url.to_owned(),
                reason: format!("{e:#}"),
            })?;
        Ok(())
    }

    fn page_source(&self) -> Result<String, BrowserError> {
        self.tab.get_content().map_err(driver("page_source"))
    }

    fn find_all(&self, selector: &str) -> Result<Vec<ChromeElement<'_>>, BrowserError> {
        if self.count(selector)? == 0 {
            return Ok(Vec::new());
        }
        let elements = self
            .tab
            .find_elements(selector)
            .map_err(driver("find_all"))?;
        Ok(elements.into_iter().map(ChromeElement).collect())
    }

    fn invoke(&self, element: &ChromeElement<'_>) -> Result<(), BrowserError> {
        match element.0.call_js_fn(PROGRAMMATIC_CLICK_JS, vec![], false) {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::debug!(error = %err, "programmatic click failed; falling back to pointer click");
                element.0.click().map_err(driver("click"))?;
                Ok(())
            }
        }
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<Readiness, BrowserError> {
        match self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
        {
            Ok(_) => Ok(Readiness::Ready),
            Err(err) => {
                tracing::debug!(selector, error = %err, "selector did not appear");
                Ok(Readiness::TimedOut)
            }
        }
    }
}

pub struct ChromeElement<'a>(headless_chrome::Element<'a>);

impl ChromeElement<'_> {
    fn call(&self, operation: &'static str, js: &str, arg: &str) -> Result<Value, BrowserError> {
        let result = self
            .0
            .call_js_fn(js, vec![Value::String(arg.to_owned())], false)
            .map_err(driver(operation))?;
        Ok(result.value.unwrap_or(Value::Null))
    }
}

impl Element for ChromeElement<'_> {
    fn find(&self, selector: &str) -> Result<Option<Self>, BrowserError> {
        let present = self.call("find", HAS_DESCENDANT_JS, selector)?;
        if present.as_bool() != Some(true) {
            return Ok(None);
        }
        let element = self.0.find_element(selector).map_err(driver("find"))?;
        Ok(Some(ChromeElement(element)))
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self>, BrowserError> {
        let count = self.call("find_all", COUNT_DESCENDANTS_JS, selector)?;
        if count.as_u64().unwrap_or(0) == 0 {
            return Ok(Vec::new());
        }
        let elements = self.0.find_elements(selector).map_err(driver("find_all"))?;
        Ok(elements.into_iter().map(ChromeElement).collect())
    }

    fn text(&self) -> Result<String, BrowserError> {
        let raw = self.0.get_inner_text().map_err(driver("text"))?;
        Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        let value = self.call("attribute", READ_ATTRIBUTE_JS, name)?;
        Ok(value.as_str().map(str::to_owned))
    }
}

fn driver<E: std::fmt::Display>(operation: &'static str) -> impl FnOnce(E) -> BrowserError {
    move |err| BrowserError::Driver {
        operation,
        reason: format!("{err:#}"),
    }
}
