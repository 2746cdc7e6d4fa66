//! A [`Browser`] over fixed HTML, backed by the `scraper` crate.
//!
//! Pages come from an in-memory map keyed by URL or, for `file://` URLs,
//! from disk. Activating an element follows its `href`; the navigation is
//! committed on the next [`Browser::wait_for`], mirroring how a click in a
//! real browser only settles once the caller waits for the new page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{Browser, BrowserError, Element, Readiness};

struct LoadedPage {
    url: Option<Url>,
    source: String,
    document: Html,
}

#[derive(Default)]
pub struct StaticBrowser {
    pages: HashMap<String, String>,
    current: Option<LoadedPage>,
    pending: RefCell<Option<String>>,
}

impl StaticBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `html` to be served for `url`.
    #[must_use]
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(page_key(url), html.into());
        self
    }

    /// URL of the loaded page, if any.
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.current
            .as_ref()
            .and_then(|page| page.url.as_ref())
            .map(Url::as_str)
    }

    fn fetch(&self, url: &str) -> Result<String, BrowserError> {
        if let Some(html) = self.pages.get(&page_key(url)) {
            return Ok(html.clone());
        }

        let navigation = |reason: &str| BrowserError::Navigation {
            url: url.to_owned(),
            reason: reason.to_owned(),
        };
        let parsed = Url::parse(url).map_err(|e| navigation(&e.to_string()))?;
        if parsed.scheme() != "file" {
            return Err(navigation("no page registered for this URL"));
        }
        let path = parsed
            .to_file_path()
            .map_err(|()| navigation("not a local file path"))?;
        std::fs::read_to_string(&path).map_err(|source| BrowserError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn loaded(&self) -> Result<&LoadedPage, BrowserError> {
        self.current.as_ref().ok_or(BrowserError::NoPage)
    }
}

impl Browser for StaticBrowser {
    type Element<'a> = StaticElement<'a>;

    fn load(&mut self, url: &str) -> Result<(), BrowserError> {
        let source = self.fetch(url)?;
        let document = Html::parse_document(&source);
        self.current = Some(LoadedPage {
            url: Url::parse(url).ok(),
            source,
            document,
        });
        tracing::debug!(url, "loaded static page");
        Ok(())
    }

    fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self.loaded()?.source.clone())
    }

    fn find_all(&self, selector: &str) -> Result<Vec<StaticElement<'_>>, BrowserError> {
        let page = self.loaded()?;
        let selector = parse_selector(selector)?;
        Ok(page
            .document
            .select(&selector)
            .map(|node| StaticElement {
                node,
                base: page.url.as_ref(),
            })
            .collect())
    }

    fn invoke(&self, element: &StaticElement<'_>) -> Result<(), BrowserError> {
        let href = element
            .attribute("href")?
            .filter(|href| !href.is_empty())
            .ok_or_else(|| BrowserError::Driver {
                operation: "invoke",
                reason: "element has no href to follow".to_owned(),
            })?;
        *self.pending.borrow_mut() = Some(href);
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<Readiness, BrowserError> {
        let pending = self.pending.get_mut().take();
        if let Some(url) = pending {
            self.load(&url)?;
        }

        // Static markup never changes, so there is nothing to wait for.
        let selector = parse_selector(selector)?;
        if self.loaded()?.document.select(&selector).next().is_some() {
            Ok(Readiness::Ready)
        } else {
            Ok(Readiness::TimedOut)
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StaticElement<'a> {
    node: ElementRef<'a>,
    base: Option<&'a Url>,
}

impl Element for StaticElement<'_> {
    fn find(&self, selector: &str) -> Result<Option<Self>, BrowserError> {
        let selector = parse_selector(selector)?;
        Ok(self.node.select(&selector).next().map(|node| Self {
            node,
            base: self.base,
        }))
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self>, BrowserError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .node
            .select(&selector)
            .map(|node| Self {
                node,
                base: self.base,
            })
            .collect())
    }

    fn text(&self) -> Result<String, BrowserError> {
        let raw: String = self.node.text().collect();
        Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        let Some(raw) = self.node.value().attr(name) else {
            return Ok(None);
        };
        if name == "href" {
            if let Some(resolved) = self.base.and_then(|base| base.join(raw).ok()) {
                return Ok(Some(resolved.into()));
            }
        }
        Ok(Some(raw.to_owned()))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|e| BrowserError::Selector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

/// Map key for a URL: normalized when it parses, verbatim otherwise.
fn page_key(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_owned(), |u| u.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="card" data-id="1">
            <a class="link" href="/product-1">  First
              <span>item</span> </a>
          </div>
          <div class="card" data-id="2"><a class="link" href="https://other.test/p2">Second</a></div>
          <a class="next" href="?k=mouse&amp;page=2">Next</a>
        </body></html>
    "#;

    fn loaded() -> StaticBrowser {
        let mut browser = StaticBrowser::new()
            .with_page("https://shop.test/s?k=mouse", LISTING)
            .with_page(
                "https://shop.test/s?k=mouse&page=2",
                "<div class='card'>page two</div>",
            );
        browser.load("https://shop.test/s?k=mouse").unwrap();
        browser
    }

    #[test]
    fn find_all_returns_document_order() {
        let browser = loaded();
        let cards = browser.find_all("div.card").unwrap();
        let ids: Vec<_> = cards
            .iter()
            .map(|c| c.attribute("data-id").unwrap().unwrap())
            .collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn text_collapses_whitespace() {
        let browser = loaded();
        let link = browser.find_all("a.link").unwrap().remove(0);
        assert_eq!(link.text().unwrap(), "First item");
    }

    #[test]
    fn href_is_resolved_against_page_url() {
        let browser = loaded();
        let links = browser.find_all("a.link").unwrap();
        assert_eq!(
            links[0].attribute("href").unwrap().as_deref(),
            Some("https://shop.test/product-1")
        );
        assert_eq!(
            links[1].attribute("href").unwrap().as_deref(),
            Some("https://other.test/p2")
        );
    }

    #[test]
    fn find_is_scoped_to_descendants() {
        let browser = loaded();
        let card = browser.find_all("div.card").unwrap().remove(0);
        assert!(card.find("div.card").unwrap().is_none());
        assert!(card.find("span").unwrap().is_some());
    }

    #[test]
    fn missing_attribute_is_none() {
        let browser = loaded();
        let card = browser.find_all("div.card").unwrap().remove(0);
        assert!(card.attribute("title").unwrap().is_none());
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let browser = loaded();
        assert!(matches!(
            browser.find_all("div[").unwrap_err(),
            BrowserError::Selector { .. }
        ));
    }

    #[test]
    fn invoke_navigates_on_wait() {
        let mut browser = loaded();
        {
            let next = browser.find_all("a.next").unwrap().remove(0);
            browser.invoke(&next).unwrap();
        }
        assert_eq!(browser.current_url(), Some("https://shop.test/s?k=mouse"));

        let readiness = browser
            .wait_for("div.card", Duration::from_secs(1))
            .unwrap();
        assert_eq!(readiness, Readiness::Ready);
        assert_eq!(
            browser.current_url(),
            Some("https://shop.test/s?k=mouse&page=2")
        );
    }

    #[test]
    fn wait_for_reports_timeout_when_selector_absent() {
        let mut browser = loaded();
        let readiness = browser
            .wait_for("div.missing", Duration::from_secs(1))
            .unwrap();
        assert_eq!(readiness, Readiness::TimedOut);
    }

    #[test]
    fn unknown_http_url_fails_navigation() {
        let mut browser = StaticBrowser::new();
        let err = browser.load("https://nowhere.test/").unwrap_err();
        assert!(matches!(err, BrowserError::Navigation { .. }));
    }

    #[test]
    fn queries_before_load_fail() {
        let browser = StaticBrowser::new();
        assert!(matches!(
            browser.find_all("div").unwrap_err(),
            BrowserError::NoPage
        ));
    }

    #[test]
    fn loads_file_urls_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<div class='card'>on disk</div>").unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let mut browser = StaticBrowser::new();
        browser.load(url.as_str()).unwrap();
        assert_eq!(browser.find_all("div.card").unwrap().len(), 1);
        assert!(browser.page_source().unwrap().contains("on disk"));
    }
}
