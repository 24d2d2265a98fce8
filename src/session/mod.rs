//! Browser session capability consumed by the harvest pipeline.
//!
//! [`BrowserSession`] is the seam between the pipeline and the live
//! browser. Elements are addressed as `(selector, index)` pairs resolved
//! fresh on every call — the DOM is treated as volatile across any
//! navigation, so the trait deliberately exposes no persistent element
//! handles that could go stale.
//!
//! The production implementation is [`page::LivePage`]; tests drive the
//! pipeline with scripted in-memory implementations.

pub mod page;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a native click attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The element received a trusted click.
    Clicked,
    /// Another element covers the target's center point; the click was
    /// withheld. Callers retry with [`BrowserSession::force_click`].
    Intercepted,
    /// The element no longer exists at that index (stale collection).
    Missing,
}

/// One exclusively-owned live browser page.
///
/// All methods take `&mut self`: the page's "current document" is shared
/// mutable state, and the pipeline is strictly sequential by design.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to a URL and wait for the load to commit.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// The page's current URL.
    async fn current_url(&mut self) -> Result<String>;

    /// Poll until at least one element matches `selector`, or the timeout
    /// elapses. Returns whether a match appeared.
    async fn wait_for_presence(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    /// Number of elements currently matching `selector`.
    async fn count(&mut self, selector: &str) -> Result<usize>;

    /// Scroll the `index`-th match into the viewport center. Returns false
    /// if no such element exists.
    async fn scroll_into_view(&mut self, selector: &str, index: usize) -> Result<bool>;

    /// Scroll a container element to its bottom.
    async fn scroll_to_bottom(&mut self, selector: &str) -> Result<()>;

    /// Scroll a container element down by a pixel delta.
    async fn scroll_by(&mut self, selector: &str, delta: i64) -> Result<()>;

    /// Click the `index`-th match with a trusted click.
    async fn click(&mut self, selector: &str, index: usize) -> Result<ClickOutcome>;

    /// Dispatch a synthetic click event directly on the `index`-th match,
    /// bypassing hit testing. Returns false if the element is missing.
    async fn force_click(&mut self, selector: &str, index: usize) -> Result<bool>;

    /// Rendered text of the `index`-th match.
    async fn read_text(&mut self, selector: &str, index: usize) -> Result<Option<String>>;

    /// Attribute value of the `index`-th match.
    async fn read_attribute(
        &mut self,
        selector: &str,
        index: usize,
        name: &str,
    ) -> Result<Option<String>>;

    /// Outer markup of the `index`-th match (the card snapshot source).
    async fn outer_markup(&mut self, selector: &str, index: usize) -> Result<Option<String>>;

    /// Set an input's value and fire its input event. Returns false if the
    /// element is missing.
    async fn fill(&mut self, selector: &str, value: &str) -> Result<bool>;

    /// Send a named key (e.g. `"Escape"`) to the document.
    async fn send_key(&mut self, key: &str) -> Result<()>;

    /// Navigate one step back in session history.
    async fn history_back(&mut self) -> Result<()>;

    /// Full markup of the current document (the detail snapshot source).
    async fn page_markup(&mut self) -> Result<String>;
}
