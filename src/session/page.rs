//! Live browser page — [`BrowserSession`] over a [`RenderContext`].
//!
//! Every primitive is executed as injected JavaScript against the current
//! document, re-resolving elements by `(selector, index)` on each call.
//! Selector and value strings are sanitized before injection; they are
//! only ever placed inside JS string literals, never in code position.

use super::{BrowserSession, ClickOutcome};
use crate::renderer::RenderContext;
use crate::stealth;
use anyhow::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Navigation timeout for the underlying context.
const NAVIGATE_TIMEOUT_MS: u64 = 30_000;

/// Poll interval for [`BrowserSession::wait_for_presence`].
const PRESENCE_POLL: Duration = Duration::from_millis(250);

/// A live page backed by a rendering context.
pub struct LivePage {
    ctx: Box<dyn RenderContext>,
}

impl LivePage {
    pub fn new(ctx: Box<dyn RenderContext>) -> Self {
        Self { ctx }
    }

    /// Close the underlying context.
    pub async fn close(self) -> Result<()> {
        self.ctx.close().await
    }

    /// Run a script that resolves the `index`-th match of `selector` as
    /// `el` before the body. The body must `return` a JSON value;
    /// `missing` is returned when the element does not exist.
    async fn eval_on_nth(
        &self,
        selector: &str,
        index: usize,
        body: &str,
    ) -> Result<serde_json::Value> {
        let script = format!(
            r#"(() => {{
                const els = document.querySelectorAll('{sel}');
                if ({index} >= els.length) return {{ missing: true }};
                const el = els[{index}];
                {body}
            }})()"#,
            sel = sanitize_js_string(selector),
        );
        self.ctx.execute_js(&script).await
    }
}

#[async_trait]
impl BrowserSession for LivePage {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.ctx.navigate(url, NAVIGATE_TIMEOUT_MS).await?;
        // The automation flag is re-created on every fresh document.
        let _ = self.ctx.execute_js(stealth::NAVIGATOR_OVERRIDE).await;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        self.ctx.get_url().await
    }

    async fn wait_for_presence(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.count(selector).await? > 0 {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(PRESENCE_POLL.min(timeout)).await;
        }
    }

    async fn count(&mut self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll('{}').length",
            sanitize_js_string(selector)
        );
        let value = self.ctx.execute_js(&script).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn scroll_into_view(&mut self, selector: &str, index: usize) -> Result<bool> {
        let value = self
            .eval_on_nth(
                selector,
                index,
                "el.scrollIntoView({ block: 'center' }); return { ok: true };",
            )
            .await?;
        Ok(value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn scroll_to_bottom(&mut self, selector: &str) -> Result<()> {
        self.eval_on_nth(
            selector,
            0,
            "el.scrollTop = el.scrollHeight; return { ok: true };",
        )
        .await?;
        Ok(())
    }

    async fn scroll_by(&mut self, selector: &str, delta: i64) -> Result<()> {
        let body = format!("el.scrollBy(0, {delta}); return {{ ok: true }};");
        self.eval_on_nth(selector, 0, &body).await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str, index: usize) -> Result<ClickOutcome> {
        let value = self
            .eval_on_nth(
                selector,
                index,
                r#"const r = el.getBoundingClientRect();
                const cx = r.left + r.width / 2, cy = r.top + r.height / 2;
                const top = document.elementFromPoint(cx, cy);
                if (top && !el.contains(top) && !top.contains(el)) {
                    return { intercepted: true };
                }
                el.click();
                return { clicked: true };"#,
            )
            .await?;

        if value.get("missing").is_some() {
            Ok(ClickOutcome::Missing)
        } else if value.get("intercepted").is_some() {
            Ok(ClickOutcome::Intercepted)
        } else {
            Ok(ClickOutcome::Clicked)
        }
    }

    async fn force_click(&mut self, selector: &str, index: usize) -> Result<bool> {
        let value = self
            .eval_on_nth(
                selector,
                index,
                r#"el.dispatchEvent(new MouseEvent('click', {
                    bubbles: true, cancelable: true, view: window
                }));
                return { ok: true };"#,
            )
            .await?;
        Ok(value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn read_text(&mut self, selector: &str, index: usize) -> Result<Option<String>> {
        let value = self
            .eval_on_nth(selector, index, "return { text: el.innerText };")
            .await?;
        Ok(value
            .get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    async fn read_attribute(
        &mut self,
        selector: &str,
        index: usize,
        name: &str,
    ) -> Result<Option<String>> {
        let body = format!(
            "return {{ value: el.getAttribute('{}') }};",
            sanitize_js_string(name)
        );
        let value = self.eval_on_nth(selector, index, &body).await?;
        Ok(value
            .get("value")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    async fn outer_markup(&mut self, selector: &str, index: usize) -> Result<Option<String>> {
        let value = self
            .eval_on_nth(selector, index, "return { html: el.outerHTML };")
            .await?;
        Ok(value
            .get("html")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<bool> {
        let body = format!(
            r#"el.value = '{}';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            return {{ ok: true }};"#,
            sanitize_js_string(value)
        );
        let result = self.eval_on_nth(selector, 0, &body).await?;
        Ok(result.get("ok").and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn send_key(&mut self, key: &str) -> Result<()> {
        let script = format!(
            r#"document.body.dispatchEvent(new KeyboardEvent('keydown', {{
                key: '{}', bubbles: true
            }}))"#,
            sanitize_js_string(key)
        );
        self.ctx.execute_js(&script).await?;
        Ok(())
    }

    async fn history_back(&mut self) -> Result<()> {
        self.ctx.execute_js("history.back()").await?;
        Ok(())
    }

    async fn page_markup(&mut self) -> Result<String> {
        self.ctx.get_html().await
    }
}

/// Sanitize a string for safe injection into a JavaScript string literal.
///
/// Escapes all characters that could break out of a JS string context:
/// - Backslashes, single/double quotes, backticks
/// - Newlines, carriage returns, tabs
/// - HTML script tags (to prevent XSS if value is reflected in HTML)
/// - Null bytes
pub fn sanitize_js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}                       // Strip null bytes
            '<' => result.push_str("\\x3c"), // Prevent </script> injection
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_js_string("div.Nv2PK"), "div.Nv2PK");
        assert_eq!(sanitize_js_string("it's"), "it\\'s");
        assert_eq!(sanitize_js_string("a\"b"), "a\\\"b");
    }

    #[test]
    fn test_sanitize_attribute_selector() {
        let sel = "button[aria-label*='Back']";
        assert_eq!(
            sanitize_js_string(sel),
            "button[aria-label*=\\'Back\\']"
        );
    }

    #[test]
    fn test_sanitize_xss() {
        let malicious = r#"</script><script>alert(1)</script>"#;
        let sanitized = sanitize_js_string(malicious);
        assert!(!sanitized.contains("</script>"));
        assert!(sanitized.contains("\\x3c/script\\x3e"));
    }

    #[test]
    fn test_sanitize_null_bytes() {
        assert_eq!(sanitize_js_string("abc\0def"), "abcdef");
    }
}
