//! Basic browser fingerprint softening.
//!
//! Directory front-ends refuse or degrade service when they detect an
//! automated browser. This module carries the minimal set of launch flags
//! and page-level overrides that keep a stock Chromium looking like an
//! ordinary interactive session. Nothing here attempts to defeat active
//! anti-bot challenges.

/// Script that hides the `navigator.webdriver` automation flag.
///
/// Re-applied after every navigation: the property is re-created on each
/// fresh document.
pub const NAVIGATOR_OVERRIDE: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined })";

/// Desktop user agent presented to the directory.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Chromium launch arguments for a softened, stable session.
///
/// Window size and language are pinned so selector layouts and label text
/// stay consistent across machines.
pub fn launch_args(headless: bool) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-gpu".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
        "--disable-background-networking".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--window-size=1920,1080".to_string(),
        "--lang=en-US".to_string(),
        format!("--user-agent={USER_AGENT}"),
    ];
    if headless {
        args.insert(0, "--headless=new".to_string());
    }
    args
}
