//! Headless Chrome session for driving the cause list form.
//!
//! Uses chromiumoxide (CDP). A session is either a locally launched Chrome
//! or a connection to a remote DevTools endpoint.

mod config;
#[cfg(feature = "browser")]
mod page;

pub use config::{BrowserEngineConfig, SANDBOX_ARGS};
#[cfg(feature = "browser")]
pub use page::ChromePage;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use anyhow::Context;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::debug;

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

/// Executable names looked up in `PATH`.
const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Find a Chrome executable: the configured path, well-known locations, then `PATH`.
pub fn find_chrome(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        anyhow::bail!("Configured Chrome executable not found: {}", path.display());
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(anyhow::anyhow!(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or set browser.chrome_path / CAUSELIST_CHROME"
    ))
}

/// `/json/version` endpoint of a remote DevTools URL.
pub fn version_endpoint(remote_url: &str) -> String {
    let http_url = remote_url
        .replace("ws://", "http://")
        .replace("wss://", "https://");
    format!("{}/json/version", http_url.trim_end_matches('/'))
}

/// A running (or connected) browser.
///
/// Dropping the session stops the CDP handler task; chromiumoxide kills a
/// launched Chrome when its `Browser` is dropped. [`BrowserSession::shutdown`]
/// is the orderly path.
#[cfg(feature = "browser")]
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    remote: bool,
}

#[cfg(feature = "browser")]
impl BrowserSession {
    /// Launch Chrome, or connect to `remote_url` if configured.
    pub async fn start(config: &BrowserEngineConfig) -> Result<Self> {
        match config.remote_url.as_deref() {
            Some(remote_url) => Self::connect_remote(remote_url, config).await,
            None => Self::launch(config).await,
        }
    }

    async fn launch(config: &BrowserEngineConfig) -> Result<Self> {
        info!("Launching browser (headless={})", config.headless);

        let chrome_path = find_chrome(config.chrome_path.as_deref())?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(Duration::from_secs(config.timeout));

        // Set headless mode (with_head means NOT headless)
        if !config.headless {
            builder = builder.with_head();
        }

        for arg in config.launch_args() {
            builder = builder.arg(arg);
        }

        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;

        Ok(Self {
            browser,
            handler: spawn_handler(handler),
            remote: false,
        })
    }

    async fn connect_remote(url: &str, config: &BrowserEngineConfig) -> Result<Self> {
        info!(
            "Connecting to remote browser at {} (timeout: {}s)",
            url, config.timeout
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        let resp: serde_json::Value = client
            .get(version_endpoint(url))
            .send()
            .await
            .context("Failed to connect to remote browser")?
            .json()
            .await
            .context("Failed to parse browser version info")?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("No webSocketDebuggerUrl in response"))?;

        info!("Connecting to WebSocket: {}", ws_url);

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: Duration::from_secs(config.timeout),
            ..Default::default()
        };

        let (browser, handler) = Browser::connect_with_config(ws_url, handler_config)
            .await
            .context("Failed to connect to remote browser")?;

        Ok(Self {
            browser,
            handler: spawn_handler(handler),
            remote: true,
        })
    }

    /// Open a new tab at `url` and wait for it to load.
    pub async fn open_page(&self, url: &str) -> Result<Page> {
        info!("Navigating to {}", url);
        self.browser
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open {}", url))
    }

    /// Close the browser. A remote browser is left running; only the connection is dropped.
    pub async fn shutdown(mut self) {
        if !self.remote {
            if let Err(e) = self.browser.close().await {
                debug!("Browser close failed: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("Browser wait failed: {}", e);
            }
        }
        self.handler.abort();
        debug!("Browser session closed");
    }
}

#[cfg(feature = "browser")]
impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[cfg(feature = "browser")]
fn spawn_handler(mut handler: chromiumoxide::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    })
}
