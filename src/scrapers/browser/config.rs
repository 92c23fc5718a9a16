//! Browser engine configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Flags always passed to Chrome. Headless Chrome in containers needs both.
pub const SANDBOX_ARGS: &[&str] = &["--no-sandbox", "--disable-dev-shm-usage"];

/// Browser engine configuration.
///
/// Passed by reference into session construction; nothing here is global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the form being filled in.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Chrome executable to launch instead of searching for one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// DevTools request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Additional Chrome arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            proxy: None,
            timeout: default_timeout(),
            chrome_args: Vec::new(),
            remote_url: None,
        }
    }
}

impl BrowserEngineConfig {
    /// Full argument list for a launched Chrome: sandbox flags, proxy, then custom args.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args: Vec<String> = SANDBOX_ARGS.iter().map(|a| a.to_string()).collect();

        if let Some(ref proxy) = self.proxy {
            args.push(format!("--proxy-server={}", proxy));
        }

        args.extend(self.chrome_args.iter().cloned());
        args
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_headless_with_sandbox_flags() {
        let config = BrowserEngineConfig::default();
        assert!(config.headless);
        assert_eq!(
            config.launch_args(),
            vec!["--no-sandbox".to_string(), "--disable-dev-shm-usage".to_string()]
        );
    }

    #[test]
    fn launch_args_include_proxy_and_custom_args() {
        let config = BrowserEngineConfig {
            proxy: Some("socks5://127.0.0.1:9050".to_string()),
            chrome_args: vec!["--lang=en-IN".to_string()],
            ..Default::default()
        };
        let args = config.launch_args();
        assert_eq!(args[2], "--proxy-server=socks5://127.0.0.1:9050");
        assert_eq!(args[3], "--lang=en-IN");
    }

    #[test]
    fn deserializes_partial_table() {
        let config: BrowserEngineConfig = toml::from_str("headless = false").unwrap();
        assert!(!config.headless);
        assert_eq!(config.timeout, 30);
        assert!(config.remote_url.is_none());
    }
}
