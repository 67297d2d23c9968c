//! Settings for the optional diagnostic-report client.
//!
//! Read from the process environment (after `dotenvy` has loaded `.env`):
//!
//! | Variable              | Default                                       |
//! |-----------------------|-----------------------------------------------|
//! | `GEMINI_API_KEY`      | unset (report disabled)                       |
//! | `GEMINI_MODEL`        | `gemini-2.5-flash-preview-09-2025`            |
//! | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com`   |
//! | `GEMINI_AUTH`         | `query` (`?key=`), or `header` (`x-goog-api-key`) |
//! | `GEMINI_TIMEOUT_SECS` | `60`                                          |
//! | `REPORT_RECENT_DAYS`  | `7`                                           |
//! | `CHANNEL_A_LABEL`     | `Android`                                     |
//! | `CHANNEL_B_LABEL`     | `iOS`                                         |

use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Where the API key travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    Query,
    Header,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub key_placement: KeyPlacement,
    pub timeout: Duration,
    pub recent_days: usize,
    pub channel_a_label: String,
    pub channel_b_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            key_placement: KeyPlacement::Query,
            timeout: Duration::from_secs(60),
            recent_days: 7,
            channel_a_label: "Android".to_string(),
            channel_b_label: "iOS".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.api_key = get("GEMINI_API_KEY");
        if let Some(model) = get("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(auth) = get("GEMINI_AUTH") {
            config.key_placement = match auth.to_ascii_lowercase().as_str() {
                "query" => KeyPlacement::Query,
                "header" => KeyPlacement::Header,
                other => anyhow::bail!("GEMINI_AUTH must be 'query' or 'header', got '{other}'"),
            };
        }
        if let Some(secs) = get("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("GEMINI_TIMEOUT_SECS is not a number: '{secs}'"))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(days) = get("REPORT_RECENT_DAYS") {
            config.recent_days = days
                .parse()
                .with_context(|| format!("REPORT_RECENT_DAYS is not a number: '{days}'"))?;
        }
        if let Some(label) = get("CHANNEL_A_LABEL") {
            config.channel_a_label = label;
        }
        if let Some(label) = get("CHANNEL_B_LABEL") {
            config.channel_b_label = label;
        }

        Ok(config)
    }

    /// `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}
