//! Site Settings
//!
//! Every tunable the behaviors read, with defaults matching the shipped
//! markup. A page may override any of them with a JSON block:
//!
//! ```html
//! <script type="application/json" id="siteSettings">
//!   { "countdownDays": 14, "newsletterMessage": "Welcome aboard!" }
//! </script>
//! ```

use serde::Deserialize;

use page_binding::Page;

use crate::error::SiteResult;
use crate::markup;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSettings {
    /// localStorage key for the theme flag
    pub theme_key: String,
    /// localStorage key for the direction flag
    pub direction_key: String,
    /// Counter ramp length
    pub counter_duration_ms: f64,
    /// Visible fraction of a counter that starts its ramp
    pub counter_threshold: f64,
    /// Rolling countdown window, measured from page load
    pub countdown_days: u32,
    /// Fixed countdown target (epoch ms); replaces the rolling window
    pub countdown_deadline: Option<f64>,
    pub countdown_interval_ms: u32,
    pub newsletter_message: String,
    pub price_suffix: String,
    pub search_close_label: String,
    pub search_input_label: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            theme_key: "sa-theme".to_string(),
            direction_key: "sa-dir".to_string(),
            counter_duration_ms: 2000.0,
            counter_threshold: 0.4,
            countdown_days: 30,
            countdown_deadline: None,
            countdown_interval_ms: 1000,
            newsletter_message: "Thanks for subscribing!".to_string(),
            price_suffix: " /mo".to_string(),
            search_close_label: "Close search".to_string(),
            search_input_label: "Search Sustainable Awareness".to_string(),
        }
    }
}

impl SiteSettings {
    pub fn from_json(json: &str) -> SiteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults, overridden by the page's settings block when it has one
    pub fn load(page: &dyn Page) -> Self {
        let Some(block) = page.query(markup::SETTINGS_SCRIPT) else {
            return Self::default();
        };
        match Self::from_json(&page.text(block)) {
            Ok(settings) => {
                log::debug!("[SETTINGS] loaded overrides from {}", markup::SETTINGS_SCRIPT);
                settings
            }
            Err(e) => {
                log::warn!("[SETTINGS] ignoring malformed settings block: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_binding::memory::MemoryPage;

    #[test]
    fn test_defaults_match_markup() {
        let settings = SiteSettings::default();
        assert_eq!(settings.theme_key, "sa-theme");
        assert_eq!(settings.direction_key, "sa-dir");
        assert_eq!(settings.countdown_days, 30);
        assert!(settings.countdown_deadline.is_none());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings = SiteSettings::from_json(r#"{ "countdownDays": 14, "priceSuffix": " /month" }"#).unwrap();
        assert_eq!(settings.countdown_days, 14);
        assert_eq!(settings.price_suffix, " /month");
        assert_eq!(settings.newsletter_message, "Thanks for subscribing!");
    }

    #[test]
    fn test_load_reads_settings_block() {
        let page = MemoryPage::new();
        let body = page.body().unwrap();
        page.append_text(
            body,
            "script",
            &[("type", "application/json"), ("id", "siteSettings")],
            r#"{ "themeKey": "my-theme" }"#,
        );
        assert_eq!(SiteSettings::load(&page).theme_key, "my-theme");
    }

    #[test]
    fn test_load_falls_back_on_malformed_block() {
        let page = MemoryPage::new();
        let body = page.body().unwrap();
        page.append_text(body, "script", &[("id", "siteSettings")], "{ not json");
        assert_eq!(SiteSettings::load(&page), SiteSettings::default());
    }

    #[test]
    fn test_load_without_block_uses_defaults() {
        let page = MemoryPage::new();
        assert_eq!(SiteSettings::load(&page), SiteSettings::default());
    }
}
