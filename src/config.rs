use log::{warn, Level};
use serde::Deserialize;
use thiserror::Error;

use crate::dom::{Element, Page};

/// Id of the optional `<script type="application/json">` block a page can
/// use to override the built-in settings.
pub const CONFIG_ELEMENT_ID: &str = "site-interactions-config";

pub const MODAL_SELECTOR: &str = "[data-ix=\"button-click\"]";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("scroll duration must be a finite, non-negative number of milliseconds, got {0}")]
    InvalidDuration(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    pub anchor_selector: String,
    pub duration_ms: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            anchor_selector: "a[href^=\"#\"]".to_string(),
            duration_ms: 850.0,
        }
    }
}

/// Which modal candidates a group accepts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModalFilter {
    /// Each selector must match something inside the modal.
    pub require: Vec<String>,
    /// No selector may match anything inside the modal.
    pub exclude: Vec<String>,
}

impl ModalFilter {
    pub fn accepts<E: Element>(&self, modal: &E) -> bool {
        self.require.iter().all(|selector| modal.query(selector).is_some())
            && !self.exclude.iter().any(|selector| modal.query(selector).is_some())
    }
}

/// Pairs the cards matched by `card_selector` with the modals matched by
/// `modal_selector`, in document order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalGroup {
    pub card_selector: String,
    pub modal_selector: String,
    pub filter: ModalFilter,
    /// Elements inside the modal that close it when clicked.
    pub overlay_selector: Option<String>,
    /// Close buttons inside the modal; also the fallback focus target.
    pub close_selector: Option<String>,
    pub focus_selector: Option<String>,
    /// `display` value applied when the modal opens.
    pub display: String,
}

impl Default for ModalGroup {
    fn default() -> Self {
        Self {
            card_selector: String::new(),
            modal_selector: String::new(),
            filter: ModalFilter::default(),
            overlay_selector: None,
            close_selector: None,
            focus_selector: None,
            display: "flex".to_string(),
        }
    }
}

impl ModalGroup {
    /// The `display` to open with; an empty value means `flex`.
    pub fn open_display(&self) -> &str {
        if self.display.is_empty() {
            "flex"
        } else {
            &self.display
        }
    }

    /// Oxford programme cards, whose popups carry `.popup-oxford`.
    pub fn oxford() -> Self {
        Self {
            card_selector: ".grid-5-oxford > div".to_string(),
            modal_selector: MODAL_SELECTOR.to_string(),
            filter: ModalFilter {
                require: vec![".popup-oxford".to_string()],
                exclude: Vec::new(),
            },
            overlay_selector: Some(".modal-wrapper-oxford, .modal-wrapper".to_string()),
            close_selector: Some(".close-oxford".to_string()),
            focus_selector: Some(".close-oxford".to_string()),
            ..Self::default()
        }
    }

    pub fn standard() -> Self {
        Self {
            card_selector: ".grid-5 > div".to_string(),
            modal_selector: MODAL_SELECTOR.to_string(),
            filter: ModalFilter {
                require: vec![".popup".to_string()],
                exclude: vec![".popup-oxford".to_string()],
            },
            overlay_selector: Some(".modal-wrapper".to_string()),
            close_selector: Some(".close".to_string()),
            focus_selector: Some(".close".to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub scroll: ScrollConfig,
    pub modal_groups: Vec<ModalGroup>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            modal_groups: vec![ModalGroup::oxford(), ModalGroup::standard()],
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        let duration = config.scroll.duration_ms;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ConfigError::InvalidDuration(duration));
        }
        Ok(config)
    }
}

/// Reads the page's configuration block, falling back to the defaults when
/// there is none or it cannot be used.
pub fn load<P: Page>(page: &P) -> SiteConfig {
    let Some(json) = page
        .element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            SiteConfig::default()
        }
    }
}
