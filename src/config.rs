//! Page-level configuration.
//!
//! Read from an optional `<script id="analyzer-config" type="application/json">`
//! element. Every field is optional; missing ones take their defaults and an
//! unreadable block falls back to defaults entirely.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::engine::{EngineConfig, Viewport};
use crate::error::ConfigError;

/// Analysis endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/analyze/";

const CONFIG_ELEMENT_ID: &str = "analyzer-config";

/// Settings for the analyzer page and its graph canvas.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// URL the analysis request is POSTed to.
	pub endpoint: String,
	/// Size of the graph canvas.
	pub viewport: Viewport,
	/// Layout and interaction settings for the graph engine.
	pub engine: EngineConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			viewport: Viewport::default(),
			engine: EngineConfig::default(),
		}
	}
}

impl AppConfig {
	/// Parse and validate a configuration block.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.endpoint.trim().is_empty() {
			return Err(ConfigError::Invalid("endpoint must not be empty".into()));
		}
		if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
			return Err(ConfigError::Invalid(format!(
				"viewport must be positive, got {}x{}",
				self.viewport.width, self.viewport.height
			)));
		}
		self.engine.forces.validate()
	}

	/// Read the configuration block from the DOM, falling back to defaults.
	pub fn load() -> Self {
		let Some(json) = config_text() else {
			return Self::default();
		};
		match Self::from_json(&json) {
			Ok(config) => {
				info!("stackinsight: using endpoint {}", config.endpoint);
				config
			}
			Err(e) => {
				warn!("stackinsight: ignoring analyzer config: {}", e);
				Self::default()
			}
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
