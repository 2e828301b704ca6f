//! Injected engine configuration: force constants, energy schedule, classifier.

use serde::{Deserialize, Serialize};

use super::classify::Classifier;
use crate::error::ConfigError;

/// Drawing area the layout is centred in and clamped to.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
		}
	}
}

impl Viewport {
	/// Viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Midpoint, where the centering force pulls the layout.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Whether the point lies inside, edges included.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		(0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
	}
}

/// Force and energy parameters of the layout simulation.
///
/// The energy ("alpha") starts at `alpha_initial`, moves toward the current
/// target by `alpha_decay` of the gap each tick, and the layout counts as
/// settled once it drops below `alpha_min` with no drag holding it up.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Pairwise charge. Negative values repel.
	pub charge_strength: f64,
	/// Pairs closer than this are treated as this far apart.
	pub charge_distance_min: f64,
	/// Rest length of link springs without a per-link override.
	pub link_distance: f64,
	/// Fraction of the centroid offset removed each tick.
	pub center_strength: f64,
	/// Energy right after a load.
	pub alpha_initial: f64,
	/// Energy below which the layout is at rest. Must be positive.
	pub alpha_min: f64,
	/// Fraction of the gap to the target closed per tick, in `(0, 1)`.
	pub alpha_decay: f64,
	/// Target energy while at least one node is being dragged.
	pub alpha_drag_target: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			charge_strength: -400.0,
			charge_distance_min: 1.0,
			link_distance: 150.0,
			center_strength: 1.0,
			alpha_initial: 1.0,
			alpha_min,
			// Reaches alpha_min from 1.0 in ~300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			alpha_drag_target: 0.3,
			velocity_decay: 0.4,
		}
	}
}

impl ForceConfig {
	/// Reject parameters under which the energy never falls below `alpha_min`
	/// or positions stop being finite.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let finite = [
			("charge_strength", self.charge_strength),
			("charge_distance_min", self.charge_distance_min),
			("link_distance", self.link_distance),
			("center_strength", self.center_strength),
		];
		if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
			return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
		}
		if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
			return Err(ConfigError::Invalid(format!(
				"alpha_decay must lie in (0, 1), got {}",
				self.alpha_decay
			)));
		}
		if !(self.alpha_min > 0.0 && self.alpha_min.is_finite()) {
			return Err(ConfigError::Invalid(format!(
				"alpha_min must be positive, got {}",
				self.alpha_min
			)));
		}
		let energies = [
			("alpha_initial", self.alpha_initial),
			("alpha_drag_target", self.alpha_drag_target),
		];
		if let Some((name, value)) = energies
			.iter()
			.find(|(_, v)| !(v.is_finite() && *v >= 0.0))
		{
			return Err(ConfigError::Invalid(format!(
				"{name} must be finite and non-negative, got {value}"
			)));
		}
		if !(0.0..=1.0).contains(&self.velocity_decay) {
			return Err(ConfigError::Invalid(format!(
				"velocity_decay must lie in [0, 1], got {}",
				self.velocity_decay
			)));
		}
		Ok(())
	}
}

/// Everything an engine instance is parameterized by.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Layout forces and energy schedule.
	pub forces: ForceConfig,
	/// Extensions that mark a label as a source file.
	pub file_extensions: Classifier,
	/// Keep nodes pinned where a drag ends until [`release`] is called.
	///
	/// [`release`]: super::GraphEngine::release
	pub sticky_drag: bool,
	/// Free nodes are kept this far inside the viewport. `None` disables clamping.
	pub viewport_padding: Option<f64>,
	/// Shown in place of a summary for nodes that have none.
	pub summary_fallback: String,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			forces: ForceConfig::default(),
			file_extensions: Classifier::default(),
			sticky_drag: false,
			viewport_padding: Some(20.0),
			summary_fallback: "No summary available.".to_string(),
		}
	}
}
