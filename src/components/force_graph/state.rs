//! Canvas-side interaction state: the engine, pointer press tracking and
//! smoothed hover highlight intensities.

use std::collections::{HashMap, HashSet};

use leptos::prelude::*;

use crate::engine::{EngineConfig, Frame, GraphEngine};

/// Pointer travel (px) beyond which a press is a drag rather than a click.
pub const CLICK_SLOP: f64 = 3.0;

/// A mouse press that landed on a node.
#[derive(Clone, Debug)]
pub struct Press {
	pub node_id: String,
	pub start_x: f64,
	pub start_y: f64,
	/// Node centre minus pointer at press time, kept while dragging.
	pub grab_dx: f64,
	pub grab_dy: f64,
	pub moved: bool,
}

impl Press {
	/// Record pointer travel; returns the pin position for the node.
	pub fn track(&mut self, x: f64, y: f64) -> (f64, f64) {
		let travel = ((x - self.start_x).powi(2) + (y - self.start_y).powi(2)).sqrt();
		if travel > CLICK_SLOP {
			self.moved = true;
		}
		(x + self.grab_dx, y + self.grab_dy)
	}
}

/// Smooth hover transitions with per-node intensity tracking.
///
/// The hovered node and its neighbours form the target set. Each node's
/// intensity eases toward 1.0 while targeted and decays toward 0.0 after a
/// short hold, so brushing past a node does not flash.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<String>,
	target_set: HashSet<String>,
	node_intensity: HashMap<String, f64>,
	hold_timer: HashMap<String, f64>,
	cached_max: f64,
}

/// Minimum time (seconds) a highlight is held before it can fade out.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

impl HighlightState {
	/// Take the hover target from the frame about to be drawn.
	pub fn retarget(&mut self, frame: &Frame) {
		let hovered = frame.nodes.iter().find(|n| n.hovered).map(|n| n.id.clone());
		if hovered == self.hovered {
			return;
		}
		self.hovered = hovered;
		self.target_set = frame
			.nodes
			.iter()
			.filter(|n| n.hovered || n.adjacent)
			.map(|n| n.id.clone())
			.collect();
		for id in &self.target_set {
			self.hold_timer.insert(id.clone(), MIN_HOLD_TIME);
		}
	}

	/// Animate intensities with exponential smoothing over `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for id in &self.target_set {
			let intensity = self.node_intensity.entry(id.clone()).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}

		let targets = &self.target_set;
		self.hold_timer.retain(|id, timer| {
			if targets.contains(id) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let holds = &self.hold_timer;
		let mut max: f64 = 0.0;
		self.node_intensity.retain(|id, intensity| {
			if !targets.contains(id) && !holds.contains_key(id) {
				*intensity *= fade_out;
			}
			max = max.max(*intensity);
			*intensity > 0.005
		});
		self.cached_max = max;
	}

	pub fn node_intensity(&self, id: &str) -> f64 {
		self.node_intensity.get(id).copied().unwrap_or(0.0)
	}

	/// Geometric mean keeps edges in step with their endpoints.
	pub fn edge_intensity(&self, a: &str, b: &str) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

/// Open while the component that created it is mounted. The animation loop
/// checks it every frame and tears itself down once it closes.
#[derive(Clone, Copy)]
pub struct LoopGate(StoredValue<bool>);

impl LoopGate {
	/// Must be called inside the component so cleanup is tied to its owner.
	pub fn new() -> Self {
		let open = StoredValue::new(true);
		on_cleanup(move || {
			let _ = open.try_update_value(|open| *open = false);
		});
		Self(open)
	}

	pub fn is_open(&self) -> bool {
		self.0.try_get_value().unwrap_or(false)
	}
}

/// Everything the canvas event handlers and animation loop share.
pub struct CanvasState {
	pub engine: GraphEngine,
	pub highlight: HighlightState,
	pub press: Option<Press>,
}

impl CanvasState {
	pub fn new(config: EngineConfig) -> Self {
		Self {
			engine: GraphEngine::new(config),
			highlight: HighlightState::default(),
			press: None,
		}
	}
}
