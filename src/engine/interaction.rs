//! The graph interaction engine: layout, drag pins, hover and selection.
//!
//! Wraps a [`Simulation`] with the per-graph interaction state. Pointer level
//! operations (`begin_drag`, `hover`, `select`, ...) take node ids and are
//! best effort: an id that is not in the current graph is ignored.

use std::collections::HashSet;
use std::fmt;

use log::{debug, info, warn};

use super::classify::NodeKind;
use super::config::{EngineConfig, ForceConfig, Viewport};
use super::frame::{Frame, FrameSink, LinkFrame, NodeFrame};
use super::graph::Graph;
use super::simulation::Simulation;
use super::types::GraphData;
use crate::error::GraphError;

/// Resolved details of the selected node, as shown in the detail modal.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
	/// Node identifier.
	pub id: String,
	/// Display label, the id when the node has none.
	pub label: String,
	/// Classification of the label.
	pub kind: NodeKind,
	/// The node's summary, or the configured fallback text.
	pub summary: String,
}

/// Content of the hover tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// Node identifier.
	pub id: String,
	/// Display label, the id when the node has none.
	pub label: String,
	/// Classification shown next to the label.
	pub kind: NodeKind,
}

impl fmt::Display for Tooltip {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.label, self.kind)
	}
}

/// State that lives exactly as long as one loaded graph.
struct Loaded {
	graph: Graph,
	kinds: Vec<NodeKind>,
	sim: Simulation,
	viewport: Viewport,
	dragging: HashSet<usize>,
	hovered: Option<usize>,
	selected: Option<usize>,
}

/// Owns the layout of one graph at a time and everything the pointer does to it.
///
/// Created once per view; [`load`](Self::load) replaces the graph wholesale,
/// [`tick`](Self::tick) is driven by the frame clock.
pub struct GraphEngine {
	config: EngineConfig,
	loaded: Option<Loaded>,
	generation: u64,
}

impl Default for GraphEngine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

impl GraphEngine {
	/// Engine with no graph loaded. Force parameters that fail
	/// [`ForceConfig::validate`] are replaced by the defaults.
	pub fn new(mut config: EngineConfig) -> Self {
		if let Err(e) = config.forces.validate() {
			warn!("stackinsight: using default forces: {}", e);
			config.forces = ForceConfig::default();
		}
		Self {
			config,
			loaded: None,
			generation: 0,
		}
	}

	/// The configuration in effect, after validation.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Validate `data` and load it. On error nothing changes.
	pub fn load_graph(&mut self, data: &GraphData, viewport: Viewport) -> Result<(), GraphError> {
		let graph = Graph::try_from(data).inspect_err(|e| {
			warn!("stackinsight: rejected graph: {}", e);
		})?;
		self.load(graph, viewport);
		Ok(())
	}

	/// Replace the current graph, discarding its layout, pins, hover and selection.
	pub fn load(&mut self, graph: Graph, viewport: Viewport) {
		self.generation += 1;
		info!(
			"stackinsight: loading {} nodes, {} links (generation {})",
			graph.len(),
			graph.links().len(),
			self.generation
		);

		let classifier = &self.config.file_extensions;
		let kinds = graph
			.nodes()
			.iter()
			.map(|node| classifier.classify(&node.label))
			.collect();
		let sim = Simulation::new(
			&graph,
			&self.config.forces,
			viewport,
			self.config.viewport_padding,
		);

		self.loaded = Some(Loaded {
			graph,
			kinds,
			sim,
			viewport,
			dragging: HashSet::new(),
			hovered: None,
			selected: None,
		});
	}

	/// Tear down the simulation. No further frames are produced.
	pub fn stop(&mut self) {
		if self.loaded.take().is_some() {
			debug!("stackinsight: simulation stopped");
		}
		self.generation += 1;
	}

	/// Bumped by every load and stop.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether `frame` belongs to the graph currently loaded.
	pub fn is_current(&self, frame: &Frame) -> bool {
		self.loaded.is_some() && frame.generation == self.generation
	}

	/// The loaded graph, if any.
	pub fn graph(&self) -> Option<&Graph> {
		self.loaded.as_ref().map(|l| &l.graph)
	}

	/// Viewport the current graph was loaded into.
	pub fn viewport(&self) -> Option<Viewport> {
		self.loaded.as_ref().map(|l| l.viewport)
	}

	/// Current layout energy.
	pub fn alpha(&self) -> Option<f64> {
		self.loaded.as_ref().map(|l| l.sim.alpha())
	}

	/// A graph is loaded and has not come to rest.
	pub fn is_running(&self) -> bool {
		self.loaded.as_ref().is_some_and(|l| !l.sim.is_settled())
	}

	/// Classify a label with the configured extensions.
	pub fn classify(&self, label: &str) -> NodeKind {
		self.config.file_extensions.classify(label)
	}

	/// Advance the layout one step and return the resulting frame.
	///
	/// Returns `None` once the layout has settled (until a drag wakes it) or
	/// when nothing is loaded.
	pub fn tick(&mut self) -> Option<Frame> {
		let loaded = self.loaded.as_mut()?;
		if loaded.sim.is_settled() {
			return None;
		}
		loaded.sim.step();
		self.snapshot()
	}

	/// The current frame without advancing the layout.
	pub fn snapshot(&self) -> Option<Frame> {
		let loaded = self.loaded.as_ref()?;
		let bodies = loaded.sim.bodies();
		let position = |idx: usize| bodies[idx].pin.unwrap_or((bodies[idx].x, bodies[idx].y));

		let adjacent: HashSet<usize> = loaded
			.hovered
			.map(|h| loaded.graph.neighbors(h).filter(|&n| n != h).collect())
			.unwrap_or_default();

		let nodes = loaded
			.graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| {
				let (x, y) = position(idx);
				NodeFrame {
					id: node.id.clone(),
					label: node.label.clone(),
					kind: loaded.kinds[idx],
					x,
					y,
					pinned: bodies[idx].pin.is_some(),
					hovered: loaded.hovered == Some(idx),
					adjacent: adjacent.contains(&idx),
					selected: loaded.selected == Some(idx),
				}
			})
			.collect();

		let nodes_ref = loaded.graph.nodes();
		let links = loaded
			.graph
			.links()
			.iter()
			.map(|link| {
				let ((x1, y1), (x2, y2)) = (position(link.source), position(link.target));
				LinkFrame {
					source: nodes_ref[link.source].id.clone(),
					target: nodes_ref[link.target].id.clone(),
					x1,
					y1,
					x2,
					y2,
					highlighted: loaded.hovered.is_some_and(|h| h == link.source || h == link.target),
				}
			})
			.collect();

		Some(Frame {
			generation: self.generation,
			alpha: loaded.sim.alpha(),
			nodes,
			links,
		})
	}

	/// Lazy frame sequence ending when the layout settles or is stopped.
	pub fn frames(&mut self) -> Frames<'_> {
		Frames { engine: self }
	}

	/// Tick once and hand the frame to `sink`. A settled layout is redrawn as
	/// is so hover and selection changes still show. Returns whether the
	/// layout is still moving.
	pub fn advance(&mut self, sink: &mut impl FrameSink) -> bool {
		match self.tick() {
			Some(frame) => {
				sink.draw(&frame);
				true
			}
			None => {
				if let Some(frame) = self.snapshot() {
					sink.draw(&frame);
				}
				false
			}
		}
	}

	/// Where the node is drawn right now: its pin if pinned.
	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		let (loaded, idx) = self.resolve(id)?;
		let body = loaded.sim.bodies()[idx];
		Some(body.pin.unwrap_or((body.x, body.y)))
	}

	/// Node closest to `(x, y)` within `radius`, if any.
	pub fn find_node(&self, x: f64, y: f64, radius: f64) -> Option<&str> {
		let loaded = self.loaded.as_ref()?;
		let mut best: Option<(usize, f64)> = None;
		for (idx, body) in loaded.sim.bodies().iter().enumerate() {
			let (bx, by) = body.pin.unwrap_or((body.x, body.y));
			let dist_sq = (bx - x).powi(2) + (by - y).powi(2);
			if dist_sq <= radius * radius && best.is_none_or(|(_, d)| dist_sq < d) {
				best = Some((idx, dist_sq));
			}
		}
		best.map(|(idx, _)| loaded.graph.nodes()[idx].id.as_str())
	}

	/// Pin the node where it is and wake the layout so neighbours react.
	pub fn begin_drag(&mut self, id: &str) {
		let drag_target = self.config.forces.alpha_drag_target;
		let Some((loaded, idx)) = self.resolve_mut(id) else {
			return;
		};
		if !loaded.dragging.insert(idx) {
			return;
		}
		let body = loaded.sim.bodies()[idx];
		let (x, y) = body.pin.unwrap_or((body.x, body.y));
		loaded.sim.pin(idx, x, y);
		loaded.sim.set_alpha_target(drag_target);
		debug!("stackinsight: drag start {} at ({:.1}, {:.1})", id, x, y);
	}

	/// Move the pin of a node that is being dragged.
	pub fn update_drag(&mut self, id: &str, x: f64, y: f64) {
		if let Some((loaded, idx)) = self.resolve_mut(id) {
			if loaded.dragging.contains(&idx) {
				loaded.sim.pin(idx, x, y);
			}
		}
	}

	/// Finish a drag. The node stays exactly at its last pin; unless sticky
	/// dragging is configured the pin is released so forces apply again.
	pub fn end_drag(&mut self, id: &str) {
		let sticky = self.config.sticky_drag;
		let Some((loaded, idx)) = self.resolve_mut(id) else {
			return;
		};
		if !loaded.dragging.remove(&idx) {
			return;
		}
		if !sticky {
			loaded.sim.unpin(idx);
		}
		if loaded.dragging.is_empty() {
			loaded.sim.set_alpha_target(0.0);
		}
		debug!("stackinsight: drag end {}", id);
	}

	/// Release a pin left behind by a sticky drag.
	pub fn release(&mut self, id: &str) {
		if let Some((loaded, idx)) = self.resolve_mut(id) {
			if !loaded.dragging.contains(&idx) {
				loaded.sim.unpin(idx);
			}
		}
	}

	/// Whether a drag on `id` is in progress.
	pub fn is_dragging(&self, id: &str) -> bool {
		self.resolve(id)
			.is_some_and(|(loaded, idx)| loaded.dragging.contains(&idx))
	}

	/// Set or clear the hovered node. Unknown ids leave the hover unchanged.
	pub fn hover(&mut self, id: Option<&str>) -> Option<Tooltip> {
		match id {
			None => {
				if let Some(loaded) = self.loaded.as_mut() {
					loaded.hovered = None;
				}
			}
			Some(id) => {
				if let Some((loaded, idx)) = self.resolve_mut(id) {
					loaded.hovered = Some(idx);
				}
			}
		}
		self.tooltip()
	}

	/// Tooltip for the hovered node.
	pub fn tooltip(&self) -> Option<Tooltip> {
		let loaded = self.loaded.as_ref()?;
		let idx = loaded.hovered?;
		let node = &loaded.graph.nodes()[idx];
		Some(Tooltip {
			id: node.id.clone(),
			label: node.label.clone(),
			kind: loaded.kinds[idx],
		})
	}

	/// Set or clear the selected node. Unknown ids leave the selection unchanged.
	pub fn select(&mut self, id: Option<&str>) -> Option<Selection> {
		match id {
			None => {
				if let Some(loaded) = self.loaded.as_mut() {
					if loaded.selected.take().is_some() {
						debug!("stackinsight: selection cleared");
					}
				}
			}
			Some(id) => {
				if let Some((loaded, idx)) = self.resolve_mut(id) {
					loaded.selected = Some(idx);
					debug!("stackinsight: selected {}", id);
				}
			}
		}
		self.selection()
	}

	/// The current selection, resolved against the loaded graph.
	pub fn selection(&self) -> Option<Selection> {
		let loaded = self.loaded.as_ref()?;
		let idx = loaded.selected?;
		let node = &loaded.graph.nodes()[idx];
		Some(Selection {
			id: node.id.clone(),
			label: node.label.clone(),
			kind: loaded.kinds[idx],
			summary: node
				.summary
				.clone()
				.filter(|s| !s.trim().is_empty())
				.unwrap_or_else(|| self.config.summary_fallback.clone()),
		})
	}

	fn resolve(&self, id: &str) -> Option<(&Loaded, usize)> {
		let loaded = self.loaded.as_ref()?;
		let idx = loaded.graph.index_of(id)?;
		Some((loaded, idx))
	}

	fn resolve_mut(&mut self, id: &str) -> Option<(&mut Loaded, usize)> {
		let loaded = self.loaded.as_mut()?;
		let idx = loaded.graph.index_of(id)?;
		Some((loaded, idx))
	}
}

/// Iterator over the frames of the current graph. See [`GraphEngine::frames`].
pub struct Frames<'a> {
	engine: &'a mut GraphEngine,
}

impl Iterator for Frames<'_> {
	type Item = Frame;

	fn next(&mut self) -> Option<Frame> {
		self.engine.tick()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::types::{GraphLink, GraphNode};

	fn data() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode {
					id: "A".into(),
					label: Some("repo-root".into()),
					summary: Some("Repository root".into()),
				},
				GraphNode {
					id: "B".into(),
					label: Some("main.py".into()),
					summary: None,
				},
				GraphNode {
					id: "C".into(),
					label: Some("parseInput".into()),
					summary: Some("   ".into()),
				},
			],
			links: vec![GraphLink::new("A", "B"), GraphLink::new("B", "C")],
		}
	}

	fn loaded() -> GraphEngine {
		let mut engine = GraphEngine::default();
		engine.load_graph(&data(), Viewport::default()).unwrap();
		engine
	}

	#[test]
	fn test_empty_engine_is_inert() {
		let mut engine = GraphEngine::default();
		assert!(engine.tick().is_none());
		assert!(engine.snapshot().is_none());
		assert!(engine.hover(Some("A")).is_none());
		assert!(engine.select(Some("A")).is_none());
		engine.begin_drag("A");
		assert!(!engine.is_dragging("A"));
		assert!(!engine.is_running());
	}

	#[test]
	fn test_invalid_forces_fall_back_to_defaults() {
		for forces in [
			ForceConfig {
				alpha_decay: 0.0,
				..ForceConfig::default()
			},
			ForceConfig {
				alpha_min: 0.0,
				..ForceConfig::default()
			},
		] {
			let mut engine = GraphEngine::new(EngineConfig {
				forces,
				..EngineConfig::default()
			});
			assert_eq!(engine.config().forces, ForceConfig::default());

			engine.load_graph(&data(), Viewport::default()).unwrap();
			let ticks = engine.frames().take(10_000).count();
			assert!(ticks < 400, "still running after {ticks} ticks");
			assert!(!engine.is_running());
		}
	}

	#[test]
	fn test_failed_load_keeps_previous_graph() {
		let mut engine = loaded();
		let generation = engine.generation();
		let mut bad = data();
		bad.links.push(GraphLink::new("C", "Z"));

		assert!(engine.load_graph(&bad, Viewport::default()).is_err());
		assert_eq!(engine.generation(), generation);
		assert_eq!(engine.graph().map(Graph::len), Some(3));
	}

	#[test]
	fn test_load_resets_interaction_state() {
		let mut engine = loaded();
		engine.hover(Some("A"));
		engine.select(Some("B"));
		engine.begin_drag("C");

		engine.load_graph(&data(), Viewport::default()).unwrap();
		assert!(engine.tooltip().is_none());
		assert!(engine.selection().is_none());
		assert!(!engine.is_dragging("C"));
	}

	#[test]
	fn test_tooltip_and_adjacency() {
		let mut engine = loaded();
		let tooltip = engine.hover(Some("B")).unwrap();
		assert_eq!(tooltip.kind, NodeKind::File);
		assert_eq!(tooltip.to_string(), "main.py (File)");

		let frame = engine.snapshot().unwrap();
		assert!(frame.node("B").unwrap().hovered);
		assert!(frame.node("A").unwrap().adjacent);
		assert!(frame.node("C").unwrap().adjacent);
		assert!(frame.links.iter().all(|l| l.highlighted));

		// Unknown ids are ignored.
		assert_eq!(engine.hover(Some("nope")), Some(tooltip));
		assert!(engine.hover(None).is_none());
	}

	#[test]
	fn test_hover_never_moves_nodes() {
		let mut engine = loaded();
		let before = engine.snapshot().unwrap();
		engine.hover(Some("A"));
		let after = engine.snapshot().unwrap();
		for (a, b) in before.nodes.iter().zip(&after.nodes) {
			assert_eq!((a.x, a.y), (b.x, b.y));
		}
		assert_eq!(before.alpha, after.alpha);
	}

	#[test]
	fn test_summary_fallback() {
		let mut engine = loaded();
		assert_eq!(engine.select(Some("A")).unwrap().summary, "Repository root");
		assert_eq!(
			engine.select(Some("B")).unwrap().summary,
			"No summary available."
		);
		assert_eq!(
			engine.select(Some("C")).unwrap().summary,
			"No summary available."
		);
	}

	#[test]
	fn test_selection_is_single() {
		let mut engine = loaded();
		engine.select(Some("A"));
		engine.select(Some("C"));
		let frame = engine.snapshot().unwrap();
		let selected: Vec<_> = frame.nodes.iter().filter(|n| n.selected).map(|n| n.id.as_str()).collect();
		assert_eq!(selected, vec!["C"]);
	}

	#[test]
	fn test_find_node_prefers_closest() {
		let engine = loaded();
		let frame = engine.snapshot().unwrap();
		let b = frame.node("B").unwrap();
		assert_eq!(engine.find_node(b.x + 0.5, b.y, 12.0), Some("B"));
		assert_eq!(engine.find_node(-500.0, -500.0, 12.0), None);
	}

	#[test]
	fn test_sticky_drag_keeps_pin_until_release() {
		let mut engine = GraphEngine::new(EngineConfig {
			sticky_drag: true,
			..EngineConfig::default()
		});
		engine.load_graph(&data(), Viewport::default()).unwrap();

		engine.begin_drag("A");
		engine.update_drag("A", 111.0, 222.0);
		engine.end_drag("A");
		for _ in 0..50 {
			engine.tick();
		}
		let a = engine.snapshot().unwrap().node("A").cloned().unwrap();
		assert!(a.pinned);
		assert_eq!((a.x, a.y), (111.0, 222.0));

		engine.release("A");
		assert!(!engine.snapshot().unwrap().node("A").unwrap().pinned);
	}

	#[test]
	fn test_drag_wakes_settled_layout() {
		let mut engine = loaded();
		let ticks = engine.frames().count();
		assert!(ticks > 0);
		assert!(!engine.is_running());

		engine.begin_drag("B");
		assert!(engine.is_running());
		assert!(engine.tick().is_some());
		engine.end_drag("B");
		assert!(engine.frames().count() > 0);
		assert!(!engine.is_running());
	}

	#[test]
	fn test_drag_ops_ignore_unknown_and_idle_nodes() {
		let mut engine = loaded();
		let before = engine.snapshot().unwrap();
		engine.update_drag("A", 1.0, 1.0);
		engine.end_drag("A");
		engine.begin_drag("ghost");
		engine.update_drag("ghost", 1.0, 1.0);
		assert_eq!(engine.snapshot().unwrap(), before);
	}

	#[test]
	fn test_advance_redraws_settled_layout() {
		let mut engine = loaded();
		engine.frames().for_each(drop);
		let mut sink: Vec<Frame> = Vec::new();
		assert!(!engine.advance(&mut sink));
		assert_eq!(sink.len(), 1);
	}

	#[test]
	fn test_stop_ends_frames() {
		let mut engine = loaded();
		assert!(engine.tick().is_some());
		let frame = engine.snapshot().unwrap();
		engine.stop();
		assert!(engine.tick().is_none());
		assert!(!engine.is_current(&frame));
	}
}
