//! Full positional snapshots handed to rendering adapters.

use super::classify::NodeKind;

/// One node as it should be drawn this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeFrame {
	/// Node identifier.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Classification, for colouring.
	pub kind: NodeKind,
	/// Horizontal position, the pin when pinned.
	pub x: f64,
	/// Vertical position, the pin when pinned.
	pub y: f64,
	/// Held in place by a drag or a sticky pin.
	pub pinned: bool,
	/// Under the pointer.
	pub hovered: bool,
	/// Directly linked to the hovered node.
	pub adjacent: bool,
	/// The single selected node.
	pub selected: bool,
}

/// One link with resolved endpoint coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkFrame {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Source endpoint x.
	pub x1: f64,
	/// Source endpoint y.
	pub y1: f64,
	/// Target endpoint x.
	pub x2: f64,
	/// Target endpoint y.
	pub y2: f64,
	/// One endpoint is hovered.
	pub highlighted: bool,
}

/// Everything needed to redraw the graph from scratch.
///
/// `generation` identifies the graph load the frame belongs to; see
/// [`GraphEngine::is_current`](super::GraphEngine::is_current).
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	/// Load this frame was produced for.
	pub generation: u64,
	/// Layout energy after the step.
	pub alpha: f64,
	/// Every node of the graph.
	pub nodes: Vec<NodeFrame>,
	/// Every link of the graph.
	pub links: Vec<LinkFrame>,
}

impl Frame {
	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&NodeFrame> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Anything that can draw frames: a canvas, a recorder in tests.
pub trait FrameSink {
	/// Render one frame.
	fn draw(&mut self, frame: &Frame);
}

impl FrameSink for Vec<Frame> {
	fn draw(&mut self, frame: &Frame) {
		self.push(frame.clone());
	}
}
