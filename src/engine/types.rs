//! Graph data structures as delivered by the analysis service.
//!
//! These are the unvalidated wire shapes. They become a [`Graph`](super::Graph)
//! only after passing [`Graph::try_from`](super::Graph), which is the sole way
//! data reaches the layout engine.

use serde::{Deserialize, Serialize};

/// A node in the graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display label. Nodes without one are shown under their id.
	#[serde(default)]
	pub label: Option<String>,
	/// Free-text summary shown in the detail modal.
	#[serde(default, alias = "desc")]
	pub summary: Option<String>,
}

impl GraphNode {
	/// Label to display, falling back to the id.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Rest distance override for this link's spring.
	#[serde(default)]
	pub distance: Option<f64>,
}

impl GraphLink {
	/// Link without a distance override.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			distance: None,
		}
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	/// All nodes.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Links between nodes, by id.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}
