//! Validated graph: unique node ids, every link endpoint resolvable.

use std::collections::HashMap;

use super::types::GraphData;
use crate::error::GraphError;

/// A node that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique node identifier.
	pub id: String,
	/// Display label, the id when the wire node had none.
	pub label: String,
	/// Free-text summary from the analysis, if any.
	pub summary: Option<String>,
}

/// A link whose endpoints are indices into [`Graph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Spring rest distance override.
	pub distance: Option<f64>,
}

/// Graph data the layout engine can trust.
///
/// The only constructor is [`TryFrom<&GraphData>`], so holding a `Graph`
/// means no link dangles and no id repeats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
}

impl Graph {
	/// Nodes in load order; indices are stable for the graph's lifetime.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Links with endpoints resolved to node indices.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Index of the node with this id.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Number of links touching each node, self-links counted once.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.nodes.len()];
		for link in &self.links {
			degrees[link.source] += 1;
			if link.target != link.source {
				degrees[link.target] += 1;
			}
		}
		degrees
	}

	/// Nodes directly linked to `idx`, in either direction.
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.links.iter().filter_map(move |link| {
			if link.source == idx {
				Some(link.target)
			} else if link.target == idx {
				Some(link.source)
			} else {
				None
			}
		})
	}
}

impl TryFrom<&GraphData> for Graph {
	type Error = GraphError;

	fn try_from(data: &GraphData) -> Result<Self, Self::Error> {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for node in &data.nodes {
			if index.insert(node.id.clone(), nodes.len()).is_some() {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
			nodes.push(Node {
				id: node.id.clone(),
				label: node.display_label().to_string(),
				summary: node.summary.clone(),
			});
		}

		let mut links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			let resolve = |id: &String| {
				index.get(id).copied().ok_or_else(|| GraphError::DanglingLink {
					source_id: link.source.clone(),
					target_id: link.target.clone(),
					missing: id.clone(),
				})
			};
			links.push(Link {
				source: resolve(&link.source)?,
				target: resolve(&link.target)?,
				distance: link.distance,
			});
		}

		Ok(Self {
			nodes,
			links,
			index,
		})
	}
}

impl TryFrom<GraphData> for Graph {
	type Error = GraphError;

	fn try_from(data: GraphData) -> Result<Self, Self::Error> {
		Self::try_from(&data)
	}
}
