use std::collections::HashSet;

use super::types::{Graph, Node};

/// Nodes that get an element of their own, in snapshot order.
#[derive(Clone, Debug, Default)]
pub struct VisibleSet<'a> {
	nodes: Vec<&'a Node>,
	ids: HashSet<&'a str>,
}

impl<'a> VisibleSet<'a> {
	pub fn from_nodes(nodes: Vec<&'a Node>) -> Self {
		let ids = nodes.iter().map(|n| n.id.as_str()).collect();
		Self { nodes, ids }
	}

	pub fn nodes(&self) -> &[&'a Node] {
		&self.nodes
	}

	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains(id)
	}

	pub fn ids(&self) -> Vec<String> {
		self.nodes.iter().map(|n| n.id.clone()).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// A node is drawn unless one of the groups around it is collapsed.
pub fn is_visible(graph: &Graph, node: &Node) -> bool {
	!graph
		.ancestors(&node.id)
		.iter()
		.any(|group| group.is_collapsed_group())
}

pub fn visible_nodes(graph: &Graph) -> VisibleSet<'_> {
	VisibleSet::from_nodes(graph.nodes().filter(|n| is_visible(graph, n)).collect())
}

/// Ids whose declared edges a visible node is responsible for drawing.
///
/// A collapsed group answers for its declared `ends`, anything else only for
/// itself.
pub fn leaves_of(node: &Node) -> Vec<&str> {
	match &node.group {
		Some(group) if group.collapsed => group.ends.iter().map(String::as_str).collect(),
		_ => vec![node.id.as_str()],
	}
}
