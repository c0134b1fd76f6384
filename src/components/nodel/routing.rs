use super::error::{NodelError, Result};
use super::types::{Graph, Node};
use super::visibility::{VisibleSet, leaves_of};

/// Where a connection towards a child actually lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoint<'a> {
	pub node: &'a Node,
	/// Set when the child is hidden and the connection ends on a group boundary.
	pub folded: bool,
}

/// One connection to draw, from a visible node to a resolved endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Route<'a> {
	pub from: &'a Node,
	pub to: &'a Node,
	pub kind: &'a str,
	pub dashed: bool,
}

/// Picks the visual endpoint for `child`.
///
/// Hidden children fold onto the nearest collapsed group around them, so a
/// connection never skips past an inner collapse boundary to an outer one.
pub fn resolve_endpoint<'a>(
	graph: &'a Graph,
	child: &'a Node,
	visible: &VisibleSet<'_>,
) -> Result<Endpoint<'a>> {
	if visible.contains(&child.id) {
		return Ok(Endpoint {
			node: child,
			folded: false,
		});
	}

	graph
		.ancestors(&child.id)
		.into_iter()
		.rev()
		.find(|group| group.is_collapsed_group())
		.map(|node| Endpoint { node, folded: true })
		.ok_or_else(|| NodelError::InconsistentGraphState {
			child: child.id.clone(),
		})
}

/// Folds `child` until it lands on a visible node.
///
/// The nearest collapsed group may itself be hidden by an outer collapse; the
/// connection then moves outward to the first collapsed group that is drawn.
fn visible_endpoint<'a>(
	graph: &'a Graph,
	child: &'a Node,
	visible: &VisibleSet<'_>,
) -> Result<Endpoint<'a>> {
	let mut end = resolve_endpoint(graph, child, visible)?;
	while !visible.contains(&end.node.id) {
		end = resolve_endpoint(graph, end.node, visible)?;
	}
	Ok(end)
}

/// Resolves every connection the visible nodes own through their leaves.
///
/// Fails on the first child that cannot be folded; nothing is routed then.
pub fn resolve_routes<'a>(graph: &'a Graph, visible: &VisibleSet<'a>) -> Result<Vec<Route<'a>>> {
	let mut routes = Vec::new();
	for &node in visible.nodes() {
		for leaf_id in leaves_of(node) {
			let leaf = graph.node(leaf_id)?;
			for (kind, children) in &leaf.children {
				for child_id in children {
					let end = visible_endpoint(graph, graph.node(child_id)?, visible)?;
					routes.push(Route {
						from: node,
						to: end.node,
						kind,
						dashed: end.folded,
					});
				}
			}
		}
	}
	Ok(routes)
}
