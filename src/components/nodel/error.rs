/// Failures raised while resolving or drawing a nodel graph.
///
/// `InconsistentGraphState` and `UnknownTemplate` abort a draw. `MissingElement`
/// and `ConnectorFailed` only cost the connection they were raised for.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodelError {
	/// A hidden child has no collapsed group to fold its connection onto.
	#[error("node {child} is hidden but none of its groups is collapsed")]
	InconsistentGraphState { child: String },
	/// A node references a template the surface does not provide.
	#[error("couldn't find template #{template_id}")]
	UnknownTemplate { template_id: String },
	/// No element was materialized for a node a connection points at.
	#[error("no element drawn for node {node_id}")]
	MissingElement { node_id: String },
	/// The surface refused to draw a connector.
	#[error("surface failed to draw connector from {from} to {to}")]
	ConnectorFailed { from: String, to: String },
	/// A group or edge names a node that is not in the snapshot.
	#[error("{referenced_by} references unknown node {node_id}")]
	UnknownNode {
		node_id: String,
		referenced_by: String,
	},
	/// Two nodes share an id.
	#[error("duplicate node id {node_id}")]
	DuplicateNode { node_id: String },
	/// Group membership loops back onto itself.
	#[error("group containment cycle through {node_id}")]
	ContainmentCycle { node_id: String },
}

impl NodelError {
	/// Whether the error aborts the whole draw instead of a single connection.
	pub fn is_fatal(&self) -> bool {
		!matches!(
			self,
			Self::MissingElement { .. } | Self::ConnectorFailed { .. }
		)
	}
}

/// Result alias for nodel operations.
pub type Result<T> = std::result::Result<T, NodelError>;
