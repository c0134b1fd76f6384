use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use super::error::{NodelError, Result};

/// Container descriptor carried by group nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
	pub collapsed: bool,
	/// Nodes (or nested groups) directly inside this group.
	pub members: IndexSet<String>,
	/// Terminal members whose edges stand in for the group while collapsed.
	pub ends: Vec<String>,
	/// Summary values substituted into the template while collapsed.
	pub summary: IndexMap<String, String>,
}

impl Group {
	/// A flat group whose members are also its ends.
	pub fn containing<I, S>(members: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let members: IndexSet<String> = members.into_iter().map(Into::into).collect();
		Self {
			ends: members.iter().cloned().collect(),
			members,
			..Self::default()
		}
	}

	pub fn collapsed(mut self, collapsed: bool) -> Self {
		self.collapsed = collapsed;
		self
	}

	pub fn with_ends<I, S>(mut self, ends: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ends = ends.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_summary(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.summary.insert(name.into(), value.into());
		self
	}

	/// Template variables of a collapsed group: its summary plus `collapsed` and `ends`.
	pub fn variables(&self) -> IndexMap<String, String> {
		let mut vars = self.summary.clone();
		vars.insert("collapsed".into(), self.collapsed.to_string());
		vars.insert("ends".into(), self.ends.join(","));
		vars
	}
}

/// A graph entity as handed over by the embedding application.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub template_id: String,
	pub data: IndexMap<String, String>,
	pub group: Option<Group>,
	/// Outgoing edges keyed by connection type.
	pub children: IndexMap<String, IndexSet<String>>,
	pub x: f64,
	pub y: f64,
}

impl Node {
	pub fn new(id: impl Into<String>, template_id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			template_id: template_id.into(),
			data: IndexMap::new(),
			group: None,
			children: IndexMap::new(),
			x: 0.0,
			y: 0.0,
		}
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = x;
		self.y = y;
		self
	}

	pub fn with_data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.data.insert(name.into(), value.into());
		self
	}

	pub fn with_group(mut self, group: Group) -> Self {
		self.group = Some(group);
		self
	}

	pub fn with_child(mut self, kind: impl Into<String>, child: impl Into<String>) -> Self {
		self.children
			.entry(kind.into())
			.or_default()
			.insert(child.into());
		self
	}

	pub fn is_group(&self) -> bool {
		self.group.is_some()
	}

	pub fn is_collapsed_group(&self) -> bool {
		self.group.as_ref().is_some_and(|g| g.collapsed)
	}

	/// Values substituted into the node's template.
	pub fn variables(&self) -> IndexMap<String, String> {
		match &self.group {
			Some(group) if group.collapsed => group.variables(),
			_ => self.data.clone(),
		}
	}
}

/// Read-only, validated snapshot of a nodel graph.
///
/// Iteration follows insertion order. Containment is derived from group
/// `members` first; a node claimed by several groups belongs to the first
/// one. Ends left unplaced belong to the innermost group listing them, and a
/// group outside every `members` list nests in the smallest group whose ends
/// strictly include its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: IndexMap<String, Node>,
	parents: HashMap<String, String>,
}

impl Graph {
	/// Builds a snapshot, rejecting duplicate ids, dangling references and
	/// containment cycles.
	pub fn new(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
		let mut by_id = IndexMap::new();
		for node in nodes {
			if by_id.contains_key(&node.id) {
				return Err(NodelError::DuplicateNode { node_id: node.id });
			}
			by_id.insert(node.id.clone(), node);
		}

		let require = |id: &String, referenced_by: &String| {
			if by_id.contains_key(id) {
				Ok(())
			} else {
				Err(NodelError::UnknownNode {
					node_id: id.clone(),
					referenced_by: referenced_by.clone(),
				})
			}
		};

		let mut parents = HashMap::new();
		for node in by_id.values() {
			for child in node.children.values().flatten() {
				require(child, &node.id)?;
			}
			let Some(group) = &node.group else {
				continue;
			};
			for end in &group.ends {
				require(end, &node.id)?;
				if end == &node.id {
					return Err(NodelError::ContainmentCycle {
						node_id: node.id.clone(),
					});
				}
			}
			for member in &group.members {
				require(member, &node.id)?;
				if member == &node.id {
					return Err(NodelError::ContainmentCycle {
						node_id: node.id.clone(),
					});
				}
				parents
					.entry(member.clone())
					.or_insert_with(|| node.id.clone());
			}
		}

		let mut claims: IndexMap<&str, &Node> = IndexMap::new();
		for node in by_id.values() {
			for end in ends_of(node) {
				if parents.contains_key(end) {
					continue;
				}
				let claimed = claims
					.get(end.as_str())
					.is_some_and(|owner| ends_of(owner).len() <= ends_of(node).len());
				if !claimed {
					claims.insert(end.as_str(), node);
				}
			}
		}
		for (end, owner) in claims {
			parents.insert(end.to_owned(), owner.id.clone());
		}

		let mut nested = Vec::new();
		for node in by_id.values() {
			if parents.contains_key(&node.id) || ends_of(node).is_empty() {
				continue;
			}
			let own: HashSet<&String> = ends_of(node).iter().collect();
			let outer = by_id
				.values()
				.filter(|other| other.id != node.id)
				.filter_map(|other| {
					let theirs: HashSet<&String> = ends_of(other).iter().collect();
					(theirs.len() > own.len() && own.is_subset(&theirs))
						.then_some((theirs.len(), other))
				})
				.min_by_key(|(len, _)| *len);
			if let Some((_, outer)) = outer {
				nested.push((node.id.clone(), outer.id.clone()));
			}
		}
		parents.extend(nested);

		for id in parents.keys() {
			let mut seen = HashSet::from([id.as_str()]);
			let mut cursor = id;
			while let Some(parent) = parents.get(cursor) {
				if !seen.insert(parent.as_str()) {
					return Err(NodelError::ContainmentCycle {
						node_id: id.clone(),
					});
				}
				cursor = parent;
			}
		}

		Ok(Self {
			nodes: by_id,
			parents,
		})
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.nodes.get(id)
	}

	/// Like [`Graph::get`], but reports the lookup failure.
	pub fn node(&self, id: &str) -> Result<&Node> {
		self.get(id).ok_or_else(|| NodelError::UnknownNode {
			node_id: id.to_owned(),
			referenced_by: "graph lookup".to_owned(),
		})
	}

	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	/// The group directly containing `id`, if any.
	pub fn parent_of(&self, id: &str) -> Option<&Node> {
		self.parents.get(id).and_then(|parent| self.get(parent))
	}

	/// Groups containing `id`, ordered from the outermost to the innermost.
	pub fn ancestors(&self, id: &str) -> Vec<&Node> {
		let mut chain = Vec::new();
		let mut cursor = id;
		while let Some(parent) = self.parent_of(cursor) {
			chain.push(parent);
			cursor = &parent.id;
		}
		chain.reverse();
		chain
	}
}

fn ends_of(node: &Node) -> &[String] {
	node.group.as_ref().map_or(&[], |group| group.ends.as_slice())
}
