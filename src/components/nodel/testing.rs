//! In-memory surface recording what the renderer does.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::surface::{ElementSpec, LineSpec, Surface};

#[derive(Clone, Debug, PartialEq)]
pub struct MockElement {
	pub template_id: String,
	pub markup: String,
	pub classes: Vec<String>,
	pub left: f64,
	pub top: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MockLine {
	pub from: String,
	pub to: String,
	pub label: String,
	pub color: String,
	pub dashed: bool,
}

pub struct MockEvent(pub &'static str);

type Handler = (String, Box<dyn Fn(&MockEvent)>);

#[derive(Default)]
pub struct RecordingSurface {
	pub templates: IndexMap<String, String>,
	pub hidden: HashMap<String, bool>,
	pub elements: IndexMap<String, MockElement>,
	pub lines: IndexMap<usize, MockLine>,
	pub fail_create: HashSet<String>,
	pub size: (f64, f64),
	handlers: HashMap<usize, Handler>,
	next_line: usize,
}

impl RecordingSurface {
	pub fn with_templates<'a>(templates: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		Self {
			templates: templates
				.into_iter()
				.map(|(id, markup)| (id.to_owned(), markup.to_owned()))
				.collect(),
			size: (40.0, 20.0),
			..Self::default()
		}
	}

	/// Fires `event_type` on the label of the given connector.
	pub fn fire(&self, line: usize, event_type: &'static str) -> bool {
		match self.handlers.get(&line) {
			Some((bound, handler)) if bound == event_type => {
				handler(&MockEvent(event_type));
				true
			}
			_ => false,
		}
	}

	pub fn line_ids(&self) -> Vec<usize> {
		self.lines.keys().copied().collect()
	}
}

impl Surface for RecordingSurface {
	type Element = String;
	type Connector = usize;
	type Event = MockEvent;

	fn find_templates(&self) -> Vec<String> {
		self.templates.keys().cloned().collect()
	}

	fn set_template_hidden(&mut self, template_id: &str, hidden: bool) {
		self.hidden.insert(template_id.to_owned(), hidden);
	}

	fn template_markup(&self, template_id: &str) -> Option<String> {
		self.templates.get(template_id).cloned()
	}

	fn create_element(&mut self, spec: &ElementSpec<'_>) -> Option<String> {
		if self.fail_create.contains(spec.node_id) {
			return None;
		}
		self.elements.insert(
			spec.node_id.to_owned(),
			MockElement {
				template_id: spec.template_id.to_owned(),
				markup: spec.markup.clone(),
				classes: spec.classes.iter().map(|c| c.to_string()).collect(),
				left: 0.0,
				top: 0.0,
			},
		);
		Some(spec.node_id.to_owned())
	}

	fn element_size(&self, _element: &String) -> (f64, f64) {
		self.size
	}

	fn place_element(&mut self, element: &String, left: f64, top: f64) {
		if let Some(elem) = self.elements.get_mut(element) {
			elem.left = left;
			elem.top = top;
		}
	}

	fn remove_element(&mut self, element: String) {
		self.elements.shift_remove(&element);
	}

	fn connect(&mut self, from: &String, to: &String, line: &LineSpec<'_>) -> Option<usize> {
		let id = self.next_line;
		self.next_line += 1;
		self.lines.insert(
			id,
			MockLine {
				from: from.clone(),
				to: to.clone(),
				label: line.label.to_owned(),
				color: line.color.to_owned(),
				dashed: line.dashed,
			},
		);
		Some(id)
	}

	fn disconnect(&mut self, connector: usize) {
		self.lines.shift_remove(&connector);
		self.handlers.remove(&connector);
	}

	fn bind(
		&mut self,
		connector: &mut usize,
		event_type: &str,
		handler: Box<dyn Fn(&MockEvent)>,
	) {
		self.handlers
			.insert(*connector, (event_type.to_owned(), handler));
	}
}
