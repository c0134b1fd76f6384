use std::borrow::Cow;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, error};

use super::error::{NodelError, Result};
use super::registry::{Connection, ConnectionRegistry};
use super::routing::{Route, resolve_routes};
use super::state::{ConnectionBinding, Helper, Helpers, NodelConfig, TemplateState, ViewTransform};
use super::surface::{ElementSpec, LineSpec, Surface};
use super::types::{Graph, Node};
use super::visibility::visible_nodes;

/// Outcome of a successful [`NodelRender::draw`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
	/// Ids of the visible nodes, in snapshot order.
	pub visible: Vec<String>,
	pub drawn: usize,
	/// Connections dropped because an element or connector was missing.
	pub skipped: usize,
}

/// Renders graph snapshots onto a [`Surface`].
///
/// Every [`draw`](Self::draw) clears the previous output and rebuilds it from
/// scratch. Calls must not overlap.
pub struct NodelRender<S: Surface> {
	surface: S,
	config: NodelConfig,
	view: ViewTransform,
	templates: TemplateState,
	helpers: Helpers,
	binding: Option<ConnectionBinding<S::Event>>,
	elements: IndexMap<String, S::Element>,
	lines: ConnectionRegistry<S::Connector>,
}

impl<S: Surface> NodelRender<S> {
	pub fn new(surface: S) -> Self {
		Self::with_config(surface, NodelConfig::default())
	}

	/// Creates a renderer and hides the surface's template masters.
	pub fn with_config(surface: S, config: NodelConfig) -> Self {
		let mut render = Self {
			templates: TemplateState::new(surface.find_templates()),
			helpers: Helpers::new(&config.default_color),
			surface,
			config,
			view: ViewTransform::default(),
			binding: None,
			elements: IndexMap::new(),
			lines: ConnectionRegistry::default(),
		};
		render.toggle_templates();
		render
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}

	pub fn config(&self) -> &NodelConfig {
		&self.config
	}

	pub fn view(&self) -> &ViewTransform {
		&self.view
	}

	pub fn element(&self, node_id: &str) -> Option<&S::Element> {
		self.elements.get(node_id)
	}

	pub fn connections(&self) -> impl Iterator<Item = &Connection> {
		self.lines.connections()
	}

	pub fn connection_count(&self) -> usize {
		self.lines.connections().count()
	}

	pub fn templates_hidden(&self) -> bool {
		self.templates.hidden()
	}

	/// Shows or hides every template master.
	pub fn toggle_templates(&mut self) {
		let hidden = self.templates.toggle();
		for template in self.templates.iter() {
			self.surface.set_template_hidden(template, hidden);
		}
	}

	/// Replaces one of the connection hooks.
	pub fn on(&mut self, helper: Helper) {
		debug!("(nodel) registered {}", helper.name());
		self.helpers.set(helper);
	}

	/// Binds `callback` to the label of every connection drawn from now on,
	/// replacing any previous binding.
	pub fn add_connection_binding(
		&mut self,
		event_type: impl Into<String>,
		callback: impl Fn(&S::Event, &[String; 2]) + 'static,
	) {
		self.binding = Some(ConnectionBinding {
			event_type: event_type.into(),
			callback: Rc::new(callback),
		});
	}

	pub fn verify(&self, template: &str, exists: bool) -> bool {
		self.templates.verify(template, exists)
	}

	pub fn recenter(&mut self) {
		self.view.recenter();
	}

	pub fn pan_view(&mut self, dx: f64, dy: f64) {
		self.view.pan(dx, dy);
	}

	pub fn adjust_scale(&mut self, delta: f64) {
		self.view.adjust_scale(delta);
	}

	pub fn set_scale(&mut self, scale: f64) {
		self.view.set_scale(scale);
	}

	pub fn reset_scale(&mut self) {
		self.view.reset_scale();
	}

	/// Screen position of the node's center.
	pub fn to_reg_pos(&self, node: &Node) -> (f64, f64) {
		self.view.graph_to_screen(node.x, node.y)
	}

	/// Removes every connector and node element, leaving template masters alone.
	pub fn clear(&mut self) {
		self.disconnect_all();
		for (_, element) in self.elements.drain(..) {
			self.surface.remove_element(element);
		}
	}

	pub fn disconnect_all(&mut self) {
		self.lines.disconnect_all(&mut self.surface);
	}

	/// Redraws `graph` from scratch.
	///
	/// Connections are routed before anything is materialized, so a graph
	/// that cannot be routed leaves the surface empty. An unknown template
	/// aborts midway; drawing again with a corrected graph restores the
	/// surface.
	pub fn draw(&mut self, graph: &Graph) -> Result<DrawReport> {
		self.clear();

		let visible = visible_nodes(graph);
		debug!("(nodel) visible nodes {:?}", visible.ids());

		let routes = resolve_routes(graph, &visible)?;

		for node in visible.nodes() {
			self.materialize(node)?;
		}

		let mut report = DrawReport {
			visible: visible.ids(),
			..DrawReport::default()
		};
		for route in &routes {
			match self.draw_connection(route) {
				Ok(()) => report.drawn += 1,
				Err(err) => {
					error!("(nodel) skipping connection: {err}");
					report.skipped += 1;
				}
			}
		}
		Ok(report)
	}

	fn materialize(&mut self, node: &Node) -> Result<()> {
		let unknown = || NodelError::UnknownTemplate {
			template_id: node.template_id.clone(),
		};
		if !self.templates.contains(&node.template_id) {
			return Err(unknown());
		}
		let master = self
			.surface
			.template_markup(&node.template_id)
			.ok_or_else(unknown)?;

		let mut classes = Vec::new();
		if node.is_collapsed_group() {
			classes.push(self.config.group_class.as_str());
		}
		let spec = ElementSpec {
			node_id: &node.id,
			template_id: &node.template_id,
			markup: substitute(&master, &node.variables(), self.config.escape_values),
			classes,
		};
		let Some(element) = self.surface.create_element(&spec) else {
			error!("(nodel) failed to create element for {}", node.id);
			return Ok(());
		};

		let (x, y) = self.to_reg_pos(node);
		let (width, height) = self.surface.element_size(&element);
		self.surface.place_element(&element, x - width / 2.0, y - height / 2.0);
		self.elements.insert(node.id.clone(), element);
		Ok(())
	}

	fn draw_connection(&mut self, route: &Route<'_>) -> Result<()> {
		let (from_id, to_id) = (&route.from.id, &route.to.id);
		let missing = |id: &String| NodelError::MissingElement {
			node_id: id.clone(),
		};
		let from = self.elements.get(from_id).ok_or_else(|| missing(from_id))?;
		let to = self.elements.get(to_id).ok_or_else(|| missing(to_id))?;
		debug!("(nodel) drawing from {from_id} to {to_id}");

		let connection = Connection {
			from: from_id.clone(),
			to: to_id.clone(),
			kind: route.kind.to_owned(),
			label: self.helpers.label(route.from, route.to, route.kind),
			color: self.helpers.color(route.kind),
			dashed: route.dashed,
		};
		let line = LineSpec {
			label: &connection.label,
			color: &connection.color,
			dashed: connection.dashed,
		};
		let mut handle = self.surface.connect(from, to, &line).ok_or_else(|| {
			NodelError::ConnectorFailed {
				from: from_id.clone(),
				to: to_id.clone(),
			}
		})?;

		if let Some(binding) = &self.binding {
			let callback = Rc::clone(&binding.callback);
			let ends = [connection.from.clone(), connection.to.clone()];
			self.surface.bind(
				&mut handle,
				&binding.event_type,
				Box::new(move |event: &S::Event| callback(event, &ends)),
			);
		}
		self.lines.push(connection, handle);
		Ok(())
	}
}

/// Replaces every `{name}` placeholder in `markup` with its value.
///
/// Unless `escape` is set the values are inserted as raw markup, so callers
/// must only pass trusted or pre-escaped values.
pub fn substitute(markup: &str, vars: &IndexMap<String, String>, escape: bool) -> String {
	vars.iter().fold(markup.to_owned(), |acc, (name, value)| {
		let value = if escape {
			escape_markup(value)
		} else {
			Cow::Borrowed(value.as_str())
		};
		acc.replace(&format!("{{{name}}}"), &value)
	})
}

pub fn escape_markup(value: &str) -> Cow<'_, str> {
	if !value.contains(['&', '<', '>', '"', '\'']) {
		return Cow::Borrowed(value);
	}
	let mut out = String::with_capacity(value.len() + 8);
	for c in value.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	Cow::Owned(out)
}
