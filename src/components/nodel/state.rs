use std::rc::Rc;

use log::error;

use super::types::Node;

pub const DEFAULT_CONNECTION_COLOR: &str = "#ad00d9";
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

/// Names, classes and switches shared by the renderer and its surface.
#[derive(Clone, Debug, PartialEq)]
pub struct NodelConfig {
	/// Id of the element hosting templates, node elements and connectors.
	pub container_id: String,
	/// Marks template masters inside the container.
	pub template_class: String,
	/// Added to elements of collapsed groups.
	pub group_class: String,
	/// Added to connector labels once an event binding is attached.
	pub connection_class: String,
	pub default_color: String,
	/// Escape substituted values instead of inserting them as raw markup.
	pub escape_values: bool,
}

impl Default for NodelConfig {
	fn default() -> Self {
		Self {
			container_id: "nodel".into(),
			template_class: "nodel-template".into(),
			group_class: "group".into(),
			connection_class: "connection".into(),
			default_color: DEFAULT_CONNECTION_COLOR.into(),
			escape_values: false,
		}
	}
}

/// Pan offset (world units) and scale applied when projecting nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		((gx + self.x) * self.k, (gy + self.y) * self.k)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(sx / self.k - self.x, sy / self.k - self.y)
	}

	pub fn recenter(&mut self) {
		self.x = 0.0;
		self.y = 0.0;
	}

	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	pub fn adjust_scale(&mut self, delta: f64) {
		self.set_scale(self.k + delta);
	}

	pub fn set_scale(&mut self, k: f64) {
		self.k = k.clamp(MIN_SCALE, MAX_SCALE);
	}

	pub fn reset_scale(&mut self) {
		self.k = 1.0;
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

/// Known template masters and whether they are currently hidden.
#[derive(Clone, Debug, Default)]
pub struct TemplateState {
	templates: Vec<String>,
	hidden: bool,
}

impl TemplateState {
	pub fn new(templates: Vec<String>) -> Self {
		Self {
			templates,
			hidden: false,
		}
	}

	/// Flips the flag and returns the new value.
	pub fn toggle(&mut self) -> bool {
		self.hidden = !self.hidden;
		self.hidden
	}

	pub fn hidden(&self) -> bool {
		self.hidden
	}

	pub fn contains(&self, template: &str) -> bool {
		self.templates.iter().any(|t| t == template)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.templates.iter().map(String::as_str)
	}

	/// Checks that `template` is (or is not) known, logging a diagnostic otherwise.
	pub fn verify(&self, template: &str, exists: bool) -> bool {
		if !template.is_empty() && self.contains(template) == exists {
			return true;
		}
		error!(
			"(nodel) {} template #{}",
			if exists { "couldn't find" } else { "found" },
			template
		);
		false
	}
}

pub type ColorHook = Box<dyn Fn(&str) -> String>;
pub type LabelHook = Box<dyn Fn(&Node, &Node, &str) -> String>;

/// A replacement for one of the connection hooks.
pub enum Helper {
	/// Maps a connection type to a stroke color.
	ConnectionColor(ColorHook),
	/// Builds the middle label from the start node, end node and connection type.
	ConnectionLabel(LabelHook),
}

impl Helper {
	pub fn color(f: impl Fn(&str) -> String + 'static) -> Self {
		Self::ConnectionColor(Box::new(f))
	}

	pub fn label(f: impl Fn(&Node, &Node, &str) -> String + 'static) -> Self {
		Self::ConnectionLabel(Box::new(f))
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::ConnectionColor(_) => "connection-color",
			Self::ConnectionLabel(_) => "connection-label",
		}
	}
}

/// Active connection hooks.
pub struct Helpers {
	color: ColorHook,
	label: LabelHook,
}

impl Helpers {
	pub fn new(default_color: &str) -> Self {
		let default_color = default_color.to_owned();
		Self {
			color: Box::new(move |_| default_color.clone()),
			label: Box::new(|_, _, _| String::new()),
		}
	}

	pub fn set(&mut self, helper: Helper) {
		match helper {
			Helper::ConnectionColor(f) => self.color = f,
			Helper::ConnectionLabel(f) => self.label = f,
		}
	}

	pub fn color(&self, kind: &str) -> String {
		(self.color)(kind)
	}

	pub fn label(&self, from: &Node, to: &Node, kind: &str) -> String {
		(self.label)(from, to, kind)
	}
}

pub type BindingCallback<E> = Rc<dyn Fn(&E, &[String; 2])>;

/// Event listener attached to the label of every connection drawn.
pub struct ConnectionBinding<E> {
	pub event_type: String,
	pub callback: BindingCallback<E>,
}

impl<E> Clone for ConnectionBinding<E> {
	fn clone(&self) -> Self {
		Self {
			event_type: self.event_type.clone(),
			callback: Rc::clone(&self.callback),
		}
	}
}
