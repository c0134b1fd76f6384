use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

use super::state::NodelConfig;
use super::surface::{ElementSpec, LineSpec, Surface};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const ARROW_SIZE: f64 = 8.0;
const LINE_WIDTH: f64 = 2.0;
const BEND: f64 = 0.15;

/// Box of a rendered element, relative to the nodel container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn center(&self) -> (f64, f64) {
		(self.left + self.width / 2.0, self.top + self.height / 2.0)
	}

	fn radius(&self) -> f64 {
		self.width.min(self.height) / 2.0
	}
}

/// Curve, arrowhead and label anchor of a connector.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorGeometry {
	pub start: (f64, f64),
	pub control: (f64, f64),
	pub end: (f64, f64),
	/// Tip first, then the two back corners.
	pub head: [(f64, f64); 3],
	pub label: (f64, f64),
}

fn unit(dx: f64, dy: f64) -> (f64, f64) {
	let len = (dx * dx + dy * dy).sqrt();
	if len < 0.001 {
		(0.0, 0.0)
	} else {
		(dx / len, dy / len)
	}
}

/// Quadratic curve between two boxes, bent to the left of the travel
/// direction and trimmed so it starts and ends at the boxes' edges.
///
/// Boxes sharing a center get a loop over their top edge.
pub fn connector_geometry(from: Rect, to: Rect, arrow_size: f64) -> ConnectorGeometry {
	let ((x1, y1), (x2, y2)) = (from.center(), to.center());
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();

	let (start, control, tip) = if dist < 0.001 {
		let r = from.radius().max(1.0);
		(
			(x1 - r * 0.5, from.top),
			(x1, from.top - 4.0 * r),
			(x1 + r * 0.5, from.top),
		)
	} else {
		let (ux, uy) = (dx / dist, dy / dist);
		let bend = dist * BEND;
		let control = ((x1 + x2) / 2.0 - uy * bend, (y1 + y2) / 2.0 + ux * bend);
		let (sx, sy) = unit(control.0 - x1, control.1 - y1);
		let (ex, ey) = unit(x2 - control.0, y2 - control.1);
		(
			(x1 + sx * from.radius(), y1 + sy * from.radius()),
			control,
			(x2 - ex * to.radius(), y2 - ey * to.radius()),
		)
	};

	let (ex, ey) = unit(tip.0 - control.0, tip.1 - control.1);
	let end = (tip.0 - ex * arrow_size, tip.1 - ey * arrow_size);
	let (px, py) = (-ey * arrow_size * 0.5, ex * arrow_size * 0.5);

	ConnectorGeometry {
		start,
		control,
		end,
		head: [tip, (end.0 + px, end.1 + py), (end.0 - px, end.1 - py)],
		label: (
			0.25 * start.0 + 0.5 * control.0 + 0.25 * end.0,
			0.25 * start.1 + 0.5 * control.1 + 0.25 * end.1,
		),
	}
}

/// Whether an event landed on a bound connection label.
pub fn is_connection_target(target: Option<EventTarget>, connection_class: &str) -> bool {
	target
		.and_then(|target| target.dyn_into::<Element>().ok())
		.is_some_and(|elem| elem.class_list().contains(connection_class))
}

/// An SVG connector and the listener bound to its label.
pub struct DomConnector {
	group: Element,
	label: Element,
	listener: Option<(String, Closure<dyn FnMut(Event)>)>,
}

/// Surface drawing into a DOM container.
///
/// Templates are children of the container carrying the template class.
/// Node elements are positioned clones of them; connectors live in an SVG
/// overlay spanning the container, which should be positioned itself.
pub struct DomSurface {
	document: Document,
	container: HtmlElement,
	overlay: Element,
	template_class: String,
	connection_class: String,
}

impl DomSurface {
	pub fn new(container: HtmlElement, config: &NodelConfig) -> Result<Self, JsValue> {
		let document = container
			.owner_document()
			.ok_or_else(|| JsValue::from_str("nodel container is not attached to a document"))?;
		let overlay = document.create_element_ns(Some(SVG_NS), "svg")?;
		overlay.set_attribute("class", "nodel-connections")?;
		overlay.set_attribute(
			"style",
			"position: absolute; left: 0; top: 0; width: 100%; height: 100%; overflow: visible; pointer-events: none;",
		)?;
		container.append_child(&overlay)?;

		Ok(Self {
			document,
			container,
			overlay,
			template_class: config.template_class.clone(),
			connection_class: config.connection_class.clone(),
		})
	}

	/// Template master with `template_id`, searched among the container's
	/// template-class children only, so node clones sharing the id never
	/// shadow it.
	fn template(&self, template_id: &str) -> Option<Element> {
		let templates = self
			.container
			.get_elements_by_class_name(&self.template_class);
		(0..templates.length())
			.filter_map(|i| templates.item(i))
			.find(|elem| elem.id() == template_id)
	}

	fn rect(element: &HtmlElement) -> Rect {
		Rect {
			left: element.offset_left() as f64,
			top: element.offset_top() as f64,
			width: element.offset_width() as f64,
			height: element.offset_height() as f64,
		}
	}

	fn svg(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<Element, JsValue> {
		let elem = self.document.create_element_ns(Some(SVG_NS), tag)?;
		for (name, value) in attrs {
			elem.set_attribute(name, value)?;
		}
		Ok(elem)
	}

	fn instantiate(&self, spec: &ElementSpec<'_>) -> Result<HtmlElement, JsValue> {
		let master = self
			.template(spec.template_id)
			.ok_or_else(|| JsValue::from_str("template master is gone"))?;
		let elem: HtmlElement = master.clone_node_with_deep(true)?.dyn_into()?;
		elem.set_id(spec.node_id);
		elem.set_hidden(false);
		let classes = elem.class_list();
		classes.remove_1(&self.template_class)?;
		for class in &spec.classes {
			classes.add_1(class)?;
		}
		elem.set_inner_html(&spec.markup);
		self.container.append_child(&elem)?;
		Ok(elem)
	}

	fn draw_connector(
		&self,
		from: &HtmlElement,
		to: &HtmlElement,
		line: &LineSpec<'_>,
	) -> Result<DomConnector, JsValue> {
		let geo = connector_geometry(Self::rect(from), Self::rect(to), ARROW_SIZE);

		let group = self.svg("g", &[("class", "nodel-connector")])?;
		let path = self.svg(
			"path",
			&[
				(
					"d",
					&format!(
						"M {} {} Q {} {} {} {}",
						geo.start.0, geo.start.1, geo.control.0, geo.control.1, geo.end.0, geo.end.1
					),
				),
				("fill", "none"),
				("stroke", line.color),
				("stroke-width", &LINE_WIDTH.to_string()),
				("stroke-dasharray", if line.dashed { "8 4" } else { "none" }),
			],
		)?;
		let points = geo
			.head
			.iter()
			.map(|(x, y)| format!("{x},{y}"))
			.collect::<Vec<_>>()
			.join(" ");
		let head = self.svg("polygon", &[("points", &points), ("fill", line.color)])?;
		let label = self.svg(
			"text",
			&[
				("x", &geo.label.0.to_string()),
				("y", &geo.label.1.to_string()),
				("text-anchor", "middle"),
				("dominant-baseline", "middle"),
				("fill", line.color),
				("style", "pointer-events: all; cursor: pointer;"),
			],
		)?;
		label.set_text_content(Some(line.label));

		group.append_child(&path)?;
		group.append_child(&head)?;
		group.append_child(&label)?;
		self.overlay.append_child(&group)?;

		Ok(DomConnector {
			group,
			label,
			listener: None,
		})
	}
}

impl Surface for DomSurface {
	type Element = HtmlElement;
	type Connector = DomConnector;
	type Event = Event;

	fn find_templates(&self) -> Vec<String> {
		let templates = self
			.container
			.get_elements_by_class_name(&self.template_class);
		(0..templates.length())
			.filter_map(|i| templates.item(i))
			.map(|elem| elem.id())
			.filter(|id| !id.is_empty())
			.collect()
	}

	fn set_template_hidden(&mut self, template_id: &str, hidden: bool) {
		if let Some(elem) = self
			.template(template_id)
			.and_then(|e| e.dyn_into::<HtmlElement>().ok())
		{
			elem.set_hidden(hidden);
		}
	}

	fn template_markup(&self, template_id: &str) -> Option<String> {
		self.template(template_id).map(|elem| elem.inner_html())
	}

	fn create_element(&mut self, spec: &ElementSpec<'_>) -> Option<HtmlElement> {
		match self.instantiate(spec) {
			Ok(elem) => Some(elem),
			Err(err) => {
				warn!("(nodel) couldn't clone template #{}: {:?}", spec.template_id, err);
				None
			}
		}
	}

	fn element_size(&self, element: &HtmlElement) -> (f64, f64) {
		(element.offset_width() as f64, element.offset_height() as f64)
	}

	fn place_element(&mut self, element: &HtmlElement, left: f64, top: f64) {
		let style = element.style();
		let _ = style.set_property("position", "absolute");
		let _ = style.set_property("left", &format!("{left}px"));
		let _ = style.set_property("top", &format!("{top}px"));
	}

	fn remove_element(&mut self, element: HtmlElement) {
		element.remove();
	}

	fn connect(
		&mut self,
		from: &HtmlElement,
		to: &HtmlElement,
		line: &LineSpec<'_>,
	) -> Option<DomConnector> {
		self.draw_connector(from, to, line)
			.map_err(|err| warn!("(nodel) couldn't draw connector: {:?}", err))
			.ok()
	}

	fn disconnect(&mut self, connector: DomConnector) {
		let DomConnector {
			group,
			label,
			listener,
		} = connector;
		if let Some((event_type, callback)) = listener {
			let _ = label
				.remove_event_listener_with_callback(&event_type, callback.as_ref().unchecked_ref());
		}
		group.remove();
	}

	fn bind(
		&mut self,
		connector: &mut DomConnector,
		event_type: &str,
		handler: Box<dyn Fn(&Event)>,
	) {
		let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| handler(&event));
		if let Err(err) = connector
			.label
			.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
		{
			warn!("(nodel) couldn't bind {event_type} listener: {:?}", err);
			return;
		}
		let _ = connector.label.class_list().add_1(&self.connection_class);
		connector.listener = Some((event_type.to_owned(), callback));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
		((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
	}

	#[test]
	fn connector_is_trimmed_to_element_edges() {
		let from = Rect {
			left: 0.0,
			top: 0.0,
			width: 20.0,
			height: 20.0,
		};
		let to = Rect { left: 100.0, ..from };
		let geo = connector_geometry(from, to, ARROW_SIZE);

		assert!((distance(geo.start, from.center()) - 10.0).abs() < 1e-9);
		assert!((distance(geo.head[0], to.center()) - 10.0).abs() < 1e-9);
		assert!((distance(geo.head[0], geo.end) - ARROW_SIZE).abs() < 1e-9);
		assert_eq!(geo.control, (60.0, 25.0));
		// Bent below the straight line for a left-to-right connector.
		assert!(geo.label.1 > 10.0);
	}

	#[test]
	fn self_connection_loops_over_the_top_edge() {
		let rect = Rect {
			left: 5.0,
			top: 5.0,
			width: 10.0,
			height: 10.0,
		};
		let geo = connector_geometry(rect, rect, ARROW_SIZE);

		assert_eq!(geo.start, (7.5, 5.0));
		assert_eq!(geo.head[0], (12.5, 5.0));
		assert!(geo.control.1 < rect.top);
		assert!(geo.label.1 < rect.top);
	}
}
