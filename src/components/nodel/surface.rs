/// Everything needed to materialize one node.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec<'a> {
	pub node_id: &'a str,
	pub template_id: &'a str,
	/// Template markup with the node's variables substituted.
	pub markup: String,
	pub classes: Vec<&'a str>,
}

/// Styling of a connector between two elements.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSpec<'a> {
	pub label: &'a str,
	pub color: &'a str,
	pub dashed: bool,
}

/// Presentation sink the renderer draws into.
///
/// The renderer owns every element and connector it gets back and hands each
/// one back exactly once for removal.
pub trait Surface {
	type Element;
	type Connector;
	type Event: 'static;

	/// Ids of the template masters available for cloning.
	fn find_templates(&self) -> Vec<String>;

	fn set_template_hidden(&mut self, template_id: &str, hidden: bool);

	/// Markup of a template master, `None` when it does not exist.
	fn template_markup(&self, template_id: &str) -> Option<String>;

	/// Clones a template into a new visible element, `None` on failure.
	fn create_element(&mut self, spec: &ElementSpec<'_>) -> Option<Self::Element>;

	/// Rendered `(width, height)` of an element.
	fn element_size(&self, element: &Self::Element) -> (f64, f64);

	/// Moves the element's top-left corner to `(left, top)`.
	fn place_element(&mut self, element: &Self::Element, left: f64, top: f64);

	fn remove_element(&mut self, element: Self::Element);

	/// Draws a connector, `None` on failure.
	fn connect(
		&mut self,
		from: &Self::Element,
		to: &Self::Element,
		line: &LineSpec<'_>,
	) -> Option<Self::Connector>;

	fn disconnect(&mut self, connector: Self::Connector);

	/// Attaches `handler` to the connector's label for `event_type`.
	fn bind(
		&mut self,
		connector: &mut Self::Connector,
		event_type: &str,
		handler: Box<dyn Fn(&Self::Event)>,
	);
}
