#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use nodel_canvas::nodel::{
		DomSurface, Graph, Group, Node, NodelConfig, NodelRender, is_connection_target,
	};
	use wasm_bindgen::JsCast;
	use wasm_bindgen_test::*;
	use web_sys::HtmlElement;

	wasm_bindgen_test_configure!(run_in_browser);

	fn mount() -> HtmlElement {
		let document = web_sys::window().unwrap().document().unwrap();
		let container: HtmlElement = document
			.create_element("div")
			.unwrap()
			.dyn_into()
			.unwrap();
		container.set_id("nodel");
		container.set_inner_html(
			r#"<div id="tpl-node" class="nodel-template"><span>{title}</span></div>"#,
		);
		document.body().unwrap().append_child(&container).unwrap();
		container
	}

	fn graph() -> Graph {
		Graph::new([
			Node::new("a", "tpl-node")
				.at(40.0, 40.0)
				.with_data("title", "Alpha")
				.with_child("flow", "b"),
			Node::new("g", "tpl-node")
				.at(200.0, 40.0)
				.with_group(
					Group::containing(["b"])
						.with_summary("title", "Group")
						.collapsed(true),
				),
			Node::new("b", "tpl-node").with_data("title", "Beta"),
		])
		.expect("valid graph")
	}

	#[wasm_bindgen_test]
	fn draws_nodes_and_folded_connector() {
		let container = mount();
		let document = web_sys::window().unwrap().document().unwrap();
		let surface =
			DomSurface::new(container.clone(), &NodelConfig::default()).expect("container attached");
		let mut render = NodelRender::new(surface);

		let report = render.draw(&graph()).expect("draw succeeds");
		assert_eq!(report.visible, ["a", "g"]);
		assert_eq!(report.drawn, 1);

		let alpha = document.get_element_by_id("a").expect("node element");
		assert!(alpha.inner_html().contains("Alpha"));
		let group = document.get_element_by_id("g").expect("group element");
		assert!(group.class_list().contains("group"));
		assert!(group.inner_html().contains("Group"));
		assert_eq!(container.get_elements_by_tag_name("path").length(), 1);

		container.remove();
	}

	#[wasm_bindgen_test]
	fn redraw_replaces_previous_output() {
		let container = mount();
		let surface = DomSurface::new(container.clone(), &NodelConfig::default()).unwrap();
		let mut render = NodelRender::new(surface);

		render.draw(&graph()).unwrap();
		let first = container.children().length();
		render.draw(&graph()).unwrap();

		assert_eq!(container.children().length(), first);
		assert_eq!(container.get_elements_by_tag_name("path").length(), 1);

		render.clear();
		assert_eq!(container.get_elements_by_tag_name("path").length(), 0);
		container.remove();
	}

	#[wasm_bindgen_test]
	fn templates_start_hidden() {
		let container = mount();
		let surface = DomSurface::new(container.clone(), &NodelConfig::default()).unwrap();
		let mut render = NodelRender::new(surface);
		let template: HtmlElement = web_sys::window()
			.unwrap()
			.document()
			.unwrap()
			.get_element_by_id("tpl-node")
			.unwrap()
			.dyn_into()
			.unwrap();

		assert!(template.hidden());
		render.toggle_templates();
		assert!(!template.hidden());
		assert!(render.verify("tpl-node", true));

		container.remove();
	}

	#[wasm_bindgen_test]
	fn node_sharing_a_template_id_keeps_the_master() {
		let container = mount();
		let surface = DomSurface::new(container.clone(), &NodelConfig::default()).unwrap();
		let mut render = NodelRender::new(surface);
		let graph = Graph::new([Node::new("tpl-node", "tpl-node").with_data("title", "First")])
			.unwrap();

		render.draw(&graph).unwrap();
		let graph = Graph::new([Node::new("tpl-node", "tpl-node").with_data("title", "Second")])
			.unwrap();
		render.draw(&graph).unwrap();

		let templates = container.get_elements_by_class_name("nodel-template");
		assert_eq!(templates.length(), 1);
		let master = templates.item(0).unwrap();
		assert!(master.inner_html().contains("{title}"));
		assert!(container.inner_html().contains("Second"));
		assert!(!container.inner_html().contains("First"));

		container.remove();
	}

	#[wasm_bindgen_test]
	fn connection_labels_are_recognised_as_targets() {
		let container = mount();
		let surface = DomSurface::new(container.clone(), &NodelConfig::default()).unwrap();
		let mut render = NodelRender::new(surface);
		render.add_connection_binding("click", |_, _| {});
		render.draw(&graph()).unwrap();

		let label = container.get_elements_by_tag_name("text").item(0).unwrap();
		assert!(is_connection_target(Some(label.into()), "connection"));
		assert!(!is_connection_target(Some(container.clone().into()), "connection"));
		assert!(!is_connection_target(None, "connection"));

		container.remove();
	}
}
