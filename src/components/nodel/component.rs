use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use web_sys::{MouseEvent, WheelEvent};

use super::dom::{DomSurface, is_connection_target};
use super::render::NodelRender;
use super::state::{NodelConfig, PanState};
use super::types::Graph;

const SCALE_STEP: f64 = 0.1;

fn redraw(render: &mut NodelRender<DomSurface>, graph: &Graph) {
	let started = js_sys::Date::now();
	match render.draw(graph) {
		Ok(report) => debug!(
			"(nodel) drew {} nodes and {} connections ({} skipped) in {:.1}ms",
			report.visible.len(),
			report.drawn,
			report.skipped,
			js_sys::Date::now() - started
		),
		Err(err) => error!("(nodel) draw failed: {err}"),
	}
}

/// Node editor view redrawing `graph` whenever it changes.
///
/// Children are the template masters; give each an id and the configured
/// template class. Drag the background to pan, scroll to zoom and
/// double-click to reset the view.
#[component]
pub fn NodelCanvas(
	#[prop(into)] graph: Signal<Graph>,
	#[prop(into, default = Signal::stored(false))] show_templates: Signal<bool>,
	#[prop(optional)] config: Option<NodelConfig>,
	#[prop(optional)] on_connection: Option<Callback<[String; 2]>>,
	#[prop(default = "click")] connection_event: &'static str,
	children: Children,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let renderer: Rc<RefCell<Option<NodelRender<DomSurface>>>> = Rc::new(RefCell::new(None));
	let pan = Rc::new(RefCell::new(PanState::default()));

	let (renderer_init, config_init) = (renderer.clone(), config.clone());
	Effect::new(move |_| {
		let graph = graph.get();
		let hide_templates = !show_templates.get();
		let Some(container) = container_ref.get() else {
			return;
		};

		let mut slot = renderer_init.borrow_mut();
		if slot.is_none() {
			let surface = match DomSurface::new(container.into(), &config_init) {
				Ok(surface) => surface,
				Err(err) => {
					error!("(nodel) couldn't attach to container: {:?}", err);
					return;
				}
			};
			let mut render = NodelRender::with_config(surface, config_init.clone());
			if let Some(callback) = on_connection {
				render.add_connection_binding(connection_event, move |_, ends| {
					callback.run(ends.clone())
				});
			}
			*slot = Some(render);
		}

		if let Some(ref mut render) = *slot {
			if render.templates_hidden() != hide_templates {
				render.toggle_templates();
			}
			redraw(render, &graph);
		}
	});

	let (pan_md, connection_class) = (pan.clone(), config.connection_class.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if is_connection_target(ev.target(), &connection_class) {
			return;
		}
		let mut pan = pan_md.borrow_mut();
		pan.active = true;
		pan.last_x = ev.client_x() as f64;
		pan.last_y = ev.client_y() as f64;
	};

	let (pan_mm, renderer_mm) = (pan.clone(), renderer.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let mut pan = pan_mm.borrow_mut();
		if !pan.active {
			return;
		}
		let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
		let (dx, dy) = (x - pan.last_x, y - pan.last_y);
		pan.last_x = x;
		pan.last_y = y;

		if let Some(ref mut render) = *renderer_mm.borrow_mut() {
			let k = render.view().k;
			render.pan_view(dx / k, dy / k);
			redraw(render, &graph.get_untracked());
		}
	};

	let pan_mu = pan.clone();
	let on_mouseup = move |_: MouseEvent| {
		pan_mu.borrow_mut().active = false;
	};

	let pan_ml = pan.clone();
	let on_mouseleave = move |_: MouseEvent| {
		pan_ml.borrow_mut().active = false;
	};

	let renderer_wh = renderer.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut render) = *renderer_wh.borrow_mut() {
			let delta = if ev.delta_y() > 0.0 { -SCALE_STEP } else { SCALE_STEP };
			render.adjust_scale(delta);
			redraw(render, &graph.get_untracked());
		}
	};

	let renderer_dc = renderer.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut render) = *renderer_dc.borrow_mut() {
			render.recenter();
			render.reset_scale();
			redraw(render, &graph.get_untracked());
		}
	};

	view! {
		<div
			node_ref=container_ref
			id=config.container_id.clone()
			class="nodel"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="position: relative; width: 100%; height: 100%; overflow: hidden; cursor: grab;"
		>
			{children()}
		</div>
	}
}
