use std::collections::HashSet;

use leptos::prelude::*;
use log::{error, info};
use web_sys::MouseEvent;

use crate::components::nodel::{Graph, Group, Node, NodelCanvas};

const GROUPS: &[(&str, &str)] = &[
	("ingest", "Ingest"),
	("storage", "Storage"),
	("archive", "Archive"),
];

/// Sample pipeline with a nested group (archive inside storage).
fn sample_graph(collapsed: &HashSet<String>) -> Graph {
	let is_collapsed = |id: &str| collapsed.contains(id);
	let nodes = [
		Node::new("source", "node")
			.at(120.0, 200.0)
			.with_data("title", "Source")
			.with_data("kind", "http")
			.with_child("flow", "parse"),
		Node::new("ingest", "group")
			.at(340.0, 200.0)
			.with_data("title", "Ingest")
			.with_data("kind", "group")
			.with_group(
				Group::containing(["parse", "validate"])
					.with_summary("title", "Ingest")
					.with_summary("kind", "collapsed")
					.collapsed(is_collapsed("ingest")),
			),
		Node::new("parse", "node")
			.at(300.0, 120.0)
			.with_data("title", "Parse")
			.with_data("kind", "json")
			.with_child("flow", "validate"),
		Node::new("validate", "node")
			.at(380.0, 280.0)
			.with_data("title", "Validate")
			.with_data("kind", "schema")
			.with_child("flow", "write")
			.with_child("reject", "report"),
		Node::new("storage", "group")
			.at(620.0, 200.0)
			.with_data("title", "Storage")
			.with_data("kind", "group")
			.with_group(
				Group::containing(["write", "archive"])
					.with_ends(["write", "compress", "upload"])
					.with_summary("title", "Storage")
					.with_summary("kind", "collapsed")
					.collapsed(is_collapsed("storage")),
			),
		Node::new("write", "node")
			.at(560.0, 120.0)
			.with_data("title", "Write")
			.with_data("kind", "db")
			.with_child("flow", "compress"),
		Node::new("archive", "group")
			.at(700.0, 300.0)
			.with_data("title", "Archive")
			.with_data("kind", "group")
			.with_group(
				Group::containing(["compress", "upload"])
					.with_summary("title", "Archive")
					.with_summary("kind", "collapsed")
					.collapsed(is_collapsed("archive")),
			),
		Node::new("compress", "node")
			.at(660.0, 260.0)
			.with_data("title", "Compress")
			.with_data("kind", "zstd")
			.with_child("flow", "upload"),
		Node::new("upload", "node")
			.at(760.0, 340.0)
			.with_data("title", "Upload")
			.with_data("kind", "s3")
			.with_child("notify", "report"),
		Node::new("report", "node")
			.at(900.0, 200.0)
			.with_data("title", "Report")
			.with_data("kind", "email"),
	];

	Graph::new(nodes).unwrap_or_else(|err| {
		error!("(nodel) invalid sample graph: {err}");
		Graph::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (collapsed, set_collapsed) = signal(HashSet::from(["archive".to_string()]));
	let (show_templates, set_show_templates) = signal(false);
	let graph = Signal::derive(move || sample_graph(&collapsed.get()));
	let on_connection = Callback::new(|[from, to]: [String; 2]| {
		info!("(nodel) clicked connection {from} -> {to}");
	});

	let toggles = GROUPS
		.iter()
		.map(|&(id, title)| {
			let toggle = move |_: MouseEvent| {
				set_collapsed.update(|set| {
					if !set.remove(id) {
						set.insert(id.to_string());
					}
				})
			};
			view! {
				<button on:click=toggle>
					{move || if collapsed.get().contains(id) { "Expand " } else { "Collapse " }}
					{title}
				</button>
			}
		})
		.collect_view();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<NodelCanvas graph=graph show_templates=show_templates on_connection=on_connection>
					<div id="node" class="nodel-template node">
						<strong>"{title}"</strong>
						<small>"{kind}"</small>
					</div>
					<div id="group" class="nodel-template group-node">
						<strong>"{title}"</strong>
						<small>"{kind}"</small>
					</div>
				</NodelCanvas>
				<div class="graph-overlay">
					<h1>"Nodel"</h1>
					<p class="subtitle">"Drag to pan. Scroll to zoom. Double-click to reset."</p>
					{toggles}
					<button on:click=move |_| set_show_templates.update(|show| *show = !*show)>
						"Toggle templates"
					</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
