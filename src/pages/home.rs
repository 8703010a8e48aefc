use leptos::prelude::*;

use crate::components::graph_editor::{Graph, GraphEditorCanvas, Mode, Point, Traversal};
use crate::components::mode_selector::ModeSelector;

/// Eight nodes A..H, wired so that a traversal from A reaches all of them.
fn demo_graph() -> Graph {
	let mut graph = Graph::new();
	for (x, y) in [
		(300.0, 40.0),
		(180.0, 130.0),
		(420.0, 130.0),
		(100.0, 230.0),
		(240.0, 230.0),
		(330.0, 320.0),
		(240.0, 410.0),
		(440.0, 320.0),
	] {
		graph.add_node(Point::new(x, y));
	}
	for (a, b) in [
		("A", "B"),
		("A", "C"),
		("B", "D"),
		("B", "E"),
		("E", "F"),
		("F", "G"),
		("F", "H"),
		("H", "C"),
	] {
		graph.connect(a, b);
	}
	graph
}

/// Number of nodes a traversal from `start` reaches.
fn reachable_from(graph: &Graph, start: &str) -> usize {
	let mut traversal = Traversal::new(0);
	traversal.start(graph, start, 0);
	traversal.drain(graph).count()
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph = Signal::derive(demo_graph);
	let reachable = reachable_from(&demo_graph(), "A");
	let mode = RwSignal::new(Mode::Add);

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

			<div class="graph-page">
				<ModeSelector mode=mode />
				<GraphEditorCanvas data=graph mode=mode start="A".to_string() width=Some(900.0) height=Some(520.0) />
				<p class="subtitle">
					{format!(
						"Pick a mode, then click the canvas. Run DFS animates a traversal from the orange start node across {reachable} nodes.",
					)}
				</p>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn demo_graph_is_connected_from_a() {
		let graph = demo_graph();
		assert_eq!(graph.ids().count(), 8);
		assert_eq!(reachable_from(&graph, "A"), 8);
		assert_eq!(reachable_from(&graph, "Q"), 0);
	}
}
