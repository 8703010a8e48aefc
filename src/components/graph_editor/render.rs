use log::warn;
use web_sys::CanvasRenderingContext2d;

use super::graph::Graph;
use super::types::{GraphStyle, Point};

/// The drawing primitives the renderer needs.
pub trait Surface {
	fn clear(&self, width: f64, height: f64, background: &str);
	fn line(&self, from: Point, to: Point, color: &str);
	fn fill_square(&self, at: Point, size: f64, color: &str);
	fn text(&self, text: &str, at: Point, color: &str);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64, background: &str) {
		self.clear_rect(0.0, 0.0, width, height);
		self.set_fill_style_str(background);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn line(&self, from: Point, to: Point, color: &str) {
		self.set_stroke_style_str(color);
		self.set_line_width(1.5);
		self.begin_path();
		self.move_to(from.x, from.y);
		self.line_to(to.x, to.y);
		self.stroke();
	}

	fn fill_square(&self, at: Point, size: f64, color: &str) {
		self.set_fill_style_str(color);
		self.fill_rect(at.x, at.y, size, size);
	}

	fn text(&self, text: &str, at: Point, color: &str) {
		self.set_fill_style_str(color);
		self.set_font("12px sans-serif");
		if let Err(e) = self.fill_text(text, at.x, at.y) {
			warn!("fill_text failed for {text:?}: {e:?}");
		}
	}
}

/// Redraws the whole graph: edges first, then squares, then labels.
///
/// Output depends only on the arguments. Each undirected edge is drawn once
/// from each endpoint.
pub fn render<S: Surface + ?Sized>(
	surface: &S,
	graph: &Graph,
	style: &GraphStyle,
	width: f64,
	height: f64,
) {
	surface.clear(width, height, &style.background);
	draw_edges(surface, graph, style);
	draw_nodes(surface, graph, style);
}

fn draw_edges<S: Surface + ?Sized>(surface: &S, graph: &Graph, style: &GraphStyle) {
	let size = style.node_size;
	for node in graph.all() {
		let from = node.center(size);
		for neighbor in node.neighbors.iter().filter_map(|id| graph.get(id)) {
			surface.line(from, neighbor.center(size), &style.edge_color);
		}
	}
}

fn draw_nodes<S: Surface + ?Sized>(surface: &S, graph: &Graph, style: &GraphStyle) {
	let size = style.node_size;
	for node in graph.all() {
		let color = node.color.as_deref().unwrap_or(&style.fill_color);
		surface.fill_square(node.position, size, color);
		if style.show_labels {
			let at = Point::new(node.position.x + size + 4.0, node.position.y + size * 0.7);
			surface.text(node.display_title(), at, &style.label_color);
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use std::cell::RefCell;

	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	pub(crate) enum DrawCall {
		Clear(f64, f64, String),
		Line(Point, Point, String),
		Square(Point, f64, String),
		Text(String, Point, String),
	}

	#[derive(Default)]
	pub(crate) struct Recorder {
		pub(crate) calls: RefCell<Vec<DrawCall>>,
	}

	impl Recorder {
		pub(crate) fn take(&self) -> Vec<DrawCall> {
			self.calls.take()
		}
	}

	impl Surface for Recorder {
		fn clear(&self, width: f64, height: f64, background: &str) {
			self.calls
				.borrow_mut()
				.push(DrawCall::Clear(width, height, background.into()));
		}

		fn line(&self, from: Point, to: Point, color: &str) {
			self.calls
				.borrow_mut()
				.push(DrawCall::Line(from, to, color.into()));
		}

		fn fill_square(&self, at: Point, size: f64, color: &str) {
			self.calls
				.borrow_mut()
				.push(DrawCall::Square(at, size, color.into()));
		}

		fn text(&self, text: &str, at: Point, color: &str) {
			self.calls
				.borrow_mut()
				.push(DrawCall::Text(text.into(), at, color.into()));
		}
	}

	fn two_nodes() -> Graph {
		let mut graph = Graph::new();
		graph.add_node(Point::new(0.0, 0.0));
		graph.add_node(Point::new(100.0, 50.0));
		graph.connect("A", "B");
		graph
	}

	#[test]
	fn redraw_is_idempotent() {
		let (graph, style, surface) = (two_nodes(), GraphStyle::default(), Recorder::default());
		render(&surface, &graph, &style, 400.0, 300.0);
		let first = surface.take();
		render(&surface, &graph, &style, 400.0, 300.0);
		assert_eq!(first, surface.take());
	}

	#[test]
	fn clears_then_edges_then_nodes() {
		let (graph, style, surface) = (two_nodes(), GraphStyle::default(), Recorder::default());
		render(&surface, &graph, &style, 400.0, 300.0);
		let calls = surface.take();

		assert_eq!(calls[0], DrawCall::Clear(400.0, 300.0, style.background.clone()));
		let (a, b) = (Point::new(12.5, 12.5), Point::new(112.5, 62.5));
		assert_eq!(calls[1], DrawCall::Line(a, b, style.edge_color.clone()));
		assert_eq!(calls[2], DrawCall::Line(b, a, style.edge_color.clone()));
		assert!(
			matches!(calls[3], DrawCall::Square(p, size, _) if p == Point::new(0.0, 0.0) && size == 25.0)
		);
		assert!(matches!(&calls[4], DrawCall::Text(t, _, _) if t == "A"));
		assert_eq!(calls.len(), 7);
	}

	#[test]
	fn override_color_wins_over_fill() {
		let mut graph = two_nodes();
		graph.set_color("B", Some("#2ca02c"));
		let (style, surface) = (GraphStyle::default(), Recorder::default());
		render(&surface, &graph, &style, 400.0, 300.0);

		let squares: Vec<_> = surface
			.take()
			.into_iter()
			.filter_map(|c| match c {
				DrawCall::Square(_, _, color) => Some(color),
				_ => None,
			})
			.collect();
		assert_eq!(squares, vec![style.fill_color.clone(), "#2ca02c".to_string()]);
	}

	#[test]
	fn labels_use_title_and_can_be_hidden() {
		let mut graph = two_nodes();
		graph.set_title("A", "root");
		let mut style = GraphStyle::default();
		let surface = Recorder::default();

		render(&surface, &graph, &style, 400.0, 300.0);
		let texts: Vec<_> = surface
			.take()
			.into_iter()
			.filter_map(|c| match c {
				DrawCall::Text(t, _, _) => Some(t),
				_ => None,
			})
			.collect();
		assert_eq!(texts, vec!["root", "B"]);

		style.show_labels = false;
		render(&surface, &graph, &style, 400.0, 300.0);
		assert!(!surface.take().iter().any(|c| matches!(c, DrawCall::Text(..))));
	}
}
