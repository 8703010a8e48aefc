use log::debug;

use super::keys::KeyAllocator;
use super::types::{Node, NodeId, Point};

/// Undirected graph of positioned nodes.
///
/// Nodes are kept in insertion order, which only matters for key allocation
/// and for breaking hit-test ties. Edges are stored as reciprocal neighbor
/// entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	keys: KeyAllocator,
}

impl Graph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.get(id).is_some()
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	/// Nodes in insertion order.
	pub fn all(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
		self.nodes.iter().map(|n| &n.id)
	}

	/// Inserts a node with the next allocated identifier and no neighbors.
	pub fn add_node(&mut self, position: Point) -> NodeId {
		let id = self.keys.next(&self.nodes);
		debug!("add node {id} at ({}, {})", position.x, position.y);
		self.nodes.push(Node::new(id.clone(), position));
		id
	}

	/// Removes a node and every neighbor entry pointing at it.
	pub fn remove_node(&mut self, id: &str) -> bool {
		let Some(idx) = self.nodes.iter().position(|n| n.id == id) else {
			return false;
		};
		self.nodes.remove(idx);
		for node in &mut self.nodes {
			node.neighbors.retain(|n| n != id);
		}
		debug!("removed node {id}");
		true
	}

	/// Links two existing nodes. Repeated calls do not duplicate the edge.
	pub fn connect(&mut self, a: &str, b: &str) -> bool {
		if !self.contains(a) || !self.contains(b) {
			return false;
		}
		let mut changed = self.push_neighbor(a, b);
		if a != b {
			changed |= self.push_neighbor(b, a);
		}
		if changed {
			debug!("connected {a} and {b}");
		}
		changed
	}

	fn push_neighbor(&mut self, id: &str, neighbor: &str) -> bool {
		match self.get_mut(id) {
			Some(node) if !node.neighbors.iter().any(|n| n == neighbor) => {
				node.neighbors.push(neighbor.to_owned());
				true
			}
			_ => false,
		}
	}

	pub fn set_title(&mut self, id: &str, title: &str) -> bool {
		let Some(node) = self.get_mut(id) else {
			return false;
		};
		node.title = Some(title.to_owned());
		true
	}

	pub fn set_position(&mut self, id: &str, position: Point) -> bool {
		let Some(node) = self.get_mut(id) else {
			return false;
		};
		node.position = position;
		true
	}

	/// Sets or clears (`None`) the highlight override of a node.
	pub fn set_color(&mut self, id: &str, color: Option<&str>) -> bool {
		let Some(node) = self.get_mut(id) else {
			return false;
		};
		node.color = color.map(str::to_owned);
		true
	}

	pub fn clear_colors(&mut self) {
		for node in &mut self.nodes {
			node.color = None;
		}
	}

	/// First node, in insertion order, whose square contains `point`.
	pub fn hit_test(&self, point: Point, node_size: f64) -> Option<&NodeId> {
		self.nodes
			.iter()
			.find(|n| n.contains(point, node_size))
			.map(|n| &n.id)
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	const SIZE: f64 = 25.0;

	fn build(n: usize, edges: &[(usize, usize)]) -> (Graph, Vec<NodeId>) {
		let mut graph = Graph::new();
		let ids: Vec<_> = (0..n)
			.map(|i| graph.add_node(Point::new(i as f64 * 40.0, 0.0)))
			.collect();
		for &(a, b) in edges {
			graph.connect(&ids[a % n], &ids[b % n]);
		}
		(graph, ids)
	}

	#[test]
	fn add_connect_delete_scenario() {
		let mut graph = Graph::new();
		let a = graph.add_node(Point::new(50.0, 50.0));
		assert_eq!(a, "A");
		let node = graph.get("A").unwrap();
		assert_eq!(node.position, Point::new(50.0, 50.0));
		assert!(node.neighbors.is_empty());

		let b = graph.add_node(Point::new(100.0, 100.0));
		assert_eq!(b, "B");

		assert!(graph.connect("A", "B"));
		assert_eq!(graph.get("A").unwrap().neighbors, vec!["B"]);
		assert_eq!(graph.get("B").unwrap().neighbors, vec!["A"]);

		assert!(graph.remove_node("A"));
		assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["B"]);
		assert!(graph.get("B").unwrap().neighbors.is_empty());
	}

	#[test]
	fn connect_twice_keeps_one_edge() {
		let (mut graph, _) = build(2, &[(0, 1)]);
		assert!(!graph.connect("A", "B"));
		assert!(!graph.connect("B", "A"));
		assert_eq!(graph.get("A").unwrap().neighbors, vec!["B"]);
		assert_eq!(graph.get("B").unwrap().neighbors, vec!["A"]);
	}

	#[test]
	fn self_connection_is_recorded_once() {
		let (mut graph, _) = build(1, &[]);
		assert!(graph.connect("A", "A"));
		assert_eq!(graph.get("A").unwrap().neighbors, vec!["A"]);
	}

	#[test]
	fn missing_ids_are_no_ops() {
		let (mut graph, _) = build(1, &[]);
		let before = graph.clone();
		assert!(!graph.remove_node("Q"));
		assert!(!graph.connect("A", "Q"));
		assert!(!graph.set_title("Q", "title"));
		assert!(!graph.set_position("Q", Point::new(1.0, 1.0)));
		assert!(!graph.set_color("Q", Some("red")));
		assert_eq!(graph, before);
	}

	#[test]
	fn set_color_none_clears_override() {
		let (mut graph, _) = build(1, &[]);
		graph.set_color("A", Some("#f00"));
		assert_eq!(graph.get("A").unwrap().color.as_deref(), Some("#f00"));
		graph.set_color("A", None);
		assert_eq!(graph.get("A").unwrap().color, None);
	}

	#[test]
	fn title_falls_back_to_id() {
		let (mut graph, _) = build(1, &[]);
		assert_eq!(graph.get("A").unwrap().display_title(), "A");
		graph.set_title("A", "root");
		assert_eq!(graph.get("A").unwrap().display_title(), "root");
	}

	#[test]
	fn hit_test_uses_inclusive_bounds() {
		let mut graph = Graph::new();
		graph.add_node(Point::new(10.0, 10.0));
		assert_eq!(graph.hit_test(Point::new(10.0, 10.0), SIZE).map(String::as_str), Some("A"));
		assert_eq!(graph.hit_test(Point::new(35.0, 35.0), SIZE).map(String::as_str), Some("A"));
		assert_eq!(graph.hit_test(Point::new(35.1, 20.0), SIZE), None);
		assert_eq!(graph.hit_test(Point::new(9.9, 20.0), SIZE), None);
	}

	#[test]
	fn overlapping_nodes_resolve_to_first_inserted() {
		let mut graph = Graph::new();
		graph.add_node(Point::new(0.0, 0.0));
		graph.add_node(Point::new(10.0, 10.0));
		for _ in 0..3 {
			assert_eq!(graph.hit_test(Point::new(15.0, 15.0), SIZE).map(String::as_str), Some("A"));
		}
		graph.remove_node("A");
		assert_eq!(graph.hit_test(Point::new(15.0, 15.0), SIZE).map(String::as_str), Some("B"));
	}

	proptest! {
		#[test]
		fn delete_cascades(n in 1usize..12, edges in prop::collection::vec((0usize..12, 0usize..12), 0..30), victim in 0usize..12) {
			let (mut graph, ids) = build(n, &edges);
			let victim = &ids[victim % n];
			prop_assert!(graph.remove_node(victim));
			prop_assert!(!graph.contains(victim));
			for node in graph.all() {
				prop_assert!(!node.neighbors.contains(victim));
				for neighbor in &node.neighbors {
					prop_assert!(graph.contains(neighbor));
				}
			}
		}

		#[test]
		fn connect_is_reciprocal(n in 1usize..12, edges in prop::collection::vec((0usize..12, 0usize..12), 0..30), a in 0usize..12, b in 0usize..12) {
			let (mut graph, ids) = build(n, &edges);
			let (a, b) = (&ids[a % n], &ids[b % n]);
			graph.connect(a, b);
			prop_assert!(graph.get(a).unwrap().neighbors.contains(b));
			prop_assert!(graph.get(b).unwrap().neighbors.contains(a));
		}

		#[test]
		fn hit_test_is_deterministic(points in prop::collection::vec((0.0f64..200.0, 0.0f64..200.0), 1..10), px in 0.0f64..230.0, py in 0.0f64..230.0) {
			let mut graph = Graph::new();
			for &(x, y) in &points {
				graph.add_node(Point::new(x, y));
			}
			let at = Point::new(px, py);
			let first = graph.all().find(|n| n.contains(at, SIZE)).map(|n| n.id.clone());
			prop_assert_eq!(graph.hit_test(at, SIZE).cloned(), first.clone());
			prop_assert_eq!(graph.clone().hit_test(at, SIZE).cloned(), first);
		}
	}
}
