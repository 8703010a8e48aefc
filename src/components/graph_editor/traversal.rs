//! Paced depth-first traversal.
//!
//! Every step waits a fixed delay before it runs. A node's neighbors are
//! checked one delay apart, and a newly visited neighbor starts its own paced
//! exploration immediately, without waiting for the previous sibling's subtree
//! to finish. Sibling subtrees therefore interleave on screen even though the
//! marking order is still depth-first from each node's point of view.
//!
//! Time is an abstract millisecond clock supplied by the caller, so the
//! engine is fully deterministic and can be driven by timers or by tests.

use std::collections::{BTreeMap, HashSet, VecDeque};

use log::info;

use super::graph::Graph;
use super::types::NodeId;

#[derive(Clone, Debug, PartialEq)]
enum Step {
	/// The pause after a node has been marked.
	Explore(NodeId),
	/// Look at `neighbors[index]` of `node`.
	Check { node: NodeId, index: usize },
}

#[derive(Clone, Debug, Default)]
pub struct Traversal {
	delay: u64,
	generation: u64,
	seq: u64,
	pending: BTreeMap<(u64, u64), Step>,
	order: Vec<NodeId>,
	visited: HashSet<NodeId>,
}

impl Traversal {
	pub fn new(delay: u64) -> Self {
		Self {
			delay,
			..Self::default()
		}
	}

	/// Bumped by every start, cancel and reset. Timers scheduled for an
	/// older generation must not drive the engine.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_running(&self) -> bool {
		!self.pending.is_empty()
	}

	pub fn is_visited(&self, id: &str) -> bool {
		self.visited.contains(id)
	}

	/// Visited nodes in marking order.
	pub fn visited(&self) -> &[NodeId] {
		&self.order
	}

	/// Due time of the earliest pending step.
	pub fn next_due(&self) -> Option<u64> {
		self.pending.keys().next().map(|&(due, _)| due)
	}

	/// Starts a new run from `start` at time `now`, abandoning any run in
	/// flight. The start node is marked straight away.
	pub fn start(&mut self, graph: &Graph, start: &str, now: u64) -> bool {
		self.reset();
		if !graph.contains(start) {
			return false;
		}
		info!("traversal started from {start}");
		self.visit(start.to_owned(), now);
		true
	}

	/// Moves the generation past one issued by another engine, so timers
	/// scheduled for that engine never match this one.
	pub fn continue_after(&mut self, generation: u64) {
		self.generation = self.generation.max(generation + 1);
	}

	/// Drops pending steps but keeps the visited set.
	pub fn cancel(&mut self) {
		self.generation += 1;
		self.pending.clear();
	}

	pub fn reset(&mut self) {
		self.cancel();
		self.order.clear();
		self.visited.clear();
	}

	/// Runs every step due at or before `now` and returns the nodes newly
	/// visited, in order.
	pub fn advance(&mut self, graph: &Graph, now: u64) -> Vec<NodeId> {
		let mut newly = Vec::new();
		while let Some(entry) = self.pending.first_entry() {
			let (due, _) = *entry.key();
			if due > now {
				break;
			}
			let step = entry.remove();
			if let Some(id) = self.run(graph, step, due) {
				newly.push(id);
			}
		}
		if !newly.is_empty() && !self.is_running() {
			info!("traversal finished after visiting {} nodes", self.order.len());
		}
		newly
	}

	/// Lazily yields visited nodes by jumping the clock from one due step to
	/// the next. The first item is the start node if the run was just
	/// started.
	pub fn drain<'a>(&'a mut self, graph: &'a Graph) -> Drain<'a> {
		Drain {
			buffered: self.order.iter().cloned().collect(),
			traversal: self,
			graph,
		}
	}

	fn run(&mut self, graph: &Graph, step: Step, due: u64) -> Option<NodeId> {
		match step {
			Step::Explore(node) => {
				if graph.get(&node).is_some_and(|n| !n.neighbors.is_empty()) {
					self.schedule(due + self.delay, Step::Check { node, index: 0 });
				}
				None
			}
			Step::Check { node, index } => {
				let neighbors = &graph.get(&node)?.neighbors;
				let neighbor = neighbors.get(index)?.clone();
				let more = index + 1 < neighbors.len();
				// The child's pause is queued ahead of the parent's next check.
				let newly = (!self.is_visited(&neighbor) && graph.contains(&neighbor))
					.then(|| {
						self.visit(neighbor.clone(), due);
						neighbor
					});
				if more {
					self.schedule(
						due + self.delay,
						Step::Check {
							node,
							index: index + 1,
						},
					);
				}
				newly
			}
		}
	}

	fn visit(&mut self, id: NodeId, now: u64) {
		self.visited.insert(id.clone());
		self.order.push(id.clone());
		self.schedule(now + self.delay, Step::Explore(id));
	}

	fn schedule(&mut self, due: u64, step: Step) {
		self.seq += 1;
		self.pending.insert((due, self.seq), step);
	}
}

/// Iterator returned by [`Traversal::drain`].
pub struct Drain<'a> {
	traversal: &'a mut Traversal,
	graph: &'a Graph,
	buffered: VecDeque<NodeId>,
}

impl Iterator for Drain<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		loop {
			if let Some(id) = self.buffered.pop_front() {
				return Some(id);
			}
			let due = self.traversal.next_due()?;
			self.buffered
				.extend(self.traversal.advance(self.graph, due));
		}
	}
}
