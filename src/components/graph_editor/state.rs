use log::{debug, info};

use super::graph::Graph;
use super::traversal::Traversal;
use super::types::{EditTarget, GraphStyle, Mode, NodeId, Point};

/// What the canvas should do after a click.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
	Ignored,
	Redraw,
	OpenEditor(EditTarget),
	StartChosen(NodeId),
}

/// Pointer-driven editing state for one graph.
///
/// Owns the graph, the traversal engine and the pristine copy used by
/// [`EditorState::reset`]. Every mutating method recomputes highlight colors
/// before returning, so the graph is always ready to render.
pub struct EditorState {
	pub graph: Graph,
	pub style: GraphStyle,
	pub width: f64,
	pub height: f64,
	mode: Mode,
	grabbed: Option<NodeId>,
	selection: Vec<NodeId>,
	editing: Option<NodeId>,
	choosing_start: bool,
	start: Option<NodeId>,
	traversal: Traversal,
	pristine: Graph,
	pristine_start: Option<NodeId>,
}

impl EditorState {
	pub fn new(
		graph: Graph,
		start: Option<NodeId>,
		style: GraphStyle,
		width: f64,
		height: f64,
	) -> Self {
		let start = start
			.filter(|id| graph.contains(id))
			.or_else(|| graph.ids().next().cloned());
		let mut state = Self {
			pristine: graph.clone(),
			pristine_start: start.clone(),
			traversal: Traversal::new(style.step_delay_ms),
			graph,
			style,
			width,
			height,
			mode: Mode::default(),
			grabbed: None,
			selection: Vec::new(),
			editing: None,
			choosing_start: false,
			start,
		};
		state.sync_highlights();
		state
	}

	pub fn editing(&self) -> Option<&str> {
		self.editing.as_deref()
	}

	pub fn traversal(&self) -> &Traversal {
		&self.traversal
	}

	pub fn set_mode(&mut self, mode: Mode) {
		if self.mode == mode {
			return;
		}
		debug!("mode {} -> {}", self.mode, mode);
		self.mode = mode;
		self.grabbed = None;
		self.selection.clear();
		self.editing = None;
		self.sync_highlights();
	}

	/// Grabs the node under the pointer, whatever the mode.
	pub fn pointer_down(&mut self, point: Point) {
		self.grabbed = self.graph.hit_test(point, self.style.node_size).cloned();
	}

	/// Drags the grabbed node in move mode. Returns whether anything moved.
	pub fn pointer_move(&mut self, point: Point) -> bool {
		if self.mode != Mode::Move {
			return false;
		}
		let Some(id) = &self.grabbed else {
			return false;
		};
		self.graph.set_position(id, point)
	}

	pub fn pointer_up(&mut self) {
		if let Some(id) = self.grabbed.take() {
			if self.mode == Mode::Move {
				debug!("released {id}");
			}
		}
	}

	pub fn click(&mut self, point: Point) -> ClickOutcome {
		let hit = self.graph.hit_test(point, self.style.node_size).cloned();

		if self.choosing_start {
			return match hit {
				Some(id) => {
					self.choosing_start = false;
					self.set_start(id.clone());
					ClickOutcome::StartChosen(id)
				}
				None => ClickOutcome::Ignored,
			};
		}

		match (self.mode, hit) {
			(Mode::Add, _) => {
				self.graph.add_node(point);
				self.sync_highlights();
				ClickOutcome::Redraw
			}
			(Mode::Connect, Some(id)) => {
				self.select(id);
				ClickOutcome::Redraw
			}
			(Mode::Edit, Some(id)) => {
				let title = self
					.graph
					.get(&id)
					.and_then(|n| n.title.clone())
					.unwrap_or_default();
				self.editing = Some(id.clone());
				ClickOutcome::OpenEditor(EditTarget {
					id,
					position: point,
					title,
				})
			}
			(Mode::Delete, Some(id)) => {
				self.remove(&id);
				ClickOutcome::Redraw
			}
			_ => ClickOutcome::Ignored,
		}
	}

	/// Pushes a node into the selection buffer, connecting the pair once two
	/// are buffered.
	fn select(&mut self, id: NodeId) {
		self.selection.push(id);
		if let [a, b] = self.selection.as_slice() {
			self.graph.connect(a, b);
			self.selection.clear();
		}
		self.sync_highlights();
	}

	fn remove(&mut self, id: &str) {
		if !self.graph.remove_node(id) {
			return;
		}
		self.selection.retain(|n| n != id);
		if self.grabbed.as_deref() == Some(id) {
			self.grabbed = None;
		}
		if self.editing.as_deref() == Some(id) {
			self.editing = None;
		}
		if self.start.as_deref() == Some(id) {
			self.start = self.graph.ids().next().cloned();
		}
		self.sync_highlights();
	}

	/// Applies text from the edit surface to the node being edited.
	pub fn edit_title(&mut self, title: &str) -> bool {
		let Some(id) = &self.editing else {
			return false;
		};
		debug!("title of {id} set to {title:?}");
		self.graph.set_title(id, title)
	}

	pub fn close_editor(&mut self) {
		self.editing = None;
	}

	/// Arms start selection: the next click on a node becomes the start.
	pub fn begin_choose_start(&mut self) {
		self.choosing_start = true;
	}

	fn set_start(&mut self, id: NodeId) {
		debug!("start node {:?} -> {id}", self.start);
		self.start = Some(id);
		self.sync_highlights();
	}

	/// Starts a traversal from the current start node at time `now`,
	/// cancelling any traversal already in flight.
	pub fn start_traversal(&mut self, now: u64) -> bool {
		let Some(start) = &self.start else {
			return false;
		};
		let started = self.traversal.start(&self.graph, start, now);
		self.sync_highlights();
		started
	}

	/// Runs traversal steps due by `now`. Returns whether a node was newly
	/// visited.
	pub fn advance_traversal(&mut self, now: u64) -> bool {
		let visited = self.traversal.advance(&self.graph, now);
		if visited.is_empty() {
			return false;
		}
		self.sync_highlights();
		true
	}

	/// Restores the graph and start node captured at construction and
	/// cancels any running traversal.
	pub fn reset(&mut self) {
		info!("reset to pristine graph");
		self.traversal.reset();
		self.graph = self.pristine.clone();
		self.start = self.pristine_start.clone();
		self.grabbed = None;
		self.selection.clear();
		self.editing = None;
		self.choosing_start = false;
		self.sync_highlights();
	}

	/// Continues the traversal generation of the editor this one replaces,
	/// so timers scheduled by `previous` can never drive this editor.
	pub fn take_over_from(&mut self, previous: &EditorState) {
		self.traversal.continue_after(previous.traversal.generation());
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Recomputes color overrides. Later sources win: visited, then start,
	/// then selected.
	fn sync_highlights(&mut self) {
		self.graph.clear_colors();
		for id in self.traversal.visited() {
			self.graph.set_color(id, Some(&self.style.traversal_color));
		}
		if let Some(start) = &self.start {
			self.graph.set_color(start, Some(&self.style.start_color));
		}
		for id in &self.selection {
			self.graph.set_color(id, Some(&self.style.selection_color));
		}
	}
}
