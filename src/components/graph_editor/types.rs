use std::fmt;

/// Node identifiers are allocator-generated strings such as `"A"` or `"B1"`.
pub type NodeId = String;

/// A point in surface-local pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A graph vertex. `position` is the top-left corner of its square.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub position: Point,
	pub title: Option<String>,
	pub color: Option<String>,
	pub neighbors: Vec<NodeId>,
}

impl Node {
	pub fn new(id: NodeId, position: Point) -> Self {
		Self {
			id,
			position,
			title: None,
			color: None,
			neighbors: Vec::new(),
		}
	}

	/// The title shown on the canvas, falling back to the identifier.
	pub fn display_title(&self) -> &str {
		self.title.as_deref().unwrap_or(&self.id)
	}

	pub fn center(&self, size: f64) -> Point {
		Point::new(self.position.x + size / 2.0, self.position.y + size / 2.0)
	}

	pub fn contains(&self, point: Point, size: f64) -> bool {
		point.x >= self.position.x
			&& point.x <= self.position.x + size
			&& point.y >= self.position.y
			&& point.y <= self.position.y + size
	}
}

/// What a click on the canvas does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
	#[default]
	Add,
	Connect,
	Move,
	Edit,
	Delete,
}

impl Mode {
	pub const ALL: [Mode; 5] = [Mode::Add, Mode::Connect, Mode::Move, Mode::Edit, Mode::Delete];

	pub fn label(self) -> &'static str {
		match self {
			Mode::Add => "Add nodes",
			Mode::Connect => "Connect nodes",
			Mode::Move => "Move nodes",
			Mode::Edit => "Edit nodes",
			Mode::Delete => "Delete nodes",
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Mode::Add => "add",
			Mode::Connect => "connect",
			Mode::Move => "move",
			Mode::Edit => "edit",
			Mode::Delete => "delete",
		};
		f.write_str(name)
	}
}

/// Where the edit surface opens and what it is pre-filled with.
#[derive(Clone, Debug, PartialEq)]
pub struct EditTarget {
	pub id: NodeId,
	pub position: Point,
	pub title: String,
}

/// Colors, sizes and timing used by the editor.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStyle {
	pub node_size: f64,
	pub fill_color: String,
	pub edge_color: String,
	pub background: String,
	pub label_color: String,
	pub selection_color: String,
	pub traversal_color: String,
	pub start_color: String,
	pub show_labels: bool,
	/// Pause between traversal steps, in milliseconds.
	pub step_delay_ms: u64,
}

impl Default for GraphStyle {
	fn default() -> Self {
		Self {
			node_size: 25.0,
			fill_color: "#FFFFFF".into(),
			edge_color: "#356bc2".into(),
			background: "#1a1a2e".into(),
			label_color: "white".into(),
			selection_color: "#356bc2".into(),
			traversal_color: "#2ca02c".into(),
			start_color: "#ff7f0e".into(),
			show_labels: true,
			step_delay_ms: 150,
		}
	}
}
