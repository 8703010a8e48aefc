use super::types::{Node, NodeId};

/// Generates node identifiers in the sequence A..Z, A1..Z1, A2..
///
/// Each graph owns its own allocator, so independent graphs never share the
/// suffix counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyAllocator {
	suffix_iteration: u32,
}

impl KeyAllocator {
	/// Next free identifier after the most recently inserted node.
	pub fn next(&mut self, nodes: &[Node]) -> NodeId {
		let Some(last) = nodes.last() else {
			return "A".into();
		};
		let mut candidate = self.successor(&last.id);
		// Reorderings from a seeded graph can put an existing key next in line.
		while nodes.iter().any(|n| n.id == candidate) {
			candidate = self.successor(&candidate);
		}
		candidate
	}

	fn successor(&mut self, key: &str) -> NodeId {
		match split_key(key) {
			Some((letter, suffix)) if letter < 'Z' => {
				let next = char::from(letter as u8 + 1);
				match suffix {
					Some(n) => format!("{next}{n}"),
					None => next.to_string(),
				}
			}
			Some((_, suffix)) => self.wrap(suffix.unwrap_or(0)),
			None => self.wrap(0),
		}
	}

	fn wrap(&mut self, suffix: u32) -> NodeId {
		self.suffix_iteration = self.suffix_iteration.max(suffix).saturating_add(1);
		format!("A{}", self.suffix_iteration)
	}
}

/// Splits `"B12"` into `('B', Some(12))` and `"C"` into `('C', None)`.
fn split_key(key: &str) -> Option<(char, Option<u32>)> {
	let mut chars = key.chars();
	let letter = chars.next().filter(char::is_ascii_uppercase)?;
	let rest = chars.as_str();
	if rest.is_empty() {
		return Some((letter, None));
	}
	rest.parse().ok().map(|n| (letter, Some(n)))
}
