use leptos::prelude::*;

use super::graph_editor::{EditTarget, Point};

/// CSS `left` and `top` of the modal. The modal shares a positioned wrapper
/// with the canvas, so canvas-local click points are used unchanged.
fn placement(target: Option<&EditTarget>) -> (String, String) {
	let at = target.map_or(Point::default(), |t| t.position);
	(format!("{}px", at.x), format!("{}px", at.y))
}

/// Floating title editor shown next to the clicked node.
///
/// Every keystroke is reported through `on_change`; the modal keeps no copy
/// of the text beyond what `target` holds.
#[component]
pub fn EditNodeModal(
	target: RwSignal<Option<EditTarget>>,
	on_change: impl Fn(String) + 'static,
	on_close: impl Fn() + 'static,
) -> impl IntoView {
	let display = move || if target.with(Option::is_some) { "block" } else { "none" };
	let left = move || target.with(|t| placement(t.as_ref()).0);
	let top = move || target.with(|t| placement(t.as_ref()).1);
	let title = move || target.with(|t| t.as_ref().map(|t| t.title.clone()).unwrap_or_default());
	let heading = move || {
		target.with(|t| t.as_ref().map(|t| format!("Edit node {}", t.id)).unwrap_or_default())
	};

	view! {
		<div
			class="modal"
			style="position: absolute;"
			style:display=display
			style:left=left
			style:top=top
		>
			<h3>{heading}</h3>
			<div class="modal-content">
				<span class="close" on:click=move |_| on_close()>
					"×"
				</span>
				<input
					type="text"
					prop:value=title
					on:input=move |ev| on_change(event_target_value(&ev))
				/>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opens_at_the_canvas_local_click_point() {
		let target = EditTarget {
			id: "C".into(),
			position: Point::new(62.0, 22.5),
			title: String::new(),
		};
		assert_eq!(placement(Some(&target)), ("62px".to_string(), "22.5px".to_string()));
		assert_eq!(placement(None), ("0px".to_string(), "0px".to_string()));
	}
}
