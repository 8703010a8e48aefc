use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::graph::Graph;
use super::render;
use super::state::{ClickOutcome, EditorState};
use super::types::{EditTarget, GraphStyle, Mode, NodeId, Point};
use crate::components::edit_modal::EditNodeModal;

/// Editor state and drawing context shared by the event handlers.
#[derive(Clone, Default)]
struct Shared {
	editor: Rc<RefCell<Option<EditorState>>>,
	ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>>,
}

impl Shared {
	fn with<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> Option<R> {
		self.editor.borrow_mut().as_mut().map(f)
	}

	/// Draws the current model. Without a context this does nothing.
	fn redraw(&self) {
		let (editor, ctx) = (self.editor.borrow(), self.ctx.borrow());
		if let (Some(s), Some(ctx)) = (editor.as_ref(), ctx.as_ref()) {
			render::render(ctx, &s.graph, &s.style, s.width, s.height);
		}
	}
}

fn now_ms() -> u64 {
	js_sys::Date::now() as u64
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	match canvas.get_context("2d") {
		Ok(Some(ctx)) => ctx.dyn_into().ok(),
		Ok(None) => None,
		Err(e) => {
			warn!("failed to get canvas context: {e:?}");
			None
		}
	}
}

/// Converts client coordinates to canvas-local ones.
fn local_point(canvas: Option<HtmlCanvasElement>, client_x: i32, client_y: i32) -> Option<Point> {
	let rect = canvas?.get_bounding_client_rect();
	Some(Point::new(
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	))
}

/// Keeps one timeout pending per due traversal step. A timeout that fires
/// after the traversal was restarted or reset sees a newer generation and
/// stops the chain.
fn drive_traversal(shared: Shared) {
	let Some((generation, wait)) = shared
		.with(|s| {
			let due = s.traversal().next_due()?;
			Some((s.traversal().generation(), due.saturating_sub(now_ms())))
		})
		.flatten()
	else {
		return;
	};
	let next = shared.clone();
	Timeout::new(u32::try_from(wait).unwrap_or(u32::MAX), move || {
		let progressed = next.with(|s| {
			(s.traversal().generation() == generation).then(|| s.advance_traversal(now_ms()))
		});
		match progressed.flatten() {
			Some(true) => next.redraw(),
			Some(false) => {}
			None => return,
		}
		drive_traversal(next);
	})
	.forget();
}

#[component]
pub fn GraphEditorCanvas(
	#[prop(into)] data: Signal<Graph>,
	mode: RwSignal<Mode>,
	#[prop(optional)] start: Option<NodeId>,
	#[prop(optional)] style: Option<GraphStyle>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let shared = Shared::default();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let edit_target = RwSignal::new(None::<EditTarget>);
	let choosing_start = RwSignal::new(false);
	let style = style.unwrap_or_default();

	let shared_init = shared.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window; graph editor disabled");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = context_2d(&canvas);
		if ctx.is_none() {
			warn!("2d context unavailable; rendering disabled");
		}
		*shared_init.ctx.borrow_mut() = ctx;
		let mut editor = EditorState::new(data.get(), start.clone(), style.clone(), w, h);
		editor.set_mode(mode.get_untracked());
		let previous = shared_init.editor.borrow_mut().take();
		if let Some(previous) = previous {
			editor.take_over_from(&previous);
		}
		*shared_init.editor.borrow_mut() = Some(editor);
		info!("graph editor ready ({w}x{h})");

		if fullscreen && resize_cb.borrow().is_none() {
			let (shared_resize, canvas_resize) = (shared_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				shared_resize.with(|s| s.resize(nw, nh));
				shared_resize.redraw();
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		shared_init.redraw();
	});

	let shared_mode = shared.clone();
	Effect::new(move |_| {
		let mode = mode.get();
		shared_mode.with(|s| s.set_mode(mode));
		edit_target.set(None);
		shared_mode.redraw();
	});

	let point_of = move |x: i32, y: i32| local_point(canvas_ref.get().map(Into::into), x, y);

	let shared_md = shared.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(p) = point_of(ev.client_x(), ev.client_y()) {
			shared_md.with(|s| s.pointer_down(p));
		}
	};

	let shared_mm = shared.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = point_of(ev.client_x(), ev.client_y()) else {
			return;
		};
		if shared_mm.with(|s| s.pointer_move(p)) == Some(true) {
			shared_mm.redraw();
		}
	};

	let shared_mu = shared.clone();
	let on_mouseup = move |_: MouseEvent| {
		shared_mu.with(EditorState::pointer_up);
	};

	let shared_ml = shared.clone();
	let on_mouseleave = move |_: MouseEvent| {
		shared_ml.with(EditorState::pointer_up);
	};

	let shared_ck = shared.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(p) = point_of(ev.client_x(), ev.client_y()) else {
			return;
		};
		let Some((outcome, editing)) =
			shared_ck.with(|s| (s.click(p), s.editing().is_some()))
		else {
			return;
		};
		match outcome {
			ClickOutcome::Ignored => return,
			ClickOutcome::OpenEditor(target) => edit_target.set(Some(target)),
			ClickOutcome::StartChosen(id) => {
				info!("traversal start is now {id}");
				choosing_start.set(false);
			}
			ClickOutcome::Redraw => {}
		}
		if !editing {
			edit_target.set(None);
		}
		shared_ck.redraw();
	};

	let first_touch = move |ev: &TouchEvent| {
		let touches = ev.touches();
		let touch = touches.get(0).or_else(|| ev.changed_touches().get(0))?;
		point_of(touch.client_x(), touch.client_y())
	};

	let shared_ts = shared.clone();
	let on_touchstart = move |ev: TouchEvent| {
		if let Some(p) = first_touch(&ev) {
			shared_ts.with(|s| s.pointer_down(p));
		}
	};

	let shared_tm = shared.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let Some(p) = first_touch(&ev) else {
			return;
		};
		if shared_tm.with(|s| s.pointer_move(p)) == Some(true) {
			ev.prevent_default();
			shared_tm.redraw();
		}
	};

	let shared_te = shared.clone();
	let on_touchend = move |_: TouchEvent| {
		shared_te.with(EditorState::pointer_up);
	};

	let shared_title = shared.clone();
	let on_title = move |text: String| {
		if shared_title.with(|s| s.edit_title(&text)) == Some(true) {
			edit_target.update(|t| {
				if let Some(t) = t {
					t.title = text;
				}
			});
			shared_title.redraw();
		}
	};

	let shared_close = shared.clone();
	let on_close = move || {
		shared_close.with(EditorState::close_editor);
		edit_target.set(None);
	};

	let shared_run = shared.clone();
	let on_traverse = move |_: MouseEvent| {
		if shared_run.with(|s| s.start_traversal(now_ms())) == Some(true) {
			shared_run.redraw();
			drive_traversal(shared_run.clone());
		}
	};

	let shared_choose = shared.clone();
	let on_choose_start = move |_: MouseEvent| {
		shared_choose.with(EditorState::begin_choose_start);
		choosing_start.set(true);
	};

	let shared_reset = shared.clone();
	let on_reset = move |_: MouseEvent| {
		shared_reset.with(EditorState::reset);
		edit_target.set(None);
		choosing_start.set(false);
		shared_reset.redraw();
	};

	view! {
		<div class="graph-editor">
			<div class="traversal-controls">
				<button on:click=on_traverse>"Run DFS"</button>
				<button class:selected=move || choosing_start.get() on:click=on_choose_start>
					"Choose start"
				</button>
				<button on:click=on_reset>"Reset"</button>
			</div>
			// The modal is placed in canvas-local coordinates.
			<div class="graph-editor-surface" style="position: relative;">
				<canvas
					node_ref=canvas_ref
					class="graph-editor-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:click=on_click
					on:touchstart=on_touchstart
					on:touchmove=on_touchmove
					on:touchend=on_touchend
					style="display: block; cursor: pointer;"
				/>
				<EditNodeModal target=edit_target on_change=on_title on_close=on_close />
			</div>
		</div>
	}
}
