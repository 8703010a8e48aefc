use leptos::prelude::*;

use super::graph_editor::Mode;

/// One button per interaction mode; the active one carries `selected`.
#[component]
pub fn ModeSelector(mode: RwSignal<Mode>) -> impl IntoView {
	view! {
		<div class="button-container">
			{Mode::ALL
				.into_iter()
				.map(|m| {
					view! {
						<button class:selected=move || mode.get() == m on:click=move |_| mode.set(m)>
							{m.label()}
						</button>
					}
				})
				.collect_view()}
		</div>
	}
}
