use leptos::prelude::*;

use crate::components::circuit_board::CircuitBoardCanvas;

/// Flips the root `data-theme` attribute between dark and light; the
/// board picks the change up through its mutation observer.
fn toggle_theme() {
	let Some(root) = web_sys::window()
		.and_then(|window| window.document())
		.and_then(|document| document.document_element())
	else {
		return;
	};
	let next = if root.get_attribute("data-theme").as_deref() == Some("light") {
		"dark"
	} else {
		"light"
	};
	let _ = root.set_attribute("data-theme", next);
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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

			<div class="hero">
				<CircuitBoardCanvas />
				<div class="hero-overlay">
					<h1>"Printed Circuit"</h1>
					<p class="subtitle">
						"Move the pointer to light up nearby copper. Pulses ride the traces while the board is on screen."
					</p>
					<button class="theme-toggle" on:click=move |_| toggle_theme()>
						"Toggle theme"
					</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
