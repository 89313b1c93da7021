//! Trunk entry point: boots logging and mounts the app.

use circuit_board_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
