//! DOM side of the board: owns the canvas, translates browser events
//! into [`CircuitEvent`]s and runs the frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Date;
use leptos::prelude::*;
use log::warn;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlDivElement, IntersectionObserver,
	IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, MutationObserver,
	MutationObserverInit, TouchEvent, Window,
};

use super::config::CircuitParams;
use super::palette::{Theme, ThemeVars};
use super::render;
use super::state::{CircuitEvent, CircuitState, Phase};
use super::surface::CanvasSurface;

// the stage counts as visible once this much of it is on screen
const INTERSECTION_THRESHOLD: f64 = 0.08;
// backing store resolution is capped to keep fill cost sane on hidpi
const MAX_DPR: f64 = 2.0;

type SharedState = Rc<RefCell<Option<CircuitState<SmallRng>>>>;
type SharedSurface = Rc<RefCell<Option<CanvasSurface>>>;
type SharedClosure<T> = Rc<RefCell<Option<Closure<T>>>>;

fn read_theme(document: &Document) -> Theme {
	let attr = document.document_element().and_then(|root| root.get_attribute("data-theme"));
	Theme::from_attr(attr.as_deref())
}

fn read_theme_vars(window: &Window, document: &Document) -> ThemeVars {
	let Some(root) = document.document_element() else {
		return ThemeVars::default();
	};
	let Ok(Some(style)) = window.get_computed_style(&root) else {
		return ThemeVars::default();
	};
	let var = |name: &str| style.get_property_value(name).unwrap_or_default();
	ThemeVars::parse(&var("--brand"), &var("--brand2"), &var("--text"))
}

fn stage_size(stage: &HtmlDivElement) -> (f64, f64) {
	let rect = stage.get_bounding_client_rect();
	(rect.width().max(1.0), rect.height().max(1.0))
}

/// Sizes the backing store for the device pixel ratio and scales the
/// context so everything else draws in css px.
fn size_canvas(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	window: &Window,
	width: f64,
	height: f64,
) {
	let dpr = window.device_pixel_ratio().clamp(1.0, MAX_DPR);
	canvas.set_width((width * dpr).round() as u32);
	canvas.set_height((height * dpr).round() as u32);
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

fn repaint(state: &SharedState, surface: &SharedSurface) {
	let state = state.borrow();
	let mut surface = surface.borrow_mut();
	if let (Some(state), Some(surface)) = (state.as_ref(), surface.as_mut()) {
		render::draw(state, surface);
	}
}

fn start_loop(
	window: &Window,
	frame: &SharedClosure<dyn FnMut(f64)>,
	pending: &Rc<RefCell<Option<i32>>>,
) {
	if pending.borrow().is_some() {
		return;
	}
	if let Some(ref cb) = *frame.borrow() {
		if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			*pending.borrow_mut() = Some(handle);
		}
	}
}

fn stop_loop(window: &Window, pending: &Rc<RefCell<Option<i32>>>) {
	if let Some(handle) = pending.borrow_mut().take() {
		let _ = window.cancel_animation_frame(handle);
	}
}

/// Decorative circuit-board animation that fills its parent. Pointer
/// movement lights up nearby copper; the loop only runs while the
/// stage is on screen and stands down entirely under reduced motion.
#[component]
pub fn CircuitBoardCanvas() -> impl IntoView {
	let stage_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	let state: SharedState = Rc::new(RefCell::new(None));
	let surface: SharedSurface = Rc::new(RefCell::new(None));
	// closure slots live for the component's whole life; dropping one
	// would tear the callback out from under the browser
	let frame_cb: SharedClosure<dyn FnMut(f64)> = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure<dyn FnMut()> = Rc::new(RefCell::new(None));
	let theme_cb: SharedClosure<dyn FnMut()> = Rc::new(RefCell::new(None));
	let visibility_cb: SharedClosure<dyn FnMut(js_sys::Array)> = Rc::new(RefCell::new(None));
	let pending_frame: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));

	let (state_init, surface_init, frame_init, pending_init) =
		(state.clone(), surface.clone(), frame_cb.clone(), pending_frame.clone());
	let (resize_init, theme_init, visibility_init) =
		(resize_cb.clone(), theme_cb.clone(), visibility_cb.clone());

	Effect::new(move |_| {
		let (Some(stage), Some(canvas)) = (stage_ref.get(), canvas_ref.get()) else {
			return;
		};
		let stage: HtmlDivElement = stage.into();
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(document) = window.document() else {
			return;
		};

		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok());
		let Some(ctx) = ctx else {
			warn!("no 2d canvas context, leaving the board blank");
			return;
		};

		let reduced_motion = window
			.match_media("(prefers-reduced-motion: reduce)")
			.ok()
			.flatten()
			.is_some_and(|query| query.matches());

		let (w, h) = stage_size(&stage);
		size_canvas(&canvas, &ctx, &window, w, h);
		*surface_init.borrow_mut() = Some(CanvasSurface::new(ctx));
		*state_init.borrow_mut() = Some(CircuitState::new(
			w,
			h,
			read_theme(&document),
			read_theme_vars(&window, &document),
			reduced_motion,
			CircuitParams::default(),
			SmallRng::seed_from_u64(Date::now() as u64),
		));
		repaint(&state_init, &surface_init);

		// frame loop: advance, paint, requeue while running
		let (state_anim, surface_anim, frame_inner, pending_anim) = (
			state_init.clone(),
			surface_init.clone(),
			frame_init.clone(),
			pending_init.clone(),
		);
		*frame_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			*pending_anim.borrow_mut() = None;
			let running = match *state_anim.borrow_mut() {
				Some(ref mut s) if s.phase == Phase::Running => {
					s.advance(now);
					true
				}
				_ => false,
			};
			if !running {
				return;
			}
			repaint(&state_anim, &surface_anim);
			if let Some(window) = web_sys::window() {
				start_loop(&window, &frame_inner, &pending_anim);
			}
		}));

		// window resizes re-measure the stage and rebuild the board
		let (state_resize, surface_resize, stage_resize, canvas_resize) = (
			state_init.clone(),
			surface_init.clone(),
			stage.clone(),
			canvas.clone(),
		);
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			let (w, h) = stage_size(&stage_resize);
			if let Some(ref sf) = *surface_resize.borrow() {
				size_canvas(&canvas_resize, sf.ctx(), &window, w, h);
			}
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.handle(CircuitEvent::Resize { width: w, height: h });
			}
			repaint(&state_resize, &surface_resize);
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// theme flips arrive as data-theme mutations on the root
		let (state_theme, surface_theme) = (state_init.clone(), surface_init.clone());
		*theme_init.borrow_mut() = Some(Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			let Some(document) = window.document() else {
				return;
			};
			if let Some(ref mut s) = *state_theme.borrow_mut() {
				s.handle(CircuitEvent::ThemeChanged {
					theme: read_theme(&document),
					vars: read_theme_vars(&window, &document),
				});
			}
			repaint(&state_theme, &surface_theme);
		}));
		let theme_guard = theme_init.borrow();
		if let (Some(cb), Some(root)) = (theme_guard.as_ref(), document.document_element()) {
			if let Ok(observer) = MutationObserver::new(cb.as_ref().unchecked_ref()) {
				let options = MutationObserverInit::new();
				options.set_attributes(true);
				options.set_attribute_filter(&js_sys::Array::of1(&JsValue::from_str("data-theme")));
				let _ = observer.observe_with_options(&root, &options);
			}
		}

		// under reduced motion the loop never runs, so there is
		// nothing for visibility to start or stop
		if reduced_motion {
			return;
		}

		let (state_vis, frame_vis, pending_vis) =
			(state_init.clone(), frame_init.clone(), pending_init.clone());
		*visibility_init.borrow_mut() = Some(Closure::new(move |entries: js_sys::Array| {
			let visible = entries.iter().any(|entry| {
				entry
					.dyn_ref::<IntersectionObserverEntry>()
					.is_some_and(|entry| entry.is_intersecting())
			});
			let Some(window) = web_sys::window() else {
				return;
			};
			let phase = match *state_vis.borrow_mut() {
				Some(ref mut s) => {
					s.handle(CircuitEvent::VisibilityChanged { visible });
					s.phase
				}
				None => return,
			};
			match phase {
				Phase::Running => start_loop(&window, &frame_vis, &pending_vis),
				Phase::Stopped => stop_loop(&window, &pending_vis),
			}
		}));

		let observer = visibility_init.borrow().as_ref().and_then(|cb| {
			let options = IntersectionObserverInit::new();
			options.set_threshold(&JsValue::from_f64(INTERSECTION_THRESHOLD));
			IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &options).ok()
		});
		match observer {
			Some(observer) => observer.observe(&stage),
			None => {
				// no observer support: animate unconditionally
				if let Some(ref mut s) = *state_init.borrow_mut() {
					s.handle(CircuitEvent::VisibilityChanged { visible: true });
				}
				start_loop(&window, &frame_init, &pending_init);
			}
		}
	});

	let (state_mm, surface_mm) = (state.clone(), surface.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(stage) = stage_ref.get() else {
			return;
		};
		let stage: HtmlDivElement = stage.into();
		let rect = stage.get_bounding_client_rect();
		let repaint_now = match *state_mm.borrow_mut() {
			Some(ref mut s) => s.handle(CircuitEvent::PointerMove {
				x: ev.client_x() as f64 - rect.left(),
				y: ev.client_y() as f64 - rect.top(),
			}),
			None => false,
		};
		if repaint_now {
			repaint(&state_mm, &surface_mm);
		}
	};

	let (state_tm, surface_tm) = (state.clone(), surface.clone());
	let on_touchmove = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		let Some(stage) = stage_ref.get() else {
			return;
		};
		let stage: HtmlDivElement = stage.into();
		let rect = stage.get_bounding_client_rect();
		let repaint_now = match *state_tm.borrow_mut() {
			Some(ref mut s) => s.handle(CircuitEvent::PointerMove {
				x: touch.client_x() as f64 - rect.left(),
				y: touch.client_y() as f64 - rect.top(),
			}),
			None => false,
		};
		if repaint_now {
			repaint(&state_tm, &surface_tm);
		}
	};

	let (state_ml, surface_ml) = (state.clone(), surface.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let repaint_now = match *state_ml.borrow_mut() {
			Some(ref mut s) => s.handle(CircuitEvent::PointerLeave),
			None => false,
		};
		if repaint_now {
			repaint(&state_ml, &surface_ml);
		}
	};

	let (state_te, surface_te) = (state.clone(), surface.clone());
	let on_touchend = move |_: TouchEvent| {
		let repaint_now = match *state_te.borrow_mut() {
			Some(ref mut s) => s.handle(CircuitEvent::PointerLeave),
			None => false,
		};
		if repaint_now {
			repaint(&state_te, &surface_te);
		}
	};

	view! {
		<div
			class="circuit-stage"
			node_ref=stage_ref
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:touchmove=on_touchmove
			on:touchend=on_touchend
		>
			<canvas node_ref=canvas_ref aria-hidden="true" />
		</div>
	}
}
