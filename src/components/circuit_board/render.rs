//! Immediate-mode frame pass: glows, then copper, then pads, then
//! pulses. Reads the board state and writes to a [`Surface`]; nothing
//! here mutates the simulation.

use rand::Rng;

use super::pointer::PointerState;
use super::state::CircuitState;
use super::surface::Surface;
use super::types::CircuitEdge;

const TRACE_WIDTH: f64 = 1.0;
const TRACE_ALPHA: f64 = 0.9;
// heat below this is not worth an overlay stroke
const HOT_THRESHOLD: f64 = 0.02;
const HOT_OVERLAY_ALPHA: f64 = 0.45;

const NODE_BASE_RADIUS: f64 = 1.35;
const NODE_HEAT_RADIUS: f64 = 0.55;
const NODE_ALPHA: f64 = 0.75;
const NODE_HOT_ALPHA: f64 = 0.92;

const PULSE_WIDTH: f64 = 2.0;
const PULSE_DOT_RADIUS: f64 = 1.9;

// where the ambient glows sit while the pointer is away
const IDLE_GLOW_X: f64 = 0.45;
const IDLE_GLOW_Y: f64 = 0.32;
const CORNER_GLOW_X: f64 = 0.82;
const CORNER_GLOW_Y: f64 = 0.18;

/// Paints one complete frame.
pub fn draw(state: &CircuitState<impl Rng>, surface: &mut impl Surface) {
	let (w, h) = (state.width, state.height);
	let palette = state.palette;
	surface.clear(w, h);

	let glow_radius = w.max(h) * state.params.glow_radius_factor;
	let (gx, gy) = if state.pointer.active {
		(state.pointer.x, state.pointer.y)
	} else {
		(w * IDLE_GLOW_X, h * IDLE_GLOW_Y)
	};
	surface.fill_glow(gx, gy, glow_radius, palette.glow, w, h);
	surface.fill_glow(w * CORNER_GLOW_X, h * CORNER_GLOW_Y, glow_radius, palette.glow2, w, h);

	let hot_radius = (w.min(h) * state.params.hot_radius_factor)
		.clamp(state.params.hot_radius_min, state.params.hot_radius_max);

	for edge in &state.graph.edges {
		surface.stroke_segments(&edge.segs, TRACE_WIDTH, palette.trace.faded(TRACE_ALPHA));
		let heat = edge_heat(edge, &state.pointer, hot_radius);
		if heat > HOT_THRESHOLD {
			surface.stroke_segments(
				&edge.segs,
				TRACE_WIDTH,
				palette.trace_hot.faded(HOT_OVERLAY_ALPHA * heat),
			);
		}
	}

	for node in &state.graph.nodes {
		let heat = state.pointer.heat(node.x, node.y, hot_radius);
		let radius = NODE_BASE_RADIUS + heat * NODE_HEAT_RADIUS;
		let paint = if heat > HOT_THRESHOLD {
			palette.node_hot.faded(NODE_HOT_ALPHA)
		} else {
			palette.node.faded(NODE_ALPHA)
		};
		surface.fill_circle(node.x, node.y, radius, paint);
	}

	if state.reduced_motion {
		return;
	}

	for pulse in state.pulses.iter() {
		let Some(edge) = state.graph.edges.get(pulse.edge) else {
			continue;
		};
		let tail_len = (state.params.tail_base
			+ (pulse.speed - state.params.speed_min) * state.params.tail_speed_gain)
			.clamp(state.params.tail_base, state.params.tail_max);
		let (hx, hy) = edge.point_along(pulse.dist);
		let (tx, ty) = edge.point_along((pulse.dist - tail_len).max(0.0));
		let fade = (pulse.life / state.params.fade_window).clamp(0.0, 1.0);
		surface.stroke_line(tx, ty, hx, hy, PULSE_WIDTH, palette.pulse.faded(fade));
		surface.fill_circle(hx, hy, PULSE_DOT_RADIUS, palette.pulse);
	}
}

/// Heat of a whole trace: the pointer falloff applied to the nearest
/// point on any of its segments.
fn edge_heat(edge: &CircuitEdge, pointer: &PointerState, radius: f64) -> f64 {
	if !pointer.active {
		return 0.0;
	}
	let mut best = f64::INFINITY;
	for seg in &edge.segs {
		best = best.min(seg.dist_to(pointer.x, pointer.y));
	}
	pointer.heat_for_distance(best, radius)
}
