//! Builds the board: a jittered grid of nodes joined by axis-aligned
//! traces with the occasional L-bend.

use std::collections::HashSet;

use rand::Rng;

use super::config::CircuitParams;
use super::types::{CircuitEdge, CircuitGraph, CircuitNode, TraceSegment};

impl CircuitGraph {
	/// Generates a fresh board for a stage of `width` x `height` css px.
	/// Every draw below comes from `rng`, so a seeded generator yields a
	/// reproducible board.
	pub fn build(width: f64, height: f64, params: &CircuitParams, rng: &mut impl Rng) -> Self {
		let step = (width / params.step_divisor).round().clamp(params.step_min, params.step_max);
		let offset = step * params.offset_factor;
		let jitter = step * params.jitter_factor;

		let cols = (((width - offset * 2.0) / step).floor() as i64 + 1).max(2) as usize;
		let rows = (((height - offset * 2.0) / step).floor() as i64 + 1).max(2) as usize;

		let mut nodes = Vec::with_capacity(cols * rows);
		for row in 0..rows {
			for col in 0..cols {
				let jx = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
				let jy = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
				// min applied last so a stage narrower than two margins
				// still keeps nodes inside it
				let x = (offset + col as f64 * step + jx)
					.max(params.node_margin)
					.min(width - params.node_margin);
				let y = (offset + row as f64 * step + jy)
					.max(params.node_margin)
					.min(height - params.node_margin);
				nodes.push(CircuitNode { col, row, x, y });
			}
		}

		let index = |col: usize, row: usize| -> Option<usize> {
			(col < cols && row < rows).then_some(row * cols + col)
		};

		let mut edges = Vec::new();
		let mut seen = HashSet::new();
		for a in 0..nodes.len() {
			let (col, row) = (nodes[a].col, nodes[a].row);
			if let Some(b) = index(col + 1, row) {
				if rng.gen_bool(params.link_chance) {
					add_candidate(a, b, &nodes, &mut edges, &mut seen, params, rng);
				}
			}
			if let Some(b) = index(col, row + 1) {
				if rng.gen_bool(params.link_chance) {
					add_candidate(a, b, &nodes, &mut edges, &mut seen, params, rng);
				}
			}
			// rarer long jumps skip a column or row
			if rng.gen_bool(params.skip_chance) {
				if let Some(b) = index(col + 2, row) {
					add_candidate(a, b, &nodes, &mut edges, &mut seen, params, rng);
				}
			}
			if rng.gen_bool(params.skip_chance) {
				if let Some(b) = index(col, row + 2) {
					add_candidate(a, b, &nodes, &mut edges, &mut seen, params, rng);
				}
			}
		}

		Self { nodes, edges, cols, rows }
	}
}

/// Routes a trace between two nodes and keeps it if it is long enough.
/// The node pair is marked as seen either way, so a pair rejected for
/// being too short is not retried by a later jump.
fn add_candidate(
	a: usize,
	b: usize,
	nodes: &[CircuitNode],
	edges: &mut Vec<CircuitEdge>,
	seen: &mut HashSet<(usize, usize)>,
	params: &CircuitParams,
	rng: &mut impl Rng,
) {
	let key = if a < b { (a, b) } else { (b, a) };
	if !seen.insert(key) {
		return;
	}
	if let Some(edge) = trace_route(a, b, &nodes[a], &nodes[b], params, rng) {
		edges.push(edge);
	}
}

/// Routes an L-shaped trace through a randomly oriented elbow, dropping
/// degenerate segments. Returns `None` when the whole run is too short
/// to bother drawing.
fn trace_route(
	a: usize,
	b: usize,
	from: &CircuitNode,
	to: &CircuitNode,
	params: &CircuitParams,
	rng: &mut impl Rng,
) -> Option<CircuitEdge> {
	let horizontal_first = rng.gen_bool(params.bend_chance);
	let (mx, my) = if horizontal_first { (to.x, from.y) } else { (from.x, to.y) };
	let points = [(from.x, from.y), (mx, my), (to.x, to.y)];

	let mut segs = Vec::with_capacity(2);
	let mut total = 0.0;
	for pair in points.windows(2) {
		let seg = TraceSegment::new(pair[0].0, pair[0].1, pair[1].0, pair[1].1);
		if seg.len < params.min_segment_len {
			continue;
		}
		total += seg.len;
		segs.push(seg);
	}
	if segs.is_empty() || total < params.min_trace_len {
		return None;
	}
	Some(CircuitEdge { a, b, segs, total })
}
