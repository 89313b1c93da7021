//! The moving part of the board: short-lived pulses that ride traces.

use rand::Rng;

use super::config::CircuitParams;
use super::types::{CircuitGraph, Pulse};

/// The live pulse population. Owned by the board state; the renderer
/// only ever iterates it.
#[derive(Clone, Debug, Default)]
pub struct Pulses {
	items: Vec<Pulse>,
}

impl Pulses {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Pulse> {
		self.items.iter()
	}

	/// Drops every pulse. Called when the graph they index into goes away.
	pub fn clear(&mut self) {
		self.items.clear();
	}

	#[cfg(test)]
	pub fn push(&mut self, pulse: Pulse) {
		self.items.push(pulse);
	}

	/// Steady-state population target, scaled to the edge count.
	pub fn target(edge_count: usize, params: &CircuitParams) -> usize {
		scaled_count(edge_count, params.pulse_edge_divisor, params.target_min, params.target_max)
	}

	/// Replaces the population with a fresh batch scattered at random
	/// distances, so a new board starts mid-traffic instead of empty.
	pub fn seed(&mut self, graph: &CircuitGraph, params: &CircuitParams, rng: &mut impl Rng) {
		self.items.clear();
		let count = scaled_count(graph.edges.len(), params.pulse_edge_divisor, params.seed_min, params.seed_max);
		for _ in 0..count {
			self.spawn(graph, params, rng, true);
		}
	}

	/// Advances every pulse by one frame and reaps the ones that ran off
	/// their edge or out of lifetime, then maybe tops the population up.
	/// An empty population spawns a single starter and waits a frame.
	pub fn step(
		&mut self,
		dt_ms: f64,
		boost: f64,
		graph: &CircuitGraph,
		params: &CircuitParams,
		rng: &mut impl Rng,
	) {
		if self.is_empty() {
			self.spawn(graph, params, rng, false);
			return;
		}
		let dt = dt_ms / 1000.0;
		self.items.retain_mut(|pulse| {
			let Some(edge) = graph.edges.get(pulse.edge) else {
				return false;
			};
			pulse.dist += pulse.speed * boost * dt;
			pulse.life -= dt;
			pulse.dist < edge.total && pulse.life > 0.0
		});
		let target = Self::target(graph.edges.len(), params);
		if self.items.len() < target && rng.gen_bool(params.spawn_chance) {
			self.spawn(graph, params, rng, false);
		}
	}

	fn spawn(&mut self, graph: &CircuitGraph, params: &CircuitParams, rng: &mut impl Rng, random_start: bool) {
		if graph.edges.is_empty() {
			return;
		}
		let edge = rng.gen_range(0..graph.edges.len());
		let dist = if random_start { rng.gen_range(0.0..graph.edges[edge].total) } else { 0.0 };
		self.items.push(Pulse {
			edge,
			dist,
			speed: rng.gen_range(params.speed_min..params.speed_max),
			life: rng.gen_range(params.life_min..params.life_max),
		});
	}
}

fn scaled_count(edge_count: usize, divisor: f64, lo: usize, hi: usize) -> usize {
	((edge_count as f64 / divisor).round() as usize).clamp(lo, hi)
}
