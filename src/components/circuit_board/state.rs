//! The board engine: owns the graph, pulses, pointer and palette, and
//! advances them in response to host events and frame ticks. Knows
//! nothing about the DOM; the component feeds it events and timestamps.

use log::debug;
use rand::Rng;

use super::config::CircuitParams;
use super::palette::{Palette, PaletteResolver, Theme, ThemeVars};
use super::pointer::PointerState;
use super::pulse::Pulses;
use super::types::CircuitGraph;

/// Where the resting glow sits before the pointer ever moves, as
/// fractions of the stage size.
const REST_X: f64 = 0.48;
const REST_Y: f64 = 0.34;

/// Whether the animation loop should be running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Stopped,
	Running,
}

/// Everything the host page can tell the board.
#[derive(Clone, Debug, PartialEq)]
pub enum CircuitEvent {
	/// Pointer moved, in stage-local css px.
	PointerMove { x: f64, y: f64 },
	/// Pointer left the stage.
	PointerLeave,
	/// The stage was measured at a new size.
	Resize { width: f64, height: f64 },
	/// The stage scrolled into or out of view.
	VisibilityChanged { visible: bool },
	/// The page theme flipped.
	ThemeChanged { theme: Theme, vars: ThemeVars },
}

/// One board instance. Generic over its random source so tests can run
/// it on a seeded generator.
pub struct CircuitState<R: Rng> {
	pub params: CircuitParams,
	pub graph: CircuitGraph,
	pub pulses: Pulses,
	pub pointer: PointerState,
	pub palette: Palette,
	pub width: f64,
	pub height: f64,
	pub phase: Phase,
	pub reduced_motion: bool,
	resolver: PaletteResolver,
	rng: R,
	last_frame: Option<f64>,
}

impl<R: Rng> CircuitState<R> {
	/// Builds a board for the given stage and seeds its traffic. The
	/// board starts [`Phase::Stopped`]; a visibility event starts it.
	pub fn new(
		width: f64,
		height: f64,
		theme: Theme,
		vars: ThemeVars,
		reduced_motion: bool,
		params: CircuitParams,
		rng: R,
	) -> Self {
		let width = width.max(1.0);
		let height = height.max(1.0);
		let mut resolver = PaletteResolver::default();
		let palette = resolver.resolve(theme, &vars);
		let mut state = Self {
			params,
			graph: CircuitGraph::default(),
			pulses: Pulses::new(),
			pointer: PointerState::at_rest(width * REST_X, height * REST_Y),
			palette,
			width,
			height,
			phase: Phase::Stopped,
			reduced_motion,
			resolver,
			rng,
			last_frame: None,
		};
		state.rebuild();
		state
	}

	/// Regenerates the graph for the current size. Pulses index into
	/// the graph, so they die with it; a fresh batch is seeded unless
	/// the board is in static mode.
	fn rebuild(&mut self) {
		self.pulses.clear();
		self.graph = CircuitGraph::build(self.width, self.height, &self.params, &mut self.rng);
		if !self.reduced_motion {
			self.pulses.seed(&self.graph, &self.params, &mut self.rng);
		}
		debug!(
			"board rebuilt: {}x{} nodes, {} traces, {} pulses",
			self.graph.cols,
			self.graph.rows,
			self.graph.edges.len(),
			self.pulses.len()
		);
	}

	/// Applies a host event. Returns true when the caller should paint
	/// a frame right away; while the loop runs, the next tick paints
	/// anyway and the hint stays false.
	pub fn handle(&mut self, event: CircuitEvent) -> bool {
		match event {
			CircuitEvent::PointerMove { x, y } => {
				self.pointer.on_move(x, y, self.width, self.height, &self.params);
				self.reduced_motion
			}
			CircuitEvent::PointerLeave => {
				self.pointer.clear();
				self.reduced_motion
			}
			CircuitEvent::Resize { width, height } => {
				self.width = width.max(1.0);
				self.height = height.max(1.0);
				self.rebuild();
				true
			}
			CircuitEvent::VisibilityChanged { visible } => {
				if self.reduced_motion {
					return false;
				}
				if visible {
					if self.phase != Phase::Running {
						self.phase = Phase::Running;
						// restart the clock so the off-screen gap
						// is not simulated as one giant frame
						self.last_frame = None;
					}
				} else {
					self.phase = Phase::Stopped;
				}
				false
			}
			CircuitEvent::ThemeChanged { theme, vars } => {
				self.palette = self.resolver.resolve(theme, &vars);
				true
			}
		}
	}

	/// Advances the simulation to `now_ms` (a rAF-style timestamp) and
	/// returns the frame delta actually simulated. The first frame
	/// after a restart uses a nominal delta; anything else clamps so a
	/// long pause never becomes one giant leap.
	pub fn advance(&mut self, now_ms: f64) -> f64 {
		let dt = match self.last_frame {
			Some(last) => (now_ms - last).clamp(0.0, self.params.max_frame_ms),
			None => self.params.first_frame_ms,
		};
		self.last_frame = Some(now_ms);
		self.tick(dt);
		dt
	}

	/// One simulation step of `dt_ms`. Boost is sampled before the
	/// velocity decays so the freshest pointer motion drives it.
	pub fn tick(&mut self, dt_ms: f64) {
		if self.reduced_motion {
			return;
		}
		let boost = self.pointer.speed_boost(&self.params);
		self.pulses.step(dt_ms, boost, &self.graph, &self.params, &mut self.rng);
		self.pointer.decay(&self.params);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::config::CircuitParams;
	use super::super::palette::{Theme, ThemeVars};
	use super::{CircuitEvent, CircuitState, Phase};

	fn board(width: f64, height: f64, reduced_motion: bool) -> CircuitState<SmallRng> {
		CircuitState::new(
			width,
			height,
			Theme::Dark,
			ThemeVars::parse("#7c9cff", "#22d3ee", "#e2e8f0"),
			reduced_motion,
			CircuitParams::default(),
			SmallRng::seed_from_u64(7),
		)
	}

	#[test]
	fn a_new_board_is_seeded_but_stopped() {
		let state = board(800.0, 400.0, false);
		assert_eq!(state.phase, Phase::Stopped);
		assert!(!state.graph.edges.is_empty());
		let seeded = state.pulses.len();
		assert!((state.params.seed_min..=state.params.seed_max).contains(&seeded));
	}

	#[test]
	fn visibility_starts_and_stops_the_loop() {
		let mut state = board(800.0, 400.0, false);
		assert!(!state.handle(CircuitEvent::VisibilityChanged { visible: true }));
		assert_eq!(state.phase, Phase::Running);
		state.handle(CircuitEvent::VisibilityChanged { visible: false });
		assert_eq!(state.phase, Phase::Stopped);
	}

	#[test]
	fn resize_rebuilds_and_keeps_pulse_indices_live() {
		let mut state = board(800.0, 400.0, false);
		let before = state.graph.nodes.len();
		assert!(state.handle(CircuitEvent::Resize { width: 400.0, height: 400.0 }));
		assert_ne!(state.graph.nodes.len(), before);
		for pulse in state.pulses.iter() {
			assert!(pulse.edge < state.graph.edges.len());
		}
	}

	#[test]
	fn pulse_indices_stay_live_across_ticks_and_resizes() {
		let mut state = board(900.0, 500.0, false);
		state.handle(CircuitEvent::VisibilityChanged { visible: true });
		let mut now = 0.0;
		for frame in 0..300 {
			now += 16.0;
			state.advance(now);
			if frame == 150 {
				state.handle(CircuitEvent::Resize { width: 500.0, height: 300.0 });
			}
			for pulse in state.pulses.iter() {
				assert!(pulse.edge < state.graph.edges.len());
			}
		}
	}

	#[test]
	fn frame_deltas_clamp_and_restart_cleanly() {
		let mut state = board(800.0, 400.0, false);
		state.handle(CircuitEvent::VisibilityChanged { visible: true });
		assert_eq!(state.advance(5000.0), 16.0);
		assert_eq!(state.advance(5020.0), 20.0);
		// a hidden-tab pause arrives as one huge delta
		assert_eq!(state.advance(9000.0), 38.0);
		// timestamps can go backwards across window focus changes
		assert_eq!(state.advance(8000.0), 0.0);

		state.handle(CircuitEvent::VisibilityChanged { visible: false });
		state.handle(CircuitEvent::VisibilityChanged { visible: true });
		assert_eq!(state.advance(60_000.0), 16.0);
	}

	#[test]
	fn theme_flip_swaps_the_palette_and_asks_for_a_paint() {
		let mut state = board(800.0, 400.0, false);
		let dark_alpha = state.palette.trace.alpha;
		let repaint = state.handle(CircuitEvent::ThemeChanged {
			theme: Theme::Light,
			vars: ThemeVars::parse("#2563eb", "#0891b2", "#0f172a"),
		});
		assert!(repaint);
		assert!((state.palette.trace.alpha - 0.12).abs() < 1e-12);
		assert!((dark_alpha - 0.10).abs() < 1e-12);
	}

	#[test]
	fn reduced_motion_keeps_the_board_static() {
		let mut state = board(800.0, 400.0, true);
		assert!(state.pulses.is_empty());
		state.handle(CircuitEvent::VisibilityChanged { visible: true });
		assert_eq!(state.phase, Phase::Stopped);
		for _ in 0..50 {
			state.tick(16.0);
		}
		assert!(state.pulses.is_empty());
		// pointer work now needs an explicit paint
		assert!(state.handle(CircuitEvent::PointerMove { x: 100.0, y: 80.0 }));
		assert!(state.handle(CircuitEvent::PointerLeave));
	}

	#[test]
	fn pointer_events_do_not_force_paints_while_animated() {
		let mut state = board(800.0, 400.0, false);
		assert!(!state.handle(CircuitEvent::PointerMove { x: 10.0, y: 10.0 }));
		assert!(!state.handle(CircuitEvent::PointerLeave));
		assert!(!state.pointer.active);
	}
}
