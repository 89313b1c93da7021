/// Tuning knobs for board layout, pulse traffic and pointer response.
///
/// Defaults reproduce the production look. Tests override individual
/// fields to pin down behaviour, e.g. `jitter_factor: 0.0` for a
/// deterministic grid or `spawn_chance: 1.0` for instant population.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitParams {
	/// Stage width is divided by this to pick the raw grid step.
	pub step_divisor: f64,
	/// Lower clamp for the grid step, in css px.
	pub step_min: f64,
	/// Upper clamp for the grid step, in css px.
	pub step_max: f64,
	/// Grid origin offset as a fraction of the step.
	pub offset_factor: f64,
	/// Node jitter radius as a fraction of the step.
	pub jitter_factor: f64,
	/// Nodes never land closer than this to a stage edge.
	pub node_margin: f64,

	/// Chance to link a node to its right or down neighbour.
	pub link_chance: f64,
	/// Chance to link a node two columns or rows away.
	pub skip_chance: f64,
	/// Chance an L-bend runs horizontally before vertically.
	pub bend_chance: f64,
	/// Segments shorter than this are dropped from a trace.
	pub min_segment_len: f64,
	/// Traces shorter than this are discarded outright.
	pub min_trace_len: f64,

	/// Edge count is divided by this to scale pulse counts.
	pub pulse_edge_divisor: f64,
	/// Clamp for the number of pulses seeded on a fresh board.
	pub seed_min: usize,
	/// Clamp for the number of pulses seeded on a fresh board.
	pub seed_max: usize,
	/// Clamp for the steady-state pulse population target.
	pub target_min: usize,
	/// Clamp for the steady-state pulse population target.
	pub target_max: usize,
	/// Per-frame chance to spawn while under the target.
	pub spawn_chance: f64,
	/// Pulse speed range, css px per second.
	pub speed_min: f64,
	/// Pulse speed range, css px per second.
	pub speed_max: f64,
	/// Pulse lifetime range, seconds.
	pub life_min: f64,
	/// Pulse lifetime range, seconds.
	pub life_max: f64,
	/// Tail length for a pulse at `speed_min`, css px.
	pub tail_base: f64,
	/// Extra tail length per px/s above `speed_min`.
	pub tail_speed_gain: f64,
	/// Upper clamp for the tail length, css px.
	pub tail_max: f64,
	/// Pulses fade out over this many final seconds of life.
	pub fade_window: f64,

	/// Smoothing factor folding pointer movement into velocity.
	pub velocity_blend: f64,
	/// Per-frame decay applied to the tracked pointer velocity.
	pub velocity_decay: f64,
	/// Pulse speed boost per unit of pointer velocity.
	pub boost_gain: f64,
	/// Upper clamp for the pointer speed boost.
	pub boost_max: f64,

	/// Hot radius as a fraction of the smaller stage dimension.
	pub hot_radius_factor: f64,
	/// Lower clamp for the hot radius, css px.
	pub hot_radius_min: f64,
	/// Upper clamp for the hot radius, css px.
	pub hot_radius_max: f64,
	/// Glow radius as a fraction of the larger stage dimension.
	pub glow_radius_factor: f64,

	/// Longest simulated frame, in ms. Hidden-tab gaps clamp to this.
	pub max_frame_ms: f64,
	/// Length assumed for the first frame after a restart, in ms.
	pub first_frame_ms: f64,
}

impl Default for CircuitParams {
	fn default() -> Self {
		Self {
			step_divisor: 10.0,
			step_min: 82.0,
			step_max: 132.0,
			offset_factor: 0.55,
			jitter_factor: 0.16,
			node_margin: 14.0,

			link_chance: 0.55,
			skip_chance: 0.18,
			bend_chance: 0.55,
			min_segment_len: 6.0,
			min_trace_len: 14.0,

			pulse_edge_divisor: 10.0,
			seed_min: 4,
			seed_max: 10,
			target_min: 6,
			target_max: 18,
			spawn_chance: 0.26,
			speed_min: 130.0,
			speed_max: 210.0,
			life_min: 1.6,
			life_max: 3.4,
			tail_base: 18.0,
			tail_speed_gain: 0.06,
			tail_max: 26.0,
			fade_window: 0.6,

			velocity_blend: 0.16,
			velocity_decay: 0.9,
			boost_gain: 0.0022,
			boost_max: 1.55,

			hot_radius_factor: 0.22,
			hot_radius_min: 140.0,
			hot_radius_max: 240.0,
			glow_radius_factor: 0.55,

			max_frame_ms: 38.0,
			first_frame_ms: 16.0,
		}
	}
}
