//! Tracks the pointer over the stage: position, smoothed velocity, and
//! the heat falloff that lights up nearby copper.

use super::config::CircuitParams;

/// Pointer state in stage-local css px. `active` flips on with the
/// first move and off when the pointer leaves; velocity keeps decaying
/// either way so the boost settles back to 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub active: bool,
}

impl PointerState {
	/// An inactive pointer parked at a fixed spot. The glow renders
	/// there until the first real move.
	pub fn at_rest(x: f64, y: f64) -> Self {
		Self { x, y, ..Self::default() }
	}

	/// Folds a new sample into the smoothed velocity and clamps the
	/// position to the stage.
	pub fn on_move(&mut self, x: f64, y: f64, width: f64, height: f64, params: &CircuitParams) {
		let nx = x.clamp(0.0, width);
		let ny = y.clamp(0.0, height);
		self.vx += (nx - self.x) * params.velocity_blend;
		self.vy += (ny - self.y) * params.velocity_blend;
		self.x = nx;
		self.y = ny;
		self.active = true;
	}

	/// Marks the pointer gone. Position and velocity are left alone.
	pub fn clear(&mut self) {
		self.active = false;
	}

	/// One frame of velocity decay.
	pub fn decay(&mut self, params: &CircuitParams) {
		self.vx *= params.velocity_decay;
		self.vy *= params.velocity_decay;
	}

	/// Heat at a point: 1 under the pointer, fading linearly to 0 at
	/// `radius`. Always 0 while inactive.
	pub fn heat(&self, x: f64, y: f64, radius: f64) -> f64 {
		if !self.active {
			return 0.0;
		}
		self.heat_for_distance((x - self.x).hypot(y - self.y), radius)
	}

	/// Same falloff for a precomputed distance, for callers that
	/// measure against a shape rather than a point.
	pub fn heat_for_distance(&self, dist: f64, radius: f64) -> f64 {
		if !self.active {
			return 0.0;
		}
		(1.0 - dist / radius).clamp(0.0, 1.0)
	}

	/// Multiplier applied to pulse speed, grown by pointer velocity.
	pub fn speed_boost(&self, params: &CircuitParams) -> f64 {
		(1.0 + self.vx.hypot(self.vy) * params.boost_gain).clamp(1.0, params.boost_max)
	}
}

#[cfg(test)]
mod tests {
	use super::super::config::CircuitParams;
	use super::PointerState;

	#[test]
	fn heat_peaks_under_the_pointer_and_fades_out() {
		let mut pointer = PointerState::at_rest(100.0, 100.0);
		pointer.on_move(100.0, 100.0, 400.0, 300.0, &CircuitParams::default());
		assert_eq!(pointer.heat(100.0, 100.0, 150.0), 1.0);
		assert!((pointer.heat(175.0, 100.0, 150.0) - 0.5).abs() < 1e-12);
		assert_eq!(pointer.heat(100.0, 260.0, 150.0), 0.0);
		assert_eq!(pointer.heat(1000.0, 1000.0, 150.0), 0.0);
	}

	#[test]
	fn heat_decreases_with_distance() {
		let mut pointer = PointerState::default();
		pointer.on_move(0.0, 0.0, 400.0, 300.0, &CircuitParams::default());
		let radius = 150.0;
		let mut last = f64::INFINITY;
		for dist in [0.0, 40.0, 80.0, 120.0, 160.0, 200.0] {
			let heat = pointer.heat(dist, 0.0, radius);
			assert!((0.0..=1.0).contains(&heat));
			assert!(heat <= last);
			last = heat;
		}
	}

	#[test]
	fn inactive_pointer_is_cold() {
		let pointer = PointerState::at_rest(50.0, 50.0);
		assert_eq!(pointer.heat(50.0, 50.0, 150.0), 0.0);
		assert_eq!(pointer.heat_for_distance(0.0, 150.0), 0.0);
	}

	#[test]
	fn leaving_keeps_momentum_but_drops_heat() {
		let params = CircuitParams::default();
		let mut pointer = PointerState::default();
		pointer.on_move(100.0, 0.0, 400.0, 300.0, &params);
		assert!(pointer.active);
		pointer.clear();
		assert_eq!(pointer.heat(100.0, 0.0, 150.0), 0.0);
		assert!(pointer.vx > 0.0);
	}

	#[test]
	fn moves_clamp_to_the_stage() {
		let params = CircuitParams::default();
		let mut pointer = PointerState::default();
		pointer.on_move(-50.0, 900.0, 400.0, 300.0, &params);
		assert_eq!((pointer.x, pointer.y), (0.0, 300.0));
	}

	#[test]
	fn velocity_blends_in_and_decays_toward_rest() {
		let params = CircuitParams::default();
		let mut pointer = PointerState::default();
		pointer.on_move(100.0, 0.0, 400.0, 300.0, &params);
		assert!((pointer.vx - 16.0).abs() < 1e-12);
		let boosted = pointer.speed_boost(&params);
		assert!((boosted - 1.0352).abs() < 1e-9);

		for _ in 0..200 {
			pointer.decay(&params);
		}
		assert!(pointer.vx.abs() < 1e-6);
		assert!((pointer.speed_boost(&params) - 1.0).abs() < 1e-9);
	}

	#[test]
	fn fast_sweeps_cap_at_the_boost_ceiling() {
		let params = CircuitParams::default();
		let mut pointer = PointerState::default();
		for i in 0..10 {
			pointer.on_move(f64::from(i) * 400.0, 0.0, 4000.0, 300.0, &params);
		}
		assert_eq!(pointer.speed_boost(&params), params.boost_max);
	}
}
