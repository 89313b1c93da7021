/// A solder pad sitting on the jittered grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircuitNode {
	pub col: usize,
	pub row: usize,
	pub x: f64,
	pub y: f64,
}

/// One axis-aligned piece of a trace, with its length cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSegment {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	pub len: f64,
}

impl TraceSegment {
	pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
		let len = (x1 - x0).hypot(y1 - y0);
		Self { x0, y0, x1, y1, len }
	}

	/// Point at `dist` along the segment, clamped to its endpoints.
	pub fn point_at(&self, dist: f64) -> (f64, f64) {
		if self.len <= 0.0 {
			return (self.x0, self.y0);
		}
		let t = (dist / self.len).clamp(0.0, 1.0);
		(self.x0 + (self.x1 - self.x0) * t, self.y0 + (self.y1 - self.y0) * t)
	}

	/// Distance from a point to the nearest spot on the segment.
	pub fn dist_to(&self, px: f64, py: f64) -> f64 {
		let vx = self.x1 - self.x0;
		let vy = self.y1 - self.y0;
		let wx = px - self.x0;
		let wy = py - self.y0;
		let c1 = vx * wx + vy * wy;
		if c1 <= 0.0 {
			return wx.hypot(wy);
		}
		let c2 = vx * vx + vy * vy;
		if c2 <= c1 {
			return (px - self.x1).hypot(py - self.y1);
		}
		let t = c1 / c2;
		(px - (self.x0 + vx * t)).hypot(py - (self.y0 + vy * t))
	}
}

/// A routed trace between two nodes: one or two segments plus the
/// cached total length pulses travel along.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitEdge {
	pub a: usize,
	pub b: usize,
	pub segs: Vec<TraceSegment>,
	pub total: f64,
}

impl CircuitEdge {
	/// Point at `dist` along the whole trace, clamped to its ends.
	pub fn point_along(&self, dist: f64) -> (f64, f64) {
		let mut remaining = dist.max(0.0);
		for seg in &self.segs {
			if remaining <= seg.len {
				return seg.point_at(remaining);
			}
			remaining -= seg.len;
		}
		match self.segs.last() {
			Some(seg) => (seg.x1, seg.y1),
			None => (0.0, 0.0),
		}
	}
}

/// A glowing packet travelling along one edge. `edge` indexes into the
/// owning graph and is only valid for the graph it was spawned on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
	pub edge: usize,
	pub dist: f64,
	pub speed: f64,
	pub life: f64,
}

/// The generated board: grid nodes plus routed traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CircuitGraph {
	pub nodes: Vec<CircuitNode>,
	pub edges: Vec<CircuitEdge>,
	pub cols: usize,
	pub rows: usize,
}
