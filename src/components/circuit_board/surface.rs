//! Where paint lands. The renderer draws through [`Surface`] so the
//! same pass drives a real canvas in the browser and a recording
//! surface in tests.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::palette::Paint;
use super::types::TraceSegment;

/// The five primitives a frame is built from, in css px coordinates.
pub trait Surface {
	/// Wipes the whole stage.
	fn clear(&mut self, width: f64, height: f64);
	/// Fills the stage with a radial glow centered at `(cx, cy)` that
	/// falls off to transparent at `radius`.
	fn fill_glow(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint, width: f64, height: f64);
	/// Strokes a run of segments as one path.
	fn stroke_segments(&mut self, segs: &[TraceSegment], line_width: f64, paint: Paint);
	/// Strokes a single line.
	fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, line_width: f64, paint: Paint);
	/// Fills a circle.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: Paint);
}

/// Production surface over a 2d canvas context. The context is assumed
/// to carry the device-pixel-ratio transform, so everything here stays
/// in css px.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}

	pub fn ctx(&self) -> &CanvasRenderingContext2d {
		&self.ctx
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_glow(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint, width: f64, height: f64) {
		let Ok(gradient) = self.ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, radius) else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &paint.css());
		let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn stroke_segments(&mut self, segs: &[TraceSegment], line_width: f64, paint: Paint) {
		self.ctx.set_stroke_style_str(&paint.css());
		self.ctx.set_line_width(line_width);
		self.ctx.begin_path();
		for seg in segs {
			self.ctx.move_to(seg.x0, seg.y0);
			self.ctx.line_to(seg.x1, seg.y1);
		}
		self.ctx.stroke();
	}

	fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, line_width: f64, paint: Paint) {
		self.ctx.set_stroke_style_str(&paint.css());
		self.ctx.set_line_width(line_width);
		self.ctx.begin_path();
		self.ctx.move_to(x0, y0);
		self.ctx.line_to(x1, y1);
		self.ctx.stroke();
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: Paint) {
		self.ctx.set_fill_style_str(&paint.css());
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		self.ctx.fill();
	}
}
