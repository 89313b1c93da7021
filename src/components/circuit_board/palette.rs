//! Resolves the board's paint set from the host page theme.
//!
//! Colors come from the `--brand`, `--brand2` and `--text` css custom
//! properties; per-layer alphas are baked in per theme. Anything that
//! fails to parse falls back to opaque white so a broken stylesheet
//! degrades to a visible board instead of an invisible one.

/// Fallback for missing or unparseable css variables.
pub const FALLBACK_RGB: Rgb = Rgb { r: 255, g: 255, b: 255 };

/// Host page theme, read from the `data-theme` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
	Dark,
	Light,
}

impl Theme {
	/// Maps the root `data-theme` attribute; anything but `"light"`,
	/// including a missing attribute, counts as dark.
	pub fn from_attr(attr: Option<&str>) -> Self {
		if attr == Some("light") { Theme::Light } else { Theme::Dark }
	}

	fn pick(self, light: f64, dark: f64) -> f64 {
		match self {
			Theme::Light => light,
			Theme::Dark => dark,
		}
	}
}

/// An opaque color channel triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

/// A color with its layer alpha, ready to become a css string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
	pub rgb: Rgb,
	pub alpha: f64,
}

impl Paint {
	pub fn new(rgb: Option<Rgb>, alpha: f64) -> Self {
		Self { rgb: rgb.unwrap_or(FALLBACK_RGB), alpha }
	}

	/// The same color with its alpha scaled down.
	pub fn faded(self, factor: f64) -> Self {
		Self { alpha: self.alpha * factor, ..self }
	}

	pub fn css(&self) -> String {
		format!("rgba({}, {}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b, self.alpha)
	}
}

/// Parses `#rgb`, `#rrggbb`, `rgb(...)` and `rgba(...)` color strings.
pub fn parse_rgb(value: &str) -> Option<Rgb> {
	let value = value.trim();
	if let Some(hex) = value.strip_prefix('#') {
		if !hex.is_ascii() {
			return None;
		}
		let full: String = match hex.len() {
			3 => hex.chars().flat_map(|c| [c, c]).collect(),
			6 => hex.to_owned(),
			_ => return None,
		};
		let r = u8::from_str_radix(&full[0..2], 16).ok()?;
		let g = u8::from_str_radix(&full[2..4], 16).ok()?;
		let b = u8::from_str_radix(&full[4..6], 16).ok()?;
		return Some(Rgb { r, g, b });
	}
	let open = value.find('(')?;
	let close = value.rfind(')')?;
	if close < open {
		return None;
	}
	let head = value[..open].trim().to_ascii_lowercase();
	if head != "rgb" && head != "rgba" {
		return None;
	}
	let mut channels = value[open + 1..close].split(',');
	let r = channel(channels.next()?)?;
	let g = channel(channels.next()?)?;
	let b = channel(channels.next()?)?;
	Some(Rgb { r, g, b })
}

fn channel(part: &str) -> Option<u8> {
	let v: f64 = part.trim().parse().ok()?;
	if !v.is_finite() || !(0.0..=255.0).contains(&v) {
		return None;
	}
	Some(v.round() as u8)
}

/// The three css custom properties the palette is derived from, already
/// parsed. `None` entries fall back to white.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThemeVars {
	pub brand: Option<Rgb>,
	pub brand2: Option<Rgb>,
	pub text: Option<Rgb>,
}

impl ThemeVars {
	pub fn parse(brand: &str, brand2: &str, text: &str) -> Self {
		Self {
			brand: parse_rgb(brand),
			brand2: parse_rgb(brand2),
			text: parse_rgb(text),
		}
	}
}

/// Paints for every layer the renderer draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
	pub trace: Paint,
	pub trace_hot: Paint,
	pub node: Paint,
	pub node_hot: Paint,
	pub glow: Paint,
	pub glow2: Paint,
	pub pulse: Paint,
}

/// Builds the palette for one theme from the parsed css variables.
pub fn resolve(theme: Theme, vars: &ThemeVars) -> Palette {
	Palette {
		trace: Paint::new(vars.text, theme.pick(0.12, 0.10)),
		trace_hot: Paint::new(vars.brand2, theme.pick(0.24, 0.22)),
		node: Paint::new(vars.text, theme.pick(0.24, 0.22)),
		node_hot: Paint::new(vars.brand2, theme.pick(0.74, 0.82)),
		glow: Paint::new(vars.brand, theme.pick(0.12, 0.10)),
		glow2: Paint::new(vars.brand2, theme.pick(0.10, 0.08)),
		pulse: Paint::new(vars.brand, theme.pick(0.88, 0.92)),
	}
}

/// Caches the resolved palette per theme so per-frame lookups stay off
/// the hot path. The cache key is the theme alone; var changes without
/// a theme flip reuse the cached paints until the next flip.
#[derive(Clone, Debug, Default)]
pub struct PaletteResolver {
	cached: Option<(Theme, Palette)>,
}

impl PaletteResolver {
	pub fn resolve(&mut self, theme: Theme, vars: &ThemeVars) -> Palette {
		if let Some((cached_theme, palette)) = self.cached {
			if cached_theme == theme {
				return palette;
			}
		}
		let palette = resolve(theme, vars);
		self.cached = Some((theme, palette));
		palette
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_forms() {
		assert_eq!(parse_rgb("#7c9cff"), Some(Rgb { r: 0x7c, g: 0x9c, b: 0xff }));
		assert_eq!(parse_rgb("  #0bC  "), Some(Rgb { r: 0x00, g: 0xbb, b: 0xcc }));
	}

	#[test]
	fn parses_functional_forms() {
		assert_eq!(parse_rgb("rgb(12, 34, 56)"), Some(Rgb { r: 12, g: 34, b: 56 }));
		assert_eq!(parse_rgb("rgba(200,100,50,0.4)"), Some(Rgb { r: 200, g: 100, b: 50 }));
		assert_eq!(parse_rgb("RGB( 1 , 2 , 3 )"), Some(Rgb { r: 1, g: 2, b: 3 }));
		assert_eq!(parse_rgb("rgb(127.6, 0, 0)"), Some(Rgb { r: 128, g: 0, b: 0 }));
	}

	#[test]
	fn rejects_garbage() {
		assert_eq!(parse_rgb(""), None);
		assert_eq!(parse_rgb("tomato"), None);
		assert_eq!(parse_rgb("#12345"), None);
		assert_eq!(parse_rgb("#ggg"), None);
		assert_eq!(parse_rgb("#ééé"), None);
		assert_eq!(parse_rgb("rgb(300, 0, 0)"), None);
		assert_eq!(parse_rgb("rgb(1, 2)"), None);
		assert_eq!(parse_rgb("hsl(10, 20%, 30%)"), None);
	}

	#[test]
	fn theme_attr_defaults_to_dark() {
		assert_eq!(Theme::from_attr(Some("light")), Theme::Light);
		assert_eq!(Theme::from_attr(Some("dark")), Theme::Dark);
		assert_eq!(Theme::from_attr(Some("solarized")), Theme::Dark);
		assert_eq!(Theme::from_attr(None), Theme::Dark);
	}

	#[test]
	fn missing_vars_fall_back_to_white() {
		let palette = resolve(Theme::Dark, &ThemeVars::default());
		assert_eq!(palette.trace.rgb, FALLBACK_RGB);
		assert_eq!(palette.pulse.rgb, FALLBACK_RGB);
		assert!((palette.trace.alpha - 0.10).abs() < 1e-12);
	}

	#[test]
	fn themes_use_their_own_alphas() {
		let vars = ThemeVars::parse("#7c9cff", "#22d3ee", "#e2e8f0");
		let dark = resolve(Theme::Dark, &vars);
		let light = resolve(Theme::Light, &vars);
		assert!((dark.node_hot.alpha - 0.82).abs() < 1e-12);
		assert!((light.node_hot.alpha - 0.74).abs() < 1e-12);
		assert!((dark.pulse.alpha - 0.92).abs() < 1e-12);
		assert!((light.pulse.alpha - 0.88).abs() < 1e-12);
		assert_eq!(dark.trace.rgb, Rgb { r: 0xe2, g: 0xe8, b: 0xf0 });
	}

	#[test]
	fn resolver_caches_per_theme() {
		let a = ThemeVars::parse("#111111", "#222222", "#333333");
		let b = ThemeVars::parse("#444444", "#555555", "#666666");
		let mut resolver = PaletteResolver::default();
		let first = resolver.resolve(Theme::Dark, &a);
		// same theme resolves from cache even when the vars moved
		let second = resolver.resolve(Theme::Dark, &b);
		assert_eq!(first, second);
		let flipped = resolver.resolve(Theme::Light, &b);
		assert_ne!(first.glow.rgb, flipped.glow.rgb);
	}

	#[test]
	fn css_strings_carry_the_alpha() {
		let paint = Paint::new(Some(Rgb { r: 10, g: 20, b: 30 }), 0.5);
		assert_eq!(paint.css(), "rgba(10, 20, 30, 0.5)");
		assert_eq!(paint.faded(0.5).css(), "rgba(10, 20, 30, 0.25)");
	}
}
