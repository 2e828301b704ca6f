//! Visual theming for the force graph.
//!
//! Node fill colors come from the node's classification; everything else is
//! fixed per theme.

use crate::engine::NodeKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	/// CSS color string, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill color per node classification.
#[derive(Clone, Debug)]
pub struct KindPalette {
	/// Repository nodes.
	pub repository: Color,
	/// File nodes.
	pub file: Color,
	/// Function/Class nodes.
	pub function_class: Color,
}

impl KindPalette {
	/// Fill for `kind`.
	pub fn get(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::Repository => self.repository,
			NodeKind::File => self.file,
			NodeKind::FunctionClass => self.function_class,
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient centre
	pub color_secondary: Color,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base edge color.
	pub color: Color,
	/// Line width in pixels.
	pub width: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Base node radius in pixels.
	pub radius: f64,
	/// Inner radial gradient instead of flat fill
	pub use_gradient: bool,
	/// Label text color.
	pub label_color: Color,
	/// Canvas font string for labels.
	pub label_font: &'static str,
	/// Label offset from the node centre
	pub label_offset: (f64, f64),
	/// Ring drawn around the hovered node
	pub hover_ring: Color,
	/// Ring drawn around the selected node
	pub selection_ring: Color,
	/// Ring drawn around pinned nodes
	pub pin_ring: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Links.
	pub edge: EdgeStyle,
	/// Nodes, labels and rings.
	pub node: NodeStyle,
	/// Node fills by classification.
	pub kinds: KindPalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(15, 23, 42),
				color_secondary: Color::rgb(30, 41, 59),
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(85, 85, 85, 0.6),
				width: 1.5,
			},
			node: NodeStyle {
				radius: 8.0,
				use_gradient: true,
				label_color: Color::rgb(255, 255, 255),
				label_font: "12px sans-serif",
				label_offset: (12.0, 4.0),
				hover_ring: Color::rgba(255, 255, 255, 0.8),
				selection_ring: Color::rgb(250, 204, 21),
				pin_ring: Color::rgba(148, 163, 184, 0.7),
			},
			kinds: KindPalette {
				repository: Color::rgb(244, 114, 182),
				file: Color::rgb(34, 211, 238),
				function_class: Color::rgb(167, 139, 250),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_css_output() {
		assert_eq!(Color::rgb(34, 211, 238).to_css(), "#22d3ee");
		assert_eq!(
			Color::rgb(85, 85, 85).with_alpha(0.6).to_css(),
			"rgba(85, 85, 85, 0.6)"
		);
	}

	#[test]
	fn test_lighten_darken_bounds() {
		let c = Color::rgb(100, 150, 200);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lighten(0.0), c);
	}

	#[test]
	fn test_kind_palette_is_distinct() {
		let kinds = Theme::default().kinds;
		let colors = [
			kinds.get(NodeKind::Repository),
			kinds.get(NodeKind::File),
			kinds.get(NodeKind::FunctionClass),
		];
		assert_ne!(colors[0], colors[1]);
		assert_ne!(colors[1], colors[2]);
		assert_ne!(colors[0], colors[2]);
	}
}
