//! Canvas rendering for the force graph.
//!
//! [`CanvasRenderer`] is the canvas implementation of [`FrameSink`]. Every
//! frame is drawn from scratch in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links, dimmed unless touching the hover target
//! 3. Dimmed nodes, then highlighted nodes and their rings on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::HighlightState;
use super::theme::{Color, Theme};
use crate::engine::{Frame, FrameSink, LinkFrame, NodeFrame, Viewport};

/// Smoothstep easing for intensity-driven transitions.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

pub struct CanvasRenderer<'a> {
	pub ctx: &'a CanvasRenderingContext2d,
	pub theme: &'a Theme,
	pub viewport: Viewport,
	pub highlight: &'a mut HighlightState,
	/// Seconds since the previous frame, for highlight animation.
	pub dt: f64,
}

impl FrameSink for CanvasRenderer<'_> {
	fn draw(&mut self, frame: &Frame) {
		self.highlight.retarget(frame);
		self.highlight.tick(self.dt);

		draw_background(self.ctx, self.theme, self.viewport);

		for link in &frame.links {
			draw_link(self.ctx, self.theme, self.highlight, link);
		}

		let max_t = smooth_step(self.highlight.max_intensity());
		for node in frame
			.nodes
			.iter()
			.filter(|n| self.highlight.node_intensity(&n.id) <= 0.001)
		{
			let alpha = 1.0 - 0.7 * max_t;
			draw_node(self.ctx, self.theme, node, alpha, 1.0 - 0.15 * max_t);
		}
		for node in frame
			.nodes
			.iter()
			.filter(|n| self.highlight.node_intensity(&n.id) > 0.001)
		{
			let t = smooth_step(self.highlight.node_intensity(&node.id));
			let dim_alpha = 1.0 - 0.7 * max_t;
			let growth = if node.hovered { 0.4 } else { 0.25 };
			draw_node(
				self.ctx,
				self.theme,
				node,
				dim_alpha + (1.0 - dim_alpha) * t,
				1.0 + growth * t,
			);
		}

		for node in &frame.nodes {
			draw_rings(self.ctx, self.theme, node);
		}

		if self.theme.background.vignette > 0.0 {
			draw_vignette(self.ctx, self.theme, self.viewport);
		}
	}
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, viewport: Viewport) {
	let (cx, cy) = viewport.center();
	match ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, viewport.width.max(viewport.height) * 0.8)
	{
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
}

fn draw_vignette(ctx: &CanvasRenderingContext2d, theme: &Theme, viewport: Viewport) {
	let (cx, cy) = viewport.center();
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		viewport.width.min(viewport.height) * 0.3,
		cx,
		cy,
		viewport.width.max(viewport.height) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(1.0, &format!("rgba(0, 0, 0, {})", theme.background.vignette));
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
}

fn draw_link(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	highlight: &HighlightState,
	link: &LinkFrame,
) {
	let (dx, dy) = (link.x2 - link.x1, link.y2 - link.y1);
	if (dx * dx + dy * dy).sqrt() < 0.001 {
		return;
	}

	let edge_t = smooth_step(highlight.edge_intensity(&link.source, &link.target));
	let max_t = smooth_step(highlight.max_intensity());
	let base = theme.edge.color;
	let (alpha, width) = if edge_t > 0.01 {
		(base.a + (1.0 - base.a) * edge_t, theme.edge.width * (1.0 + 0.4 * edge_t))
	} else {
		(base.a * (1.0 - 0.6 * max_t), theme.edge.width)
	};

	ctx.set_stroke_style_str(&base.with_alpha(alpha).to_css());
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(link.x1, link.y1);
	ctx.line_to(link.x2, link.y2);
	ctx.stroke();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &NodeFrame,
	alpha: f64,
	radius_mult: f64,
) {
	let radius = theme.node.radius * radius_mult;
	let color = theme.kinds.get(node.kind);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
	if !gradient_fill(ctx, theme, node, radius, color) {
		ctx.set_fill_style_str(&color.to_css());
	}
	ctx.fill();

	ctx.set_fill_style_str(&theme.node.label_color.with_alpha(0.9).to_css());
	ctx.set_font(theme.node.label_font);
	let (ox, oy) = theme.node.label_offset;
	let _ = ctx.fill_text(&node.label, node.x + ox * radius_mult, node.y + oy);
	ctx.set_global_alpha(1.0);
}

/// Sets a lit-sphere gradient as fill style; false if gradients are off or unavailable.
fn gradient_fill(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &NodeFrame,
	radius: f64,
	color: Color,
) -> bool {
	if !theme.node.use_gradient {
		return false;
	}
	let Ok(gradient) = ctx.create_radial_gradient(
		node.x - radius * 0.3,
		node.y - radius * 0.3,
		0.0,
		node.x,
		node.y,
		radius,
	) else {
		return false;
	};
	let _ = gradient.add_color_stop(0.0, &color.lighten(0.4).to_css());
	let _ = gradient.add_color_stop(0.7, &color.to_css());
	let _ = gradient.add_color_stop(1.0, &color.darken(0.2).to_css());
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	true
}

fn draw_rings(ctx: &CanvasRenderingContext2d, theme: &Theme, node: &NodeFrame) {
	let rings = [
		(node.pinned, theme.node.pin_ring, 2.0, 1.0),
		(node.hovered, theme.node.hover_ring, 3.0, 1.5),
		(node.selected, theme.node.selection_ring, 5.0, 2.0),
	];
	for (active, color, offset, width) in rings {
		if !active {
			continue;
		}
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, theme.node.radius + offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		ctx.stroke();
	}
}
