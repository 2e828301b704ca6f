//! Velocity-Verlet style force simulation with a decaying energy ("alpha").
//!
//! Each [`Simulation::step`]:
//! 1. moves alpha toward its target by `alpha_decay` of the gap,
//! 2. accumulates link spring, pairwise charge and centering contributions,
//! 3. integrates velocities with `velocity_decay` friction, holding pinned
//!    bodies exactly at their pin and clamping free bodies to the viewport.
//!
//! Forces scale with alpha, so motion fades as the energy decays and comes
//! back when a drag raises the target.

use std::f64::consts::PI;

use super::config::{ForceConfig, Viewport};
use super::graph::Graph;

/// Positional state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity carried into the next tick.
	pub vx: f64,
	/// Vertical velocity carried into the next tick.
	pub vy: f64,
	/// Externally fixed position (`fx`, `fy`), overriding integration.
	pub pin: Option<(f64, f64)>,
}

/// A link spring with its precomputed strength and bias.
#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	distance: f64,
	strength: f64,
	/// Share of the correction taken by the target; lighter-linked ends move more.
	bias: f64,
}

/// Deterministic generator for breaking exact overlaps.
#[derive(Clone, Debug)]
struct Jiggle(u64);

impl Jiggle {
	fn next(&mut self) -> f64 {
		self.0 = (1_664_525 * self.0 + 1_013_904_223) & 0xFFFF_FFFF;
		(self.0 as f64 / 4_294_967_296.0 - 0.5) * 1e-6
	}
}

/// Axis-aligned box free bodies are clamped to.
#[derive(Clone, Copy, Debug)]
struct Bounds {
	min_x: f64,
	max_x: f64,
	min_y: f64,
	max_y: f64,
}

impl Bounds {
	fn inset(viewport: Viewport, padding: f64) -> Self {
		let (cx, cy) = viewport.center();
		Self {
			min_x: padding.min(cx),
			max_x: (viewport.width - padding).max(cx),
			min_y: padding.min(cy),
			max_y: (viewport.height - padding).max(cy),
		}
	}
}

/// Layout state for the nodes of one [`Graph`], indexed like its nodes.
pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	params: ForceConfig,
	center: (f64, f64),
	bounds: Option<Bounds>,
	alpha: f64,
	alpha_target: f64,
	jiggle: Jiggle,
}

impl Simulation {
	/// Seed bodies in a spiral around the viewport centre with alpha at `alpha_initial`.
	pub fn new(
		graph: &Graph,
		params: &ForceConfig,
		viewport: Viewport,
		padding: Option<f64>,
	) -> Self {
		let center = viewport.center();

		// Phyllotaxis seeding: deterministic, no two bodies coincide.
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let bodies = (0..graph.len())
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				Body {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let degrees = graph.degrees();
		let springs = graph
			.links()
			.iter()
			.filter(|link| link.source != link.target)
			.map(|link| {
				let (ds, dt) = (degrees[link.source] as f64, degrees[link.target] as f64);
				Spring {
					source: link.source,
					target: link.target,
					distance: link.distance.unwrap_or(params.link_distance),
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			bodies,
			springs,
			params: params.clone(),
			center,
			bounds: padding.map(|p| Bounds::inset(viewport, p)),
			alpha: params.alpha_initial,
			alpha_target: 0.0,
			jiggle: Jiggle(1),
		}
	}

	/// Bodies indexed like the graph's nodes.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy the simulation is moving toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Raise or lower the energy target, e.g. while dragging.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Energy is below the threshold and nothing is holding it up.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
	}

	/// Fix a body at `(x, y)` until [`unpin`](Self::unpin).
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pin = Some((x, y));
		}
	}

	/// Drops the pin, leaving the body at the pinned spot and at rest.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			if let Some((x, y)) = body.pin.take() {
				body.x = x;
				body.y = y;
			}
			body.vx = 0.0;
			body.vy = 0.0;
		}
	}

	/// Advance one tick.
	pub fn step(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_springs();
		self.apply_charge();
		self.apply_centering();
		self.integrate();
	}

	fn apply_springs(&mut self) {
		let alpha = self.alpha;
		for spring in &self.springs {
			let (s, t) = (self.bodies[spring.source], self.bodies[spring.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = self.jiggle.next();
			}
			if dy == 0.0 {
				dy = self.jiggle.next();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - spring.distance) / len * alpha * spring.strength;
			let (fx, fy) = (dx * k, dy * k);

			let target = &mut self.bodies[spring.target];
			target.vx -= fx * spring.bias;
			target.vy -= fy * spring.bias;
			let source = &mut self.bodies[spring.source];
			source.vx += fx * (1.0 - spring.bias);
			source.vy += fy * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		let scale = self.params.charge_strength * self.alpha;
		let min_sq = self.params.charge_distance_min * self.params.charge_distance_min;

		for i in 0..n {
			let (xi, yi) = (self.bodies[i].x, self.bodies[i].y);
			let (mut ax, mut ay) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut dx = self.bodies[j].x - xi;
				let mut dy = self.bodies[j].y - yi;
				if dx == 0.0 {
					dx = self.jiggle.next();
				}
				if dy == 0.0 {
					dy = self.jiggle.next();
				}
				let mut dist_sq = dx * dx + dy * dy;
				if dist_sq < min_sq {
					dist_sq = (min_sq * dist_sq).sqrt();
				}
				let w = scale / dist_sq;
				ax += dx * w;
				ay += dy * w;
			}
			self.bodies[i].vx += ax;
			self.bodies[i].vy += ay;
		}
	}

	fn apply_centering(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let shift_x = (sx / n as f64 - self.center.0) * self.params.center_strength;
		let shift_y = (sy / n as f64 - self.center.1) * self.params.center_strength;
		for body in &mut self.bodies {
			body.x -= shift_x;
			body.y -= shift_y;
		}
	}

	fn integrate(&mut self) {
		let friction = 1.0 - self.params.velocity_decay;
		for body in &mut self.bodies {
			if let Some((fx, fy)) = body.pin {
				body.x = fx;
				body.y = fy;
				body.vx = 0.0;
				body.vy = 0.0;
				continue;
			}

			body.vx *= friction;
			body.vy *= friction;
			body.x += body.vx;
			body.y += body.vy;

			if let Some(b) = self.bounds {
				if body.x < b.min_x || body.x > b.max_x {
					body.x = body.x.clamp(b.min_x, b.max_x);
					body.vx = 0.0;
				}
				if body.y < b.min_y || body.y > b.max_y {
					body.y = body.y.clamp(b.min_y, b.max_y);
					body.vy = 0.0;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::types::{GraphData, GraphLink, GraphNode};

	fn graph(ids: &[&str], links: &[(&str, &str)]) -> Graph {
		let data = GraphData {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					..GraphNode::default()
				})
				.collect(),
			links: links.iter().map(|(s, t)| GraphLink::new(*s, *t)).collect(),
		};
		Graph::try_from(&data).unwrap()
	}

	fn distance(a: &Body, b: &Body) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn run(sim: &mut Simulation, ticks: usize) {
		for _ in 0..ticks {
			sim.step();
		}
	}

	#[test]
	fn test_seeding_is_distinct_and_centred() {
		let sim = Simulation::new(
			&graph(&["a", "b", "c", "d"], &[]),
			&ForceConfig::default(),
			Viewport::new(800.0, 600.0),
			None,
		);
		let bodies = sim.bodies();
		for i in 0..bodies.len() {
			assert!(distance(&bodies[i], &Body { x: 400.0, y: 300.0, ..Body::default() }) < 30.0);
			for j in (i + 1)..bodies.len() {
				assert!(distance(&bodies[i], &bodies[j]) > 1.0);
			}
		}
	}

	#[test]
	fn test_charge_pushes_unlinked_nodes_apart() {
		let mut sim = Simulation::new(
			&graph(&["a", "b"], &[]),
			&ForceConfig::default(),
			Viewport::new(800.0, 600.0),
			None,
		);
		let before = distance(&sim.bodies()[0], &sim.bodies()[1]);
		run(&mut sim, 20);
		assert!(distance(&sim.bodies()[0], &sim.bodies()[1]) > before * 3.0);
	}

	#[test]
	fn test_spring_settles_near_rest_distance() {
		let params = ForceConfig {
			charge_strength: 0.0,
			..ForceConfig::default()
		};
		let mut sim = Simulation::new(
			&graph(&["a", "b"], &[("a", "b")]),
			&params,
			Viewport::new(800.0, 600.0),
			None,
		);
		while !sim.is_settled() {
			sim.step();
		}
		let d = distance(&sim.bodies()[0], &sim.bodies()[1]);
		assert!((d - 150.0).abs() < 15.0, "rest distance {d}");
	}

	#[test]
	fn test_link_distance_override() {
		let mut data = GraphData {
			nodes: vec![
				GraphNode { id: "a".into(), ..GraphNode::default() },
				GraphNode { id: "b".into(), ..GraphNode::default() },
			],
			links: vec![GraphLink::new("a", "b")],
		};
		data.links[0].distance = Some(60.0);
		let params = ForceConfig {
			charge_strength: 0.0,
			..ForceConfig::default()
		};
		let mut sim = Simulation::new(
			&Graph::try_from(&data).unwrap(),
			&params,
			Viewport::new(800.0, 600.0),
			None,
		);
		run(&mut sim, 400);
		let d = distance(&sim.bodies()[0], &sim.bodies()[1]);
		assert!((d - 60.0).abs() < 10.0, "rest distance {d}");
	}

	#[test]
	fn test_centroid_tracks_viewport_centre() {
		let mut sim = Simulation::new(
			&graph(&["a", "b", "c"], &[("a", "b")]),
			&ForceConfig::default(),
			Viewport::new(1000.0, 400.0),
			None,
		);
		run(&mut sim, 50);
		let n = sim.bodies().len() as f64;
		let cx = sim.bodies().iter().map(|b| b.x).sum::<f64>() / n;
		let cy = sim.bodies().iter().map(|b| b.y).sum::<f64>() / n;
		// Centering runs before integration, so allow for one tick of drift.
		assert!((cx - 500.0).abs() < 5.0, "cx {cx}");
		assert!((cy - 200.0).abs() < 5.0, "cy {cy}");
	}

	#[test]
	fn test_pinned_body_holds_position() {
		let mut sim = Simulation::new(
			&graph(&["a", "b"], &[("a", "b")]),
			&ForceConfig::default(),
			Viewport::new(800.0, 600.0),
			None,
		);
		sim.pin(0, 100.0, 120.0);
		run(&mut sim, 30);
		let a = sim.bodies()[0];
		assert_eq!((a.x, a.y), (100.0, 120.0));
		assert_eq!((a.vx, a.vy), (0.0, 0.0));

		sim.unpin(0);
		assert_eq!(sim.bodies()[0].pin, None);
		assert_eq!((sim.bodies()[0].x, sim.bodies()[0].y), (100.0, 120.0));
	}

	#[test]
	fn test_alpha_target_keeps_simulation_awake() {
		let mut sim = Simulation::new(
			&graph(&["a"], &[]),
			&ForceConfig::default(),
			Viewport::default(),
			None,
		);
		while !sim.is_settled() {
			sim.step();
		}
		sim.set_alpha_target(0.3);
		assert!(!sim.is_settled());
		run(&mut sim, 200);
		assert!(sim.alpha() > 0.25);

		sim.set_alpha_target(0.0);
		run(&mut sim, 400);
		assert!(sim.is_settled());
	}

	#[test]
	fn test_bodies_clamped_to_viewport() {
		let params = ForceConfig {
			charge_strength: -5000.0,
			..ForceConfig::default()
		};
		let viewport = Viewport::new(200.0, 200.0);
		let mut sim = Simulation::new(
			&graph(&["a", "b", "c", "d", "e"], &[]),
			&params,
			viewport,
			Some(10.0),
		);
		run(&mut sim, 100);
		for body in sim.bodies() {
			assert!((10.0..=190.0).contains(&body.x), "x {}", body.x);
			assert!((10.0..=190.0).contains(&body.y), "y {}", body.y);
		}
	}

	#[test]
	fn test_empty_graph_steps() {
		let mut sim = Simulation::new(
			&graph(&[], &[]),
			&ForceConfig::default(),
			Viewport::default(),
			Some(20.0),
		);
		run(&mut sim, 10);
		assert!(sim.bodies().is_empty());
	}
}
