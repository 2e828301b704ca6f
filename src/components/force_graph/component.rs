//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component owns a [`GraphEngine`](crate::engine::GraphEngine), reloads
//! it whenever the `graph` signal changes and drives it from
//! `requestAnimationFrame`, drawing each frame with [`CanvasRenderer`]. Mouse
//! input becomes engine calls: press on a node starts a drag, a press that
//! barely moved is a click that selects, plain movement hovers.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render::CanvasRenderer;
use super::state::{CanvasState, LoopGate, Press};
use super::theme::Theme;
use crate::engine::{EngineConfig, Graph, Selection, Tooltip, Viewport};

/// Pointer distance (px) within which a press or hover hits a node.
const HIT_RADIUS: f64 = 12.0;
/// Frame clock step fed to highlight animation.
const FRAME_DT: f64 = 0.016;

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders `graph` as an interactive force-directed layout.
///
/// Clicking a node writes its [`Selection`] into `selected`; writing `None`
/// into `selected` from outside (closing the modal) clears the engine's
/// selection too. A new `graph` value discards the previous layout.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to lay out; `None` clears the canvas.
	#[prop(into)]
	graph: Signal<Option<Graph>>,
	/// Selection shared with the page.
	selected: RwSignal<Option<Selection>>,
	/// Engine settings.
	#[prop(optional)]
	config: EngineConfig,
	/// Canvas size.
	#[prop(default = Viewport::default())]
	viewport: Viewport,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(CanvasState::new(config)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let tooltip = RwSignal::new(None::<(Tooltip, f64, f64)>);
	let theme = Theme::default();
	let gate = LoopGate::new();

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() {
			return;
		}
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("stackinsight: canvas 2d context unavailable");
			return;
		};

		let (state_anim, animate_inner, theme_anim) =
			(state_init.clone(), animate_init.clone(), theme.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !gate.is_open() {
				// Drop the self-reference; wasm-bindgen frees the closure after this call returns.
				animate_inner.borrow_mut().take();
				return;
			}
			{
				let mut guard = state_anim.borrow_mut();
				let CanvasState {
					engine, highlight, ..
				} = &mut *guard;
				let mut renderer = CanvasRenderer {
					ctx: &ctx,
					theme: &theme_anim,
					viewport,
					highlight,
					dt: FRAME_DT,
				};
				engine.advance(&mut renderer);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_load = state.clone();
	Effect::new(move |_| {
		let next = graph.get();
		{
			let mut s = state_load.borrow_mut();
			match next {
				Some(next_graph) => s.engine.load(next_graph, viewport),
				None => s.engine.stop(),
			}
			s.highlight.reset();
			s.press = None;
		}
		tooltip.set(None);
		selected.set(None);
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		if selected.get().is_none() {
			state_sel.borrow_mut().engine.select(None);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		{
			let mut s = state_md.borrow_mut();
			let Some(id) = s.engine.find_node(x, y, HIT_RADIUS).map(str::to_string) else {
				return;
			};
			let (nx, ny) = s.engine.position(&id).unwrap_or((x, y));
			s.engine.begin_drag(&id);
			s.press = Some(Press {
				node_id: id,
				start_x: x,
				start_y: y,
				grab_dx: nx - x,
				grab_dy: ny - y,
				moved: false,
			});
		}
		tooltip.set(None);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let tip = {
			let mut s = state_mm.borrow_mut();
			let CanvasState { engine, press, .. } = &mut *s;
			if let Some(press) = press.as_mut() {
				let (px, py) = press.track(x, y);
				engine.update_drag(&press.node_id, px, py);
				return;
			}
			let hit = engine.find_node(x, y, HIT_RADIUS).map(str::to_string);
			engine.hover(hit.as_deref())
		};
		tooltip.set(tip.map(|t| (t, x, y)));
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut s = state_mu.borrow_mut();
			let Some(press) = s.press.take() else {
				return;
			};
			s.engine.end_drag(&press.node_id);
			(!press.moved).then(|| s.engine.select(Some(&press.node_id)))
		};
		if let Some(selection) = clicked {
			selected.set(selection);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		{
			let mut s = state_ml.borrow_mut();
			if let Some(press) = s.press.take() {
				s.engine.end_drag(&press.node_id);
			}
			s.engine.hover(None);
		}
		tooltip.set(None);
	};

	view! {
		<div
			class="graph-stage"
			style=format!(
				"position: relative; width: {}px; height: {}px;",
				viewport.width,
				viewport.height,
			)
		>
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: grab;"
			/>
			{move || {
				tooltip
					.get()
					.map(|(tip, x, y)| {
						view! {
							<div
								class="graph-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; pointer-events: none;",
									x + 14.0,
									y + 14.0,
								)
							>
								<strong>{tip.label}</strong>
								" "
								<span class="graph-tooltip-kind">{tip.kind.name()}</span>
							</div>
						}
					})
			}}
		</div>
	}
}
