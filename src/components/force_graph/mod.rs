//! Force-directed graph visualization component.
//!
//! Canvas adapter around the [`engine`](crate::engine):
//! - One engine step per animation frame, full redraw from each frame
//! - Node dragging with pin-and-reheat, click to select, hover tooltips
//! - Smooth highlight transitions for the hovered node and its neighbours
//! - Node colors by label classification
//!
//! # Example
//!
//! ```ignore
//! use stackinsight::components::force_graph::ForceGraphCanvas;
//!
//! let graph = RwSignal::new(None::<Graph>);
//! let selected = RwSignal::new(None::<Selection>);
//!
//! view! { <ForceGraphCanvas graph=graph selected=selected /> }
//! ```

mod component;
mod render;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use theme::Theme;
