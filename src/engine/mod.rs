//! Graph interaction engine.
//!
//! Independent of any rendering library: it validates graph data, runs a
//! force-directed layout and turns pointer-level operations into drag pins,
//! hover tooltips and a single selection. Consumers pull [`Frame`]s (full
//! positional snapshots) once per display refresh and redraw from scratch.
//!
//! # Example
//!
//! ```
//! use stackinsight::engine::{GraphData, GraphEngine, GraphLink, GraphNode, NodeKind, Viewport};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "a".into(), label: Some("my-repo".into()), summary: None },
//!         GraphNode { id: "b".into(), label: Some("index.js".into()), summary: None },
//!     ],
//!     links: vec![GraphLink::new("a", "b")],
//! };
//!
//! let mut engine = GraphEngine::default();
//! engine.load_graph(&data, Viewport::new(800.0, 600.0)).unwrap();
//! let last = engine.frames().last().unwrap();
//! assert_eq!(last.node("b").unwrap().kind, NodeKind::File);
//! ```

mod classify;
mod config;
mod frame;
mod graph;
mod interaction;
mod simulation;
mod types;

pub use classify::{Classifier, DEFAULT_FILE_EXTENSIONS, NodeKind, classify};
pub use config::{EngineConfig, ForceConfig, Viewport};
pub use frame::{Frame, FrameSink, LinkFrame, NodeFrame};
pub use graph::{Graph, Link, Node};
pub use interaction::{Frames, GraphEngine, Selection, Tooltip};
pub use simulation::{Body, Simulation};
pub use types::{GraphData, GraphLink, GraphNode};
