//! stackinsight: interactive explorer for repository dependency graphs.
//!
//! The [`engine`] module is a headless force-directed layout with drag, hover
//! and selection. The browser side wraps it in a canvas component and an
//! analyzer page that fetches graphs from the StackInsight service.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod analysis;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod pages;

pub use analysis::{Analysis, Frameworks, RepoRef, analyze};
pub use components::force_graph::ForceGraphCanvas;
pub use config::AppConfig;
pub use engine::{EngineConfig, Frame, Graph, GraphData, GraphEngine, NodeKind, Selection, Viewport};
pub use error::{AnalysisError, ConfigError, GraphError};
pub use pages::AnalyzerPage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("stackinsight: logging initialized");
}

/// Main application component.
/// Reads the page configuration from the DOM and renders the analyzer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = AppConfig::load();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="StackInsight Analyzer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<AnalyzerPage config=config />
	}
}
