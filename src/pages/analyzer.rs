//! Analyzer page: URL input, progress log, frameworks panel, graph and
//! node detail modal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::analysis::{Analysis, Frameworks, analyze};
use crate::components::force_graph::ForceGraphCanvas;
use crate::config::AppConfig;
use crate::engine::{Graph, Selection};
use crate::error::AnalysisError;

/// First log line of every run.
pub const LOG_STARTED: &str = "🚀 Starting analysis...";
/// Log line written when the service returns a valid graph.
pub const LOG_COMPLETE: &str = "✅ Analysis complete!";

/// Log lines appended once an analysis finishes.
pub fn outcome_lines(result: &Result<Analysis, AnalysisError>) -> Vec<String> {
	match result {
		Ok(analysis) => vec![
			LOG_COMPLETE.to_string(),
			format!(
				"Graph has {} nodes and {} links",
				analysis.graph.len(),
				analysis.graph.links().len()
			),
		],
		Err(e) => vec![format!("❌ Error: {}", e)],
	}
}

/// Repository analyzer: submits a URL to the analysis service and explores
/// the returned dependency graph.
#[component]
pub fn AnalyzerPage(
	/// Endpoint, canvas size and engine settings.
	config: AppConfig,
) -> impl IntoView {
	let repo_url = RwSignal::new(String::new());
	let logs = RwSignal::new(Vec::<String>::new());
	let loading = RwSignal::new(false);
	let graph = RwSignal::new(None::<Graph>);
	let frameworks = RwSignal::new(None::<Frameworks>);
	let selected = RwSignal::new(None::<Selection>);
	let endpoint = StoredValue::new(config.endpoint.clone());

	let run = move || {
		let url = repo_url.get_untracked();
		if loading.get_untracked() || url.trim().is_empty() {
			return;
		}
		loading.set(true);
		logs.set(vec![LOG_STARTED.to_string()]);

		spawn_local(async move {
			let client = reqwest::Client::new();
			let result = analyze(&client, &endpoint.get_value(), &url).await;
			logs.update(|l| l.extend(outcome_lines(&result)));
			match result {
				Ok(analysis) => {
					info!("stackinsight: analysis of {} complete", url.trim());
					frameworks.set(Some(analysis.frameworks));
					graph.set(Some(analysis.graph));
				}
				Err(e) => warn!("stackinsight: analysis of {} failed: {}", url.trim(), e),
			}
			loading.set(false);
		});
	};

	view! {
		<div class="analyzer-page">
			<h1>"🔍 StackInsight Analyzer"</h1>

			<div class="analyzer-form">
				<input
					type="text"
					placeholder="Enter GitHub Repository URL..."
					prop:value=move || repo_url.get()
					on:input=move |ev| repo_url.set(event_target_value(&ev))
					on:keydown=move |ev| {
						if ev.key() == "Enter" {
							run();
						}
					}
				/>
				<button on:click=move |_| run() disabled=move || loading.get()>
					{move || if loading.get() { "Analyzing..." } else { "Analyze Repository" }}
				</button>
			</div>

			<div class="analyzer-log">
				{move || {
					logs.get()
						.into_iter()
						.map(|line| view! { <div class="log-line">{line}</div> })
						.collect_view()
				}}
			</div>

			<div class="analyzer-results">
				<ForceGraphCanvas
					graph=graph
					selected=selected
					config=config.engine.clone()
					viewport=config.viewport
				/>
				{move || {
					frameworks
						.get()
						.map(|fw| {
							view! {
								<aside class="frameworks-panel">
									<h3>"Detected frameworks"</h3>
									<p>"Frontend: " {fw.frontend.unwrap_or_else(|| "Unknown".into())}</p>
									<p>"Backend: " {fw.backend.unwrap_or_else(|| "Unknown".into())}</p>
									<ul>
										{fw
											.detected
											.into_iter()
											.map(|name| view! { <li>{name}</li> })
											.collect_view()}
									</ul>
								</aside>
							}
						})
				}}
			</div>

			{move || {
				selected
					.get()
					.map(|sel| {
						view! {
							<div class="modal-backdrop" on:click=move |_| selected.set(None)>
								<div class="node-modal" on:click=|ev| ev.stop_propagation()>
									<h2>{sel.label}</h2>
									<p class="node-kind">{sel.kind.name()}</p>
									<p class="node-summary">{sel.summary}</p>
									<button on:click=move |_| selected.set(None)>"Close"</button>
								</div>
							</div>
						}
					})
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::{GraphData, GraphLink, GraphNode};
	use crate::error::GraphError;

	#[test]
	fn test_success_lines() {
		let data = GraphData {
			nodes: vec![
				GraphNode {
					id: "a".into(),
					..GraphNode::default()
				},
				GraphNode {
					id: "b".into(),
					..GraphNode::default()
				},
			],
			links: vec![GraphLink::new("a", "b")],
		};
		let analysis = Analysis {
			graph: Graph::try_from(&data).unwrap(),
			frameworks: Frameworks::default(),
		};
		assert_eq!(
			outcome_lines(&Ok(analysis)),
			vec![
				LOG_COMPLETE.to_string(),
				"Graph has 2 nodes and 1 links".to_string()
			]
		);
	}

	#[test]
	fn test_malformed_line() {
		let result = Err(AnalysisError::Malformed(GraphError::DuplicateNode(
			"a".into(),
		)));
		assert_eq!(
			outcome_lines(&result),
			vec!["❌ Error: Analysis returned malformed data: duplicate node id a".to_string()]
		);
	}
}
