//! Client for the remote repository analysis service.
//!
//! One `POST {"repo_url": ...}` per analysis. The response carries the graph
//! plus display-only framework fields; the graph is validated here so the
//! page only ever hands a [`Graph`] to the engine.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::{Graph, GraphData};
use crate::error::AnalysisError;

/// `owner/repo` extracted from a repository URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
	/// Account or organisation.
	pub owner: String,
	/// Repository name.
	pub repo: String,
}

impl RepoRef {
	/// Takes the last two path segments, the same way the service does.
	pub fn parse(url: &str) -> Result<Self, AnalysisError> {
		let trimmed = url.trim().trim_end_matches('/');
		let invalid = || AnalysisError::InvalidUrl(url.trim().to_string());
		if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
			return Err(invalid());
		}

		let mut segments = trimmed.rsplit('/');
		let repo = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
		let owner = segments
			.next()
			.filter(|s| !s.is_empty() && !s.ends_with(':'))
			.ok_or_else(invalid)?;

		Ok(Self {
			owner: owner.to_string(),
			repo: repo.to_string(),
		})
	}
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
	repo_url: &'a str,
}

/// Raw response body of a successful analysis.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnalysisResponse {
	/// Nodes and links, unvalidated.
	#[serde(flatten)]
	pub graph: GraphData,
	/// Detected frontend framework.
	#[serde(default)]
	pub frontend_framework: Option<String>,
	/// Detected backend framework.
	#[serde(default)]
	pub backend_framework: Option<String>,
	/// Every framework the service recognised.
	#[serde(default)]
	pub frameworks: Vec<String>,
}

/// Framework detection results for the side panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frameworks {
	/// Frontend framework, if detected.
	pub frontend: Option<String>,
	/// Backend framework, if detected.
	pub backend: Option<String>,
	/// Full list of detected frameworks.
	pub detected: Vec<String>,
}

/// A completed analysis with its graph already validated.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
	/// Validated dependency graph.
	pub graph: Graph,
	/// Framework panel contents.
	pub frameworks: Frameworks,
}

impl TryFrom<AnalysisResponse> for Analysis {
	type Error = AnalysisError;

	fn try_from(response: AnalysisResponse) -> Result<Self, Self::Error> {
		let graph = Graph::try_from(&response.graph)?;
		Ok(Self {
			graph,
			frameworks: Frameworks {
				frontend: response.frontend_framework,
				backend: response.backend_framework,
				detected: response.frameworks,
			},
		})
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	error: String,
}

/// Human-readable reason from an error response body.
fn service_message(body: &str) -> String {
	match serde_json::from_str::<ErrorBody>(body) {
		Ok(parsed) => parsed.error,
		Err(_) if body.trim().is_empty() => "no details".to_string(),
		Err(_) => body.trim().to_string(),
	}
}

/// Decode and validate a success body. Anything that is not a well-formed
/// graph is reported as malformed data, never as a transport failure.
fn decode_response(body: &str) -> Result<Analysis, AnalysisError> {
	let response: AnalysisResponse = serde_json::from_str(body)?;
	Analysis::try_from(response)
}

/// Run one analysis against `endpoint`.
pub async fn analyze(
	client: &reqwest::Client,
	endpoint: &str,
	repo_url: &str,
) -> Result<Analysis, AnalysisError> {
	let repo = RepoRef::parse(repo_url)?;
	debug!("stackinsight: analyzing {}/{}", repo.owner, repo.repo);

	let response = client
		.post(endpoint)
		.json(&AnalysisRequest {
			repo_url: repo_url.trim(),
		})
		.send()
		.await?;

	let status = response.status();
	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		return Err(AnalysisError::Service {
			status: status.as_u16(),
			message: service_message(&body),
		});
	}

	let body = response.text().await?;
	decode_response(&body)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::GraphError;

	#[test]
	fn test_repo_ref_parse() {
		assert_eq!(
			RepoRef::parse(" https://github.com/octo/hello-world/ ").unwrap(),
			RepoRef {
				owner: "octo".into(),
				repo: "hello-world".into()
			}
		);
		assert_eq!(RepoRef::parse("octo/hello").unwrap().repo, "hello");
	}

	#[test]
	fn test_repo_ref_rejects() {
		for url in ["", "   ", "hello", "https://", "https://github.com/", "a b/c"] {
			assert!(
				matches!(RepoRef::parse(url), Err(AnalysisError::InvalidUrl(_))),
				"{url:?}"
			);
		}
	}

	#[test]
	fn test_request_body_shape() {
		let body = serde_json::to_value(AnalysisRequest {
			repo_url: "https://github.com/octo/hello",
		})
		.unwrap();
		assert_eq!(
			body,
			serde_json::json!({ "repo_url": "https://github.com/octo/hello" })
		);
	}

	#[test]
	fn test_response_to_analysis() {
		let response: AnalysisResponse = serde_json::from_str(
			r#"{
				"frontend_framework": "React",
				"backend_framework": "Django",
				"frameworks": ["React", "Django"],
				"nodes": [{"id": "A", "label": "repo-root"}, {"id": "B", "label": "main.py"}],
				"links": [{"source": "A", "target": "B"}]
			}"#,
		)
		.unwrap();
		let analysis = Analysis::try_from(response).unwrap();

		assert_eq!(analysis.graph.len(), 2);
		assert_eq!(analysis.frameworks.frontend.as_deref(), Some("React"));
		assert_eq!(analysis.frameworks.backend.as_deref(), Some("Django"));
		assert_eq!(analysis.frameworks.detected, vec!["React", "Django"]);
	}

	#[test]
	fn test_malformed_response_is_distinguishable() {
		let response: AnalysisResponse = serde_json::from_str(
			r#"{ "nodes": [{"id": "A"}], "links": [{"source": "A", "target": "B"}] }"#,
		)
		.unwrap();
		let error = Analysis::try_from(response).unwrap_err();
		assert!(matches!(
			error,
			AnalysisError::Malformed(GraphError::DanglingLink { .. })
		));
	}

	#[test]
	fn test_undecodable_bodies_are_malformed() {
		for body in [
			r#"{"nodes":[{"label":"x"}],"links":[]}"#,
			r#"{"nodes":[],"links":{"source":"a"}}"#,
			"<html>Bad Gateway</html>",
		] {
			let error = decode_response(body).unwrap_err();
			assert!(matches!(error, AnalysisError::Decode(_)), "{body}");
			assert!(
				error.to_string().starts_with("Analysis returned malformed data"),
				"{error}"
			);
		}
	}

	#[test]
	fn test_decode_response() {
		let analysis =
			decode_response(r#"{"nodes":[{"id":"A"}],"links":[],"backend_framework":"Flask"}"#)
				.unwrap();
		assert_eq!(analysis.graph.len(), 1);
		assert_eq!(analysis.frameworks.backend.as_deref(), Some("Flask"));
		assert!(matches!(
			decode_response(r#"{"nodes":[{"id":"A"},{"id":"A"}]}"#),
			Err(AnalysisError::Malformed(GraphError::DuplicateNode(_)))
		));
	}

	#[test]
	fn test_service_message() {
		assert_eq!(
			service_message(r#"{"error": "Invalid GitHub URL"}"#),
			"Invalid GitHub URL"
		);
		assert_eq!(service_message("Bad Gateway"), "Bad Gateway");
		assert_eq!(service_message(""), "no details");
	}
}
