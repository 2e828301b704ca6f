//! Error types for graph validation, configuration and the analysis service.

use thiserror::Error;

/// A graph that cannot be handed to the layout engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	/// A link endpoint names a node that is not in the graph.
	#[error("link {source_id} -> {target_id} references unknown node {missing}")]
	DanglingLink {
		/// Link source id.
		source_id: String,
		/// Link target id.
		target_id: String,
		/// The endpoint that names no node.
		missing: String,
	},

	/// Two nodes share the same identifier.
	#[error("duplicate node id {0}")]
	DuplicateNode(String),
}

/// Failures of the analysis round-trip. These never reach the engine; the
/// analyzer page turns them into log lines.
#[derive(Error, Debug)]
pub enum AnalysisError {
	/// The URL does not look like `https://github.com/<owner>/<repo>`.
	#[error("Invalid GitHub URL: {0}")]
	InvalidUrl(String),

	/// The request never produced a usable HTTP response.
	#[error("Request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// The service answered with a non-success status.
	#[error("Service error ({status}): {message}")]
	Service {
		/// HTTP status code.
		status: u16,
		/// Reason decoded from the response body.
		message: String,
	},

	/// The service answered, but the graph it returned is inconsistent.
	#[error("Analysis returned malformed data: {0}")]
	Malformed(#[from] GraphError),

	/// The service answered with a success status, but the body is not an
	/// analysis result.
	#[error("Analysis returned malformed data: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Problems reading the page-level configuration block.
#[derive(Error, Debug)]
pub enum ConfigError {
	/// The block is not valid JSON for the expected shape.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// A value is out of range.
	#[error("Configuration error: {0}")]
	Invalid(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let errors = vec![
			(
				GraphError::DanglingLink {
					source_id: "a".into(),
					target_id: "z".into(),
					missing: "z".into(),
				}
				.to_string(),
				"link a -> z references unknown node z",
			),
			(
				GraphError::DuplicateNode("a".into()).to_string(),
				"duplicate node id a",
			),
			(
				AnalysisError::InvalidUrl("nope".into()).to_string(),
				"Invalid GitHub URL: nope",
			),
			(
				AnalysisError::Service {
					status: 400,
					message: "Failed to fetch repo: 404".into(),
				}
				.to_string(),
				"Service error (400): Failed to fetch repo: 404",
			),
			(
				ConfigError::Invalid("viewport width must be positive".into()).to_string(),
				"Configuration error: viewport width must be positive",
			),
		];

		for (actual, expected) in errors {
			assert_eq!(actual, expected);
		}
	}

	#[test]
	fn test_malformed_wraps_graph_error() {
		let error: AnalysisError = GraphError::DuplicateNode("a".into()).into();
		assert!(matches!(error, AnalysisError::Malformed(_)));
		assert!(error.to_string().starts_with("Analysis returned malformed data"));
	}

	#[test]
	fn test_undecodable_body_is_malformed() {
		let result: Result<serde_json::Value, _> = serde_json::from_str("<html>");
		let error: AnalysisError = result.unwrap_err().into();
		assert!(matches!(error, AnalysisError::Decode(_)));
		assert!(error.to_string().starts_with("Analysis returned malformed data"));
	}

	#[test]
	fn test_from_serde_json_error() {
		let result: Result<serde_json::Value, _> = serde_json::from_str("not json");
		let error: ConfigError = result.unwrap_err().into();
		assert!(matches!(error, ConfigError::Serialization(_)));
	}
}
