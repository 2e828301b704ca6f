//! Label-based node classification used for colors and tooltip text.
//!
//! Classification is a presentation heuristic derived purely from the label:
//! a case-insensitive "repo" substring wins over a file extension, and
//! anything else is treated as a function or class.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source-file extensions recognized when no override is configured.
pub const DEFAULT_FILE_EXTENSIONS: [&str; 4] = [".js", ".html", ".css", ".py"];

/// Presentation bucket of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// Label mentions a repository.
	Repository,
	/// Label ends in a known source extension.
	File,
	/// Anything else: a function or class.
	FunctionClass,
}

impl NodeKind {
	/// Human-readable name, as shown in tooltips and the modal.
	pub fn name(self) -> &'static str {
		match self {
			NodeKind::Repository => "Repository",
			NodeKind::File => "File",
			NodeKind::FunctionClass => "Function/Class",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Classifies labels against a configurable set of file extensions.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Classifier {
	extensions: Vec<String>,
}

impl Default for Classifier {
	fn default() -> Self {
		Self::new(DEFAULT_FILE_EXTENSIONS)
	}
}

impl Classifier {
	/// Extensions are matched case-insensitively; a missing leading dot is added.
	pub fn new<I, S>(extensions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let extensions = extensions
			.into_iter()
			.map(|ext| {
				let ext = ext.as_ref().to_lowercase();
				if ext.starts_with('.') {
					ext
				} else {
					format!(".{ext}")
				}
			})
			.collect();
		Self { extensions }
	}

	/// Normalised extensions, lowercase with a leading dot.
	pub fn extensions(&self) -> &[String] {
		&self.extensions
	}

	/// Repository before File before Function/Class, case-insensitive.
	pub fn classify(&self, label: &str) -> NodeKind {
		let label = label.to_lowercase();
		if label.contains("repo") {
			NodeKind::Repository
		} else if self
			.extensions
			.iter()
			.any(|ext| label.ends_with(ext.as_str()))
		{
			NodeKind::File
		} else {
			NodeKind::FunctionClass
		}
	}
}

impl From<Vec<String>> for Classifier {
	fn from(extensions: Vec<String>) -> Self {
		Self::new(extensions)
	}
}

impl From<Classifier> for Vec<String> {
	fn from(classifier: Classifier) -> Self {
		classifier.extensions
	}
}

/// Classify with the default extension set.
pub fn classify(label: &str) -> NodeKind {
	Classifier::default().classify(label)
}
