//! Top-level pages.

pub mod analyzer;

pub use analyzer::AnalyzerPage;
