//! Report rendering: console dashboard, JSON, Markdown and HTML

pub mod report;
pub mod formatter;

pub use formatter::{ConsoleFormatter, OutputFormatter, ReportGenerator};
pub use report::AnalysisReport;
