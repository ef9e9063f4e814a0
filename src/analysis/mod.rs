//! Model-backed compatibility analysis

pub mod types;
pub mod prompts;
pub mod gemini;
pub mod client;

pub use client::{AnalysisClient, Analyzer};
pub use types::{AnalysisRequest, AnalysisResult, LinkedInOptimization};
