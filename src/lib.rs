//! resume-ats library

pub mod analysis;
pub mod cli;
pub mod config;
pub mod consistency;
pub mod controller;
pub mod error;
pub mod input;
pub mod output;
pub mod session;

pub use analysis::{AnalysisClient, AnalysisResult, Analyzer};
pub use config::Config;
pub use controller::{AdmissionPolicy, AnalysisController, AnalysisState};
pub use error::{Result, ResumeAtsError};
