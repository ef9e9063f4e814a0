//! Report model wrapping one analysis result with its metadata

use crate::analysis::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub verdict: String,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub model: String,
    pub resume_source: String,
    pub job_source: String,
    pub tool_version: String,
}

/// Colour band of a score, matching the gauge thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            ScoreBand::Strong
        } else if score > 40 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG MATCH",
            ScoreBand::Moderate => "PARTIAL MATCH",
            ScoreBand::Weak => "WEAK MATCH",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "score-strong",
            ScoreBand::Moderate => "score-moderate",
            ScoreBand::Weak => "score-weak",
        }
    }
}

impl AnalysisReport {
    pub fn new(
        result: AnalysisResult,
        model: &str,
        resume_source: &str,
        job_source: &str,
        processing_time_ms: u64,
    ) -> Self {
        let verdict = Self::verdict_for(result.display_score()).to_string();
        Self {
            result,
            verdict,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms,
                model: model.to_string(),
                resume_source: resume_source.to_string(),
                job_source: job_source.to_string(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.result.display_score())
    }

    fn verdict_for(score: u8) -> &'static str {
        match ScoreBand::from_score(score) {
            ScoreBand::Strong => "Your resume is well aligned with this position.",
            ScoreBand::Moderate => "Your resume covers part of the requirements; close the gaps below.",
            ScoreBand::Weak => "Your resume is unlikely to pass an ATS screen for this position yet.",
        }
    }
}
