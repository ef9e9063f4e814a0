//! Analysis data contract

use serde::{Deserialize, Serialize};

/// The two texts submitted for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description_text: String,
}

impl AnalysisRequest {
    pub fn new(resume_text: impl Into<String>, job_description_text: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description_text: job_description_text.into(),
        }
    }
}

/// Structured result returned by the model.
///
/// Field names follow the camelCase wire schema. Every field except
/// `linkedin` is required; a missing one is a format error, never a
/// partially populated result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Intended range 0-100. Trusted as returned.
    pub score: i64,
    pub missing_keywords: Vec<String>,
    pub match_analysis: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<LinkedInOptimization>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInOptimization {
    pub suggested_headline: String,
    pub suggested_about: String,
    pub top_skills_to_add: Vec<String>,
}

impl AnalysisResult {
    /// Score clamped to 0-100 for display.
    pub fn display_score(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }
}
