//! Fixed prompt and response schema for the compatibility analysis

use serde_json::{json, Value};

pub const SYSTEM_INSTRUCTION: &str = "You are an applicant tracking system (ATS) evaluator and a \
LinkedIn profile optimization specialist. Compare the resume with the job description and give a \
realistic compatibility score. Beyond the compatibility analysis, produce LinkedIn suggestions \
that increase the candidate's visibility for this specific position. Answer only with JSON that \
matches the provided schema.";

const USER_CONTENT_TEMPLATE: &str = r#"Act as an ATS screening system and personal branding expert.
Compare the resume with the job description and suggest LinkedIn optimizations.

JOB DESCRIPTION:
{job}

RESUME:
{resume}"#;

/// Prompt template used for every analysis request
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system_instruction: String,
    pub user_content: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_content: USER_CONTENT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Embed both texts verbatim.
    pub fn render_user_content(&self, resume_text: &str, job_description_text: &str) -> String {
        // Split on the resume slot first so a literal "{resume}" in the job text stays as is.
        let (before, after) = self
            .user_content
            .split_once("{resume}")
            .unwrap_or((self.user_content.as_str(), ""));
        format!(
            "{}{}{}",
            before.replace("{job}", job_description_text),
            resume_text,
            after.replace("{job}", job_description_text)
        )
    }
}

/// Output schema in the provider's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "INTEGER",
                "description": "Candidate fit for the position from 0 to 100"
            },
            "missingKeywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Technical keywords present in the job description but NOT in the resume"
            },
            "matchAnalysis": {
                "type": "STRING",
                "description": "Short analysis of the compatibility"
            },
            "recommendation": {
                "type": "STRING",
                "description": "Two-sentence summary with improvement advice"
            },
            "linkedin": {
                "type": "OBJECT",
                "properties": {
                    "suggestedHeadline": {
                        "type": "STRING",
                        "description": "LinkedIn headline optimized with keywords from the job description"
                    },
                    "suggestedAbout": {
                        "type": "STRING",
                        "description": "Suggested text for the LinkedIn About section"
                    },
                    "topSkillsToAdd": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "The five most important skills to list on LinkedIn"
                    }
                },
                "required": ["suggestedHeadline", "suggestedAbout", "topSkillsToAdd"]
            }
        },
        "required": ["score", "missingKeywords", "matchAnalysis", "recommendation", "linkedin"]
    })
}
