//! Analysis request client
//!
//! One request per call: resolve the credential, build the prompt and the
//! declared schema, await a single response under a timeout, and parse the
//! structured payload. No retries and no caching happen at this layer.

use crate::analysis::gemini::{
    Content, GenerateContentRequest, GenerationConfig, HttpTransport, Transport,
};
use crate::analysis::prompts::{response_schema, PromptTemplates};
use crate::analysis::types::{AnalysisRequest, AnalysisResult};
use crate::config::ProviderConfig;
use crate::error::{Result, ResumeAtsError};
use log::{debug, error, info};
use std::time::{Duration, Instant};

/// Anything that turns a résumé and a job description into a result.
pub trait Analyzer {
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl std::future::Future<Output = Result<AnalysisResult>> + Send;
}

pub struct AnalysisClient<T = HttpTransport> {
    transport: T,
    provider: ProviderConfig,
    prompts: PromptTemplates,
}

impl AnalysisClient<HttpTransport> {
    pub fn from_config(provider: &ProviderConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(provider)?, provider.clone()))
    }
}

impl<T: Transport> AnalysisClient<T> {
    pub fn with_transport(transport: T, provider: ProviderConfig) -> Self {
        Self {
            transport,
            provider,
            prompts: PromptTemplates::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.provider.model
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request(&self, request: &AnalysisRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::text(None, self.prompts.system_instruction.clone()),
            contents: vec![Content::text(
                Some("user"),
                self.prompts
                    .render_user_content(&request.resume_text, &request.job_description_text),
            )],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

impl<T: Transport + Sync> Analyzer for AnalysisClient<T> {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let api_key = self.provider.resolve_api_key()?;

        let body = self.build_request(request);
        let timeout_secs = self.provider.timeout_secs;
        let start = Instant::now();

        info!("Requesting analysis from {}", self.provider.model);
        let response = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.transport.generate(&api_key, &self.provider.model, &body),
        )
        .await
        .map_err(|_| {
            error!("Analysis request exceeded {}s", timeout_secs);
            ResumeAtsError::Timeout(timeout_secs)
        })??;
        debug!("Provider answered in {}ms", start.elapsed().as_millis());

        let text = response.text().ok_or(ResumeAtsError::EmptyResponse)?;
        parse_result(&text)
    }
}

/// Parse the model's text payload into a complete result.
///
/// A surrounding Markdown code fence is tolerated; anything else that is not
/// the declared shape is a format error.
pub fn parse_result(text: &str) -> Result<AnalysisResult> {
    let payload = strip_code_fence(text.trim());
    serde_json::from_str(payload).map_err(|e| {
        error!("Failed to parse analysis payload: {}", e);
        debug!("Raw analysis payload: {}", text);
        ResumeAtsError::Format(e.to_string())
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::gemini::GenerateContentResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const RESUME: &str = "Jane Doe. Rust engineer, eight years building distributed storage systems.";
    const JOB: &str = "We are hiring a backend engineer with Python and Kubernetes experience.";

    struct RecordingTransport {
        reply: Option<String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        last_key: Mutex<Option<String>>,
    }

    impl RecordingTransport {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                delay: None,
                calls: AtomicUsize::new(0),
                last_key: Mutex::new(None),
            }
        }

        fn silent() -> Self {
            Self { reply: None, ..Self::replying("") }
        }
    }

    impl Transport for RecordingTransport {
        async fn generate(
            &self,
            api_key: &str,
            _model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_key.lock().unwrap() = Some(api_key.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(match &self.reply {
                Some(text) => GenerateContentResponse::from_text(text.clone()),
                None => GenerateContentResponse::default(),
            })
        }
    }

    fn provider_with_key() -> ProviderConfig {
        ProviderConfig {
            api_key_env: "RESUME_ATS_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            api_key: Some("test-key".to_string()),
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_successful_analysis() {
        let transport = RecordingTransport::replying(
            r#"{"score":77,"missingKeywords":["Python","Kubernetes"],"matchAnalysis":"Strong systems background.",
                "recommendation":"Mention scripting work.","linkedin":{"suggestedHeadline":"Backend Engineer | Rust",
                "suggestedAbout":"Engineer building reliable services.","topSkillsToAdd":["Python","Kubernetes"]}}"#,
        );
        let client = AnalysisClient::with_transport(transport, provider_with_key());

        let result = client.analyze(&AnalysisRequest::new(RESUME, JOB)).await.unwrap();
        assert_eq!(result.score, 77);
        assert_eq!(result.missing_keywords, vec!["Python", "Kubernetes"]);
        assert_eq!(
            result.linkedin.unwrap().suggested_headline,
            "Backend Engineer | Rust"
        );
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            client.transport().last_key.lock().unwrap().as_deref(),
            Some("test-key")
        );
    }

    #[tokio::test]
    async fn test_empty_response() {
        let client = AnalysisClient::with_transport(RecordingTransport::silent(), provider_with_key());
        let err = client.analyze(&AnalysisRequest::new(RESUME, JOB)).await.unwrap_err();
        assert!(matches!(err, ResumeAtsError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_json_is_format_error() {
        let client = AnalysisClient::with_transport(
            RecordingTransport::replying("Sure! The candidate looks great."),
            provider_with_key(),
        );
        let err = client.analyze(&AnalysisRequest::new(RESUME, JOB)).await.unwrap_err();
        assert!(matches!(err, ResumeAtsError::Format(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let mut transport = RecordingTransport::replying(
            r#"{"score":1,"missingKeywords":[],"matchAnalysis":"","recommendation":""}"#,
        );
        transport.delay = Some(Duration::from_secs(120));
        let provider = ProviderConfig {
            timeout_secs: 5,
            ..provider_with_key()
        };
        let client = AnalysisClient::with_transport(transport, provider);

        let err = client.analyze(&AnalysisRequest::new(RESUME, JOB)).await.unwrap_err();
        assert!(matches!(err, ResumeAtsError::Timeout(5)));
    }

    #[test]
    fn test_request_carries_schema_and_texts() {
        let client = AnalysisClient::with_transport(RecordingTransport::silent(), provider_with_key());
        let request = client.build_request(&AnalysisRequest::new(RESUME, JOB));

        assert_eq!(request.generation_config.response_mime_type, "application/json");
        assert_eq!(request.generation_config.response_schema, response_schema());
        assert!(request.system_instruction.parts[0].text.contains("LinkedIn"));
        let user = &request.contents[0].parts[0].text;
        assert!(user.contains(RESUME));
        assert!(user.contains(JOB));
    }

    #[test]
    fn test_code_fence_is_tolerated() {
        let fenced = "```json\n{\"score\":5,\"missingKeywords\":[],\"matchAnalysis\":\"a\",\"recommendation\":\"b\"}\n```";
        assert_eq!(parse_result(fenced).unwrap().score, 5);
    }

    #[test]
    fn test_partial_payload_is_rejected() {
        let err = parse_result(r#"{"score":5,"missingKeywords":[]}"#).unwrap_err();
        assert!(matches!(err, ResumeAtsError::Format(_)));
    }
}
