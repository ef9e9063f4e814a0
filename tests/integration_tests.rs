//! Integration tests for resume-ats

use resume_ats::analysis::gemini::{GenerateContentRequest, GenerateContentResponse, Transport};
use resume_ats::analysis::AnalysisClient;
use resume_ats::config::ProviderConfig;
use resume_ats::controller::{AdmissionPolicy, AnalysisController, AnalysisState};
use resume_ats::error::{Result, ResumeAtsError, GENERIC_FORMAT_FAILURE};
use resume_ats::input::text_extractor::extract_with_mime;
use resume_ats::input::InputManager;
use resume_ats::output::formatter::parse_output_format;
use resume_ats::output::{AnalysisReport, ReportGenerator};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const UNSET_KEY_ENV: &str = "RESUME_ATS_TEST_KEY_THAT_IS_NEVER_SET";

#[derive(Clone)]
struct CannedTransport {
    body: String,
    calls: Arc<AtomicUsize>,
}

impl CannedTransport {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for CannedTransport {
    async fn generate(
        &self,
        _api_key: &str,
        _model: &str,
        _request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GenerateContentResponse::from_text(self.body.clone()))
    }
}

fn provider_with_key() -> ProviderConfig {
    ProviderConfig {
        api_key_env: UNSET_KEY_ENV.to_string(),
        api_key: Some("test-key".to_string()),
        ..ProviderConfig::default()
    }
}

async fn fixture_texts() -> (String, String) {
    let mut manager = InputManager::new();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    let job = manager
        .extract_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();
    (resume, job)
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Senior Software Engineer"));
    assert!(text.contains("Kafka"));
}

#[tokio::test]
async fn test_pdf_pages_and_runs() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/three_pages.pdf");

    let text = manager.extract_text(path).await.unwrap();
    assert_eq!(
        text,
        "Jane Doe Rust Engineer\nExperience Acme Corp\nSkills Python and Go"
    );
}

#[tokio::test]
async fn test_pdf_by_mime() {
    let bytes = std::fs::read("tests/fixtures/three_pages.pdf").unwrap();
    let text = extract_with_mime(&bytes, "application/pdf").await.unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("Jane Doe"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(ResumeAtsError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_end_to_end_analysis() {
    let (resume, job) = fixture_texts().await;
    let transport = CannedTransport::new(
        r#"{"score":42,"missingKeywords":["Python"],"matchAnalysis":"Solid backend overlap.","recommendation":"Highlight any Python work."}"#,
    );
    let client = AnalysisClient::with_transport(transport.clone(), provider_with_key());
    let controller = AnalysisController::new(client, AdmissionPolicy::default());

    assert!(controller.can_submit(&resume, &job));
    let state = controller.submit(&resume, &job).await.unwrap();

    let result = state.result().unwrap();
    assert_eq!(result.score, 42);
    assert!(result.missing_keywords.contains(&"Python".to_string()));
    assert_eq!(transport.calls(), 1);

    let report = AnalysisReport::new(
        result.clone(),
        "gemini-2.5-flash",
        "sample_resume.txt",
        "sample_job.txt",
        12,
    );
    let generator = ReportGenerator::with_options(false, true);
    let format = parse_output_format("json").unwrap();
    let json = generator.generate_report(&report, &format).unwrap();
    assert!(json.contains("\"score\": 42"));

    controller.reset();
    assert_eq!(controller.state(), AnalysisState::Idle);
}

#[tokio::test]
async fn test_missing_credential_makes_no_request() {
    if std::env::var("API_KEY").is_ok() {
        return;
    }
    let (resume, job) = fixture_texts().await;
    let transport = CannedTransport::new("{}");
    let provider = ProviderConfig {
        api_key_env: UNSET_KEY_ENV.to_string(),
        api_key: None,
        ..ProviderConfig::default()
    };
    let client = AnalysisClient::with_transport(transport.clone(), provider);
    let controller = AnalysisController::new(client, AdmissionPolicy::default());

    let state = controller.submit(&resume, &job).await.unwrap();
    let message = state.error().unwrap();
    assert!(message.contains(UNSET_KEY_ENV));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_non_json_answer_fails() {
    let (resume, job) = fixture_texts().await;
    let transport = CannedTransport::new("I am sorry, I cannot help with that.");
    let client = AnalysisClient::with_transport(transport, provider_with_key());
    let controller = AnalysisController::new(client, AdmissionPolicy::default());

    let state = controller.submit(&resume, &job).await.unwrap();
    assert_eq!(state.error(), Some(GENERIC_FORMAT_FAILURE));
    assert!(controller.can_submit(&resume, &job));
}

#[tokio::test]
async fn test_short_text_is_not_admitted() {
    let (resume, _) = fixture_texts().await;
    let transport = CannedTransport::new("{}");
    let client = AnalysisClient::with_transport(transport.clone(), provider_with_key());
    let controller = AnalysisController::new(client, AdmissionPolicy::default());

    assert!(!controller.can_submit(&resume, "Python dev"));
    assert!(controller.submit(&resume, "Python dev").await.is_err());
    assert_eq!(controller.state(), AnalysisState::Idle);
    assert_eq!(transport.calls(), 0);
}
