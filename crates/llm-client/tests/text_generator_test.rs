//! Integration tests for [`llm_client::TextGenerator`] with a scripted backend.
//!
//! Covers: the success path, each failure kind (backend error, missing/empty candidates,
//! safety block, missing content/text), non-STOP finish reasons, alias fallback, and the
//! request payload (system instruction, role mapping, prompt as final user turn).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use conversation_store::TranscriptEntry;
use gemini_client::{
    Candidate, Content, FinishReason, GeminiError, GenerateContentRequest,
    GenerateContentResponse, Part, PromptFeedback,
};
use llm_client::{GenerationBackend, GenerationError, ModelCatalog, TextGenerator};

type Scripted = Box<dyn Fn() -> Result<GenerateContentResponse, GeminiError> + Send + Sync>;

/// Backend returning a scripted result and recording (model, request) of every call.
struct ScriptedBackend {
    respond: Scripted,
    calls: Mutex<Vec<(String, GenerateContentRequest)>>,
}

impl ScriptedBackend {
    fn new(
        respond: impl Fn() -> Result<GenerateContentResponse, GeminiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));
        (self.respond)()
    }
}

fn candidate(text: Option<&str>, finish_reason: Option<FinishReason>) -> Candidate {
    Candidate {
        content: Some(Content {
            role: Some("model".to_string()),
            parts: vec![Part {
                text: text.map(str::to_string),
            }],
        }),
        finish_reason,
        index: Some(0),
    }
}

fn response(candidates: Option<Vec<Candidate>>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates,
        ..Default::default()
    }
}

fn generator(backend: Arc<ScriptedBackend>) -> TextGenerator {
    TextGenerator::new(backend, ModelCatalog::default())
        .with_system_instruction(Some("Você é a Miku.".to_string()))
}

/// **Test: A well-formed single candidate yields success with model and alias.**
#[tokio::test]
async fn test_well_formed_response_succeeds() {
    let backend = ScriptedBackend::new(|| {
        Ok(response(Some(vec![candidate(Some("Olá!"), Some(FinishReason::Stop))])))
    });

    let reply = generator(backend.clone())
        .generate_response("oi", &[], "flash")
        .await
        .unwrap();

    assert_eq!(reply.text, "Olá!");
    assert_eq!(reply.model, "gemini-2.5-flash");
    assert_eq!(reply.alias, "flash");
    assert_eq!(reply.finish_reason, Some(FinishReason::Stop));
    assert_eq!(backend.calls.lock().unwrap()[0].0, "gemini-2.5-flash");
}

async fn failure(
    respond: impl Fn() -> Result<GenerateContentResponse, GeminiError> + Send + Sync + 'static,
) -> GenerationError {
    generator(ScriptedBackend::new(respond))
        .generate_response("oi", &[], "lite")
        .await
        .unwrap_err()
}

/// **Test: Every failure path returns Err, never panics.**
///
/// **Setup:** One scripted backend per case: backend timeout, HTTP error, missing candidates,
/// prompt blocked, empty candidates, SAFETY and PROHIBITED_CONTENT finish reasons, candidate
/// without content, first part without text, blank text.
/// **Expected:** Each call returns the matching `GenerationError` variant.
#[tokio::test]
async fn test_failures_are_returned_not_raised() {
    let err = failure(|| Err(GeminiError::Timeout)).await;
    assert!(matches!(err, GenerationError::Backend(GeminiError::Timeout)));

    let err = failure(|| {
        Err(GeminiError::Status {
            status: 500,
            body: "boom".to_string(),
        })
    })
    .await;
    assert!(matches!(err, GenerationError::Backend(GeminiError::Status { status: 500, .. })));

    let err = failure(|| Ok(response(None))).await;
    assert!(matches!(err, GenerationError::MissingCandidates));

    let err = failure(|| {
        Ok(GenerateContentResponse {
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".to_string()),
            }),
            ..Default::default()
        })
    })
    .await;
    assert!(matches!(err, GenerationError::PromptBlocked(_)));
    assert!(err.is_safety_block());

    let err = failure(|| Ok(response(Some(vec![])))).await;
    assert!(matches!(err, GenerationError::NoCandidates));

    let err =
        failure(|| Ok(response(Some(vec![candidate(Some("x"), Some(FinishReason::Safety))])))).await;
    assert!(matches!(err, GenerationError::SafetyBlocked(FinishReason::Safety)));

    let err = failure(|| {
        Ok(response(Some(vec![candidate(
            Some("x"),
            Some(FinishReason::ProhibitedContent),
        )])))
    })
    .await;
    assert!(err.is_safety_block());

    let err = failure(|| {
        Ok(response(Some(vec![Candidate {
            content: None,
            finish_reason: Some(FinishReason::Stop),
            index: None,
        }])))
    })
    .await;
    assert!(matches!(err, GenerationError::MissingContent));

    let err = failure(|| Ok(response(Some(vec![candidate(None, Some(FinishReason::Stop))])))).await;
    assert!(matches!(err, GenerationError::MissingText));

    let err =
        failure(|| Ok(response(Some(vec![candidate(Some("  "), Some(FinishReason::Stop))])))).await;
    assert!(matches!(err, GenerationError::MissingText));
}

/// **Test: A non-STOP, non-safety finish reason is still a success when text is present.**
#[tokio::test]
async fn test_max_tokens_with_text_is_success() {
    let backend = ScriptedBackend::new(|| {
        Ok(response(Some(vec![candidate(
            Some("resposta cortada"),
            Some(FinishReason::MaxTokens),
        )])))
    });

    let reply = generator(backend)
        .generate_response("oi", &[], "lite")
        .await
        .unwrap();

    assert_eq!(reply.text, "resposta cortada");
    assert_eq!(reply.finish_reason, Some(FinishReason::MaxTokens));
}

/// **Test: An unrecognised alias dispatches to the default alias's model.**
#[tokio::test]
async fn test_unknown_alias_uses_default_model() {
    let backend = ScriptedBackend::new(|| {
        Ok(response(Some(vec![candidate(Some("ok"), Some(FinishReason::Stop))])))
    });
    let gen = generator(backend.clone());

    let reply = gen.generate_response("oi", &[], "nonexistent").await.unwrap();
    gen.generate_response("oi", &[], "lite").await.unwrap();

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls[0].0, calls[1].0);
    assert_eq!(reply.model, "gemini-2.5-flash-lite");
    assert_eq!(reply.alias, "nonexistent");
}

/// **Test: Payload is system instruction, history with assistant→model, then the prompt.**
#[tokio::test]
async fn test_request_payload_shape() {
    let backend = ScriptedBackend::new(|| {
        Ok(response(Some(vec![candidate(Some("ok"), Some(FinishReason::Stop))])))
    });
    let history = vec![
        TranscriptEntry::user("oi"),
        TranscriptEntry::assistant("olá"),
    ];

    generator(backend.clone())
        .generate_response("tudo bem?", &history, "pro")
        .await
        .unwrap();

    let calls = backend.calls.lock().unwrap();
    let request = &calls[0].1;
    assert_eq!(
        request.system_instruction,
        Some(Content::instruction("Você é a Miku."))
    );
    assert_eq!(
        request.contents,
        vec![
            Content::text("user", "oi"),
            Content::text("model", "olá"),
            Content::text("user", "tudo bem?"),
        ]
    );
    assert_eq!(request.safety_settings.len(), 4);
}
