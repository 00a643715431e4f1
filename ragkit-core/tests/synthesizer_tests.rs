//! Behavioral tests for multi-modal synthesis against a scripted model.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ragkit_core::{
    ChatMessage, CoreError, ImageSource, Llm, MessageRole, MultiModalSynthesizer, Node,
    NodeWithScore, Prediction, PromptPart, PromptTemplate, Synthesizer,
};

/// A scripted model backend that records every prompt it receives.
struct ScriptedLlm {
    reply: String,
    fail: bool,
    calls: Mutex<Vec<Vec<PromptPart>>>,
}

impl ScriptedLlm {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), fail: false, calls: Mutex::new(Vec::new()) })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self { reply: String::new(), fail: true, calls: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> Vec<Vec<PromptPart>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Llm for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn predict(&self, parts: &[PromptPart]) -> ragkit_core::Result<Prediction> {
        self.calls.lock().unwrap().push(parts.to_vec());
        if self.fail {
            return Err(CoreError::Prediction {
                provider: "scripted".into(),
                message: "scripted failure".into(),
            });
        }
        Ok(Prediction { text: self.reply.clone() })
    }
}

fn image_bytes(tag: u8) -> ImageSource {
    ImageSource::Bytes { data: vec![tag], mime_type: "image/png".into() }
}

fn mixed_nodes() -> Vec<NodeWithScore> {
    vec![
        NodeWithScore::new(Node::text("alpha"), 0.9),
        NodeWithScore::new(Node::image(image_bytes(1)), 0.8),
        NodeWithScore::new(Node::text("beta"), 0.7),
        NodeWithScore::new(Node::image(image_bytes(2)), 0.6),
    ]
}

#[tokio::test]
async fn assembles_text_part_first_then_images_in_input_order() {
    let llm = ScriptedLlm::new("the answer");
    let synthesizer = MultiModalSynthesizer::new(llm.clone());
    let nodes = mixed_nodes();

    let response = synthesizer.synthesize("what?", &nodes, false).await.unwrap();
    assert_eq!(response.text, "the answer");

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    let parts = &calls[0];
    assert_eq!(parts.len(), 3, "one text part plus one part per image node");

    let PromptPart::Text { text } = &parts[0] else {
        panic!("first part must be text");
    };
    assert!(text.contains("alpha\n\nbeta"), "text chunks joined with a blank line");
    assert!(text.contains("what?"));

    let expected_first = ragkit_core::to_data_url(&image_bytes(1)).await.unwrap();
    let expected_second = ragkit_core::to_data_url(&image_bytes(2)).await.unwrap();
    assert_eq!(parts[1], PromptPart::ImageUrl { url: expected_first });
    assert_eq!(parts[2], PromptPart::ImageUrl { url: expected_second });
}

#[tokio::test]
async fn source_nodes_round_trip_unchanged() {
    let llm = ScriptedLlm::new("ok");
    let synthesizer = MultiModalSynthesizer::new(llm.clone());
    let nodes = mixed_nodes();

    let response = synthesizer.synthesize("q", &nodes, false).await.unwrap();
    assert_eq!(response.source_nodes, nodes, "partitioning must not reorder or drop nodes");
}

#[tokio::test]
async fn streaming_is_not_implemented_and_never_predicts() {
    let llm = ScriptedLlm::new("unused");
    let synthesizer = MultiModalSynthesizer::new(llm.clone());

    let err = synthesizer.synthesize("q", &mixed_nodes(), true).await.unwrap_err();
    assert!(matches!(err, CoreError::NotImplemented(_)));
    assert!(llm.calls().is_empty(), "streaming must fail before any remote call");
}

#[tokio::test]
async fn chat_template_fails_before_any_remote_call() {
    let llm = ScriptedLlm::new("unused");
    let template = PromptTemplate::Chat(vec![ChatMessage {
        role: MessageRole::User,
        content: "{context} {query}".into(),
    }]);
    let synthesizer = MultiModalSynthesizer::new(llm.clone()).with_text_qa_template(template);

    let err = synthesizer.synthesize("q", &mixed_nodes(), false).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidPromptShape(_)));
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn prediction_failure_propagates_unmodified() {
    let llm = ScriptedLlm::failing();
    let synthesizer = MultiModalSynthesizer::new(llm.clone());

    let err = synthesizer.synthesize("q", &mixed_nodes(), false).await.unwrap_err();
    assert!(matches!(err, CoreError::Prediction { .. }));
}

#[tokio::test]
async fn update_template_replaces_only_when_supplied() {
    let llm = ScriptedLlm::new("ok");
    let mut synthesizer = MultiModalSynthesizer::new(llm);
    let original = synthesizer.text_qa_template().clone();

    synthesizer.update_text_qa_template(None);
    assert_eq!(synthesizer.text_qa_template(), &original, "None must be a no-op");

    let custom = PromptTemplate::Text("{query} only".into());
    synthesizer.update_text_qa_template(Some(custom.clone()));
    assert_eq!(synthesizer.text_qa_template(), &custom);
}
