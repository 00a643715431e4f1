//! Property tests for prompt part assembly ordering.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use ragkit_core::{
    ImageSource, Llm, MultiModalSynthesizer, Node, NodeWithScore, Prediction, PromptPart,
    Synthesizer,
};

/// Records prompts and answers with a fixed string.
struct RecordingLlm {
    calls: Mutex<Vec<Vec<PromptPart>>>,
}

#[async_trait]
impl Llm for RecordingLlm {
    fn name(&self) -> &str {
        "recording"
    }

    async fn predict(&self, parts: &[PromptPart]) -> ragkit_core::Result<Prediction> {
        self.calls.lock().unwrap().push(parts.to_vec());
        Ok(Prediction { text: "ok".into() })
    }
}

/// *For any* interleaving of N text nodes and M image nodes, the assembled
/// prompt SHALL contain exactly 1 + M parts, with the text part first and
/// the image parts in the same relative order as the input image nodes.
mod prop_part_assembly_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn one_text_part_then_images_in_input_order(kinds in proptest::collection::vec(any::<bool>(), 0..24)) {
            let rt = tokio::runtime::Runtime::new().unwrap();

            // Tag each image node's payload with its position so the data
            // URL reveals input order.
            let nodes: Vec<NodeWithScore> = kinds
                .iter()
                .enumerate()
                .map(|(i, &is_image)| {
                    let node = if is_image {
                        Node::image(ImageSource::Bytes {
                            data: vec![i as u8],
                            mime_type: "image/png".into(),
                        })
                    } else {
                        Node::text(format!("chunk {i}"))
                    };
                    NodeWithScore::new(node, 1.0)
                })
                .collect();
            let image_count = kinds.iter().filter(|&&k| k).count();

            let parts = rt.block_on(async {
                let llm = Arc::new(RecordingLlm { calls: Mutex::new(Vec::new()) });
                let synthesizer = MultiModalSynthesizer::new(llm.clone());
                synthesizer.synthesize("q", &nodes, false).await.unwrap();
                let calls = llm.calls.lock().unwrap();
                calls[0].clone()
            });

            prop_assert_eq!(parts.len(), 1 + image_count);
            let first_is_text = matches!(parts[0], PromptPart::Text { .. });
            prop_assert!(first_is_text);

            let expected: Vec<String> = rt.block_on(async {
                let mut urls = Vec::new();
                for (i, &is_image) in kinds.iter().enumerate() {
                    if is_image {
                        let source = ImageSource::Bytes {
                            data: vec![i as u8],
                            mime_type: "image/png".into(),
                        };
                        urls.push(ragkit_core::to_data_url(&source).await.unwrap());
                    }
                }
                urls
            });
            let actual: Vec<String> = parts[1..]
                .iter()
                .map(|p| match p {
                    PromptPart::ImageUrl { url } => url.clone(),
                    PromptPart::Text { .. } => panic!("text part after position 0"),
                })
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
