//! Core content model and response synthesis for RagKit.
//!
//! This crate provides:
//! - Documents, retrieved nodes (text or image), and scored node wrappers
//! - Prompt templates with `{context}` / `{query}` substitution
//! - The [`Llm`] prediction seam and multi-part prompt types
//! - Inline image encoding and the [`MultiModalSynthesizer`]

pub mod error;
pub mod image;
pub mod llm;
pub mod node;
pub mod prompt;
pub mod synthesizer;

pub use error::{CoreError, Result};
pub use image::to_data_url;
pub use llm::{Llm, Prediction, PromptPart};
pub use node::{
    Document, ImageSource, MetadataMode, Node, NodeContent, NodeWithScore, split_nodes_by_kind,
};
pub use prompt::{
    ChatMessage, DEFAULT_TEXT_QA_TEMPLATE, MessageRole, PromptOutput, PromptTemplate,
};
pub use synthesizer::{MultiModalSynthesizer, SynthesizedResponse, Synthesizer};
