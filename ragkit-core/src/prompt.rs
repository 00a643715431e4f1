//! Prompt templates with `{context}` / `{query}` placeholders.

use serde::{Deserialize, Serialize};

/// The default text question-answering template.
pub const DEFAULT_TEXT_QA_TEMPLATE: &str = "Context information is below.\n\
---------------------\n\
{context}\n\
---------------------\n\
Given the context information and not prior knowledge, answer the query.\n\
Query: {query}\n\
Answer:";

/// The role of a chat message in a chat-style template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// System instructions.
    System,
    /// User-authored content.
    User,
}

/// A single message in a chat-style prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: MessageRole,
    /// The message content, after placeholder substitution.
    pub content: String,
}

/// A prompt template that substitutes `{context}` and `{query}`.
///
/// Templates come in two shapes: a flat text template that formats to a
/// single string, and a chat-style template that formats to a message list.
/// Consumers that require a flat string must reject the chat shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PromptTemplate {
    /// A single-string template.
    Text(String),
    /// A chat-style template: each message content is substituted
    /// independently.
    Chat(Vec<ChatMessage>),
}

/// The result of formatting a [`PromptTemplate`].
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutput {
    /// A flat string prompt.
    Text(String),
    /// A chat-style message list.
    Messages(Vec<ChatMessage>),
}

impl PromptTemplate {
    /// The default text question-answering template.
    pub fn default_text_qa() -> Self {
        Self::Text(DEFAULT_TEXT_QA_TEMPLATE.to_string())
    }

    /// Substitute `{context}` and `{query}` into the template.
    pub fn format(&self, context: &str, query: &str) -> PromptOutput {
        match self {
            Self::Text(template) => PromptOutput::Text(substitute(template, context, query)),
            Self::Chat(messages) => PromptOutput::Messages(
                messages
                    .iter()
                    .map(|m| ChatMessage {
                        role: m.role,
                        content: substitute(&m.content, context, query),
                    })
                    .collect(),
            ),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::default_text_qa()
    }
}

fn substitute(template: &str, context: &str, query: &str) -> String {
    template.replace("{context}", context).replace("{query}", query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_template_substitutes_placeholders() {
        let template = PromptTemplate::Text("ctx={context} q={query}".into());
        let PromptOutput::Text(prompt) = template.format("C", "Q") else {
            panic!("expected flat text output");
        };
        assert_eq!(prompt, "ctx=C q=Q");
    }

    #[test]
    fn default_template_mentions_context_and_query() {
        let PromptOutput::Text(prompt) = PromptTemplate::default_text_qa().format("facts", "ask")
        else {
            panic!("expected flat text output");
        };
        assert!(prompt.contains("facts"));
        assert!(prompt.ends_with("Query: ask\nAnswer:"));
    }

    #[test]
    fn chat_template_formats_to_messages() {
        let template = PromptTemplate::Chat(vec![
            ChatMessage { role: MessageRole::System, content: "be terse".into() },
            ChatMessage { role: MessageRole::User, content: "{context} / {query}".into() },
        ]);
        let PromptOutput::Messages(messages) = template.format("C", "Q") else {
            panic!("expected chat output");
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "C / Q");
    }
}
