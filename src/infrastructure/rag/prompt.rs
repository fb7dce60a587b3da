//! Prompt construction for every generation path

use crate::domain::{LlmRequest, Message};

/// Builds the chat requests sent to the generator
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("Turkish")
    }
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    fn system(&self) -> Message {
        Message::system(format!(
            "You are the AILAYZER assistant. Answer in {}. Be clear and concise.",
            self.language
        ))
    }

    fn history_block(history: &str) -> String {
        if history.trim().is_empty() {
            String::new()
        } else {
            format!("Conversation so far:\n{}\n\n", history.trim())
        }
    }

    /// Plain chat: memory and the question only
    pub fn chat(&self, history: &str, query: &str) -> LlmRequest {
        let user = format!(
            "{}User question: {query}\n\nGive a short, direct answer.",
            Self::history_block(history)
        );

        LlmRequest::builder().message(self.system()).user(user).build()
    }

    /// Answer over web search snippets
    pub fn web(&self, history: &str, context: &str, query: &str) -> LlmRequest {
        let user = format!(
            "{}Context (web search results):\n\"\"\"{context}\"\"\"\n\n\
             Question: {query}\n\n\
             Instructions:\n\
             - If the context is empty or does not cover the question, do not make things up; say you are not sure.",
            Self::history_block(history)
        );

        LlmRequest::builder().message(self.system()).user(user).build()
    }

    /// Answer over retrieved knowledge base documents
    pub fn domain(&self, history: &str, context: &str, query: &str) -> LlmRequest {
        let user = format!(
            "{}Context (company documents):\n\"\"\"{context}\"\"\"\n\n\
             Question: {query}\n\n\
             Instructions:\n\
             - Answer using only the context above.\n\
             - If the answer is not in the context, say so.",
            Self::history_block(history)
        );

        LlmRequest::builder().message(self.system()).user(user).build()
    }

    /// Rephrase a query that retrieved nothing useful
    pub fn rewrite(&self, query: &str) -> LlmRequest {
        let user = format!(
            "Question:\n{query}\n\n\
             Rewrite this question so that it retrieves better results from a corporate \
             profile and company information index. Return only the rewritten question."
        );

        LlmRequest::builder().user(user).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageRole;

    #[test]
    fn test_chat_without_history() {
        let request = PromptBuilder::default().chat("", "merhaba");

        assert_eq!(request.messages[0].role, MessageRole::System);
        assert!(request.messages[0].content.contains("Answer in Turkish"));
        assert!(request.user_text().contains("User question: merhaba"));
        assert!(!request.user_text().contains("Conversation so far"));
    }

    #[test]
    fn test_history_is_injected() {
        let request = PromptBuilder::new("English").domain(
            "User: my name is Deniz\nAssistant: hi Deniz",
            "doc text",
            "what do you offer",
        );

        let text = request.user_text();
        assert!(text.starts_with("Conversation so far:\nUser: my name is Deniz"));
        assert!(text.contains("\"\"\"doc text\"\"\""));
        assert!(text.contains("Question: what do you offer"));
    }

    #[test]
    fn test_web_prompt_warns_against_invention() {
        let text = PromptBuilder::default().web("", "", "hava durumu").user_text();
        assert!(text.contains("do not make things up"));
    }

    #[test]
    fn test_rewrite_has_no_system_message() {
        let request = PromptBuilder::default().rewrite("ailayzer");
        assert_eq!(request.messages.len(), 1);
        assert!(request.user_text().contains("Return only the rewritten question"));
    }
}
