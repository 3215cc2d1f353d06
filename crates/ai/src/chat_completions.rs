use crate::Result;
use async_trait::async_trait;
use derive_builder::Builder;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatCompletionMessage {
    System(ChatCompletionSystemMessage),
    User(ChatCompletionUserMessage),
    Assistant(ChatCompletionAssistantMessage),
}

impl ChatCompletionMessage {
    pub fn role(&self) -> Role {
        match self {
            ChatCompletionMessage::System(_) => Role::System,
            ChatCompletionMessage::User(_) => Role::User,
            ChatCompletionMessage::Assistant(_) => Role::Assistant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionSystemMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl<S: Into<String>> From<S> for ChatCompletionSystemMessage {
    fn from(content: S) -> Self {
        ChatCompletionSystemMessage {
            content: content.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionUserMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl<S: Into<String>> From<S> for ChatCompletionUserMessage {
    fn from(content: S) -> Self {
        ChatCompletionUserMessage {
            content: content.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionAssistantMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl<S: Into<String>> From<S> for ChatCompletionAssistantMessage {
    fn from(content: S) -> Self {
        ChatCompletionAssistantMessage {
            content: Some(content.into()),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder, PartialEq)]
#[builder(pattern = "mutable")]
#[builder(setter(into, strip_option))]
#[builder(derive(Debug))]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[builder(default = "None")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[builder(default = "None")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u64>,
    #[builder(default = "None")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(pattern = "mutable")]
#[builder(setter(into, strip_option))]
pub struct ChatCompletionResponse {
    #[builder(default)]
    #[serde(default)]
    pub id: Option<String>,
    #[builder(default = "\"chat.completion\".to_string()")]
    #[serde(default)]
    pub object: String,
    #[builder(default)]
    #[serde(default)]
    pub created: u64,
    #[builder(default)]
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    #[builder(default)]
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the API returned one with text.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(pattern = "mutable")]
#[builder(setter(into, strip_option))]
pub struct ChatCompletionResponseMessage {
    #[builder(default = "None")]
    pub content: Option<String>,
    #[builder(default = "None")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(pattern = "mutable")]
#[builder(setter(into, strip_option))]
pub struct ChatCompletionChoice {
    #[builder(default)]
    #[serde(default)]
    pub index: u32,
    pub message: ChatCompletionResponseMessage,
    #[builder(default = "None")]
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder, Default)]
#[builder(setter(into, strip_option), default)]
#[builder(pattern = "mutable")]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait ChatCompletion: DynClone + Send + Sync {
    async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

dyn_clone::clone_trait_object!(ChatCompletion);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_user_message() {
        let message = ChatCompletionMessage::User("Plan a 3-day trip to Rome".into());
        assert_eq!(
            r#"{"role":"user","content":"Plan a 3-day trip to Rome"}"#,
            serde_json::to_string(&message).unwrap()
        );
        assert_eq!(message.role(), Role::User);
    }

    #[test]
    fn test_system_message() {
        let message = ChatCompletionMessage::System("You are a travel assistant.".into());
        assert_eq!(
            r#"{"role":"system","content":"You are a travel assistant."}"#,
            serde_json::to_string(&message).unwrap()
        );
    }

    #[test]
    fn test_request_omits_unset_options() {
        let request = ChatCompletionRequestBuilder::default()
            .model("gpt-4o-mini")
            .messages(vec![ChatCompletionMessage::User("Hello".into())])
            .build()
            .unwrap();

        assert_eq!(
            r#"{"model":"gpt-4o-mini","messages":[{"role":"user","content":"Hello"}]}"#,
            serde_json::to_string(&request).unwrap()
        );
    }

    #[test]
    fn test_max_completion_tokens() {
        let request = ChatCompletionRequestBuilder::default()
            .model("gpt-4o-mini")
            .messages(vec![ChatCompletionMessage::User("Hello".into())])
            .max_completion_tokens(100u32)
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_completion_tokens"], 100);
    }

    #[test]
    fn test_response_uses_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "created": 1728000000,
                "model": "gpt-4o-mini",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "Day 1: ..."}, "finish_reason": "stop"},
                    {"index": 1, "message": {"role": "assistant", "content": "Other"}, "finish_reason": "stop"}
                ],
                "usage": {"prompt_tokens": 9, "completion_tokens": 4, "total_tokens": 13}
            }"#,
        )
        .unwrap();

        assert_eq!(response.first_content(), Some("Day 1: ..."));
        assert_eq!(response.choices[0].finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_response_tolerates_sparse_payload() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "Ciao"}}]}"#).unwrap();

        assert_eq!(response.first_content(), Some("Ciao"));
        assert!(response.usage.is_none());

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn test_unknown_role_is_tolerated() {
        let message: ChatCompletionResponseMessage =
            serde_json::from_str(r#"{"role": "tool", "content": null}"#).unwrap();

        assert_eq!(message.role, Role::Unknown);
        assert!(message.content.is_none());
    }
}
