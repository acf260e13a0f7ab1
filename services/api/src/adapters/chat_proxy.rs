//! services/api/src/adapters/chat_proxy.rs
//!
//! A `ChatTransport` that talks to the chat endpoint of a running API server, for
//! chat sessions that live outside the server process.

use async_trait::async_trait;
use coursehub_core::domain::ChatReply;
use coursehub_core::ports::{ChatTransport, PortError, PortResult};
use reqwest::Client;
use std::time::Duration;

use crate::web::protocol::{ChatRequest, ChatResponse};

pub const CHAT_PATH: &str = "/api/ai-support/chat";

#[derive(Clone)]
pub struct ProxyTransport {
    client: Client,
    endpoint: String,
}

impl ProxyTransport {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str, timeout: Duration) -> PortResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
        })
    }
}

#[async_trait]
impl ChatTransport for ProxyTransport {
    async fn send(&self, message: &str) -> PortResult<ChatReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                message: Some(message.to_string()),
            })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Invalid chat response: {}", e)))?;

        if !status.is_success() || !body.success {
            return Err(PortError::Unexpected(format!(
                "Chat server returned {}: {}",
                status, body.message
            )));
        }

        Ok(ChatReply {
            text: body.message,
            partial: body.partial.unwrap_or(false),
            fallback: body.fallback.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> ProxyTransport {
        ProxyTransport::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_message_and_reads_flags() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(body_json(json!({ "message": "what is html?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "HTML is markup...",
                "partial": true
            })))
            .mount(&server)
            .await;

        let reply = transport(&server).send("what is html?").await.unwrap();

        assert_eq!(
            reply,
            ChatReply {
                text: "HTML is markup...".to_string(),
                partial: true,
                fallback: false,
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "message": "AI service is not configured"
            })))
            .mount(&server)
            .await;

        let err = transport(&server).send("hi").await.unwrap_err();

        assert!(err.to_string().contains("AI service is not configured"));
    }
}
