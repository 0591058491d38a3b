use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{VisionError, VisionService, DESCRIBE_PROMPT};
use crate::upload::ImageUpload;

const MAX_TOKENS: u32 = 300;

/// Chat-completions client sending the image inline as a data URL.
#[derive(Clone)]
pub struct OpenAiVision {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiVision {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl VisionService for OpenAiVision {
    async fn describe(&self, image: &ImageUpload) -> Result<String, VisionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: DESCRIBE_PROMPT },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_data_url(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        };

        log::info!(
            "Sending {} ({} bytes) to vision model {}",
            image.filename,
            image.bytes.len(),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(VisionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::tests::PNG_HEADER;
    use mockito::{Matcher, Server};

    fn sample_image() -> ImageUpload {
        ImageUpload::validate("photo.png".into(), PNG_HEADER.to_vec()).unwrap()
    }

    fn client(base_url: String) -> OpenAiVision {
        OpenAiVision::new(base_url, "sk-test", "gpt-4o-mini", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn describe_posts_prompt_and_image() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({
                    "model": "gpt-4o-mini",
                    "max_tokens": 300
                })),
                Matcher::Regex("Describe this image in detail".into()),
                Matcher::Regex("data:image/png;base64,".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"A red bicycle against a brick wall."}}]}"#,
            )
            .create_async()
            .await;

        let description = client(server.url()).describe(&sample_image()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(description, "A red bicycle against a brick wall.");
    }

    #[tokio::test]
    async fn upstream_error_keeps_status_and_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let err = client(server.url()).describe(&sample_image()).await.unwrap_err();
        match err {
            VisionError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(server.url()).describe(&sample_image()).await.unwrap_err();
        assert!(matches!(err, VisionError::EmptyResponse));
    }
}
