//! Twitter/X client: v1.1 media upload and v2 tweet creation, both signed
//! with OAuth 1.0a user credentials.

use crate::config::{require, Settings};
use crate::oauth::OAuthCredentials;
use crate::publish::{MediaId, PostId, ThreadPublisher};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::debug;

const UPLOAD_API: &str = "https://upload.twitter.com";
const TWITTER_API: &str = "https://api.twitter.com";

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<TweetReply<'a>>,
}

#[derive(Debug, Serialize)]
struct TweetMedia<'a> {
    media_ids: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct TweetReply<'a> {
    in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
    upload_base: String,
    api_base: String,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    access_token: Option<String>,
    access_token_secret: Option<String>,
}

impl TwitterClient {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_base: UPLOAD_API.to_string(),
            api_base: TWITTER_API.to_string(),
            consumer_key: settings.twitter_consumer_key.clone(),
            consumer_secret: settings.twitter_consumer_secret.clone(),
            access_token: settings.twitter_access_token.clone(),
            access_token_secret: settings.twitter_access_token_secret.clone(),
        }
    }

    /// Send both uploads and posts to `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.upload_base = base_url.clone();
        self.api_base = base_url;
        self
    }

    fn credentials(&self) -> Result<OAuthCredentials> {
        Ok(OAuthCredentials {
            consumer_key: require(&self.consumer_key, "TWITTER_CONSUMER_KEY")?.to_string(),
            consumer_secret: require(&self.consumer_secret, "TWITTER_CONSUMER_SECRET")?
                .to_string(),
            access_token: require(&self.access_token, "TWITTER_ACCESS_TOKEN")?.to_string(),
            access_token_secret: require(&self.access_token_secret, "TWITTER_ACCESS_TOKEN_SECRET")?
                .to_string(),
        })
    }
}

fn tweet_request<'a>(
    text: &'a str,
    reply_to: Option<&'a PostId>,
    media: Option<&'a MediaId>,
) -> CreateTweetRequest<'a> {
    CreateTweetRequest {
        text,
        media: media.map(|m| TweetMedia {
            media_ids: vec![m.0.as_str()],
        }),
        reply: reply_to.map(|p| TweetReply {
            in_reply_to_tweet_id: p.0.as_str(),
        }),
    }
}

#[async_trait]
impl ThreadPublisher for TwitterClient {
    async fn upload_media(&self, bytes: &[u8]) -> Result<MediaId> {
        let url = format!("{}/1.1/media/upload.json", self.upload_base);
        let auth = self.credentials()?.authorization_header("POST", &url, &[])?;

        let form = Form::new().part("media", Part::bytes(bytes.to_vec()).file_name("image.jpg"));

        let response: MediaUploadResponse = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .multipart(form)
            .send()
            .await?
            .error_for_status()
            .context("Failed to upload media")?
            .json()
            .await
            .context("Failed to parse media upload response")?;

        Ok(MediaId(response.media_id_string))
    }

    async fn create_post(
        &self,
        text: &str,
        reply_to: Option<&PostId>,
        media: Option<&MediaId>,
    ) -> Result<PostId> {
        let url = format!("{}/2/tweets", self.api_base);
        let auth = self.credentials()?.authorization_header("POST", &url, &[])?;
        let request = tweet_request(text, reply_to, media);

        debug!(reply_to = ?reply_to, has_media = media.is_some(), "Creating tweet");

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Failed to create tweet ({}): {}", status, body));
        }

        let response: CreateTweetResponse = response
            .json()
            .await
            .context("Failed to parse create tweet response")?;

        Ok(PostId(response.data.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_tweet_request_has_media_only() {
        let media = MediaId("1455952740635586573".to_string());
        let request = tweet_request("Hello", None, Some(&media));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "Hello", "media": {"media_ids": ["1455952740635586573"]}})
        );
    }

    #[test]
    fn test_reply_request_has_reply_only() {
        let previous = PostId("1445880548472328192".to_string());
        let request = tweet_request("More", Some(&previous), None);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "More", "reply": {"in_reply_to_tweet_id": "1445880548472328192"}})
        );
    }

    #[test]
    fn test_missing_credentials() {
        let client = TwitterClient::from_settings(&Settings::default());
        let err = client.credentials().unwrap_err();
        assert_eq!(err.to_string(), "TWITTER_CONSUMER_KEY not set");
    }
}
