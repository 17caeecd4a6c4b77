use crate::content::ThreadContent;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use tracing::info;

/// Identifier of an uploaded image, attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaId(pub String);

/// Identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(pub String);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A social network that accepts image uploads and reply-chained posts.
#[async_trait]
pub trait ThreadPublisher: Send + Sync {
    async fn upload_media(&self, bytes: &[u8]) -> Result<MediaId>;

    async fn create_post(
        &self,
        text: &str,
        reply_to: Option<&PostId>,
        media: Option<&MediaId>,
    ) -> Result<PostId>;
}

/// Publish `content` as a thread with `image` on the first post.
///
/// Posts go out one at a time; each reply needs the id of the post before it.
pub async fn publish_thread(
    publisher: &dyn ThreadPublisher,
    content: &ThreadContent,
    image: &[u8],
) -> Result<Vec<PostId>> {
    publish_thread_with_progress(publisher, content, image, |_, _| {}).await
}

/// Same as [`publish_thread`], calling `progress(posted, total)` after each post.
pub async fn publish_thread_with_progress<F>(
    publisher: &dyn ThreadPublisher,
    content: &ThreadContent,
    image: &[u8],
    mut progress: F,
) -> Result<Vec<PostId>>
where
    F: FnMut(usize, usize),
{
    let media = publisher.upload_media(image).await?;
    info!(media_id = %media, "Uploaded image");

    let total = content.len();
    let mut post_ids: Vec<PostId> = Vec::with_capacity(total);

    for (i, text) in content.posts().iter().enumerate() {
        let post_id = match post_ids.last() {
            None => publisher.create_post(text, None, Some(&media)).await?,
            Some(previous) => publisher.create_post(text, Some(previous), None).await?,
        };

        info!(post_id = %post_id, "Published post {} of {}", i + 1, total);
        post_ids.push(post_id);
        progress(i + 1, total);
    }

    Ok(post_ids)
}
