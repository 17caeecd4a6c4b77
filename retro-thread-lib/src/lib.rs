//! Generate a short thread about a retro game and publish it.
//!
//! One run:
//! - picks a random `title,platform` record from the games list
//! - asks a text model for the thread and checks every post fits
//! - looks up box art for the game and downloads it
//! - publishes the thread, image on the first post, each later post a reply

pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod image;
pub mod oauth;
pub mod publish;
pub mod records;
pub mod twitter;

use anyhow::Result;
use rand::Rng;
use tracing::{error, info};

pub use config::Settings;
pub use content::{ThreadContent, MAX_POST_CHARS};
pub use error::ThreadError;
pub use generation::{ContentGenerator, OpenAiClient};
pub use image::{BoxArt, GoogleImageSearch, ImageSource};
pub use publish::{publish_thread, publish_thread_with_progress, MediaId, PostId, ThreadPublisher};
pub use records::GameRecord;
pub use twitter::TwitterClient;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after generating and checking the thread.
    pub dry_run: bool,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub record: GameRecord,
    pub content: ThreadContent,
    pub image_url: Option<String>,
    pub post_ids: Vec<PostId>,
}

/// Pick a game and have its thread written and checked.
///
/// A generated post over the length limit fails here, before the image is
/// fetched or anything is published.
pub async fn generate_thread<R>(
    lines: &[String],
    rng: &mut R,
    generator: &dyn ContentGenerator,
) -> Result<(GameRecord, ThreadContent)>
where
    R: Rng + ?Sized,
{
    let record = records::pick_record(lines, rng)?;
    info!(title = %record.title, platform = %record.platform, "Picked game");

    let text = generator.generate(&record).await?;
    let content = ThreadContent::from_generated(&text).map_err(|e| {
        error!(error = %e, %text, "Generated thread rejected");
        e
    })?;
    info!(posts = content.len(), "Generated thread");
    for (i, post) in content.posts().iter().enumerate() {
        info!(chars = post.chars().count(), "[{}] {}", i + 1, post);
    }

    Ok((record, content))
}

/// Fetch box art for `record` and publish `content` with it.
///
/// Returns the image URL and the ids of the published posts.
pub async fn publish_with_box_art<F>(
    record: &GameRecord,
    content: &ThreadContent,
    images: &dyn ImageSource,
    publisher: &dyn ThreadPublisher,
    progress: F,
) -> Result<(String, Vec<PostId>)>
where
    F: FnMut(usize, usize),
{
    let image = images.fetch(record).await?;
    let post_ids = publish_thread_with_progress(publisher, content, &image.bytes, progress).await?;
    Ok((image.url, post_ids))
}

/// Run once against the given collaborators.
pub async fn run_once<R, F>(
    lines: &[String],
    rng: &mut R,
    generator: &dyn ContentGenerator,
    images: &dyn ImageSource,
    publisher: &dyn ThreadPublisher,
    options: &RunOptions,
    progress: F,
) -> Result<RunReport>
where
    R: Rng + ?Sized,
    F: FnMut(usize, usize),
{
    let (record, content) = generate_thread(lines, rng, generator).await?;

    if options.dry_run {
        info!("Dry run, not publishing");
        return Ok(RunReport {
            record,
            content,
            image_url: None,
            post_ids: Vec::new(),
        });
    }

    let (image_url, post_ids) =
        publish_with_box_art(&record, &content, images, publisher, progress).await?;

    Ok(RunReport {
        record,
        content,
        image_url: Some(image_url),
        post_ids,
    })
}
