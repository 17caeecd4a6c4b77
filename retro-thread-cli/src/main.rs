use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use retro_thread_lib::{
    generate_thread, publish_with_box_art, records, GoogleImageSearch, OpenAiClient, Settings,
    TwitterClient,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retro-thread")]
#[command(about = "Post an AI-written thread about a random retro game, with box art")]
struct Args {
    /// Games list, one "title,platform" per line
    #[arg(short, long, default_value = "best-games-total.txt")]
    input: PathBuf,

    /// Where the downloaded box art is written (overwritten each run)
    #[arg(long, default_value = retro_thread_lib::image::DEFAULT_IMAGE_PATH)]
    image_path: PathBuf,

    /// Chat model to use (defaults to OPENAI_MODEL, then gpt-3.5-turbo)
    #[arg(long)]
    model: Option<String>,

    /// Generate and print the thread without fetching the image or posting
    #[arg(long)]
    dry_run: bool,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args);

    let mut settings = Settings::from_env();
    if let Some(model) = args.model.clone() {
        settings.openai_model = Some(model);
    }

    let lines = records::load_records(&args.input)?;

    let generator = OpenAiClient::from_settings(&settings);
    let (record, content) = generate_thread(&lines, &mut rand::thread_rng(), &generator).await?;

    println!("{} ({})", record.title, record.platform);
    for (i, post) in content.posts().iter().enumerate() {
        println!("[{}/{}] {}", i + 1, content.len(), post);
    }

    if args.dry_run {
        info!("Dry run, not publishing");
        return Ok(());
    }

    let images = GoogleImageSearch::from_settings(&settings).with_image_path(&args.image_path);
    let publisher = TwitterClient::from_settings(&settings);

    let pb = ProgressBar::new(content.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} posts")?
            .progress_chars("#>-"),
    );

    let (image_url, post_ids) =
        publish_with_box_art(&record, &content, &images, &publisher, |posted, _| {
            pb.set_position(posted as u64)
        })
        .await?;
    pb.finish_and_clear();

    if let Some(first) = post_ids.first() {
        info!(
            posts = post_ids.len(),
            thread = %first,
            image = %image_url,
            "Published thread"
        );
    }

    Ok(())
}
