use std::path::PathBuf;

use scissorhands::pipeline::Cancellation;
use scissorhands::{Publisher, Settings};

use crate::PublishArgs;

pub async fn run(args: &PublishArgs) -> Result<(), anyhow::Error> {
    let settings = Settings::load_from_arg(args.config_file.as_deref())?;
    let publisher = Publisher::from_settings(settings)?;

    let posts = publisher
        .processor()
        .get_post_paths(args.post.as_deref())?
        .collect::<Result<Vec<PathBuf>, _>>()?;

    if posts.is_empty() {
        return Err(match &args.post {
            Some(post) => anyhow::anyhow!(
                "{post} is not a post (expected a {} file)",
                publisher.processor().extension()
            ),
            None => anyhow::anyhow!(
                "No posts found in {}",
                publisher.settings().directories.posts.display()
            ),
        });
    }

    // Ctrl-C stops before the next write; a write already issued completes
    let (cancel, cancellation) = Cancellation::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping before the next write");
            cancel.cancel();
        }
    });

    for post in &posts {
        let published = publisher
            .publish_file(post, args.theme.as_deref(), Some(cancellation.clone()))
            .await?;
        println!(
            "Published {} -> {}",
            published.markdown.display(),
            published.html.display()
        );
    }

    println!("Published {} post(s)", posts.len());
    Ok(())
}
