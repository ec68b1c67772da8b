use scissorhands::Settings;

use crate::CleanArgs;

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    let settings = Settings::load_from_arg(args.config_file.as_deref())?;

    // Delete the published pages
    let published = settings
        .directories
        .published
        .canonicalize()
        .unwrap_or(settings.directories.published);
    if published.exists() {
        if args.dry_run {
            println!("Would delete {}", published.display());
        } else {
            tokio::fs::remove_dir_all(&published).await?;
            println!("Deleted {}", published.display());
        }
    } else {
        println!("Nothing to clean");
    }

    Ok(())
}
