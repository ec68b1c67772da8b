use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: ScissorhandsCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the blog in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct ListArgs {
    /// A single post to look up instead of listing the posts directory
    post: Option<String>,

    /// The path to the configuration file
    #[arg(short, long, default_value = "scissorhands.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct PublishArgs {
    /// The markdown post to publish (every post when omitted)
    post: Option<String>,

    /// The theme to render with
    #[arg(short, long)]
    theme: Option<String>,

    /// The path to the configuration file
    #[arg(short, long, default_value = "scissorhands.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct TemplateArgs {
    /// The template kind: layout, page, post or tag
    kind: String,

    /// The theme to look the template up in
    #[arg(short, long)]
    theme: Option<String>,

    /// Print the template's path instead of its content
    #[arg(short, long, default_value = "false")]
    path_only: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = "scissorhands.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct PartialsArgs {
    /// The theme to show partials for
    #[arg(short, long)]
    theme: Option<String>,

    /// The path to the configuration file
    #[arg(short, long, default_value = "scissorhands.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// Only print what would be deleted
    #[arg(short, long, default_value = "false")]
    dry_run: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = "scissorhands.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ScissorhandsCommand {
    /// Initialize a new blog
    Init(InitArgs),

    /// List the blog's posts
    List(ListArgs),

    /// Publish one post, or all of them
    Publish(PublishArgs),

    /// Show a theme template
    Template(TemplateArgs),

    /// Show where a theme's partials live
    Partials(PartialsArgs),

    /// Delete the published directory
    Clean(CleanArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    match args.command {
        ScissorhandsCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        ScissorhandsCommand::List(args) => {
            commands::list::run(&args)?;
        }
        ScissorhandsCommand::Publish(args) => {
            commands::publish::run(&args).await?;
        }
        ScissorhandsCommand::Template(args) => {
            commands::template::run(&args).await?;
        }
        ScissorhandsCommand::Partials(args) => {
            commands::partials::run(&args)?;
        }
        ScissorhandsCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
    }

    Ok(())
}
