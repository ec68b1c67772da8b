use std::path::Path;

use scissorhands::Settings;
use scissorhands::config::CONFIG_FILE;
use scissorhands::theme::{Partial, Theme};

use crate::InitArgs;

const HELLO_WORLD: &str = "# Hello, world\n\nThis is your first post. Edit or delete it, then publish.\n";

const PAGE_TEMPLATE: &str = "<article>{{ page.post | safe }}</article>\n";
const TAG_TEMPLATE: &str = "<section class=\"tag\">{{ page.title }}</section>\n";

/// Starter content for each conventional partial of the default theme.
fn partial_template(partial: Partial) -> &'static str {
    match partial {
        Partial::Head => {
            "<meta charset=\"utf-8\">\n<title>{{ page.title }} | {{ site.title }}</title>\n"
        }
        Partial::Header => "<header><h1>{{ site.title }}</h1></header>\n",
        Partial::Post => {
            "<article>\n<h2>{{ page.title }}</h2>\n\
             <p class=\"byline\">{{ page.author }}, {{ page.date_released | date(format=\"%Y-%m-%d\") }}</p>\n\
             {{ page.post | safe }}\n</article>\n"
        }
        Partial::Footer => "<footer>Published with the {{ meta.theme }} theme</footer>\n",
        Partial::Layout => {
            "<!DOCTYPE html>\n<html>\n<head>\n{{ head }}</head>\n<body>\n{{ header }}\
             <main>\n{{ post }}</main>\n{{ footer }}</body>\n</html>\n"
        }
    }
}

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    println!("Initializing blog in {}", path.display());
    scaffold(&path).await?;
    println!(
        "Created config file {config_file}",
        config_file = path.join(CONFIG_FILE).display()
    );

    Ok(())
}

/// Write a config file, a first post and the default theme into `path`.
async fn scaffold(path: &Path) -> Result<(), anyhow::Error> {
    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(anyhow::anyhow!(
            "Config file already exists: {}",
            config_path.display()
        ));
    }

    let settings = Settings::default();
    let config_text = serde_yaml::to_string(&settings)?;
    tokio::fs::write(&config_path, config_text).await?;

    let posts = path.join(&settings.directories.posts);
    tokio::fs::create_dir_all(&posts).await?;
    tokio::fs::write(
        posts.join(format!("hello-world{}", settings.contents.extension)),
        HELLO_WORLD,
    )
    .await?;

    let theme = Theme::conventional(&settings.site.theme);
    let theme_dir = path.join(&settings.directories.themes).join(&theme.name);
    let mut files: Vec<(&str, &str)> = [
        Partial::Head,
        Partial::Header,
        Partial::Post,
        Partial::Footer,
        Partial::Layout,
    ]
    .into_iter()
    .map(|p| (p.relative_path(), partial_template(p)))
    .collect();
    files.push((theme.page.as_str(), PAGE_TEMPLATE));
    files.push((theme.tag.as_str(), TAG_TEMPLATE));

    for (relative, content) in files {
        let file = theme_dir.join(relative);
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file, content).await?;
    }

    Ok(())
}
