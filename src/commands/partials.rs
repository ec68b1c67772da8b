use scissorhands::theme::Partial;
use scissorhands::{Publisher, Settings};

use crate::PartialsArgs;

pub fn run(args: &PartialsArgs) -> Result<(), anyhow::Error> {
    let settings = Settings::load_from_arg(args.config_file.as_deref())?;
    let publisher = Publisher::from_settings(settings)?;
    let meta = publisher.page_metadata(args.theme.as_deref());
    let paths = publisher.paths();

    println!("Theme: {}", meta.theme);
    let partials = [
        (Partial::Head, &meta.head_partial_path),
        (Partial::Header, &meta.header_partial_path),
        (Partial::Post, &meta.post_partial_path),
        (Partial::Footer, &meta.footer_partial_path),
    ];
    for (partial, path) in partials {
        let marker = if path.is_file() { "" } else { " (missing)" };
        println!("  {:<8}{}{marker}", partial.name(), path.display());
    }

    let layout = paths.layout_path(Some(meta.theme.as_str()));
    let marker = if layout.is_file() { "" } else { " (missing)" };
    println!("  {:<8}{}{marker}", Partial::Layout.name(), layout.display());

    Ok(())
}
