use scissorhands::theme::TemplateType;
use scissorhands::{Publisher, Settings};

use crate::TemplateArgs;

pub async fn run(args: &TemplateArgs) -> Result<(), anyhow::Error> {
    let settings = Settings::load_from_arg(args.config_file.as_deref())?;
    let publisher = Publisher::from_settings(settings)?;
    let kind: TemplateType = args.kind.parse()?;

    let locator = publisher.locator();
    if args.path_only {
        let path = locator.template_path(args.theme.as_deref(), kind)?;
        println!("{}", path.display());
    } else {
        let template = locator
            .get_template_async(args.theme.as_deref(), kind)
            .await?;
        print!("{template}");
    }

    Ok(())
}
