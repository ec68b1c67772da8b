use scissorhands::{Publisher, Settings};

use crate::ListArgs;

pub fn run(args: &ListArgs) -> Result<(), anyhow::Error> {
    let settings = Settings::load_from_arg(args.config_file.as_deref())?;
    let publisher = Publisher::from_settings(settings)?;

    let mut count = 0;
    for path in publisher.processor().get_post_paths(args.post.as_deref())? {
        println!("{}", path?.display());
        count += 1;
    }

    if count == 0 {
        match &args.post {
            Some(post) => println!(
                "{post} is not a post (expected a {} file)",
                publisher.processor().extension()
            ),
            None => println!("No posts found"),
        }
    }

    Ok(())
}
