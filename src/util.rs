//! Shared utility functions.

use std::future::Future;

/// Compare two names ignoring case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Check whether `name` ends with `suffix`, ignoring case.
pub fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.to_lowercase().ends_with(&suffix.to_lowercase())
}

/// Strip `suffix` from the end of `name`, ignoring case.
pub fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.get(split..)?;
    if eq_ignore_case(tail, suffix) {
        name.get(..split)
    } else {
        None
    }
}

/// Convert a string to a slug suitable for file names and HTML ids.
///
/// "Hello World" -> "hello-world"
/// "What's New?" -> "whats-new"
pub fn slugify(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}

/// Convert a slug to title case.
///
/// Splits on `-` and `_`, capitalizes each word.
/// "getting-started" -> "Getting Started"
/// "api_reference" -> "Api Reference"
pub fn title_case(s: &str) -> String {
    s.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drive a future to completion on a private current-thread runtime.
///
/// Backs the blocking variants of the async operations. Called from inside
/// a tokio runtime it returns an error instead of blocking that runtime.
pub fn block_on<F: Future>(future: F) -> std::io::Result<F::Output> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(std::io::Error::other(
            "blocking call inside an async runtime, use the async variant",
        ));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
