//! Input validation for URL batches.
//!
//! URLs are checked but never rewritten: the exact input string is what the
//! cache is keyed on.

use sitesnap_core::Error;

/// Check that `urls` is a non-empty batch of at most `max` absolute
/// http(s) URLs with a host.
///
/// Reports the first offending URL.
pub fn validate_urls(urls: &[String], max: usize) -> Result<(), Error> {
    if urls.is_empty() {
        return Err(Error::InvalidInput("no urls".into()));
    }

    if urls.len() > max {
        return Err(Error::InvalidInput(format!("too many urls: {} exceeds {max}", urls.len())));
    }

    if let Some(bad) = urls.iter().find(|url| !is_fetchable(url)) {
        return Err(Error::InvalidInput(format!("bad url: {bad}")));
    }

    Ok(())
}

fn is_fetchable(input: &str) -> bool {
    if input.is_empty() || input.trim() != input {
        return false;
    }

    match url::Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}
