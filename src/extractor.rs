use std::collections::HashSet;
use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

use crate::constants::SKIPPED_EXTENSIONS;

/// Collect the document's anchor hrefs as absolute URLs, in document order.
/// Relative hrefs are resolved against `base`; anything unresolvable is
/// dropped.
pub fn collect_hrefs(html: &str, base: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    static ANCHOR_SELECTOR: OnceLock<Selector> = OnceLock::new();
    let anchor_selector = ANCHOR_SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());
    let base_url = Url::parse(base).ok();

    document
        .select(anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| match Url::parse(href) {
            Ok(absolute) => Some(absolute.to_string()),
            Err(_) => base_url
                .as_ref()
                .and_then(|base| base.join(href).ok())
                .map(|joined| joined.to_string()),
        })
        .collect()
}

/// Filter `hrefs` down to the links the walk may take: absolute http(s)
/// URLs whose final path extension is not in the skip list and which have
/// not been visited yet. Order-preserving; duplicates outside the visited
/// set pass through unchanged.
pub fn navigable_links(hrefs: &[String], visited: &HashSet<String>) -> Vec<String> {
    hrefs
        .iter()
        .filter(|href| qualifies(href, visited))
        .cloned()
        .collect()
}

fn qualifies(href: &str, visited: &HashSet<String>) -> bool {
    if visited.contains(href) {
        return false;
    }
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => return false,
    };
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }
    !has_skipped_extension(&url)
}

fn has_skipped_extension(url: &Url) -> bool {
    let last_segment = url.path().rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((_, extension)) => SKIPPED_EXTENSIONS.contains(&extension.to_lowercase().as_str()),
        None => false,
    }
}
