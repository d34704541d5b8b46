//! `[#id]` citation markers

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static CITATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[#(\d+)\]").expect("Invalid citation regex"));

/// Every passage id cited in the text
pub fn cited_ids(text: &str) -> BTreeSet<u64> {
    CITATION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}
