//! Caption normalizer: [`SubmissionRecord`] → canonical caption.
//!
//! Also owns the line-level link operations the fan-out reuses:
//! duplicate removal and provider subsets.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::submissions::classifier::Provider;
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::models::{CanonicalCaption, SubmissionRecord};
use crate::domains::submissions::policy::ContentPolicy;

pub const LINK_LABEL: &str = "链接：";

/// Promotional tag appended to every rendered caption.
pub const PROMO_TAG: &str = "#鹏摇星海";

/// Stand-in link for captions that arrive without any.
pub const PLACEHOLDER_LINK: &str = "https://pan.quark.cn/s/3c07afa156f3";

lazy_static! {
    static ref PROVIDER_PREFIX: Regex = Regex::new(r"^(?:夸克|百度|UC|迅雷)[：:]").unwrap();
    static ref PREFIXED_URL: Regex = Regex::new(r"[：:]\s*(https?://.+)").unwrap();
}

/// Render a record into the canonical caption.
///
/// Fails with [`SubmissionError::PolicyViolation`] when the name or the
/// description carries an ad, copyright or solicitation keyword.
pub fn render(
    record: &SubmissionRecord,
    policy: &ContentPolicy,
) -> Result<CanonicalCaption, SubmissionError> {
    policy.check_record(&record.name, &record.description)?;

    let mut link_lines = format_links(&record.links);
    if link_lines.is_empty() {
        link_lines.push(format!("{}{}", LINK_LABEL, PLACEHOLDER_LINK));
    }

    let tags = if record.tags.trim().is_empty() {
        PROMO_TAG.to_string()
    } else {
        format!("{} {}", record.tags.trim(), PROMO_TAG)
    };

    let caption = assemble(
        &record.name,
        &record.description,
        &link_lines,
        &record.size,
        &tags,
    );
    Ok(remove_duplicate_links(&caption))
}

/// Format one link entry as a `链接：` line. Blank entries yield `None`.
///
/// A `链接：` entry passes through unchanged; a provider-labelled entry
/// (`夸克：<url>`) keeps only its URL.
pub fn format_link(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    if entry.starts_with(LINK_LABEL) {
        return Some(entry.to_string());
    }
    if PROVIDER_PREFIX.is_match(entry) {
        if let Some(url) = PREFIXED_URL.captures(entry).and_then(|c| c.get(1)) {
            return Some(format!("{}{}", LINK_LABEL, url.as_str()));
        }
    }
    Some(format!("{}{}", LINK_LABEL, entry))
}

pub fn format_links(links: &[String]) -> Vec<String> {
    links
        .iter()
        .flat_map(|entry| entry.lines())
        .filter_map(format_link)
        .collect()
}

/// Fixed five-section layout. Values are inserted as given.
pub fn assemble(
    name: &str,
    description: &str,
    link_lines: &[String],
    size: &str,
    tags: &str,
) -> CanonicalCaption {
    format!(
        "名称：{}\n\n描述：{}\n\n{}\n\n📁 大小：{}\n🏷 标签：{}",
        name,
        description,
        link_lines.join("\n"),
        size,
        tags
    )
}

/// Drop repeated `链接：` lines (same URL), keeping the first. Other lines
/// are untouched. Idempotent.
pub fn remove_duplicate_links(caption: &str) -> String {
    let mut seen = HashSet::new();
    caption
        .split('\n')
        .filter(|line| match line.strip_prefix(LINK_LABEL) {
            Some(url) => seen.insert(url.trim()),
            None => true,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep only the `链接：` lines whose URL belongs to `provider`; every other
/// line stays in place.
pub fn create_provider_subset(caption: &str, provider: Provider) -> String {
    caption
        .split('\n')
        .filter(|line| match line.strip_prefix(LINK_LABEL) {
            Some(url) => provider.matches(url.trim()),
            None => true,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
