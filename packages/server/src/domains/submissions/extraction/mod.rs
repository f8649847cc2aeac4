//! Caption extraction: free-form text → [`SubmissionRecord`].
//!
//! Two grammars:
//! - [`parse`]: strict rules, total, never fails (unmatched fields stay empty)
//! - [`repair`]: looser rules plus defaults, returns a canonical caption

pub mod repair;
pub mod rules;

pub use repair::repair;

use crate::domains::submissions::models::SubmissionRecord;
use rules::{
    rule, Field, ANY_URL, CANONICAL_LAYOUT, CANONICAL_LINK, FALLBACK_LINK, PROVIDER_LINK,
};

/// Extract a structured record from free-form text.
pub fn parse(raw: &str) -> SubmissionRecord {
    let field = |f: Field| rule(f).extract(raw).unwrap_or_default();

    SubmissionRecord {
        name: field(Field::Name),
        description: field(Field::Description),
        links: find_links(raw),
        size: field(Field::Size),
        tags: field(Field::Tags),
    }
}

/// Provider-shaped URLs anywhere in the text, deduplicated in first-seen
/// order. Falls back to the broader grammar when none are found.
pub fn find_links(raw: &str) -> Vec<String> {
    let mut links = SubmissionRecord::default();

    for m in PROVIDER_LINK.find_iter(raw) {
        links.push_link(m.as_str());
    }

    if links.links.is_empty() {
        for caps in FALLBACK_LINK.captures_iter(raw) {
            if let Some(url) = caps.get(1).or_else(|| caps.get(2)) {
                links.push_link(url.as_str());
            }
        }
    }

    links.links
}

/// URLs on `链接：` lines, in caption order. This is what publishing routes on.
pub fn labelled_links(caption: &str) -> Vec<String> {
    CANONICAL_LINK
        .captures_iter(caption)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Links typed one per line in the guided flow.
///
/// Each line may carry a `链接：` or provider label; the first URL on the
/// line is kept. Lines without a URL are dropped.
pub fn extract_link_lines(text: &str) -> Vec<String> {
    let mut record = SubmissionRecord::default();
    for line in text.lines() {
        if let Some(url) = ANY_URL.find(line) {
            record.push_link(url.as_str());
        }
    }
    record.links
}

/// Strict format validation: the caption already has the canonical layout.
pub fn matches_canonical_layout(caption: &str) -> bool {
    CANONICAL_LAYOUT.is_match(caption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_example() {
        let raw = "名称：测试\n\n描述：测试描述\n\n链接：https://pan.quark.cn/s/abc\n\n📁 大小：1GB\n🏷 标签：#test";
        let record = parse(raw);

        assert_eq!(
            record,
            SubmissionRecord {
                name: "测试".to_string(),
                description: "测试描述".to_string(),
                links: vec!["https://pan.quark.cn/s/abc".to_string()],
                size: "1GB".to_string(),
                tags: "#test".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_is_total_on_garbage() {
        let record = parse("随便说点什么");
        assert_eq!(record, SubmissionRecord::default());
    }

    #[test]
    fn test_parse_fields_independently() {
        let record = parse("🏷 标签：#剧集\n一些文字 https://pan.baidu.com/s/1abc?pwd=xy12");

        assert!(record.name.is_empty());
        assert!(record.description.is_empty());
        assert_eq!(record.tags, "#剧集");
        assert_eq!(record.links, vec!["https://pan.baidu.com/s/1abc?pwd=xy12"]);
    }

    #[test]
    fn test_parse_provider_labelled_links_dedup() {
        let raw = "名称：a\n描述：b\n夸克：https://pan.quark.cn/s/1\n百度: https://pan.baidu.com/s/2\n链接：https://pan.quark.cn/s/1";
        let record = parse(raw);

        assert_eq!(
            record.links,
            vec!["https://pan.quark.cn/s/1", "https://pan.baidu.com/s/2"]
        );
    }

    #[test]
    fn test_parse_falls_back_to_broader_grammar() {
        let raw = "链接：https://example.com/share\nhttps://yun.baidu.com/x/abc";
        let record = parse(raw);

        assert_eq!(
            record.links,
            vec!["https://example.com/share", "https://yun.baidu.com/x/abc"]
        );
    }

    #[test]
    fn test_primary_grammar_shadows_fallback() {
        let raw = "链接：https://example.com/share\n链接：https://pan.quark.cn/s/abc";
        assert_eq!(parse(raw).links, vec!["https://pan.quark.cn/s/abc"]);
    }

    #[test]
    fn test_labelled_links_in_order() {
        let caption = "链接：https://pan.quark.cn/s/a\n描述：https://pan.quark.cn/s/z\n链接： https://example.com/b";
        assert_eq!(
            labelled_links(caption),
            vec!["https://pan.quark.cn/s/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_extract_link_lines_strips_labels() {
        let text = "夸克：https://pan.quark.cn/s/a\n\n链接：https://pan.baidu.com/s/b\n不是链接\nhttps://pan.quark.cn/s/a";
        assert_eq!(
            extract_link_lines(text),
            vec!["https://pan.quark.cn/s/a", "https://pan.baidu.com/s/b"]
        );
    }

    #[test]
    fn test_extract_link_lines_without_urls() {
        assert!(extract_link_lines("没有链接\n还是没有").is_empty());
    }
}
