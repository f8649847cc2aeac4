use crate::domains::submissions::extraction::rules::{
    rule, Field, LOOSE_LABELLED_LINK, PROVIDER_LABELLED_LINK, PROVIDER_LINK,
};
use crate::domains::submissions::models::{CanonicalCaption, SubmissionRecord};
use crate::domains::submissions::normalizer::{assemble, LINK_LABEL, PLACEHOLDER_LINK};

pub const DEFAULT_NAME: &str = "未提供";
pub const DEFAULT_DESCRIPTION: &str = "未提供";
pub const DEFAULT_SIZE: &str = "NG";
pub const DEFAULT_TAGS: &str = "#网盘资源";

/// Rebuild a canonical caption from a caption that failed strict validation.
///
/// Fields still empty after the looser extraction get fixed defaults. The
/// result re-parses to itself, so `repair(repair(x)) == repair(x)`.
pub fn repair(raw: &str) -> CanonicalCaption {
    let field = |f: Field, default: &str| {
        rule(f)
            .extract(raw)
            .unwrap_or_else(|| default.to_string())
    };

    let name = field(Field::Name, DEFAULT_NAME);
    let description = field(Field::Description, DEFAULT_DESCRIPTION);
    let size = field(Field::Size, DEFAULT_SIZE);
    let tags = field(Field::Tags, DEFAULT_TAGS);

    let mut links = repair_links(raw);
    if links.is_empty() {
        links.push(PLACEHOLDER_LINK.to_string());
    }
    let link_lines: Vec<String> = links
        .iter()
        .map(|url| format!("{}{}", LINK_LABEL, url))
        .collect();

    assemble(&name, &description, &link_lines, &size, &tags)
}

/// Labelled links, then provider-labelled links, then bare provider URLs.
fn repair_links(raw: &str) -> Vec<String> {
    let mut record = SubmissionRecord::default();

    for pattern in [&*LOOSE_LABELLED_LINK, &*PROVIDER_LABELLED_LINK] {
        for caps in pattern.captures_iter(raw) {
            if let Some(url) = caps.get(1) {
                record.push_link(url.as_str());
            }
        }
    }
    for m in PROVIDER_LINK.find_iter(raw) {
        record.push_link(m.as_str());
    }

    record.links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::submissions::extraction::matches_canonical_layout;

    #[test]
    fn test_repair_fills_defaults() {
        let repaired = repair("随便写的内容");

        assert_eq!(
            repaired,
            format!(
                "名称：未提供\n\n描述：未提供\n\n链接：{}\n\n📁 大小：NG\n🏷 标签：#网盘资源",
                PLACEHOLDER_LINK
            )
        );
        assert!(matches_canonical_layout(&repaired));
    }

    #[test]
    fn test_repair_reorders_loose_caption() {
        let raw = "🏷 标签：#电影\n名称: 我在顶峰等你\n简介：上一世...\n百度：https://pan.baidu.com/s/1YF?pwd=pyxh\n大小：3G";
        let repaired = repair(raw);

        assert_eq!(
            repaired,
            "名称：我在顶峰等你\n\n描述：上一世...\n\n链接：https://pan.baidu.com/s/1YF?pwd=pyxh\n\n📁 大小：3G\n🏷 标签：#电影"
        );
    }

    #[test]
    fn test_repair_is_idempotent() {
        let inputs = [
            "",
            "名称：a",
            "描述：多行\n描述内容\n链接:https://pan.quark.cn/s/1\nhttps://pan.xunlei.com/s/2",
            "名称：x\n\n描述：y\n\n链接：https://example.com/z\n\n📁 大小：1G\n🏷 标签：#t",
            "资源标题：标题\n夸克：https://pan.quark.cn/s/q\nUC：https://drive.uc.cn/s/u",
        ];

        for input in inputs {
            let once = repair(input);
            assert_eq!(repair(&once), once, "repair not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_repair_preserves_canonical_caption() {
        let canonical = "名称：测试\n\n描述：测试描述\n\n链接：https://pan.quark.cn/s/abc\n链接：https://pan.baidu.com/s/def\n\n📁 大小：1GB\n🏷 标签：#test";
        assert_eq!(repair(canonical), canonical);
    }
}
