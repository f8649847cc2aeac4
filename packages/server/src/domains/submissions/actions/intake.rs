use tracing::debug;

use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::extraction::{matches_canonical_layout, parse, repair};
use crate::domains::submissions::models::{CanonicalCaption, SubmissionRecord};
use crate::domains::submissions::normalizer::{remove_duplicate_links, render};
use crate::domains::submissions::policy::ContentPolicy;

/// Turn a single-message caption into a canonical caption ready to become a
/// draft.
///
/// Strict tier: when `parse` finds both a name and a description, the record
/// is rendered (denylisted keywords surface as `PolicyViolation`) and then
/// run through the policy filter.
///
/// Otherwise the raw text is screened first, accepted as-is when it already
/// has the canonical layout, and repaired when it does not. A repaired
/// caption is screened again and must pass the layout check. Whatever is
/// accepted has had its name and description checked against the denylist.
pub fn accept_caption(
    raw: &str,
    policy: &ContentPolicy,
) -> Result<CanonicalCaption, SubmissionError> {
    let record = parse(raw);

    if record.has_name_and_description() {
        let caption = render(&record, policy)?;
        policy.check_caption(&caption)?;
        debug!("caption accepted by strict parse");
        return Ok(caption);
    }

    policy.check_caption(raw)?;
    policy.check_record(&record.name, &record.description)?;

    if matches_canonical_layout(raw) {
        debug!("caption accepted by layout check");
        return Ok(remove_duplicate_links(raw));
    }

    let repaired = repair(raw);
    policy.check_caption(&repaired)?;
    let fixed = parse(&repaired);
    policy.check_record(&fixed.name, &fixed.description)?;
    if !matches_canonical_layout(&repaired) {
        return Err(SubmissionError::MalformedCaption);
    }

    debug!("caption accepted after repair");
    Ok(remove_duplicate_links(&repaired))
}

/// Final step of the guided flow: render the collected record and screen it.
pub fn complete_guided(
    record: &SubmissionRecord,
    policy: &ContentPolicy,
) -> Result<CanonicalCaption, SubmissionError> {
    let caption = render(record, policy)?;
    policy.check_caption(&caption)?;
    Ok(caption)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::submissions::extraction::repair::{DEFAULT_NAME, DEFAULT_SIZE};
    use crate::domains::submissions::normalizer::PLACEHOLDER_LINK;

    fn policy() -> ContentPolicy {
        ContentPolicy::default()
    }

    #[test]
    fn test_strict_tier_renders_with_promo_tag() {
        let raw = "名称：测试\n\n描述：测试描述\n\n链接：https://pan.quark.cn/s/abc\n\n📁 大小：1GB\n🏷 标签：#test";
        let caption = accept_caption(raw, &policy()).unwrap();

        assert_eq!(
            caption,
            "名称：测试\n\n描述：测试描述\n\n链接：https://pan.quark.cn/s/abc\n\n📁 大小：1GB\n🏷 标签：#test #鹏摇星海"
        );
    }

    #[test]
    fn test_strict_tier_rejects_ad_description() {
        let raw = "名称：测试\n\n描述：兼职日结\n\n链接：https://pan.quark.cn/s/abc\n\n📁 大小：1GB\n🏷 标签：#test";
        assert_eq!(
            accept_caption(raw, &policy()),
            Err(SubmissionError::PolicyViolation("兼职".to_string()))
        );
    }

    #[test]
    fn test_strict_tier_rejects_suspicious_link_after_render() {
        let raw = "名称：测试\n\n描述：测试描述\n\n链接：https://item.taobao.com/item.htm?id=1";
        assert_eq!(
            accept_caption(raw, &policy()),
            Err(SubmissionError::AdContent)
        );
    }

    #[test]
    fn test_name_and_description_without_links_take_strict_tier() {
        let raw = "名称：测试\n描述：好资源";
        let caption = accept_caption(raw, &policy()).unwrap();

        assert_eq!(
            caption,
            format!(
                "名称：测试\n\n描述：好资源\n\n链接：{}\n\n📁 大小：\n🏷 标签：#鹏摇星海",
                PLACEHOLDER_LINK
            )
        );
    }

    #[test]
    fn test_name_and_description_without_links_still_screened() {
        assert_eq!(
            accept_caption("名称：关注频道获取更多\n描述：好资源", &policy()),
            Err(SubmissionError::PolicyViolation("频道".to_string()))
        );
    }

    #[test]
    fn test_layout_match_with_denylisted_description_is_rejected() {
        let raw = "名称：\n\n描述：加入群组投稿\n\n链接：https://pan.quark.cn/s/a\n\n📁 大小：1G\n🏷 标签：#t";
        assert!(matches_canonical_layout(raw));

        assert_eq!(
            accept_caption(raw, &policy()),
            Err(SubmissionError::PolicyViolation("群组".to_string()))
        );
    }

    #[test]
    fn test_partial_caption_with_denylisted_name_is_rejected() {
        let raw = "名称：频道合集\nhttps://pan.quark.cn/s/a";
        assert_eq!(
            accept_caption(raw, &policy()),
            Err(SubmissionError::PolicyViolation("频道".to_string()))
        );
    }

    #[test]
    fn test_strict_tier_surfaces_copyright_keyword() {
        let raw = "名称：测试\n\n描述：欢迎投稿\n\n链接：https://pan.quark.cn/s/abc";
        assert_eq!(
            accept_caption(raw, &policy()),
            Err(SubmissionError::PolicyViolation("投稿".to_string()))
        );
    }

    #[test]
    fn test_incomplete_caption_is_repaired() {
        let raw = "描述：只有描述\n百度：https://pan.baidu.com/s/1abc";
        let caption = accept_caption(raw, &policy()).unwrap();

        assert!(caption.starts_with(&format!("名称：{}", DEFAULT_NAME)));
        assert!(caption.contains("链接：https://pan.baidu.com/s/1abc"));
        assert!(caption.contains(&format!("📁 大小：{}", DEFAULT_SIZE)));
        assert!(matches_canonical_layout(&caption));
    }

    #[test]
    fn test_incomplete_caption_with_ad_is_rejected_before_repair() {
        let raw = "描述：刷单返利\nhttps://pan.baidu.com/s/1abc";
        assert_eq!(
            accept_caption(raw, &policy()),
            Err(SubmissionError::AdContent)
        );
    }

    #[test]
    fn test_guided_record_goes_through_render() {
        let record = SubmissionRecord {
            name: "测试".to_string(),
            description: "测试描述".to_string(),
            links: vec!["https://pan.quark.cn/s/abc".to_string()],
            size: "1GB".to_string(),
            tags: "#test".to_string(),
        };

        assert_eq!(
            complete_guided(&record, &policy()).unwrap(),
            render(&record, &policy()).unwrap()
        );
    }

    #[test]
    fn test_guided_record_with_ad_is_rejected() {
        let record = SubmissionRecord {
            name: "测试".to_string(),
            description: "招聘代理".to_string(),
            links: vec!["https://pan.quark.cn/s/abc".to_string()],
            ..Default::default()
        };

        assert_eq!(
            complete_guided(&record, &policy()),
            Err(SubmissionError::PolicyViolation("招聘".to_string()))
        );
    }
}
