//! Declarative field-extraction rules.
//!
//! Each field is located independently: a rule tries its primary pattern,
//! then its fallback, and a field that matches neither stays empty. Rust's
//! regex engine has no lookahead, so multi-line fields end at the next
//! recognized label line found by [`LABEL_BOUNDARY`].

use lazy_static::lazy_static;
use regex::Regex;

/// Fields extracted by label. Links have their own grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Size,
    Tags,
}

/// How far a field's value reaches past its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Rest of the label's line.
    Line,
    /// Until the next recognized label line or end of text.
    UntilNextLabel,
}

pub struct FieldRule {
    pub field: Field,
    /// Matches the label; the value starts where the match ends.
    pub primary: Regex,
    pub fallback: Option<Regex>,
    pub span: Span,
}

impl FieldRule {
    fn new(field: Field, primary: &str, fallback: Option<&str>, span: Span) -> Self {
        Self {
            field,
            primary: Regex::new(primary).expect("field rule pattern must compile"),
            fallback: fallback.map(|p| Regex::new(p).expect("field rule pattern must compile")),
            span,
        }
    }

    /// Trimmed value of the first non-empty match, primary before fallback.
    pub fn extract(&self, text: &str) -> Option<String> {
        std::iter::once(&self.primary)
            .chain(self.fallback.as_ref())
            .find_map(|label| self.value_after(label, text))
    }

    /// Value after the first label occurrence that carries one. An empty
    /// label line does not hide a later filled one.
    fn value_after(&self, label: &Regex, text: &str) -> Option<String> {
        label.find_iter(text).find_map(|m| {
            let rest = &text[m.end()..];
            let end = match self.span {
                Span::Line => rest.find('\n').unwrap_or(rest.len()),
                Span::UntilNextLabel => LABEL_BOUNDARY
                    .find(rest)
                    .map(|b| b.start())
                    .unwrap_or(rest.len()),
            };
            let value = rest[..end].trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }
}

// Label colon: full-width or half-width, optional horizontal space around it.
macro_rules! label {
    ($name:literal) => {
        concat!($name, r"[\t \x{3000}]*[：:][\t \x{3000}]*")
    };
}

lazy_static! {
    /// Start of a line that opens another field.
    pub static ref LABEL_BOUNDARY: Regex = Regex::new(
        r"\n[\t \x{3000}]*(?:📁|🏷|(?:链接|夸克|百度|UC|迅雷|大小|标签|名称|资源标题|描述|简介)[\t \x{3000}]*[：:])"
    ).expect("boundary pattern must compile");

    /// Parser rules, one per labelled field.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule::new(Field::Name, label!("名称"), Some(label!("资源标题")), Span::Line),
        FieldRule::new(Field::Description, label!("描述"), Some(label!("简介")), Span::UntilNextLabel),
        FieldRule::new(
            Field::Size,
            concat!(r"📁\x{FE0F}?[\t ]*", label!("大小")),
            Some(label!("大小")),
            Span::Line,
        ),
        FieldRule::new(
            Field::Tags,
            concat!(r"🏷\x{FE0F}?[\t ]*", label!("标签")),
            Some(label!("标签")),
            Span::Line,
        ),
    ];

    /// Share URLs of the four providers, wherever they occur.
    pub static ref PROVIDER_LINK: Regex = Regex::new(
        r"https?://(?:pan\.quark\.cn/s/|pan\.baidu\.com/s/|drive\.uc\.cn/|pan\.xunlei\.com/s/)\S+"
    ).expect("provider link pattern must compile");

    /// Broader grammar used when PROVIDER_LINK finds nothing: any URL after a
    /// `链接` label, or any URL on a provider's domain family.
    pub static ref FALLBACK_LINK: Regex = Regex::new(
        r"链接[\t \x{3000}]*[：:]\s*(https?://\S+)|(https?://(?:[\w-]+\.)*(?:quark\.cn|baidu\.com|uc\.cn|xunlei\.com)/\S+)"
    ).expect("fallback link pattern must compile");

    /// URL after a provider-name label, e.g. `百度：https://...`.
    pub static ref PROVIDER_LABELLED_LINK: Regex = Regex::new(
        r"(?:夸克|百度|UC|迅雷)[\t \x{3000}]*[：:]\s*(https?://\S+)"
    ).expect("labelled link pattern must compile");

    /// URL after the canonical `链接：` label.
    pub static ref CANONICAL_LINK: Regex = Regex::new(r"链接：\s*(https?://\S+)")
        .expect("canonical link pattern must compile");

    /// Same, accepting a half-width colon.
    pub static ref LOOSE_LABELLED_LINK: Regex = Regex::new(r"链接[：:]\s*(https?://\S+)")
        .expect("labelled link pattern must compile");

    /// Any http(s) URL.
    pub static ref ANY_URL: Regex = Regex::new(r"https?://\S+")
        .expect("url pattern must compile");

    /// Full canonical layout, used by strict format validation.
    pub static ref CANONICAL_LAYOUT: Regex = Regex::new(
        r"(?s)名称：\s*.*\n\n描述：\s*.*\n\n(?:链接：[ \t]*https?://\S+\n)+\n📁 大小：\s*.*\n🏷 标签：\s*.*"
    ).expect("layout pattern must compile");
}

pub fn rule(field: Field) -> &'static FieldRule {
    FIELD_RULES
        .iter()
        .find(|r| r.field == field)
        .expect("every field has a rule")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_before_fallback() {
        let text = "资源标题：备用\n名称：主标题";
        assert_eq!(rule(Field::Name).extract(text).as_deref(), Some("主标题"));
    }

    #[test]
    fn test_fallback_synonym() {
        let text = "资源标题：备用标题\n简介：一段简介";
        assert_eq!(rule(Field::Name).extract(text).as_deref(), Some("备用标题"));
        assert_eq!(
            rule(Field::Description).extract(text).as_deref(),
            Some("一段简介")
        );
    }

    #[test]
    fn test_half_width_colon() {
        assert_eq!(
            rule(Field::Name).extract("名称: 半角").as_deref(),
            Some("半角")
        );
    }

    #[test]
    fn test_empty_label_does_not_swallow_next_line() {
        let text = "名称：\n\n描述：有内容";
        assert_eq!(rule(Field::Name).extract(text), None);
    }

    #[test]
    fn test_empty_label_line_does_not_hide_later_value() {
        let text = "📁 大小：\n🏷 标签：\n大小：3G\n标签：#a";
        assert_eq!(rule(Field::Size).extract(text).as_deref(), Some("3G"));
        assert_eq!(rule(Field::Tags).extract(text).as_deref(), Some("#a"));

        let text = "名称：\n名称：第二个";
        assert_eq!(rule(Field::Name).extract(text).as_deref(), Some("第二个"));
    }

    #[test]
    fn test_description_stops_at_next_label() {
        let text = "描述：第一行\n第二行\n链接：https://pan.quark.cn/s/a";
        assert_eq!(
            rule(Field::Description).extract(text).as_deref(),
            Some("第一行\n第二行")
        );
    }

    #[test]
    fn test_size_with_and_without_icon() {
        assert_eq!(
            rule(Field::Size).extract("📁 大小：1GB").as_deref(),
            Some("1GB")
        );
        assert_eq!(rule(Field::Size).extract("大小：2GB").as_deref(), Some("2GB"));
    }

    #[test]
    fn test_tags_with_variation_selector() {
        assert_eq!(
            rule(Field::Tags).extract("🏷️ 标签：#国剧 #爱情").as_deref(),
            Some("#国剧 #爱情")
        );
    }

    #[test]
    fn test_canonical_layout_matches() {
        let caption = "名称：a\n\n描述：b\n\n链接：https://pan.quark.cn/s/x\n\n📁 大小：1GB\n🏷 标签：#t";
        assert!(CANONICAL_LAYOUT.is_match(caption));
        assert!(!CANONICAL_LAYOUT.is_match("名称：a\n描述：b"));
    }
}
