use crate::domains::submissions::classifier::Provider;
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::extraction::labelled_links;
use crate::domains::submissions::extraction::rules::{rule, Field};

const AD_KEYWORDS: &[&str] = &["兼职", "招聘", "游戏代练", "刷单", "刷钻"];

const COPYRIGHT_KEYWORDS: &[&str] = &[
    "⚠️ 版权：",
    "版权反馈/DMCA",
    "📢 频道 👥群组🔍投稿/搜索",
    "版权",
    "版权反馈",
    "DMCA",
    "频道",
    "群组",
    "投稿",
    "搜索",
];

const SUSPICIOUS_DOMAINS: &[&str] = &[
    "taobao.com",
    "tmall.com",
    "jd.com",
    "wechat",
    "wx.qq.com",
    "alipay.com",
];

/// Keyword and domain lists. Loaded once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Disqualify a caption when found in its description, and a record
    /// when found in its name or description.
    pub ad_keywords: Vec<String>,
    /// Disqualify a record when found in its name or description.
    pub copyright_keywords: Vec<String>,
    /// Substrings marking a non-provider link as suspicious.
    pub suspicious_domains: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            ad_keywords: owned(AD_KEYWORDS),
            copyright_keywords: owned(COPYRIGHT_KEYWORDS),
            suspicious_domains: owned(SUSPICIOUS_DOMAINS),
        }
    }
}

/// What tripped the filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    AdKeyword,
    SuspiciousLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyMatch {
    pub kind: ViolationKind,
    /// The keyword, or the offending URL.
    pub value: String,
}

#[derive(Debug, Default, Clone)]
pub struct PolicyFindings {
    pub matches: Vec<PolicyMatch>,
}

impl PolicyFindings {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    pub fn add(&mut self, kind: ViolationKind, value: impl Into<String>) {
        self.matches.push(PolicyMatch {
            kind,
            value: value.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn by_kind(&self, kind: &ViolationKind) -> Vec<&PolicyMatch> {
        self.matches.iter().filter(|m| &m.kind == kind).collect()
    }
}

/// Content policy filter. Pure: the same caption always gets the same verdict.
#[derive(Debug, Clone, Default)]
pub struct ContentPolicy {
    config: PolicyConfig,
}

impl ContentPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Run both caption checks and report everything found.
    pub fn scan(&self, caption: &str) -> PolicyFindings {
        let mut findings = PolicyFindings::new();

        if let Some(description) = rule(Field::Description).extract(caption) {
            for keyword in &self.config.ad_keywords {
                if description.contains(keyword.as_str()) {
                    findings.add(ViolationKind::AdKeyword, keyword.as_str());
                }
            }
        }

        for url in labelled_links(caption) {
            if self.is_suspicious_link(&url) {
                findings.add(ViolationKind::SuspiciousLink, url);
            }
        }

        findings
    }

    /// True when the caption must not be published.
    pub fn is_disallowed(&self, caption: &str) -> bool {
        !self.scan(caption).is_empty()
    }

    /// Same verdict as [`is_disallowed`](Self::is_disallowed), as a `Result`.
    pub fn check_caption(&self, caption: &str) -> Result<(), SubmissionError> {
        if self.is_disallowed(caption) {
            Err(SubmissionError::AdContent)
        } else {
            Ok(())
        }
    }

    /// First denylisted keyword found in name or description. Ad keywords
    /// are searched before copyright keywords, each list in order.
    pub fn check_record(&self, name: &str, description: &str) -> Result<(), SubmissionError> {
        match self
            .config
            .ad_keywords
            .iter()
            .chain(&self.config.copyright_keywords)
            .find(|k| name.contains(k.as_str()) || description.contains(k.as_str()))
        {
            Some(keyword) => Err(SubmissionError::PolicyViolation(keyword.clone())),
            None => Ok(()),
        }
    }

    fn is_suspicious_link(&self, url: &str) -> bool {
        let from_provider = Provider::ALL.iter().any(|p| p.is_prefix_of(url));
        !from_provider
            && self
                .config
                .suspicious_domains
                .iter()
                .any(|domain| url.contains(domain.as_str()))
    }
}
