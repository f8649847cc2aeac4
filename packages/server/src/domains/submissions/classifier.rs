//! Link classification by provider URL fragment.
//!
//! Matching is a plain substring test against a fixed table; no redirects are
//! followed and nothing touches the network.

use std::collections::BTreeSet;
use std::fmt;

use crate::domains::submissions::normalizer::LINK_LABEL;

/// Cloud-drive providers with a dedicated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    Quark,
    Baidu,
    Uc,
    Xunlei,
}

impl Provider {
    /// Classification order. The first provider whose host matches wins.
    pub const ALL: [Provider; 4] = [
        Provider::Quark,
        Provider::Baidu,
        Provider::Uc,
        Provider::Xunlei,
    ];

    /// Stable key used in configuration.
    pub fn key(self) -> &'static str {
        match self {
            Provider::Quark => "quark",
            Provider::Baidu => "baidu",
            Provider::Uc => "uc",
            Provider::Xunlei => "xunlei",
        }
    }

    /// Label contributors write in front of a link, e.g. `夸克：https://...`.
    pub fn label(self) -> &'static str {
        match self {
            Provider::Quark => "夸克",
            Provider::Baidu => "百度",
            Provider::Uc => "UC",
            Provider::Xunlei => "迅雷",
        }
    }

    pub fn host(self) -> &'static str {
        match self {
            Provider::Quark => "pan.quark.cn",
            Provider::Baidu => "pan.baidu.com",
            Provider::Uc => "drive.uc.cn",
            Provider::Xunlei => "pan.xunlei.com",
        }
    }

    /// Canonical share prefix shown to contributors when a link is rejected.
    pub fn url_prefix(self) -> String {
        format!("https://{}/", self.host())
    }

    /// Substring match, the same rule used for channel routing.
    pub fn matches(self, url: &str) -> bool {
        url.contains(self.host())
    }

    /// Strict match: the URL starts with this provider's host.
    pub fn is_prefix_of(self, url: &str) -> bool {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        matches!(rest, Some(rest) if rest.strip_prefix(self.host()).is_some_and(|r| r.starts_with('/')))
    }

    pub fn from_key(key: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Strip a leading `链接：` label, as found on canonical caption lines.
pub fn strip_link_label(link: &str) -> &str {
    link.strip_prefix(LINK_LABEL).unwrap_or(link).trim()
}

/// Classify one URL.
pub fn classify(url: &str) -> Option<Provider> {
    let url = strip_link_label(url);
    Provider::ALL.into_iter().find(|p| p.matches(url))
}

/// Providers present in a set of links, plus every link that matched none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClassification {
    pub providers: BTreeSet<Provider>,
    /// Unmatched URLs, verbatim and in input order.
    pub unrecognized: Vec<String>,
}

impl LinkClassification {
    pub fn has_recognized(&self) -> bool {
        !self.providers.is_empty()
    }
}

pub fn classify_all<I, S>(links: I) -> LinkClassification
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = LinkClassification::default();

    for link in links {
        let url = strip_link_label(link.as_ref());
        match classify(url) {
            Some(provider) => {
                result.providers.insert(provider);
            }
            None => result.unrecognized.push(url.to_string()),
        }
    }

    result
}
