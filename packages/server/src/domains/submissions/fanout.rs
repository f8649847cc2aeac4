//! Channel fan-out: which channels get a caption, and in what form.
//!
//! Broadcast channels always receive the full caption. Each provider present
//! in the caption adds its dedicated channel, which receives only that
//! provider's links.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domains::submissions::classifier::{classify_all, Provider};
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::extraction::labelled_links;
use crate::domains::submissions::normalizer::{create_provider_subset, remove_duplicate_links};

const BROADCAST_FOOTER: &str = "📢 频道：@yunpanNB\n\
👥 群组：@naclzy\n\
🔗 获取更多资源：https://docs.qq.com/aio/DYmZYVGpFVGxOS3NE\n\
🎉 来源：https://link3.cc/pyxh";

const PROVIDER_FOOTER: &str = "📢 频道：@yunpanNB\n\
👥 群组：@naclzy\n\
🔗 获取更多资源：https://docs.qq.com/aio/DYmZYVGpFVGxOS3NE\n\
🔗交流讨论：https://link3.cc/pyxh";

/// Channel table. Static configuration, immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Receive every submission with all links.
    pub broadcast: Vec<String>,
    /// Dedicated channel per provider.
    pub provider_channels: BTreeMap<Provider, String>,
    pub broadcast_footer: String,
    pub provider_footer: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            broadcast: vec!["@yunpanNB".to_string(), "@ammmziyuan".to_string()],
            provider_channels: BTreeMap::from([
                (Provider::Quark, "@yunpanquark".to_string()),
                (Provider::Baidu, "@yunpanbaidu".to_string()),
                (Provider::Uc, "@pxyunpanuc".to_string()),
                (Provider::Xunlei, "@pxyunpanxunlei".to_string()),
            ]),
            broadcast_footer: BROADCAST_FOOTER.to_string(),
            provider_footer: PROVIDER_FOOTER.to_string(),
        }
    }
}

/// One delivery target and the text it gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAssignment {
    pub channel_id: String,
    pub caption: String,
    /// `None` for broadcast channels.
    pub provider: Option<Provider>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutPlan {
    pub assignments: Vec<ChannelAssignment>,
    pub providers: BTreeSet<Provider>,
    /// Links that matched no provider. They stay in the broadcast caption.
    pub unrecognized: Vec<String>,
}

impl FanoutPlan {
    pub fn channel_ids(&self) -> Vec<&str> {
        self.assignments
            .iter()
            .map(|a| a.channel_id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct FanoutResolver {
    channels: ChannelConfig,
}

impl FanoutResolver {
    pub fn new(channels: ChannelConfig) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> &ChannelConfig {
        &self.channels
    }

    /// Compute the assignments for a canonical caption.
    ///
    /// Fails with [`SubmissionError::NoRecognizedLinks`] when no `链接：` line
    /// belongs to a known provider; the error carries the unmatched URLs.
    pub fn resolve(&self, caption: &str) -> Result<FanoutPlan, SubmissionError> {
        let caption = remove_duplicate_links(caption);
        let links = labelled_links(&caption);
        let classification = classify_all(&links);

        if !classification.has_recognized() {
            return Err(SubmissionError::NoRecognizedLinks {
                unrecognized: classification.unrecognized,
            });
        }

        let mut assignments: Vec<ChannelAssignment> = self
            .channels
            .broadcast
            .iter()
            .map(|channel_id| ChannelAssignment {
                channel_id: channel_id.clone(),
                caption: with_footer(&caption, &self.channels.broadcast_footer),
                provider: None,
            })
            .collect();

        for provider in &classification.providers {
            let Some(channel_id) = self.channels.provider_channels.get(provider) else {
                debug!(provider = %provider, "no dedicated channel configured");
                continue;
            };
            let subset = remove_duplicate_links(&create_provider_subset(&caption, *provider));
            assignments.push(ChannelAssignment {
                channel_id: channel_id.clone(),
                caption: with_footer(&subset, &self.channels.provider_footer),
                provider: Some(*provider),
            });
        }

        Ok(FanoutPlan {
            assignments,
            providers: classification.providers,
            unrecognized: classification.unrecognized,
        })
    }
}

fn with_footer(caption: &str, footer: &str) -> String {
    if footer.is_empty() {
        caption.to_string()
    } else {
        format!("{}\n\n{}", caption, footer)
    }
}
