use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::domains::submissions::{ChannelConfig, PolicyConfig, Provider};
use crate::kernel::DeliverySettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub telegram_api_base: Option<String>,
    pub port: u16,
    /// Long-poll wait in seconds.
    pub poll_timeout_secs: u64,
    pub channels: ChannelConfig,
    pub policy: PolicyConfig,
    pub delivery: DeliverySettings,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ChannelConfig::default();

        let broadcast = match var("BROADCAST_CHANNELS") {
            Some(list) => comma_list(&list),
            None => defaults.broadcast.clone(),
        };
        if broadcast.is_empty() {
            bail!("BROADCAST_CHANNELS must name at least one channel");
        }

        let mut provider_channels = BTreeMap::new();
        for provider in Provider::ALL {
            let key = format!("{}_CHANNEL", provider.key().to_uppercase());
            let channel = var(&key)
                .or_else(|| defaults.provider_channels.get(&provider).cloned())
                .filter(|c| !c.trim().is_empty());
            if let Some(channel) = channel {
                provider_channels.insert(provider, channel.trim().to_string());
            }
        }

        let policy_defaults = PolicyConfig::default();
        let list_or = |key: &str, default: Vec<String>| var(key).map(|v| comma_list(&v)).unwrap_or(default);

        Ok(Self {
            telegram_bot_token: var("TELEGRAM_BOT_TOKEN")
                .context("TELEGRAM_BOT_TOKEN must be set")?,
            telegram_api_base: var("TELEGRAM_API_BASE"),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            poll_timeout_secs: var("POLL_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .context("POLL_TIMEOUT_SECS must be a valid number")?,
            channels: ChannelConfig {
                broadcast,
                provider_channels,
                ..defaults
            },
            policy: PolicyConfig {
                ad_keywords: list_or("AD_KEYWORDS", policy_defaults.ad_keywords),
                copyright_keywords: list_or("COPYRIGHT_KEYWORDS", policy_defaults.copyright_keywords),
                suspicious_domains: list_or("SUSPICIOUS_DOMAINS", policy_defaults.suspicious_domains),
            },
            delivery: DeliverySettings {
                timeout_backoff: Duration::from_secs(
                    var("DELIVERY_TIMEOUT_BACKOFF_SECS")
                        .unwrap_or_else(|| "5".to_string())
                        .parse()
                        .context("DELIVERY_TIMEOUT_BACKOFF_SECS must be a valid number")?,
                ),
            },
        })
    }
}

fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
