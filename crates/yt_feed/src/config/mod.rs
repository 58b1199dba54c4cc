use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod args;
mod item;

pub use crate::config::args::ARGS;
pub use crate::config::item::{ChannelRef, FallbackEntry};

fn default_max_results() -> u32 {
    6
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_show_featured_video() -> bool {
    true
}

fn default_api_base() -> String {
    "https://www.googleapis.com/youtube/v3".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_handle: Option<String>,
    /// 兜底视频展示时使用的频道名称
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default = "default_max_results")]
    #[validate(range(min = 1, max = 50))]
    pub max_results: u32,
    /// 缓存有效期，单位为秒
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
    #[serde(default = "default_show_featured_video", alias = "showFeaturedVideo")]
    pub show_featured_video: bool,
    #[serde(default = "default_api_base")]
    #[validate(url)]
    pub api_base: String,
    #[serde(default)]
    pub videos: Vec<FallbackEntry>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            channel_id: None,
            channel_handle: None,
            channel_name: None,
            max_results: default_max_results(),
            cache_ttl: default_cache_ttl(),
            show_featured_video: default_show_featured_video(),
            api_base: default_api_base(),
            videos: Vec::new(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// 只有 @ 的 handle 与未设置等价
fn non_blank_handle(value: &Option<String>) -> Option<&str> {
    non_blank(value).filter(|s| !s.trim_start_matches('@').trim().is_empty())
}

impl FeedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 配置中指定的频道，id 与 handle 同时存在或都不存在时返回 None
    pub fn channel(&self) -> Option<ChannelRef> {
        match (non_blank(&self.channel_id), non_blank_handle(&self.channel_handle)) {
            (Some(id), None) => Some(ChannelRef::Id(id.to_owned())),
            (None, Some(handle)) => Some(ChannelRef::Handle(handle.to_owned())),
            _ => None,
        }
    }

    pub fn channel_url(&self) -> String {
        self.channel()
            .map(|channel| channel.page_url())
            .unwrap_or_else(|| "https://www.youtube.com".to_owned())
    }

    pub fn check(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.api_key.trim().is_empty() {
            errors.push("未设置 api_key".to_owned());
        }
        match (non_blank(&self.channel_id), non_blank_handle(&self.channel_handle)) {
            (Some(_), Some(_)) => errors.push("channel_id 与 channel_handle 只能设置其中一个".to_owned()),
            (None, None) => errors.push("必须设置 channel_id 或 channel_handle".to_owned()),
            _ => {}
        }
        if let Err(e) = self.validate() {
            errors.push(e.to_string());
        }
        if !errors.is_empty() {
            bail!(
                errors
                    .into_iter()
                    .map(|e| format!("- {}", e))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn test_default() -> Self {
        Self {
            api_key: "test-key".to_owned(),
            channel_handle: Some("@rustlang".to_owned()),
            ..Default::default()
        }
    }
}
