use serde::{Deserialize, Serialize};

/// 配置中的兜底视频，既可以只写视频 id，也可以写完整的结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackEntry {
    Id(String),
    Detailed {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl FallbackEntry {
    pub fn id(&self) -> &str {
        match self {
            FallbackEntry::Id(id) | FallbackEntry::Detailed { id, .. } => id.trim(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            FallbackEntry::Detailed { title: Some(title), .. } if !title.trim().is_empty() => Some(title),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            FallbackEntry::Detailed { url: Some(url), .. } if !url.trim().is_empty() => Some(url),
            _ => None,
        }
    }
}

/// 频道的两种指定方式，Id 是平台内部的 UC 开头的标识，Handle 是 @ 开头的可读名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(String),
    Handle(String),
}

impl ChannelRef {
    /// 去掉 handle 前面的 @，id 原样返回
    pub fn name(&self) -> &str {
        match self {
            ChannelRef::Id(id) => id,
            ChannelRef::Handle(handle) => handle.trim_start_matches('@'),
        }
    }

    pub fn cache_key(&self) -> String {
        format!("yt_feed_{}", self.name())
    }

    pub fn page_url(&self) -> String {
        match self {
            ChannelRef::Id(id) => format!("https://www.youtube.com/channel/{}", id),
            ChannelRef::Handle(_) => format!("https://www.youtube.com/@{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_entry_deserialize() {
        let entries: Vec<FallbackEntry> = serde_json::from_value(serde_json::json!([
            "abc123",
            {"id": "xyz", "title": "Custom"},
            {"id": "qwe", "title": "", "url": "https://youtu.be/qwe"}
        ]))
        .unwrap();
        assert_eq!(entries[0], FallbackEntry::Id("abc123".to_owned()));
        assert_eq!(entries[1].id(), "xyz");
        assert_eq!(entries[1].title(), Some("Custom"));
        assert_eq!(entries[1].url(), None);
        assert_eq!(entries[2].title(), None);
        assert_eq!(entries[2].url(), Some("https://youtu.be/qwe"));
    }

    #[test]
    fn test_channel_ref() {
        let handle = ChannelRef::Handle("@rustlang".to_owned());
        assert_eq!(handle.cache_key(), "yt_feed_rustlang");
        assert_eq!(handle.page_url(), "https://www.youtube.com/@rustlang");
        let id = ChannelRef::Id("UCaYhcUwRBNscFNUKTjgPFiA".to_owned());
        assert_eq!(id.cache_key(), "yt_feed_UCaYhcUwRBNscFNUKTjgPFiA");
        assert_eq!(id.page_url(), "https://www.youtube.com/channel/UCaYhcUwRBNscFNUKTjgPFiA");
    }
}
