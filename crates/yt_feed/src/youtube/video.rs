use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 统一的视频信息，既可能来自接口，也可能由兜底配置生成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail: Thumbnail,
    pub published_at: Option<DateTime<Utc>>,
    pub channel_title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl Thumbnail {
    /// 不请求接口，直接根据视频 id 拼出的缩略图
    pub fn from_id(id: &str) -> Self {
        Self {
            url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
            width: 480,
            height: 360,
        }
    }
}

pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaylistItem {
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// 按 high、medium、default 的顺序选择缩略图
    pub fn best(self) -> Option<Thumbnail> {
        self.high.or(self.medium).or(self.default)
    }
}

impl PlaylistItemSnippet {
    pub fn into_record(self, video_id: String, channel_title: &str) -> VideoRecord {
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));
        let thumbnail = self.thumbnails.best().unwrap_or_else(|| Thumbnail::from_id(&video_id));
        VideoRecord {
            url: watch_url(&video_id),
            title: self.title,
            description: self.description,
            thumbnail,
            published_at,
            channel_title: self.channel_title.unwrap_or_else(|| channel_title.to_owned()),
            id: video_id,
        }
    }
}
