use serde_json::Value;

use crate::youtube::video::PlaylistItem;
use crate::youtube::{ApiError, Transport, VideoRecord, take_items};

/// 频道的“上传”播放列表
pub struct Uploads<'a> {
    transport: &'a dyn Transport,
    channel_id: &'a str,
}

impl<'a> Uploads<'a> {
    pub fn new(transport: &'a dyn Transport, channel_id: &'a str) -> Self {
        Self { transport, channel_id }
    }

    /// 获取上传列表的 id 与频道名称
    async fn get_info(&self) -> Result<(String, String), ApiError> {
        let mut res = self
            .transport
            .get_json("channels", &[("part", "contentDetails,snippet"), ("id", self.channel_id)])
            .await?;
        let channel = take_items(&mut res)
            .into_iter()
            .next()
            .ok_or(ApiError::MissingField("items"))?;
        let uploads = channel["contentDetails"]["relatedPlaylists"]["uploads"]
            .as_str()
            .ok_or(ApiError::MissingField("contentDetails.relatedPlaylists.uploads"))?;
        let title = channel["snippet"]["title"].as_str().unwrap_or_default();
        Ok((uploads.to_owned(), title.to_owned()))
    }

    /// 获取频道最新的至多 max_results 个视频，任意一步失败都会使整体失败
    pub async fn fetch(&self, max_results: u32) -> Result<Vec<VideoRecord>, ApiError> {
        let (playlist_id, channel_title) = self.get_info().await?;
        let limit = max_results.to_string();
        let mut res = self
            .transport
            .get_json(
                "playlistItems",
                &[
                    ("part", "snippet"),
                    ("playlistId", playlist_id.as_str()),
                    ("maxResults", limit.as_str()),
                ],
            )
            .await?;
        let items: Vec<PlaylistItem> = serde_json::from_value(Value::Array(take_items(&mut res)))
            .map_err(|e| ApiError::Fetch(format!("failed to parse playlist items: {e}")))?;
        // 代理可能无视 maxResults，这里再截断一次
        items
            .into_iter()
            .take(max_results as usize)
            .map(|item| {
                let snippet = item.snippet.ok_or(ApiError::MissingField("snippet"))?;
                let video_id = snippet
                    .resource_id
                    .as_ref()
                    .and_then(|r| r.video_id.clone())
                    .ok_or(ApiError::MissingField("snippet.resourceId.videoId"))?;
                Ok(snippet.into_record(video_id, &channel_title))
            })
            .collect()
    }
}
