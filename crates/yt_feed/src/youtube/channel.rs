use serde_json::Value;

use crate::config::ChannelRef;
use crate::youtube::{ApiError, Transport, take_items};

pub struct Channel<'a> {
    transport: &'a dyn Transport,
    channel: &'a ChannelRef,
}

impl<'a> Channel<'a> {
    pub fn new(transport: &'a dyn Transport, channel: &'a ChannelRef) -> Self {
        Self { transport, channel }
    }

    /// 将频道解析为 channel id，id 原样返回，handle 依次尝试用户名查询与搜索
    pub async fn resolve_id(&self) -> Result<String, ApiError> {
        let handle = match self.channel {
            ChannelRef::Id(id) => return Ok(id.clone()),
            ChannelRef::Handle(_) => self.channel.name(),
        };
        let resolution_failed = |e: ApiError| {
            warn!("解析频道 @{handle} 时请求失败：{e}");
            ApiError::Resolution(format!("@{handle}"))
        };
        if let Some(id) = self.by_username(handle).await.map_err(resolution_failed)? {
            debug!("通过用户名查询解析到频道 @{handle}：{id}");
            return Ok(id);
        }
        if let Some(id) = self.by_search(handle).await.map_err(resolution_failed)? {
            debug!("通过搜索解析到频道 @{handle}：{id}");
            return Ok(id);
        }
        Err(ApiError::Resolution(format!("@{handle}")))
    }

    async fn by_username(&self, handle: &str) -> Result<Option<String>, ApiError> {
        let mut res = self
            .transport
            .get_json("channels", &[("part", "id"), ("forUsername", handle)])
            .await?;
        Ok(take_items(&mut res)
            .into_iter()
            .find_map(|item| item["id"].as_str().map(str::to_owned)))
    }

    async fn by_search(&self, handle: &str) -> Result<Option<String>, ApiError> {
        let mut res = self
            .transport
            .get_json(
                "search",
                &[("part", "snippet"), ("type", "channel"), ("maxResults", "1"), ("q", handle)],
            )
            .await?;
        Ok(take_items(&mut res).iter().find_map(search_channel_id))
    }
}

fn search_channel_id(item: &Value) -> Option<String> {
    item["snippet"]["channelId"]
        .as_str()
        .or_else(|| item["id"]["channelId"].as_str())
        .map(str::to_owned)
}
