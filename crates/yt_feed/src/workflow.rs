use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cache::{KvStore, VideoCache};
use crate::config::{ChannelRef, FeedConfig};
use crate::error::FeedError;
use crate::fallback;
use crate::render::{self, RenderTarget};
use crate::youtube::{Channel, Transport, Uploads, VideoRecord};

/// 没能展示视频的原因，决定错误页的提示文字
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    NoVideos,
    LoadFailed,
}

impl FailureKind {
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::NoVideos => "No videos found.",
            FailureKind::LoadFailed => "Failed to load videos.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Cache,
    Api,
    Fallback,
}

/// 一次获取流程的最终结果，要么是至少一个视频，要么是错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResult {
    Videos(Vec<VideoRecord>),
    Failed(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Init,
    /// 配置有误，不会发起请求也不会渲染
    Invalid,
    CacheCheck,
    Loading,
    FallbackCheck(FailureKind),
    Rendered(Source),
    ErrorShown(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ConfigValid,
    ConfigInvalid,
    CacheHit,
    CacheMiss,
    /// 接口请求成功，携带获取到的视频数量
    Fetched(usize),
    FetchFailed,
    /// 兜底视频生成完毕，携带生成的视频数量
    FallbackComposed(usize),
}

impl FeedState {
    /// 状态转移，返回 None 表示该状态下不应出现此事件
    pub fn next(self, event: Event) -> Option<FeedState> {
        use Event::*;
        use FeedState::*;

        match (self, event) {
            (Init, ConfigValid) => Some(CacheCheck),
            (Init, ConfigInvalid) => Some(Invalid),
            (CacheCheck, CacheHit) => Some(Rendered(Source::Cache)),
            (CacheCheck, CacheMiss) => Some(Loading),
            (Loading, Fetched(0)) => Some(FallbackCheck(FailureKind::NoVideos)),
            (Loading, Fetched(_)) => Some(Rendered(Source::Api)),
            (Loading, FetchFailed) => Some(FallbackCheck(FailureKind::LoadFailed)),
            (FallbackCheck(kind), FallbackComposed(0)) => Some(ErrorShown(kind)),
            (FallbackCheck(_), FallbackComposed(_)) => Some(Rendered(Source::Fallback)),
            (Invalid | Rendered(_) | ErrorShown(_), _) => None,
            (Init | CacheCheck | Loading | FallbackCheck(_), _) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedState::Invalid | FeedState::Rendered(_) | FeedState::ErrorShown(_))
    }
}

pub struct VideoFeedController {
    config: Arc<FeedConfig>,
    transport: Arc<dyn Transport>,
    cache: VideoCache,
    target: Arc<dyn RenderTarget>,
}

impl VideoFeedController {
    pub fn new(
        config: Arc<FeedConfig>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KvStore>,
        target: Arc<dyn RenderTarget>,
    ) -> Self {
        let cache = VideoCache::new(store, config.cache_ttl);
        Self {
            config,
            transport,
            cache,
            target,
        }
    }

    /// 执行一次完整的获取与渲染流程，返回最终停留的状态
    ///
    /// 同一个实例上并发调用不会互相等待，最后完成的一次渲染结果生效
    pub async fn initialize(&self) -> FeedState {
        let mut state = FeedState::Init;
        let mut channel = None;
        let mut records = Vec::new();
        while !state.is_terminal() {
            let event = match state {
                FeedState::Init => match self.check() {
                    Ok(c) => {
                        channel = Some(c);
                        Event::ConfigValid
                    }
                    Err(e) => {
                        error!("{}", FeedError::Configuration(format!("{e:#}")));
                        Event::ConfigInvalid
                    }
                },
                FeedState::CacheCheck => match self.lookup_cache(channel.as_ref()).await {
                    Some(cached) => {
                        records = cached;
                        Event::CacheHit
                    }
                    None => Event::CacheMiss,
                },
                FeedState::Loading => match self.load(channel.as_ref()).await {
                    Ok(fetched) => {
                        records = fetched;
                        Event::Fetched(records.len())
                    }
                    Err(FeedError::EmptyResult) => {
                        info!("频道中没有任何视频，尝试使用兜底视频");
                        Event::Fetched(0)
                    }
                    Err(e) => {
                        warn!("获取视频失败：{e}，尝试使用兜底视频");
                        Event::FetchFailed
                    }
                },
                FeedState::FallbackCheck(_) => {
                    records = fallback::compose(
                        &self.config.videos,
                        self.config.channel_name.as_deref().unwrap_or_default(),
                    );
                    Event::FallbackComposed(records.len())
                }
                FeedState::Invalid | FeedState::Rendered(_) | FeedState::ErrorShown(_) => break,
            };
            let Some(next) = state.next(event) else {
                error!("状态 {state:?} 下出现了非预期的事件 {event:?}");
                break;
            };
            debug!("{state:?} -> {next:?}");
            state = next;
        }
        let result = match state {
            FeedState::Rendered(source) => {
                info!("从 {source} 获取到 {} 个视频", records.len());
                FeedResult::Videos(records)
            }
            FeedState::ErrorShown(kind) => FeedResult::Failed(kind),
            _ => return state,
        };
        if let Err(e) = render::dispatch(self.target.as_ref(), &result, &self.config).await {
            error!("渲染结果时遇到错误：{e:#}");
        }
        state
    }

    /// 删除当前频道的缓存
    pub async fn clear_cache(&self) {
        if let Some(channel) = self.config.channel() {
            info!("清除频道 {} 的缓存", channel.name());
            self.cache.clear(&channel.cache_key()).await;
        }
    }

    fn check(&self) -> Result<ChannelRef> {
        self.config.check()?;
        self.target.check().context("render target is not available")?;
        self.config.channel().context("channel is not configured")
    }

    async fn lookup_cache(&self, channel: Option<&ChannelRef>) -> Option<Vec<VideoRecord>> {
        self.cache.get(&channel?.cache_key()).await
    }

    /// 解析频道并请求最新视频，成功时写入缓存
    async fn load(&self, channel: Option<&ChannelRef>) -> Result<Vec<VideoRecord>, FeedError> {
        let channel = channel.ok_or_else(|| FeedError::Configuration("channel is not configured".to_owned()))?;
        let channel_id = Channel::new(self.transport.as_ref(), channel).resolve_id().await?;
        let records = Uploads::new(self.transport.as_ref(), &channel_id)
            .fetch(self.config.max_results)
            .await?;
        if records.is_empty() {
            return Err(FeedError::EmptyResult);
        }
        self.cache.put(&channel.cache_key(), &records).await;
        Ok(records)
    }
}
