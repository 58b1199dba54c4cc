use thiserror::Error;

use crate::youtube::ApiError;

/// 视频获取流程中可能出现的错误，除 Configuration 外都不会直接暴露给用户
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("invalid configuration:\n{0}")]
    Configuration(String),
    #[error("failed to resolve channel: {0}")]
    Resolution(String),
    #[error("failed to fetch videos: {0}")]
    Fetch(String),
    #[error("cache store unavailable: {0}")]
    Cache(String),
    #[error("channel has no videos")]
    EmptyResult,
}

impl From<ApiError> for FeedError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Resolution(_) => FeedError::Resolution(err.to_string()),
            _ => FeedError::Fetch(err.to_string()),
        }
    }
}
