use async_trait::async_trait;
use serde_json::Value;

pub use channel::Channel;
pub use client::Client;
pub use error::ApiError;
pub use playlist::Uploads;
pub use video::{Thumbnail, VideoRecord, watch_url};

mod channel;
mod client;
mod error;
mod playlist;
mod video;

/// 对 HTTP 请求能力的抽象，endpoint 为 channels、search、playlistItems 等相对路径
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ApiError>;
}

pub(crate) trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ApiError>;
}

impl Validate for Value {
    type Output = Value;

    /// 部分代理会以 200 返回错误信息，这里统一检查 error 字段
    fn validate(self) -> Result<Self::Output, ApiError> {
        if let Some(error) = self.get("error") {
            let code = error["code"].as_i64().unwrap_or_default();
            let message = error["message"].as_str().unwrap_or("unknown error").to_owned();
            return Err(ApiError::ErrorResponse(code, message));
        }
        Ok(self)
    }
}

/// 取出响应中的 items 数组，缺失与为空都视为“没有找到”
pub(crate) fn take_items(value: &mut Value) -> Vec<Value> {
    match value["items"].take() {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}
