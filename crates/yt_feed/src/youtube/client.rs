use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Once;
use reqwest::header;
use serde_json::Value;
use ua_generator::ua;

use crate::youtube::{ApiError, Transport, Validate};

// 一个对 reqwest::Client 的简单封装，用于请求 YouTube Data API
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl Client {
    pub fn new(api_base: &str, api_key: &str) -> Result<Self> {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            // 已经安装过 provider 时会返回 Err，忽略即可
            let _ = rustls::crypto::ring::default_provider().install_default();
        });
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(ua::spoof_chrome_ua()),
        );
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .connect_timeout(Duration::from_secs(10))
            .read_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            inner,
            api_base: api_base.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }
}

#[async_trait]
impl Transport for Client {
    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.api_base, endpoint);
        debug!("请求 {url}，参数：{query:?}");
        self.inner
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?
            .validate()
    }
}
