#[macro_use]
extern crate tracing;

mod cache;
mod config;
mod error;
mod fallback;
mod render;
mod utils;
mod workflow;
mod youtube;

use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};

use crate::cache::FileStore;
use crate::config::{ARGS, FeedConfig};
use crate::render::FileTarget;
use crate::utils::init_logger;
use crate::workflow::{FeedState, VideoFeedController};
use crate::youtube::Client;

#[tokio::main]
async fn main() {
    LazyLock::force(&ARGS);
    init_logger(&ARGS.log_level);
    match run().await {
        Ok(FeedState::Invalid) => std::process::exit(2),
        Ok(state) => info!("本轮执行结束，最终状态：{:?}", state),
        Err(e) => {
            error!("运行时遇到错误：{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<FeedState> {
    let config_path = ARGS.config_path();
    info!("开始加载配置文件 {}..", config_path.display());
    let mut config = FeedConfig::load(&config_path)
        .with_context(|| format!("加载配置文件 {} 失败", config_path.display()))?;
    if let Some(api_key) = &ARGS.api_key {
        config.api_key = api_key.clone();
    }
    let client = Client::new(&config.api_base, &config.api_key)?;
    let store = FileStore::new(ARGS.cache_dir());
    let target = FileTarget::new(&ARGS.output);
    let controller = VideoFeedController::new(Arc::new(config), Arc::new(client), Arc::new(store), Arc::new(target));
    if ARGS.refresh {
        controller.clear_cache().await;
    }
    Ok(controller.initialize().await)
}
