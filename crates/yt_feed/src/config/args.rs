use std::path::PathBuf;
use std::sync::LazyLock;

use clap::Parser;

pub static ARGS: LazyLock<Args> = LazyLock::new(Args::parse);

#[derive(Parser)]
#[command(name = "yt-feed", version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, env = "YT_FEED_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, default_value = "None,yt_feed=info", env = "RUST_LOG")]
    pub log_level: String,

    #[arg(short, long, default_value = "yt-feed.html")]
    pub output: PathBuf,

    #[arg(long, env = "YT_FEED_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    #[arg(long, env = "YT_FEED_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// 忽略并清除当前频道的缓存，强制重新请求
    #[arg(long)]
    pub refresh: bool,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("yt-feed")
                .join("config.toml")
        })
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("yt-feed")
        })
    }
}
