use crate::config::FallbackEntry;
use crate::youtube::{Thumbnail, VideoRecord, watch_url};

/// 将配置中的兜底视频转换为 VideoRecord，顺序与数量保持不变，不会发起任何请求
///
/// 只要有一项没有填写 id，就认为整个配置有误，返回空列表
pub fn compose(entries: &[FallbackEntry], channel_title: &str) -> Vec<VideoRecord> {
    if let Some(position) = entries.iter().position(|entry| entry.id().is_empty()) {
        warn!("第 {} 个兜底视频未设置 id，忽略全部兜底视频", position + 1);
        return Vec::new();
    }
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let id = entry.id();
            VideoRecord {
                id: id.to_owned(),
                title: entry
                    .title()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("Video {}", idx + 1)),
                description: String::new(),
                thumbnail: Thumbnail::from_id(id),
                published_at: None,
                channel_title: channel_title.to_owned(),
                url: entry
                    .url()
                    .map(str::to_owned)
                    .unwrap_or_else(|| watch_url(id)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_bare_id() {
        let videos = compose(&[FallbackEntry::Id("abc123".to_owned())], "");
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Video 1");
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(videos[0].thumbnail.url, "https://i.ytimg.com/vi/abc123/hqdefault.jpg");
        assert_eq!(videos[0].published_at, None);
    }

    #[test]
    fn test_compose_detailed() {
        let entries = vec![
            FallbackEntry::Id("first".to_owned()),
            FallbackEntry::Detailed {
                id: "xyz".to_owned(),
                title: Some("Custom".to_owned()),
                url: None,
            },
            FallbackEntry::Detailed {
                id: "third".to_owned(),
                title: None,
                url: Some("https://youtu.be/third".to_owned()),
            },
        ];
        let videos = compose(&entries, "Rust");
        assert_eq!(
            videos.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(),
            vec!["first", "xyz", "third"]
        );
        assert_eq!(videos[1].title, "Custom");
        assert_eq!(videos[1].url, "https://www.youtube.com/watch?v=xyz");
        assert_eq!(videos[1].thumbnail.url, "https://i.ytimg.com/vi/xyz/hqdefault.jpg");
        assert_eq!(videos[2].title, "Video 3");
        assert_eq!(videos[2].url, "https://youtu.be/third");
        assert!(videos.iter().all(|v| v.channel_title == "Rust"));
    }

    #[test]
    fn test_compose_malformed() {
        assert!(compose(&[], "Rust").is_empty());
        let entries = vec![FallbackEntry::Id("ok".to_owned()), FallbackEntry::Id("  ".to_owned())];
        assert!(compose(&entries, "Rust").is_empty());
    }
}
