mod target;

use std::sync::LazyLock;

use anyhow::Result;
use chrono::DateTime;
use handlebars::handlebars_helper;
use serde::Serialize;
use serde_json::json;

use crate::config::FeedConfig;
#[cfg(test)]
pub use crate::render::target::MemoryTarget;
pub use crate::render::target::{FileTarget, RenderTarget};
use crate::workflow::FeedResult;
use crate::youtube::VideoRecord;

const DEFAULT_HEADER: &str = "Latest Videos";

const FEED_TEMPLATE: &str = r#"<section class="yt-feed">
  <header class="yt-feed__header">
    <h2 class="yt-feed__title">{{header}}</h2>
  </header>
{{#with featured}}
  <article class="yt-feed__featured">
    <a href="{{url}}" target="_blank" rel="noopener">
      <img src="{{thumbnail.url}}" width="{{thumbnail.width}}" height="{{thumbnail.height}}" alt="{{title}}" loading="lazy">
    </a>
    <div class="yt-feed__featured-info">
      <h3><a href="{{url}}" target="_blank" rel="noopener">{{title}}</a></h3>
{{#if published_at}}
      <time datetime="{{published_at}}">{{format_date published_at}}</time>
{{/if}}
{{#if description}}
      <p>{{truncate description 100}}</p>
{{/if}}
    </div>
  </article>
{{/with}}
{{#if grid}}
  <div class="yt-feed__grid">
{{#each grid}}
{{> card}}
{{/each}}
  </div>
{{/if}}
  <a class="yt-feed__more" href="{{channel_url}}" target="_blank" rel="noopener">View more on YouTube</a>
</section>
"#;

const CARD_TEMPLATE: &str = r#"    <article class="yt-feed__card">
      <a href="{{url}}" target="_blank" rel="noopener">
        <img src="{{thumbnail.url}}" width="{{thumbnail.width}}" height="{{thumbnail.height}}" alt="{{title}}" loading="lazy">
        <h3 class="yt-feed__card-title">{{title}}</h3>
      </a>
{{#if published_at}}
      <time datetime="{{published_at}}">{{format_date published_at}}</time>
{{/if}}
    </article>
"#;

const ERROR_TEMPLATE: &str = r#"<section class="yt-feed yt-feed--error">
  <p class="yt-feed__error">{{message}}</p>
  <a class="yt-feed__more" href="{{channel_url}}" target="_blank" rel="noopener">View channel on YouTube</a>
</section>
"#;

pub static TEMPLATE: LazyLock<handlebars::Handlebars<'static>> =
    LazyLock::new(|| create_template().expect("Failed to create handlebars template"));

fn create_template() -> Result<handlebars::Handlebars<'static>> {
    let mut handlebars = handlebars::Handlebars::new();
    handlebars.register_escape_fn(escape_html);
    handlebars.register_helper("truncate", Box::new(truncate));
    handlebars.register_helper("format_date", Box::new(format_date));
    handlebars.register_partial("card", CARD_TEMPLATE)?;
    handlebars.register_template_string("feed", FEED_TEMPLATE)?;
    handlebars.register_template_string("error", ERROR_TEMPLATE)?;
    Ok(handlebars)
}

handlebars_helper!(truncate: |s: String, len: usize| {
    if s.chars().count() > len {
        s.chars().take(len).collect::<String>() + "..."
    } else {
        s.to_string()
    }
});

handlebars_helper!(format_date: |s: String| {
    DateTime::parse_from_rfc3339(&s)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or(s)
});

// 默认的转义会把 url 中的 = 也转义掉，这里只处理真正需要转义的字符
fn escape_html(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

#[derive(Serialize)]
struct FeedView<'a> {
    header: &'a str,
    featured: Option<&'a VideoRecord>,
    grid: &'a [VideoRecord],
    channel_url: String,
}

/// 将结果渲染为 html，相同的输入总是得到相同的输出
pub fn render(result: &FeedResult, config: &FeedConfig) -> Result<String> {
    let channel_url = config.channel_url();
    match result {
        FeedResult::Videos(records) => {
            let (featured, grid) = match records.split_first() {
                Some((first, rest)) if config.show_featured_video => (Some(first), rest),
                _ => (None, records.as_slice()),
            };
            let header = records
                .first()
                .map(|r| r.channel_title.as_str())
                .filter(|title| !title.trim().is_empty())
                .unwrap_or(DEFAULT_HEADER);
            let view = FeedView {
                header,
                featured,
                grid,
                channel_url,
            };
            Ok(TEMPLATE.render("feed", &view)?)
        }
        FeedResult::Failed(kind) => Ok(TEMPLATE.render(
            "error",
            &json!({
                "message": kind.message(),
                "channel_url": channel_url,
            }),
        )?),
    }
}

pub async fn dispatch(target: &dyn RenderTarget, result: &FeedResult, config: &FeedConfig) -> Result<()> {
    let html = render(result, config)?;
    target.replace(&html).await
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::workflow::FailureKind;
    use crate::youtube::Thumbnail;

    fn records(count: usize) -> Vec<VideoRecord> {
        (0..count)
            .map(|i| VideoRecord {
                id: format!("vid{i}"),
                title: format!("Episode {}", i + 1),
                description: "a".repeat(120),
                thumbnail: Thumbnail::from_id(&format!("vid{i}")),
                published_at: Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()),
                channel_title: "Rust".to_owned(),
                url: format!("https://www.youtube.com/watch?v=vid{i}"),
            })
            .collect()
    }

    fn count(html: &str, pattern: &str) -> usize {
        html.matches(pattern).count()
    }

    #[test]
    fn test_render_featured() {
        let config = FeedConfig::test_default();
        let html = render(&FeedResult::Videos(records(4)), &config).unwrap();
        assert_eq!(count(&html, r#"class="yt-feed__featured""#), 1);
        assert_eq!(count(&html, r#"class="yt-feed__card""#), 3);
        let featured = html.find(r#"class="yt-feed__featured""#).unwrap();
        let positions = (1..4)
            .map(|i| html.find(&format!("watch?v=vid{i}")).unwrap())
            .collect::<Vec<_>>();
        assert!(featured < html.find("watch?v=vid0").unwrap());
        assert!(positions.is_sorted());
        assert!(html.contains(r#"<h2 class="yt-feed__title">Rust</h2>"#));
        assert!(html.contains("Mar 5, 2024"));
        assert!(html.contains(&format!("{}...", "a".repeat(100))));
        assert!(html.contains(r#"href="https://www.youtube.com/@rustlang""#));
    }

    #[test]
    fn test_render_without_featured() {
        let config = FeedConfig {
            show_featured_video: false,
            ..FeedConfig::test_default()
        };
        let html = render(&FeedResult::Videos(records(4)), &config).unwrap();
        assert_eq!(count(&html, r#"class="yt-feed__featured""#), 0);
        assert_eq!(count(&html, r#"class="yt-feed__card""#), 4);

        let config = FeedConfig::test_default();
        let html = render(&FeedResult::Videos(records(1)), &config).unwrap();
        assert_eq!(count(&html, r#"class="yt-feed__featured""#), 1);
        assert_eq!(count(&html, r#"class="yt-feed__grid""#), 0);
    }

    #[test]
    fn test_render_header_and_escape() {
        let mut videos = records(1);
        videos[0].channel_title = String::new();
        videos[0].title = "<script>alert('x')</script>".to_owned();
        videos[0].published_at = None;
        let html = render(&FeedResult::Videos(videos), &FeedConfig::test_default()).unwrap();
        assert!(html.contains("Latest Videos"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
        assert!(!html.contains("<time"));
    }

    #[test]
    fn test_render_error() {
        let config = FeedConfig::test_default();
        let html = render(&FeedResult::Failed(FailureKind::LoadFailed), &config).unwrap();
        assert!(html.contains("Failed to load videos."));
        assert!(html.contains(r#"href="https://www.youtube.com/@rustlang""#));
        let html = render(&FeedResult::Failed(FailureKind::NoVideos), &config).unwrap();
        assert!(html.contains("No videos found."));
    }

    #[tokio::test]
    async fn test_dispatch_is_idempotent() {
        let target = MemoryTarget::default();
        let config = FeedConfig::test_default();
        let result = FeedResult::Videos(records(3));
        dispatch(&target, &result, &config).await.unwrap();
        let first = target.content().unwrap();
        dispatch(&target, &result, &config).await.unwrap();
        assert_eq!(target.content().unwrap(), first);
        assert_eq!(target.writes(), 2);
        dispatch(&target, &FeedResult::Failed(FailureKind::NoVideos), &config)
            .await
            .unwrap();
        assert!(!target.content().unwrap().contains("yt-feed__card"));
    }
}
