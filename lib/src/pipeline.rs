use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde_derive::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::*;
use crate::forumparser::{ForumIndexPage, ThreadPage};
use crate::model::{ThreadSnapshot, UpdateEvent};
use crate::recency::match_recent;
use crate::util::truncate_chars;

/// Source of page markup.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// What to do when the page of a recently updated thread can't be fetched or parsed.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThreadErrorPolicy {
    /// Fail the whole check.
    #[default]
    Abort,
    /// Leave out only the failed thread.
    Skip,
}

#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub base_url: Url,
    pub window: Duration,
    pub display_offset: FixedOffset,
    pub excerpt_length: usize,
    pub on_thread_error: ThreadErrorPolicy,
}

/// A forum and the threads in it that are being watched.
#[derive(Clone, Debug)]
pub struct ForumWatch {
    pub id: u64,
    pub name: String,
    pub threads: HashSet<String>,
}

pub struct UpdatePipeline<'a> {
    fetcher: &'a dyn Fetcher,
    options: PipelineOptions,
}

impl<'a> UpdatePipeline<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, options: PipelineOptions) -> Self {
        Self { fetcher, options }
    }

    /// Check all forums, in order, for recent posts in watched threads.
    pub fn run(&self, forums: &[ForumWatch], now: DateTime<Utc>) -> Result<Vec<UpdateEvent>, WatchError> {
        let mut events: Vec<UpdateEvent> = Vec::new();

        for forum in forums.iter() {
            events.extend(self.check_forum(forum, now)?);
        }

        Ok(events)
    }

    /// Check a single forum.
    /// A forum whose index page can't be retrieved contributes no events.
    pub fn check_forum(&self, forum: &ForumWatch, now: DateTime<Utc>) -> Result<Vec<UpdateEvent>, WatchError> {
        info!("BEGIN FORUM: {} ({})", forum.name, forum.id);

        let snapshots = match self.fetch_snapshots(forum, now) {
            Ok(snapshots) => snapshots,
            Err(err) => {
                warn!("Skipping forum '{}': {}", forum.name, err);
                return Ok(Vec::new());
            }
        };

        let mut events: Vec<UpdateEvent> = Vec::new();

        for snapshot in match_recent(snapshots, &forum.threads, self.options.window, now) {
            info!("Thread '{}' was updated at {}.", snapshot.thread_name, snapshot.last_post_time);

            match self.build_event(forum, snapshot) {
                Ok(event) => events.push(event),
                Err(err) => match self.options.on_thread_error {
                    ThreadErrorPolicy::Abort => return Err(err),
                    ThreadErrorPolicy::Skip => warn!("Skipping thread in forum '{}': {}", forum.name, err),
                },
            }
        }

        info!("END FORUM: {} ({} updated)", forum.name, events.len());

        Ok(events)
    }

    fn fetch_snapshots(&self, forum: &ForumWatch, now: DateTime<Utc>) -> Result<Vec<ThreadSnapshot>, WatchError> {
        let url = self.index_url(forum.id);

        debug!("Fetching forum index: {}", url);
        let index_html = self.fetcher.fetch(&url)?;

        let page = ForumIndexPage::from_html(&index_html);

        Ok(page.snapshots(now).collect())
    }

    fn build_event(&self, forum: &ForumWatch, snapshot: ThreadSnapshot) -> Result<UpdateEvent, WatchError> {
        let url = self.thread_url(&snapshot.last_post_link)?;

        debug!("Fetching thread page: {}", url);
        let thread_html = self.fetcher.fetch(url.as_str())?;

        let post = ThreadPage::from_html(&thread_html).last_post()?;

        Ok(UpdateEvent {
            forum_name: forum.name.clone(),
            thread_name: snapshot.thread_name,
            last_post_time: to_display_time(snapshot.last_post_time, self.options.display_offset)?,
            last_post_link: snapshot.last_post_link,
            last_post_excerpt: excerpt(&post.body, self.options.excerpt_length),
            last_poster_name: post.poster_name,
            last_poster_character: post.character_name,
        })
    }

    pub fn index_url(&self, forum_id: u64) -> String {
        format!(
            "{}/forums/{}/",
            self.options.base_url.as_str().trim_end_matches('/'),
            forum_id
        )
    }

    pub fn thread_url(&self, last_post_link: &str) -> Result<Url, WatchError> {
        self.options
            .base_url
            .join(last_post_link)
            .map_err(|err| WatchError::Other(format!("Invalid thread link '{last_post_link}': {err}").into()))
    }
}

/// Convert a post time to the display timezone, dropping seconds and below.
pub fn to_display_time(time: DateTime<Utc>, offset: FixedOffset) -> Result<DateTime<FixedOffset>, WatchError> {
    time.with_timezone(&offset)
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(|| WatchError::Other(format!("Could not truncate time: {time}").into()))
}

/// Shorten a post body for display, marking it if anything was cut.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    match truncate_chars(body.trim(), max_chars) {
        (text, true) => format!("{}...", text.trim_end()),
        (text, false) => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;

    const BASE_URL: &str = "https://forum.example.com";

    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    impl MapFetcher {
        fn new() -> Self {
            Self { pages: HashMap::new() }
        }

        fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
            self.pages.insert(url.into(), html.into());
            self
        }
    }

    impl Fetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages.get(url).cloned().ok_or(FetchError::Http {
                code: 404,
                description: "Not Found".into(),
            })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap()
    }

    fn options(on_thread_error: ThreadErrorPolicy) -> PipelineOptions {
        PipelineOptions {
            base_url: Url::parse(BASE_URL).unwrap(),
            window: Duration::minutes(10),
            display_offset: FixedOffset::west_opt(8 * 3600).unwrap(),
            excerpt_length: 300,
            on_thread_error,
        }
    }

    fn forum(id: u64, name: &str, threads: &[&str]) -> ForumWatch {
        ForumWatch {
            id,
            name: name.to_owned(),
            threads: threads.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn index_row(name: &str, time: &str, thread_id: u32) -> String {
        format!(
            r#"<div class="tr">
    <div class="td threadInfo"><a class="threadTitle" href="/forums/thread/{thread_id}/">{name}</a></div>
    <div class="td lastPost">
        <span class="convertTZ">{time}</span>
        <a href="/forums/thread/{thread_id}/?view=lastPost#lastPost">&gt;</a>
    </div>
</div>"#
        )
    }

    fn index_page(rows: &[String]) -> String {
        format!(
            r#"<div class="tr headerTR"><div class="td threadInfo">Thread</div><div class="td lastPost">Last post</div></div>
{}"#,
            rows.join("\n")
        )
    }

    fn thread_page(poster: &str, character: Option<&str>, body: &str) -> String {
        let character = character
            .map(|c| format!(r#"<p class="charName"><a href="/characters/1/">{c}</a></p>"#))
            .unwrap_or_default();

        format!(
            r#"<div class="postNames">{character}<p class="posterName"><a class="username">{poster}</a></p></div>
<div class="post">{body}</div>
<div class="postNames"><p class="posterName"><a class="username">Me</a></p></div>
<div class="post"></div>"#
        )
    }

    fn thread_url(thread_id: u32) -> String {
        format!("{BASE_URL}/forums/thread/{thread_id}/?view=lastPost#lastPost")
    }

    #[test]
    fn reports_recent_watched_thread() {
        let index = index_page(&[
            index_row("Alpha Thread", "March 10, 2024 1:55 PM", 1),
            index_row("Beta Thread", "March 10, 2024 12:00 PM", 2),
        ]);
        let alpha = thread_page("Nyx", None, "Hello world");

        let fetcher = MapFetcher::new()
            .with_page(format!("{BASE_URL}/forums/7/"), index)
            .with_page(thread_url(1), alpha);

        let pipeline = UpdatePipeline::new(&fetcher, options(ThreadErrorPolicy::Abort));
        let events = pipeline
            .run(&[forum(7, "Game", &["Alpha Thread", "Beta Thread"])], now())
            .unwrap();

        assert_eq!(
            events,
            vec![UpdateEvent {
                forum_name: "Game".to_owned(),
                thread_name: "Alpha Thread".to_owned(),
                last_post_time: DateTime::parse_from_rfc3339("2024-03-10T05:55:00-08:00").unwrap(),
                last_post_link: "/forums/thread/1/?view=lastPost#lastPost".to_owned(),
                last_post_excerpt: "Hello world".to_owned(),
                last_poster_name: "Nyx".to_owned(),
                last_poster_character: None,
            }]
        );
    }

    #[test]
    fn events_follow_forum_then_index_order() {
        let index_a = index_page(&[
            index_row("Second", "1:58 PM", 2),
            index_row("First", "1:50 PM", 1),
        ]);
        let index_b = index_page(&[index_row("Other", "1:59 PM", 3)]);

        let fetcher = MapFetcher::new()
            .with_page(format!("{BASE_URL}/forums/1/"), index_a)
            .with_page(format!("{BASE_URL}/forums/2/"), index_b)
            .with_page(thread_url(1), thread_page("A", None, "a"))
            .with_page(thread_url(2), thread_page("B", Some("Bee"), "b"))
            .with_page(thread_url(3), thread_page("C", None, "c"));

        let pipeline = UpdatePipeline::new(&fetcher, options(ThreadErrorPolicy::Abort));
        let events = pipeline
            .run(
                &[forum(1, "One", &["First", "Second"]), forum(2, "Two", &["Other"])],
                now(),
            )
            .unwrap();

        let names: Vec<(&str, &str)> = events
            .iter()
            .map(|e| (e.forum_name.as_str(), e.thread_name.as_str()))
            .collect();

        assert_eq!(names, vec![("One", "Second"), ("One", "First"), ("Two", "Other")]);
        assert_eq!(events[0].last_poster_character.as_deref(), Some("Bee"));
    }

    #[test]
    fn unreachable_forum_contributes_nothing() {
        let index = index_page(&[index_row("Alpha Thread", "1:55 PM", 1)]);

        let fetcher = MapFetcher::new()
            .with_page(format!("{BASE_URL}/forums/2/"), index)
            .with_page(thread_url(1), thread_page("Nyx", None, "Hello"));

        let pipeline = UpdatePipeline::new(&fetcher, options(ThreadErrorPolicy::Abort));
        let events = pipeline
            .run(
                &[forum(1, "Missing", &["Alpha Thread"]), forum(2, "Present", &["Alpha Thread"])],
                now(),
            )
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].forum_name, "Present");
    }

    #[test]
    fn thread_failure_aborts_by_default() {
        let index = index_page(&[index_row("Alpha Thread", "1:55 PM", 1)]);

        let fetcher = MapFetcher::new().with_page(format!("{BASE_URL}/forums/1/"), index);

        let pipeline = UpdatePipeline::new(&fetcher, options(ThreadErrorPolicy::Abort));
        let result = pipeline.run(&[forum(1, "Game", &["Alpha Thread"])], now());

        assert!(matches!(result, Err(WatchError::Fetch(FetchError::Http { code: 404, .. }))));
        assert_eq!(ThreadErrorPolicy::default(), ThreadErrorPolicy::Abort);
    }

    #[test]
    fn thread_failure_can_be_skipped() {
        let index = index_page(&[
            index_row("Broken", "1:55 PM", 1),
            index_row("Working", "1:56 PM", 2),
        ]);

        let fetcher = MapFetcher::new()
            .with_page(format!("{BASE_URL}/forums/1/"), index)
            .with_page(thread_url(1), "<div class=\"post\">only the composer</div>")
            .with_page(thread_url(2), thread_page("Nyx", None, "Hello"));

        let pipeline = UpdatePipeline::new(&fetcher, options(ThreadErrorPolicy::Skip));
        let events = pipeline.run(&[forum(1, "Game", &["Broken", "Working"])], now()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].thread_name, "Working");
    }

    #[test]
    fn display_time_is_truncated_to_minute() {
        let time = Utc.with_ymd_and_hms(2024, 3, 10, 13, 55, 42).unwrap() + Duration::milliseconds(250);

        let display = to_display_time(time, FixedOffset::west_opt(8 * 3600).unwrap()).unwrap();

        assert_eq!(display.to_rfc3339(), "2024-03-10T05:55:00-08:00");
    }

    #[test]
    fn long_bodies_are_shortened() {
        assert_eq!(excerpt("  Hello world  ", 300), "Hello world");
        assert_eq!(excerpt("Hello world", 6), "Hello...");
    }

    #[test]
    fn urls() {
        let fetcher = MapFetcher::new();
        let pipeline = UpdatePipeline::new(&fetcher, options(ThreadErrorPolicy::Abort));

        assert_eq!(pipeline.index_url(42), "https://forum.example.com/forums/42/");
        assert_eq!(
            pipeline.thread_url("/forums/thread/5/?view=lastPost#lastPost").unwrap().as_str(),
            "https://forum.example.com/forums/thread/5/?view=lastPost#lastPost"
        );
    }
}
