use chrono::{DateTime, FixedOffset, Utc};

/// One thread row from a forum index page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadSnapshot {
    pub thread_name: String,
    pub last_post_time: DateTime<Utc>,
    /// Relative link to the thread, pointing at its last-post anchor.
    pub last_post_link: String,
}

/// The newest post on a thread page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostInfo {
    pub body: String,
    pub poster_name: String,
    pub character_name: Option<String>,
}

/// A watched thread that received a new post within the recency window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateEvent {
    pub forum_name: String,
    pub thread_name: String,
    /// Post time in the display timezone, truncated to the minute.
    pub last_post_time: DateTime<FixedOffset>,
    pub last_post_link: String,
    pub last_post_excerpt: String,
    pub last_poster_name: String,
    pub last_poster_character: Option<String>,
}
