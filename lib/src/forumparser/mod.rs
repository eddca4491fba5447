//! Parsers for the forum's index and thread pages.
//!
//! The markup is not a format we control, so parsing is tolerant: rows that
//! do not look like threads are skipped instead of failing the whole page.

mod index;
mod post;

pub use self::index::*;
pub use self::post::*;

/// Fragment marking links that jump to a thread's newest post.
pub const LAST_POST_LINK_MARKER: &str = "lastPost#lastPost";
