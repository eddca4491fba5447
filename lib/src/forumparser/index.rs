use chrono::{DateTime, Utc};
use kuchikiki::*;
use tracing::{debug, warn};

use crate::html;
use crate::model::ThreadSnapshot;
use crate::timeresolver::resolve_timestamp;

use super::LAST_POST_LINK_MARKER;

pub struct ForumIndexPage {
    pub root: NodeRef,
}

/// Raw fields of one thread row, before the timestamp has been resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexRow {
    pub thread_name: String,
    pub last_post_text: String,
    pub last_post_link: String,
}

impl IndexRow {
    /// Extract all fields from a single row.
    /// Returns None for rows that are not complete threads.
    pub fn from_row_node(row: &NodeRef) -> Option<Self> {
        let thread_name = html::find_first_with_classes(row, "a", &["threadTitle"])
            .and_then(|node| html::trimmed_text(&node));

        let Some(thread_name) = thread_name else {
            debug!("Skipping index row without a thread title.");
            return None;
        };

        let last_post_text = html::find_first_with_classes(row, "div", &["lastPost"])
            .and_then(|last_post| html::find_first_with_classes(&last_post, "span", &["convertTZ"]))
            .and_then(|node| html::trimmed_text(&node));

        let Some(last_post_text) = last_post_text else {
            debug!("Skipping index row '{}' without a last post time.", thread_name);
            return None;
        };

        let last_post_link = html::find_elements(row.clone(), |data| &*data.name.local == "a")
            .filter_map(|node| html::get_attribute(&node, "href"))
            .find(|href| href.contains(LAST_POST_LINK_MARKER));

        let Some(last_post_link) = last_post_link else {
            debug!("Skipping index row '{}' without a last post link.", thread_name);
            return None;
        };

        Some(Self {
            thread_name,
            last_post_text,
            last_post_link,
        })
    }
}

impl ForumIndexPage {
    pub fn from_html(html_str: &str) -> Self {
        Self {
            root: html::parse_document(html_str),
        }
    }

    /// Thread rows in document order.
    ///
    /// The first thread cell belongs to the table's header row and is skipped.
    /// Each remaining cell's parent is treated as the row holding all of its fields.
    pub fn rows(&self) -> impl Iterator<Item = IndexRow> {
        html::find_elements_with_classes(self.root.clone(), "div", &["threadInfo"])
            .skip(1)
            .filter_map(|cell| {
                let row = cell.parent().unwrap_or(cell);

                IndexRow::from_row_node(&row)
            })
    }

    /// Thread snapshots in document order, with timestamps resolved against `reference`.
    /// Rows whose timestamp cannot be resolved are dropped.
    pub fn snapshots(&self, reference: DateTime<Utc>) -> impl Iterator<Item = ThreadSnapshot> {
        self.rows().filter_map(move |row| match resolve_timestamp(&row.last_post_text, reference) {
            Ok(last_post_time) => Some(ThreadSnapshot {
                thread_name: row.thread_name,
                last_post_time,
                last_post_link: row.last_post_link,
            }),
            Err(err) => {
                warn!("Dropping thread '{}': {}", row.thread_name, err);
                None
            }
        })
    }
}
