use tracing::info;

use crate::error::WatchError;
use crate::model::UpdateEvent;

mod discord;
mod message;

pub use self::discord::*;
pub use self::message::*;

/// Destination for update notifications.
pub trait Notifier {
    fn notify(&self, message: &str) -> Result<(), WatchError>;
}

/// Format and deliver a notification for the given events.
/// Nothing is sent when there are no events.
pub fn dispatch(notifier: &dyn Notifier, events: &[UpdateEvent], options: &MessageOptions) -> Result<bool, WatchError> {
    if events.is_empty() {
        info!("No updates. Not sending a notification.");
        return Ok(false);
    }

    let message = format_message(events, options);

    info!("Sending notification for {} updated threads.", events.len());
    notifier.notify(&message)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::DateTime;

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) -> Result<(), WatchError> {
            self.messages.borrow_mut().push(message.to_owned());
            Ok(())
        }
    }

    #[test]
    fn empty_update_list_sends_nothing() {
        let notifier = RecordingNotifier::default();

        let sent = dispatch(&notifier, &[], &MessageOptions::default()).unwrap();

        assert!(!sent);
        assert!(notifier.messages.borrow().is_empty());
    }

    #[test]
    fn sends_one_message_for_all_events() {
        let event = UpdateEvent {
            forum_name: "Game".to_owned(),
            thread_name: "Alpha Thread".to_owned(),
            last_post_time: DateTime::parse_from_rfc3339("2024-03-10T05:55:00-08:00").unwrap(),
            last_post_link: "/forums/thread/1/?view=lastPost#lastPost".to_owned(),
            last_post_excerpt: "Hello world".to_owned(),
            last_poster_name: "Nyx".to_owned(),
            last_poster_character: None,
        };
        let notifier = RecordingNotifier::default();

        let sent = dispatch(&notifier, &[event.clone(), event], &MessageOptions::default()).unwrap();

        assert!(sent);
        assert_eq!(notifier.messages.borrow().len(), 1);
    }
}
