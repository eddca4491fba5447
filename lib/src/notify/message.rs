use crate::model::UpdateEvent;

pub const MESSAGE_HEADER: &str = "Got an update in the following threads:";

#[derive(Clone, Debug)]
pub struct MessageOptions {
    pub include_post_time: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            include_post_time: true,
        }
    }
}

/// Build the notification text for a list of updates.
pub fn format_message(events: &[UpdateEvent], options: &MessageOptions) -> String {
    let mut message = format!("{MESSAGE_HEADER}\n");

    for event in events.iter() {
        let poster = match &event.last_poster_character {
            Some(character) => format!("{} ({})", character, event.last_poster_name),
            None => event.last_poster_name.clone(),
        };

        message.push_str(&format!(
            "\n**{}** - *{}* updated by ***{}***",
            event.forum_name, event.thread_name, poster
        ));

        if options.include_post_time {
            message.push_str(&format!(" at {}", event.last_post_time.format("%H:%M, %Y-%m-%d")));
        }

        message.push_str(&format!(":\n*{}*\n", event.last_post_excerpt));
    }

    message
}

/// Split a message into chunks of at most `max_chars` characters,
/// breaking on line boundaries where possible.
///
/// A `max_chars` of zero means no limit.
pub fn split_message(message: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return if message.trim().is_empty() {
            Vec::new()
        } else {
            vec![message.to_owned()]
        };
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len: usize = 0;

    for line in message.split_inclusive('\n') {
        let mut line = line;

        // Hard-split lines that can never fit on their own.
        while line.chars().count() > max_chars {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }

            let split_at = line.char_indices().nth(max_chars).map_or(line.len(), |(idx, _)| idx);
            chunks.push(line[..split_at].to_owned());
            line = &line[split_at..];
        }

        let line_len = line.chars().count();

        if current_len + line_len > max_chars && current_len > 0 {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks
}
