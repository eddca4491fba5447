use kuchikiki::*;

use crate::error::WatchError;
use crate::html;
use crate::model::PostInfo;

pub struct ThreadPage {
    pub root: NodeRef,
}

impl ThreadPage {
    pub fn from_html(html_str: &str) -> Self {
        Self {
            root: html::parse_document(html_str),
        }
    }

    /// All post body blocks, in document order.
    pub fn post_blocks(&self) -> Vec<NodeRef> {
        html::find_elements_with_classes(self.root.clone(), "div", &["post"]).collect()
    }

    /// All poster identity blocks, in document order.
    pub fn poster_blocks(&self) -> Vec<NodeRef> {
        html::find_elements_with_classes(self.root.clone(), "div", &["postNames"]).collect()
    }

    /// Get the newest post on the page.
    ///
    /// The final post block on a thread page is the reply composer, so the
    /// newest real post is the second-to-last block.
    pub fn last_post(&self) -> Result<PostInfo, WatchError> {
        let posts = self.post_blocks();
        let post = second_to_last(&posts).ok_or(WatchError::NoPostsFound)?;

        let posters = self.poster_blocks();
        let poster = second_to_last(&posters)
            .ok_or_else(|| WatchError::MalformedPostBlock("no poster block for the last post".into()))?;

        let poster_name_node =
            html::find_first_with_classes(poster, "p", &["posterName"]).ok_or(WatchError::NoPostAuthor)?;

        let poster_name = html::find_first_with_classes(&poster_name_node, "a", &["username"])
            .and_then(|node| html::trimmed_text(&node))
            .ok_or_else(|| WatchError::MalformedPostBlock("poster name has no username".into()))?;

        // Not every poster posts as a character.
        let character_name = html::find_first_with_classes(poster, "p", &["charName"])
            .and_then(|char_name| html::find_elements(char_name, |data| &*data.name.local == "a").next())
            .and_then(|node| html::trimmed_text(&node));

        Ok(PostInfo {
            body: post.text_contents().trim().to_owned(),
            poster_name,
            character_name,
        })
    }
}

fn second_to_last<T>(items: &[T]) -> Option<&T> {
    items.len().checked_sub(2).and_then(|idx| items.get(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD: &str = r###"
<div class="postBlock">
    <div class="posterDetails">
        <div class="postNames">
            <p class="charName"><a href="/characters/1/">Vesper</a></p>
            <p class="posterName"><a class="username" href="/user/2/">Orrin</a></p>
        </div>
    </div>
    <div class="post">First post</div>
</div>
<div class="postBlock">
    <div class="posterDetails">
        <div class="postNames">
            <p class="posterName"><a class="username" href="/user/3/">Nyx</a></p>
        </div>
    </div>
    <div class="post">
        Hello world
    </div>
</div>
<a name="lastPost"></a>
<div class="postBlock composer">
    <div class="posterDetails">
        <div class="postNames">
            <p class="posterName"><a class="username" href="/user/9/">Me</a></p>
        </div>
    </div>
    <div class="post">Write your reply here</div>
</div>
"###;

    #[test]
    fn returns_post_before_composer() {
        let page = ThreadPage::from_html(THREAD);

        let post = page.last_post().unwrap();

        assert_eq!(
            post,
            PostInfo {
                body: "Hello world".to_owned(),
                poster_name: "Nyx".to_owned(),
                character_name: None,
            }
        );
    }

    #[test]
    fn reads_character_name() {
        const PAGE: &str = r###"
<div class="postNames">
    <p class="charName"><a href="/characters/1/"> Vesper </a></p>
    <p class="posterName"><a class="username">Orrin</a></p>
</div>
<div class="post">In character</div>
<div class="postNames"><p class="posterName"><a class="username">Me</a></p></div>
<div class="post"></div>
"###;

        let post = ThreadPage::from_html(PAGE).last_post().unwrap();

        assert_eq!(post.poster_name, "Orrin");
        assert_eq!(post.character_name.as_deref(), Some("Vesper"));
        assert_eq!(post.body, "In character");
    }

    #[test]
    fn too_few_posts() {
        const PAGE: &str = r###"
<div class="postNames"><p class="posterName"><a class="username">Me</a></p></div>
<div class="post">composer</div>
"###;

        let result = ThreadPage::from_html(PAGE).last_post();

        assert!(matches!(result, Err(WatchError::NoPostsFound)));
    }

    #[test]
    fn missing_username_is_malformed() {
        const PAGE: &str = r###"
<div class="postNames"><p class="posterName">deleted user</p></div>
<div class="post">orphan</div>
<div class="postNames"><p class="posterName"><a class="username">Me</a></p></div>
<div class="post">composer</div>
"###;

        let result = ThreadPage::from_html(PAGE).last_post();

        assert!(matches!(result, Err(WatchError::MalformedPostBlock(_))));
    }

    #[test]
    fn missing_poster_name_section() {
        const PAGE: &str = r###"
<div class="postNames"></div>
<div class="post">orphan</div>
<div class="postNames"><p class="posterName"><a class="username">Me</a></p></div>
<div class="post">composer</div>
"###;

        let result = ThreadPage::from_html(PAGE).last_post();

        assert!(matches!(result, Err(WatchError::NoPostAuthor)));
    }

    #[test]
    fn missing_poster_blocks() {
        const PAGE: &str = r###"
<div class="post">one</div>
<div class="post">composer</div>
"###;

        let result = ThreadPage::from_html(PAGE).last_post();

        assert!(matches!(result, Err(WatchError::MalformedPostBlock(_))));
    }
}
