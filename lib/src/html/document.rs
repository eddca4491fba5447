use kuchikiki::traits::*;
use kuchikiki::NodeRef;

/// Parse an HTML string into a Kuchiki document node.
pub fn parse_document(html_str: &str) -> NodeRef {
    kuchikiki::parse_html().one(html_str)
}
