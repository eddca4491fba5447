use kuchikiki::*;

use crate::util::IsSubset;

pub fn has_classes(data: &ElementData, class_names: &[&str]) -> bool {
    if let Some(class_attr) = data.attributes.borrow().get("class") {
        // Split classes into a vector of strings
        let classes: Vec<&str> = class_attr.split_whitespace().collect();

        // Does the element have the specified classes?
        class_names.is_subset(&classes)
    } else {
        false
    }
}

/// Get the value of an attribute on an element node, if it has one.
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    if let NodeData::Element(data) = node.data() {
        return data.attributes.borrow().get(name).map(|v| v.to_owned());
    }

    None
}

/// Text content of a node with surrounding whitespace removed.
/// Returns None if nothing but whitespace remains.
pub fn trimmed_text(node: &NodeRef) -> Option<String> {
    let text = node.text_contents();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
