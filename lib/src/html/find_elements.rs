use kuchikiki::*;

use super::has_classes;

/// Depth-first search over an element tree, yielding matches in document order.
pub struct FindElements<P> {
    stack: Vec<NodeRef>,
    predicate: P,
}

impl<P> Iterator for FindElements<P>
where
    P: Fn(&ElementData) -> bool,
{
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        // Grab next node from the stack
        while let Some(node) = self.stack.pop() {
            let mut is_match = false;

            if let NodeData::Element(data) = node.data() {
                let predicate = &self.predicate;

                is_match = predicate(data);
            }

            // Push child nodes in reverse, so the first child is visited next
            self.stack.extend(node.children().rev());

            // If the node matched, return it.
            if is_match {
                return Some(node);
            }
        }

        None
    }
}

pub fn find_elements<P>(node: NodeRef, predicate: P) -> FindElements<P>
where
    P: Fn(&ElementData) -> bool,
{
    FindElements {
        stack: vec![node],
        predicate,
    }
}

pub fn find_elements_with_classes<'a>(
    node: NodeRef,
    find_name: &'a str,
    find_classes: &[&'a str],
) -> impl Iterator<Item = NodeRef> + 'a {
    let find_classes: Vec<&'a str> = find_classes.to_vec();

    find_elements(node, move |data: &ElementData| {
        &*data.name.local == find_name && has_classes(data, &find_classes)
    })
}

/// First descendant (or the node itself) matching the tag name and classes.
pub fn find_first_with_classes(node: &NodeRef, find_name: &str, find_classes: &[&str]) -> Option<NodeRef> {
    find_elements_with_classes(node.clone(), find_name, find_classes).next()
}
