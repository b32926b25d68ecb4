//! Queries over a coerced [`ElementNode`] tree.

use crate::tree::ElementNode;

/// Lazy pre-order walk yielding every element named `tag`, the starting node
/// included. Each call starts a fresh traversal.
pub struct FindAll<'a, 't> {
    stack: Vec<&'a ElementNode>,
    tag: &'t str,
}

impl<'a> Iterator for FindAll<'a, '_> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.elements().rev());

            if node.tag_name.eq_ignore_ascii_case(self.tag) {
                return Some(node);
            }
        }
        None
    }
}

/// All elements named `tag` at any depth below (and including) `root`, in
/// document order.
pub fn find_all<'a, 't>(root: &'a ElementNode, tag: &'t str) -> FindAll<'a, 't> {
    FindAll {
        stack: vec![root],
        tag,
    }
}

/// Direct children of `node` named `tag`.
pub fn children_named<'a>(
    node: &'a ElementNode,
    tag: &'a str,
) -> impl Iterator<Item = &'a ElementNode> + 'a {
    node.elements()
        .filter(move |child| child.tag_name.eq_ignore_ascii_case(tag))
}

/// Attribute value, or `None` when the attribute is absent.
pub fn attr<'a>(node: &'a ElementNode, name: &str) -> Option<&'a str> {
    node.attributes
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Attribute value with absence read as the empty string.
pub fn attr_or_empty<'a>(node: &'a ElementNode, name: &str) -> &'a str {
    attr(node, name).unwrap_or("")
}

/// `true` only when the attribute is present and equal to `value`.
pub fn attr_eq(node: &ElementNode, name: &str, value: &str) -> bool {
    attr(node, name) == Some(value)
}

/// Elements whose qualified tag name resolves to `{ns_uri}local`.
///
/// Prefixes are resolved through `xmlns:prefix` (or `xmlns` for unprefixed
/// names) declarations on the element itself or its ancestors. The local
/// part is compared case-insensitively since html5ever lowercases tag names.
pub fn find_all_ns<'a>(root: &'a ElementNode, ns_uri: &str, local: &str) -> Vec<&'a ElementNode> {
    let mut found = Vec::new();
    let mut bindings: Vec<(&'a str, &'a str)> = Vec::new();
    // (node, number of in-scope bindings inherited from its ancestors)
    let mut stack: Vec<(&'a ElementNode, usize)> = vec![(root, 0)];

    while let Some((node, scope)) = stack.pop() {
        bindings.truncate(scope);
        for (name, value) in &node.attributes {
            if name == "xmlns" {
                bindings.push(("", value.as_str()));
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                bindings.push((prefix, value.as_str()));
            }
        }

        let (prefix, name) = match node.tag_name.split_once(':') {
            Some((prefix, name)) => (prefix, name),
            None => ("", node.tag_name.as_str()),
        };
        let resolved = bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound.eq_ignore_ascii_case(prefix))
            .map(|(_, uri)| *uri);

        if resolved == Some(ns_uri) && name.eq_ignore_ascii_case(local) {
            found.push(node);
        }

        let inner = bindings.len();
        stack.extend(node.elements().rev().map(|child| (child, inner)));
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{parse_tree, ElementNode, DOCUMENT_TAG};

    fn sample() -> ElementNode {
        ElementNode::new(DOCUMENT_TAG).with_child(
            ElementNode::new("div")
                .with_child(ElementNode::new("a").with_attr("href", "1"))
                .with_child(
                    ElementNode::new("span")
                        .with_child(ElementNode::new("a").with_attr("href", "2")),
                )
                .with_child(ElementNode::new("a").with_attr("href", "3")),
        )
    }

    #[test]
    fn test_find_all_document_order() {
        let root = sample();
        let hrefs: Vec<&str> = find_all(&root, "a").map(|a| attr_or_empty(a, "href")).collect();
        assert_eq!(hrefs, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_find_all_includes_self_and_restarts() {
        let root = sample();
        let div = find_all(&root, "div").next().unwrap();
        assert_eq!(find_all(div, "div").count(), 1);
        assert_eq!(find_all(&root, "a").count(), 3);
        assert_eq!(find_all(&root, "a").count(), 3);
    }

    #[test]
    fn test_find_all_is_case_insensitive() {
        let root = ElementNode::new(DOCUMENT_TAG).with_child(ElementNode::new("TITLE"));
        assert_eq!(find_all(&root, "title").count(), 1);
    }

    #[test]
    fn test_missing_attribute_never_matches() {
        let node = ElementNode::new("a").with_attr("href", "x");
        assert_eq!(attr(&node, "class"), None);
        assert_eq!(attr_or_empty(&node, "class"), "");
        assert!(!attr_eq(&node, "class", "l"));
        assert!(!attr_eq(&node, "class", ""));
        assert!(attr_eq(&node, "href", "x"));
    }

    #[test]
    fn test_children_named_is_direct_only() {
        let root = sample();
        let div = find_all(&root, "div").next().unwrap();
        assert_eq!(children_named(div, "a").count(), 2);
    }

    #[test]
    fn test_find_all_ns_resolves_prefixes() {
        let raw = r#"<env:Envelope xmlns:env="urn:env"><env:Body>
            <m:count xmlns:m="urn:m">4</m:count>
            <x:count xmlns:x="urn:other">5</x:count>
            </env:Body></env:Envelope>"#;
        let root = parse_tree(raw);

        let bodies = find_all_ns(&root, "urn:env", "body");
        assert_eq!(bodies.len(), 1);

        // env is bound above the subtree being searched
        assert!(find_all_ns(bodies[0], "urn:env", "body").is_empty());

        let counts = find_all_ns(bodies[0], "urn:m", "count");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].text(), "4");
    }

    #[test]
    fn test_find_all_ns_ignores_html_body() {
        let root = parse_tree("<html><body><p>x</p></body></html>");
        assert!(find_all_ns(&root, "urn:env", "body").is_empty());
    }
}
