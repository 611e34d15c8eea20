//! Helper functions for tree-sitter AST navigation.

use tree_sitter::Node;

/// Get the text content of a node.
pub fn get_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Find the first child of a specific type.
#[allow(clippy::manual_find)]
pub fn find_child_by_type<'a>(node: &Node<'a>, type_name: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            return Some(child);
        }
    }
    None
}

/// Find all children of a specific type.
pub fn find_children_by_type<'a>(node: &Node<'a>, type_name: &str) -> Vec<Node<'a>> {
    let mut results = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            results.push(child);
        }
    }
    results
}

/// The child stored under `field`, else the first child of kind `fallback`.
///
/// Grammar releases have renamed a few fields; the kind lookup keeps older
/// trees working.
pub fn field_or_kind<'a>(node: &Node<'a>, field: &str, fallback: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
        .or_else(|| find_child_by_type(node, fallback))
}

/// Named children that are part of the grammar proper (no comments or
/// other extras).
pub fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'a>> = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children
}

/// Byte spans of every non-empty leaf under `root`, in source order.
///
/// Extras (comments, preprocessor lines) are not descended into; their text
/// ends up between leaves.
pub fn leaf_spans(root: &Node) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut stack = vec![*root];

    while let Some(node) = stack.pop() {
        if node.is_extra() {
            continue;
        }
        if node.child_count() == 0 {
            if node.end_byte() > node.start_byte() {
                spans.push((node.start_byte(), node.end_byte()));
            }
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_leaf_spans_skip_comments() {
        let source = "class A { /* c */ }";
        let tree = parse(source);
        let texts: Vec<&str> = leaf_spans(&tree.root_node())
            .into_iter()
            .map(|(s, e)| &source[s..e])
            .collect();
        assert_eq!(texts, vec!["class", "A", "{", "}"]);
    }

    #[test]
    fn test_find_child_by_type() {
        let source = "class A : B { }";
        let tree = parse(source);
        let class = tree.root_node().named_child(0).unwrap();
        let base_list = find_child_by_type(&class, "base_list").unwrap();
        assert_eq!(get_node_text(&base_list, source), ": B");
        assert!(find_children_by_type(&class, "attribute_list").is_empty());
    }
}
