//! Integration tests for the tree builder.

use lightdom_common::DomError;
use lightdom_dom::{DomTree, NodeId, NodeType};
use lightdom_html::{TreeBuilder, parse_fragment};

/// Helper to parse a fragment under a fresh Document node
fn parse(input: &str) -> DomTree {
    let mut tree = DomTree::new();
    parse_fragment(&mut tree, NodeId::ROOT, input).unwrap();
    tree
}

fn parse_err(input: &str) -> DomError {
    let mut tree = DomTree::new();
    parse_fragment(&mut tree, NodeId::ROOT, input).unwrap_err()
}

#[test]
fn test_nested_elements_and_text() {
    let tree = parse("<div><p>Hello</p> <span>World</span></div>");
    let div = tree.children(NodeId::ROOT)[0];
    assert_eq!(tree.tag_name(div), Some("div"));

    let kids = tree.children(div);
    assert_eq!(kids.len(), 3);
    assert_eq!(tree.tag_name(kids[0]), Some("p"));
    assert_eq!(tree.as_text(kids[1]), Some(" "));
    assert_eq!(tree.text_content(kids[2]), "World");
}

#[test]
fn test_text_before_and_after_tags() {
    let tree = parse("lead <b>bold</b> tail");
    let kids = tree.children(NodeId::ROOT);
    assert_eq!(kids.len(), 3);
    assert_eq!(tree.as_text(kids[0]), Some("lead "));
    assert_eq!(tree.as_text(kids[2]), Some(" tail"));
}

#[test]
fn test_plain_text_only() {
    let tree = parse("Hallo");
    let kids = tree.children(NodeId::ROOT);
    assert_eq!(kids.len(), 1);
    assert!(matches!(&tree.get(kids[0]).unwrap().node_type, NodeType::Text(t) if t == "Hallo"));
}

#[test]
fn test_empty_input_creates_nothing() {
    let tree = parse("");
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_builtin_self_closing_never_takes_children() {
    let tree = parse(r#"<p><img src="a.png">caption<br>more</p>"#);
    let p = tree.children(NodeId::ROOT)[0];
    let kids = tree.children(p);
    assert_eq!(kids.len(), 4);
    assert!(tree.children(kids[0]).is_empty());
    assert_eq!(tree.as_text(kids[1]), Some("caption"));
}

#[test]
fn test_explicit_slash_self_closes() {
    let tree = parse("<x-icon/><span></span>");
    let kids = tree.children(NodeId::ROOT);
    assert_eq!(kids.len(), 2);
    assert!(tree.children(kids[0]).is_empty());
}

#[test]
fn test_attributes_are_applied_in_order() {
    let tree = parse(r#"<input type="text" name="q" disabled>"#);
    let input = tree.children(NodeId::ROOT)[0];
    assert_eq!(tree.outer_html(input), r#"<input type="text" name="q" disabled="disabled"/>"#);
    assert_eq!(tree.as_element(input).unwrap().name(), Some("q"));
}

#[test]
fn test_quoted_gt_round_trips() {
    let input = r#"<isif condition="${a > b}">yes</isif>"#;
    let tree = parse(input);
    assert_eq!(tree.inner_html(NodeId::ROOT), input);
}

// ========== errors ==========

#[test]
fn test_mismatched_closing_tag() {
    assert_eq!(
        parse_err("<a><b></a>"),
        DomError::UnexpectedClosingTag {
            found: "a".to_string(),
            expected: Some("b".to_string()),
        }
    );
}

#[test]
fn test_closing_tag_with_nothing_open() {
    assert_eq!(
        parse_err("text</p>"),
        DomError::UnexpectedClosingTag {
            found: "p".to_string(),
            expected: None,
        }
    );
}

#[test]
fn test_closing_tag_case_must_match() {
    assert!(matches!(parse_err("<DIV></div>"), DomError::UnexpectedClosingTag { .. }));
}

#[test]
fn test_unclosed_tags_listed_innermost_first() {
    assert_eq!(
        parse_err("<a><b>"),
        DomError::UnclosedTag {
            tags: vec!["b".to_string(), "a".to_string()],
        }
    );
}

#[test]
fn test_closing_tag_without_gt_leaves_element_open() {
    assert_eq!(
        parse_err("<div>x</div"),
        DomError::UnclosedTag {
            tags: vec!["div".to_string()],
        }
    );
}

#[test]
fn test_malformed_attribute_aborts() {
    assert!(matches!(
        parse_err("<div 1bad>x</div>"),
        DomError::MalformedAttribute { ref tag, .. } if tag == "div"
    ));
}

#[test]
fn test_partial_tree_survives_error() {
    let mut tree = DomTree::new();
    let result = TreeBuilder::new(&mut tree, NodeId::ROOT).run("<p>ok</p><a><b></a>");
    assert!(result.is_err());

    let kids = tree.children(NodeId::ROOT);
    assert_eq!(tree.tag_name(kids[0]), Some("p"));
    assert_eq!(tree.text_content(kids[0]), "ok");
}

#[test]
fn test_self_closing_root_takes_no_children() {
    let mut tree = DomTree::new();
    let br = tree.create_element("br");
    tree.append_child(NodeId::ROOT, br);

    assert!(parse_fragment(&mut tree, br, "<b>x</b>").is_ok());
    assert!(tree.children(br).is_empty());
}

#[test]
fn test_builders_do_not_share_state() {
    let mut tree = DomTree::new();
    assert!(parse_fragment(&mut tree, NodeId::ROOT, "<a>").is_err());
    // The failed `<a>` left nothing open for the next parse.
    assert!(parse_fragment(&mut tree, NodeId::ROOT, "<b></b>").is_ok());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 20_000;
    let input = format!("{}{}", "<i>".repeat(depth), "</i>".repeat(depth));
    let tree = parse(&input);

    let deepest = tree.descendants(NodeId::ROOT).last().unwrap();
    assert_eq!(tree.ancestors(deepest).count(), depth);
    assert_eq!(tree.inner_html(NodeId::ROOT), input);
}
