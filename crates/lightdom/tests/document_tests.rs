//! Integration tests for document construction, innerHTML, and
//! document-wide queries.

use std::cell::Cell;
use std::rc::Rc;

use lightdom::{Document, DomError, Event, NodeId};

const PAGE: &str = concat!(
    r#"<html><head><meta charset="UTF-8"/><title>Mein Titel</title></head>"#,
    r#"<body><link rel="zino-tag" data-local="test.html"/><test></test></body></html>"#,
);

fn fragment(markup: &str) -> Document {
    Document::new(markup).unwrap()
}

// ========== construction ==========

#[test]
fn test_parse_full_document() {
    let doc = Document::new(&format!("<!DOCTYPE html>{PAGE}")).unwrap();
    let tree = doc.tree();
    assert_eq!(tree.outer_html(doc.document_element()), PAGE);
    assert_eq!(doc.head().and_then(|id| tree.tag_name(id)), Some("head"));
    assert_eq!(doc.body().and_then(|id| tree.tag_name(id)), Some("body"));
}

#[test]
fn test_html_wrapper_attributes_land_on_document_element() {
    let markup = PAGE.replacen("<html>", r#"<html lang="en">"#, 1);
    let doc = Document::new(&format!("<!doctype html>\n{markup}")).unwrap();
    assert_eq!(doc.tree().get_attribute(doc.document_element(), "lang"), Some("en"));
    assert_eq!(doc.tree().outer_html(doc.document_element()), markup);
}

#[test]
fn test_fragment_is_wrapped_in_html_head_body() {
    let code = r#"<div class="Hallo">World!</div>"#;
    let doc = fragment(code);
    let tree = doc.tree();
    assert_eq!(
        tree.outer_html(doc.document_element()),
        format!("<html><head></head><body>{code}</body></html>")
    );
    assert_eq!(tree.inner_html(doc.body().unwrap()), code);
    assert_eq!(doc.to_html(), tree.outer_html(doc.document_element()));
}

#[test]
fn test_plain_text_fragment() {
    let doc = fragment("just text");
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().children(body).len(), 1);
    assert_eq!(doc.tree().text_content(body), "just text");
}

#[test]
fn test_default_child_properties() {
    let code = r#"
<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>

<title></title>

<link href="favicon.ico" rel="shortcut icon"/>
<script type="text/javascript">//
</script>
<link type="text/css" href="dynamic.css" rel="stylesheet" /></head>
<body><iframe src="/start" width="0px" height="0px"></iframe>

<h1>Headline</h1>

<link rel="zino-tag" data-local="components/example.html"/>
<example></example>

<script>
window.urls = {"test": "1234"};
</script>
</body>
</html>"#;
    let doc = fragment(code);
    let tree = doc.tree();
    let children = tree.element_children(doc.document_element());
    assert_eq!(doc.head(), Some(children[0]));
    assert_eq!(doc.body(), Some(children[1]));
    assert_eq!(doc.get_elements_by_tag_name("example").len(), 1);
    assert_eq!(doc.query_selector_all(r#"[rel="zino-tag"]"#).len(), 1);
}

#[test]
fn test_construction_errors_propagate() {
    assert!(matches!(Document::new("<a><b></a>"), Err(DomError::UnexpectedClosingTag { .. })));
    assert!(matches!(
        Document::new("<!DOCTYPE html><html><body>"),
        Err(DomError::UnclosedTag { ref tags }) if tags == &["body"]
    ));
    assert!(matches!(
        Document::new(r#"<!DOCTYPE html><html 1x="y"></html>"#),
        Err(DomError::MalformedAttribute { ref tag, .. }) if tag == "html"
    ));
}

// ========== traversal and queries ==========

#[test]
fn test_simple_traversal() {
    let doc = fragment(r#"<div class="Hallo">World!</div>"#);
    let tree = doc.tree();
    let html = doc.document_element();
    let first = tree.element_children(html)[0];
    assert_eq!(tree.parent(first), Some(html));
    assert_eq!(doc.query_selector_all(".Hallo").len(), 1);
    assert_eq!(doc.get_elements_by_class_name("Hallo").len(), 1);
    assert_eq!(doc.get_elements_by_tag_name("body").first().copied(), doc.body());
    assert_eq!(doc.get_elements_by_tag_name("*").len(), 4);
}

#[test]
fn test_id_class_and_attribute_queries() {
    let doc = fragment(r#"<div id="t1" class="test"><i id="italic">x</i></div>"#);
    let tree = doc.tree();
    let found: Vec<_> = doc
        .query_selector_all("[id]")
        .into_iter()
        .map(|id| tree.get_attribute(id, "id"))
        .collect();
    assert_eq!(found, [Some("t1"), Some("italic")]);
    assert_eq!(doc.query_selector_all(".test"), [doc.get_element_by_id("t1").unwrap()]);
    assert_eq!(doc.get_element_by_id("italic").and_then(|id| tree.tag_name(id)), Some("i"));
    assert_eq!(doc.get_element_by_id("missing"), None);
    assert_eq!(doc.query_selector("section"), None);
}

#[test]
fn test_attribute_access_by_name_and_position() {
    let doc = fragment(r#"<div class="test" data-value="me">test</div>"#);
    let tree = doc.tree();
    let div = doc.get_elements_by_class_name("test")[0];
    assert_eq!(tree.get_attribute(div, "data-value"), Some("me"));
    let second = tree.as_element(div).unwrap().attrs.get_index(1).unwrap();
    assert_eq!((second.name.as_str(), second.value.as_str()), ("data-value", "me"));
}

#[test]
fn test_outer_html_keeps_attribute_order() {
    let doc = fragment(concat!(
        r#"<div id="t1" class="test" __ready="true"><i id="italic" __ready="true">huhu</i></div>"#,
        r#"<div __ready="true" id="t2" class="test"><b __ready="true" id="bold"></b></div>"#,
    ));
    let bold = doc.get_element_by_id("bold").unwrap();
    assert_eq!(doc.tree().outer_html(bold), r#"<b __ready="true" id="bold"></b>"#);
}

// ========== modification ==========

#[test]
fn test_dom_modification() {
    let mut doc = fragment(r#"<div class="Hallo">World!</div>"#);
    let body = doc.body().unwrap();
    let object = doc.create_element("object");
    let tree = doc.tree_mut();
    tree.set_attribute(object, "src", "/test.obj");
    tree.append_child(body, object);
    assert_eq!(
        tree.inner_html(body),
        r#"<div class="Hallo">World!</div><object src="/test.obj"></object>"#
    );

    let hallo = tree.element_children(body)[0];
    assert_eq!(Some(hallo), doc.query_selector(".Hallo"));

    let tree = doc.tree_mut();
    assert!(tree.remove_child(body, hallo));
    assert_eq!(tree.inner_html(body), r#"<object src="/test.obj"></object>"#);
}

#[test]
fn test_created_text_node_serializes_verbatim() {
    let mut doc = fragment("");
    let body = doc.body().unwrap();
    let text = doc.create_text_node("1 < 2");
    doc.tree_mut().append_child(body, text);
    assert_eq!(doc.tree().inner_html(body), "1 < 2");
}

// ========== innerHTML ==========

#[test]
fn test_set_inner_html_replaces_children() {
    let mut doc = fragment("<p>old</p>");
    let body = doc.body().unwrap();
    doc.set_inner_html(body, "<i>new</i> text").unwrap();
    assert_eq!(doc.tree().inner_html(body), "<i>new</i> text");
    assert_eq!(doc.query_selector_all("p").len(), 0);
}

#[test]
fn test_set_inner_html_leaves_partial_tree_on_error() {
    let mut doc = fragment("<div></div>");
    let div = doc.query_selector("div").unwrap();
    let err = doc.set_inner_html(div, "<test>1234<div>ok</div>Me").unwrap_err();
    assert_eq!(
        err,
        DomError::UnclosedTag {
            tags: vec!["test".to_string()],
        }
    );
    assert_eq!(doc.tree().inner_html(div), "<test>1234<div>ok</div>Me</test>");
}

#[test]
fn test_set_inner_html_atomic_keeps_old_children_on_error() {
    let mut doc = fragment("<div><b>keep</b></div>");
    let div = doc.query_selector("div").unwrap();
    let result = doc.set_inner_html_atomic(div, r#"<test>1234<div><img src="test">test</div>Me"#);
    assert!(matches!(result, Err(DomError::UnclosedTag { .. })));
    assert_eq!(doc.tree().inner_html(doc.body().unwrap()), "<div><b>keep</b></div>");

    doc.set_inner_html_atomic(div, "<u>swapped</u>").unwrap();
    assert_eq!(doc.tree().inner_html(div), "<u>swapped</u>");
    let u = doc.query_selector("u").unwrap();
    assert_eq!(doc.tree().parent(u), Some(div));
}

#[test]
fn test_set_inner_html_atomic_allocates_scratch_each_call() {
    let mut doc = fragment("<div></div>");
    let div = doc.query_selector("div").unwrap();
    let before = doc.tree().len();

    doc.set_inner_html_atomic(div, "<b></b>").unwrap();
    // One scratch element plus the parsed <b>.
    assert_eq!(doc.tree().len(), before + 2);

    doc.set_inner_html_atomic(div, "<b></b>").unwrap();
    assert_eq!(doc.tree().len(), before + 4);
    assert_eq!(doc.tree().children(div).len(), 1);
}

#[test]
fn test_round_trip_is_identity() {
    let html = r#"<xyz><div class="approaching-discounts">
        <isif condition="${pdict.approachingDiscounts.length > 0}">
                <isloop items="${pdict.approachingDiscounts}" var="approachingDiscount">
                    <div class="single-approaching-discount text-center">
                    ${approachingDiscount.discountMsg}
                    </div>
                </isloop>
        </isif>
</div>
</xyz>"#;
    let doc = fragment(html);
    let body = doc.body().unwrap();
    assert_eq!(doc.query_selector_all("xyz").len(), 1);
    assert_eq!(doc.tree().inner_html(body), html);
    assert_eq!(doc.query_selector_all("[items]").len(), 1);

    let mut again = fragment("");
    let again_body = again.body().unwrap();
    again.set_inner_html(again_body, &doc.tree().inner_html(body)).unwrap();
    assert_eq!(again.tree().inner_html(again_body), html);
}

#[test]
fn test_self_closing_elements_have_no_children() {
    let doc = fragment(r#"<p><img src="a.png">after<br>more<input name="q"></p>"#);
    for tag in ["img", "br", "input"] {
        for id in doc.get_elements_by_tag_name(tag) {
            assert!(doc.tree().children(id).is_empty(), "<{tag}> has children");
        }
    }
}

#[test]
fn test_inner_html_on_self_closing_element_adds_nothing() {
    let mut doc = fragment(r#"<p><img src="a.png"></p>"#);
    let img = doc.query_selector("img").unwrap();

    doc.set_inner_html(img, "<b>x</b>").unwrap();
    assert!(doc.tree().children(img).is_empty());

    doc.set_inner_html_atomic(img, "<b>y</b>").unwrap();
    assert!(doc.tree().children(img).is_empty());

    assert_eq!(doc.tree().outer_html(img), r#"<img src="a.png"/>"#);
    assert!(doc.query_selector("b").is_none());
}

// ========== events ==========

#[test]
fn test_simulated_click_bubbles_to_document_element() {
    let mut doc = fragment("<div></div>");
    let body = doc.body().unwrap();
    let html = doc.document_element();
    let triggered = Rc::new(Cell::new(0));

    let on_body = Rc::clone(&triggered);
    let body_listener = doc
        .tree_mut()
        .add_event_listener(body, "click", move |_: &mut Event| on_body.set(1));
    let _ = doc.tree().click(body);
    assert_eq!(triggered.get(), 1);

    let on_html = Rc::clone(&triggered);
    let html_listener = doc
        .tree_mut()
        .add_event_listener(html, "click", move |_: &mut Event| on_html.set(2));
    let _ = doc.tree().click(body);
    assert_eq!(triggered.get(), 2, "event bubbles up");

    assert!(doc.tree_mut().remove_event_listener(html, "click", html_listener));
    let _ = doc.tree().click(body);
    assert_eq!(triggered.get(), 1, "listener removal works");
    assert!(doc.tree_mut().remove_event_listener(body, "click", body_listener));
}

#[test]
fn test_stop_propagation_from_body() {
    let mut doc = fragment("<div></div>");
    let body = doc.body().unwrap();
    let html = doc.document_element();
    let triggered = Rc::new(Cell::new(0));

    let first = Rc::clone(&triggered);
    let _ = doc.tree_mut().add_event_listener(body, "click", move |event: &mut Event| {
        event.stop_propagation();
        first.set(1);
    });
    let second = Rc::clone(&triggered);
    let _ = doc
        .tree_mut()
        .add_event_listener(body, "click", move |_: &mut Event| second.set(2));
    let third = Rc::clone(&triggered);
    let _ = doc
        .tree_mut()
        .add_event_listener(html, "click", move |_: &mut Event| third.set(3));

    let event = doc.tree().click(body);
    assert_eq!(triggered.get(), 2);
    assert!(event.propagation_stopped());
    assert_eq!(event.target, body);
}

#[test]
fn test_click_from_nested_div_reaches_document() {
    let mut doc = fragment("<div></div>");
    let div = doc.query_selector("div").unwrap();
    let seen = Rc::new(Cell::new(None));

    let record = Rc::clone(&seen);
    let _ = doc
        .tree_mut()
        .add_event_listener(NodeId::ROOT, "click", move |event: &mut Event| {
            record.set(Some((event.target, event.current_target)));
        });

    let _ = doc.tree().click(div);
    assert_eq!(seen.get(), Some((div, NodeId::ROOT)));
}
