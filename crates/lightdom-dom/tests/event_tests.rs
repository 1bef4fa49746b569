//! Tests for listener registration and bubbling dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use lightdom_dom::{DomTree, Event, ListenerOutcome, NodeId, StandardEvent};

/// Builds Document > body > div and returns (body, div).
fn body_with_div() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let body = tree.create_element("body");
    tree.append_child(NodeId::ROOT, body);
    let div = tree.create_element("div");
    tree.append_child(body, div);
    (tree, body, div)
}

type Log = Rc<RefCell<Vec<&'static str>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn record(log: &Log, label: &'static str) -> impl Fn(&mut Event) + 'static {
    let log = Rc::clone(log);
    move |_event: &mut Event| log.borrow_mut().push(label)
}

// ========== bubbling ==========

#[test]
fn test_click_bubbles_from_target_to_ancestors() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let _ = tree.add_event_listener(div, "click", record(&calls, "div"));
    let _ = tree.add_event_listener(body, "click", record(&calls, "body"));
    let _ = tree.add_event_listener(NodeId::ROOT, "click", record(&calls, "document"));

    let event = tree.click(div);

    assert_eq!(*calls.borrow(), ["div", "body", "document"]);
    assert_eq!(event.target, div);
    assert_eq!(event.current_target, NodeId::ROOT);
}

#[test]
fn test_stop_propagation_keeps_same_node_listeners() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let stopper = Rc::clone(&calls);
    let _ = tree.add_event_listener(div, "click", move |event: &mut Event| {
        event.stop_propagation();
        stopper.borrow_mut().push("div-stop");
    });
    let _ = tree.add_event_listener(div, "click", record(&calls, "div-second"));
    let _ = tree.add_event_listener(body, "click", record(&calls, "body"));

    let event = tree.click(div);

    assert_eq!(*calls.borrow(), ["div-stop", "div-second"]);
    assert!(event.propagation_stopped());
    assert_eq!(event.current_target, div);
}

#[test]
fn test_prevent_default_does_not_stop_propagation() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let _ = tree.add_event_listener(div, "click", |event: &mut Event| event.prevent_default());
    let _ = tree.add_event_listener(body, "click", record(&calls, "body"));

    let event = tree.click(div);

    assert!(event.default_prevented());
    assert!(!event.propagation_stopped());
    assert_eq!(*calls.borrow(), ["body"]);
}

#[test]
fn test_cancel_outcome_skips_remaining_listeners_but_bubbles() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let first = Rc::clone(&calls);
    let _ = tree.add_event_listener(div, "click", move |_: &mut Event| {
        first.borrow_mut().push("div-first");
        false
    });
    let _ = tree.add_event_listener(div, "click", record(&calls, "div-second"));
    let _ = tree.add_event_listener(body, "click", |_: &mut Event| ListenerOutcome::Continue);
    let _ = tree.add_event_listener(body, "click", record(&calls, "body"));

    let _ = tree.click(div);

    assert_eq!(*calls.borrow(), ["div-first", "body"]);
}

#[test]
fn test_duplicate_listeners_run_in_registration_order() {
    let (mut tree, _, div) = body_with_div();
    let calls = log();
    let _ = tree.add_event_listener(div, "focus", record(&calls, "one"));
    let _ = tree.add_event_listener(div, "focus", record(&calls, "two"));
    let _ = tree.add_event_listener(div, "focus", record(&calls, "one"));

    let _ = tree.focus(div);
    let _ = tree.blur(div);

    assert_eq!(*calls.borrow(), ["one", "two", "one"]);
}

// ========== removal ==========

#[test]
fn test_remove_event_listener_by_id() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let removed = tree.add_event_listener(body, "click", record(&calls, "removed"));
    let _ = tree.add_event_listener(body, "click", record(&calls, "kept"));

    assert!(tree.remove_event_listener(body, "click", removed));
    assert!(!tree.remove_event_listener(body, "click", removed));
    assert!(!tree.remove_event_listener(div, "click", removed));

    let _ = tree.click(div);
    assert_eq!(*calls.borrow(), ["kept"]);
}

#[test]
fn test_clear_event_listeners_by_name() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let _ = tree.add_event_listener(body, "click", record(&calls, "a"));
    let _ = tree.add_event_listener(body, "click", record(&calls, "b"));
    let _ = tree.add_event_listener(body, "blur", record(&calls, "blur"));

    assert_eq!(tree.clear_event_listeners(body, "click"), 2);
    assert_eq!(tree.clear_event_listeners(body, "click"), 0);

    let _ = tree.click(div);
    let _ = tree.dispatch_standard(div, StandardEvent::Blur);
    assert_eq!(*calls.borrow(), ["blur"]);
}

// ========== custom events ==========

#[test]
fn test_custom_event_names_and_standard_names() {
    let (mut tree, body, div) = body_with_div();
    let calls = log();
    let _ = tree.add_event_listener(body, "zino:mounted", record(&calls, "mounted"));

    let event = tree.dispatch_event(div, Event::new("zino:mounted", div));
    assert_eq!(event.name, "zino:mounted");
    assert_eq!(*calls.borrow(), ["mounted"]);

    assert_eq!(StandardEvent::Click.to_string(), "click");
    assert_eq!("blur".parse::<StandardEvent>(), Ok(StandardEvent::Blur));
}
