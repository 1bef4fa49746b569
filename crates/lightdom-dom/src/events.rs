//! Event listeners and bubbling dispatch.
//!
//! [§ 2.7 Interface EventTarget](https://dom.spec.whatwg.org/#interface-eventtarget)
//!
//! Only the target and bubbling phases exist. Every node keeps an ordered
//! list of listeners per event name; dispatch runs the target's listeners,
//! then its parent's, up to the Document node.
//!
//! Three signals are independent of each other:
//! - a listener returning [`ListenerOutcome::Cancel`] skips the remaining
//!   listeners on the current node only;
//! - [`Event::stop_propagation`] ends dispatch after the current node;
//! - [`Event::prevent_default`] is recorded and nothing else.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::{DomTree, NodeId};

/// Events synthesized by the convenience helpers on [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum StandardEvent {
    /// `click`
    Click,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
}

/// The mutable record shared by every listener during one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name listeners are registered under.
    pub name: String,
    /// Node the event was dispatched on.
    pub target: NodeId,
    /// Node whose listeners are currently running.
    pub current_target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// A fresh event aimed at `target`.
    #[must_use]
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// [§ 2.2 preventDefault()](https://dom.spec.whatwg.org/#dom-event-preventdefault)
    ///
    /// There are no default actions to suppress; the flag is only observable.
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// [§ 2.2 stopPropagation()](https://dom.spec.whatwg.org/#dom-event-stoppropagation)
    ///
    /// Listeners on the current node still run; ancestors are skipped.
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether a listener called [`Event::prevent_default`].
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether a listener called [`Event::stop_propagation`].
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// What a listener asks of the dispatcher for the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerOutcome {
    /// Keep running listeners.
    #[default]
    Continue,
    /// Skip the remaining listeners on this node. Bubbling is unaffected.
    Cancel,
}

impl From<()> for ListenerOutcome {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

impl From<bool> for ListenerOutcome {
    /// `false` cancels, mirroring a listener that returns a falsy value.
    fn from(keep_going: bool) -> Self {
        if keep_going { Self::Continue } else { Self::Cancel }
    }
}

/// Handle returned by [`DomTree::add_event_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A registered callback.
pub type Listener = Rc<dyn Fn(&mut Event) -> ListenerOutcome>;

/// Per-node table of event name to listeners, in registration order.
#[derive(Clone, Default)]
pub struct EventListeners {
    by_event: HashMap<String, Vec<(ListenerId, Listener)>>,
}

impl EventListeners {
    fn add(&mut self, name: &str, id: ListenerId, listener: Listener) {
        self.by_event
            .entry(name.to_string())
            .or_default()
            .push((id, listener));
    }

    fn remove(&mut self, name: &str, id: ListenerId) -> bool {
        let Some(list) = self.by_event.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        let removed = list.len() != before;
        if list.is_empty() {
            let _ = self.by_event.remove(name);
        }
        removed
    }

    fn clear(&mut self, name: &str) -> usize {
        self.by_event.remove(name).map_or(0, |list| list.len())
    }

    /// Listeners registered for `name`, in registration order.
    pub fn iter<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Listener> + use<'a> {
        self.by_event
            .get(name)
            .into_iter()
            .flatten()
            .map(|(_, listener)| listener)
    }

    /// Number of listeners registered for `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.by_event.get(name).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_event.iter().map(|(name, list)| (name, list.len())))
            .finish()
    }
}

impl DomTree {
    /// [§ 2.7 addEventListener()](https://dom.spec.whatwg.org/#dom-eventtarget-addeventlistener)
    ///
    /// Register `listener` for `name` on `node`. Duplicates are allowed and
    /// run once per registration. The listener may return `()`, a `bool`
    /// (`false` cancels), or a [`ListenerOutcome`].
    pub fn add_event_listener<F, R>(&mut self, node: NodeId, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut Event) -> R + 'static,
        R: Into<ListenerOutcome>,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        if let Some(target) = self.get_mut(node) {
            let wrapped: Listener = Rc::new(move |event: &mut Event| -> ListenerOutcome {
                listener(event).into()
            });
            target.listeners.add(name, id, wrapped);
        }
        id
    }

    /// [§ 2.7 removeEventListener()](https://dom.spec.whatwg.org/#dom-eventtarget-removeeventlistener)
    ///
    /// Remove one registration. Returns `false` if it was not registered on
    /// `node` under `name`.
    pub fn remove_event_listener(&mut self, node: NodeId, name: &str, id: ListenerId) -> bool {
        self.get_mut(node)
            .is_some_and(|target| target.listeners.remove(name, id))
    }

    /// Remove every listener for `name` on `node`, returning how many were
    /// removed.
    pub fn clear_event_listeners(&mut self, node: NodeId, name: &str) -> usize {
        self.get_mut(node)
            .map_or(0, |target| target.listeners.clear(name))
    }

    /// Dispatch `event` at `target` and bubble it to the root.
    ///
    /// Returns the record as the last listener left it.
    pub fn dispatch_event(&self, target: NodeId, mut event: Event) -> Event {
        event.target = target;
        let name = event.name.clone();
        let mut current = Some(target);

        while let Some(node_id) = current {
            event.current_target = node_id;
            if let Some(node) = self.get(node_id) {
                for listener in node.listeners.iter(&name) {
                    if listener(&mut event) == ListenerOutcome::Cancel {
                        break;
                    }
                }
            }
            if event.propagation_stopped {
                break;
            }
            current = self.parent(node_id);
        }

        tracing::trace!(
            event = %event.name,
            target = target.0,
            stopped_at = event.current_target.0,
            default_prevented = event.default_prevented,
            "event dispatched"
        );
        event
    }

    /// Dispatch one of the [`StandardEvent`]s at `target`.
    pub fn dispatch_standard(&self, target: NodeId, kind: StandardEvent) -> Event {
        let name: &'static str = kind.into();
        self.dispatch_event(target, Event::new(name, target))
    }

    /// [§ 6.6.4 click()](https://html.spec.whatwg.org/multipage/interaction.html#dom-click)
    pub fn click(&self, target: NodeId) -> Event {
        self.dispatch_standard(target, StandardEvent::Click)
    }

    /// Dispatch a `focus` event at `target`.
    pub fn focus(&self, target: NodeId) -> Event {
        self.dispatch_standard(target, StandardEvent::Focus)
    }

    /// Dispatch a `blur` event at `target`.
    pub fn blur(&self, target: NodeId) -> Event {
        self.dispatch_standard(target, StandardEvent::Blur)
    }
}
