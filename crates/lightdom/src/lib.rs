//! High-level document API for lightdom.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Construction** - full documents (with DOCTYPE) and body fragments
//! - **innerHTML Assignment** - in place, or atomically through a scratch element
//! - **Document Queries** - tag, class, ID, and selector lookups from the root
//!
//! The member crates are re-exported for callers that need the lower layers.
//!
//! # Example
//!
//! ```
//! use lightdom::Document;
//!
//! let doc = Document::new(r#"<div class="Hallo">World!</div>"#)?;
//! let body = doc.body().unwrap();
//! assert_eq!(doc.tree().inner_html(body), r#"<div class="Hallo">World!</div>"#);
//!
//! let div = doc.query_selector(".Hallo").unwrap();
//! let event = doc.tree().click(div);
//! assert!(!event.default_prevented());
//! # Ok::<(), lightdom::DomError>(())
//! ```

/// The `Document` type.
pub mod document;

pub use document::Document;

pub use lightdom_common as common;
pub use lightdom_css as css;
pub use lightdom_dom as dom;
pub use lightdom_html as html;

pub use lightdom_common::self_closing::{SelfClosingConfig, set_custom_self_closing};
pub use lightdom_common::{DomError, Result};
pub use lightdom_dom::{DomTree, Event, ListenerId, ListenerOutcome, NodeId, StandardEvent};
