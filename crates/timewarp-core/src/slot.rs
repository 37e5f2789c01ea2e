//! # Render as child
//!
//! A wrapper that supports `as_child` does not render its own element. It
//! hands its props to a [`Slot`], which merges them onto the single element
//! the caller supplied:
//!
//! ```rust
//! use timewarp_core::*;
//!
//! let link = Element::new("a").props(Props::new().set("href", "/docs").class("nav"));
//! let merged = Slot::new(Props::new().class("tm-button").on("onClick", |_| {}))
//!     .compose(link)
//!     .unwrap();
//!
//! assert_eq!(merged.tag, "a");
//! assert_eq!(merged.class_name(), Some("tm-button nav"));
//! ```
//!
//! Merge rules, per child prop:
//!
//! - `class`: wrapper classes first, then the child's, space joined. Absent
//!   when both are empty.
//! - Handler keys (`on` + uppercase letter) holding a handler on the child:
//!   composed with the wrapper's handler, wrapper first.
//! - Everything else: the child's value wins.
//!
//! Wrapper props the child does not set pass through. Refs from both sides
//! are combined so both observe the committed node. Only the immediate
//! child is touched; its own children are kept as they are.

use std::rc::Rc;

use crate::element::{CLASS, Element, Handler, Node, NodeRef, Prop, Props};
use crate::error::InvalidChildError;

/// The shape of whatever was passed as a slot's children, classified once at
/// the API boundary.
#[derive(Clone, Debug)]
pub enum SlotChild {
    Empty,
    One(Element),
    Text(String),
    Many(usize),
}

impl From<Element> for SlotChild {
    fn from(e: Element) -> Self {
        SlotChild::One(e)
    }
}

impl From<Node> for SlotChild {
    fn from(n: Node) -> Self {
        match n {
            Node::Element(e) => SlotChild::One(e),
            Node::Text(t) => SlotChild::Text(t),
        }
    }
}

impl From<Option<Node>> for SlotChild {
    fn from(n: Option<Node>) -> Self {
        n.map_or(SlotChild::Empty, SlotChild::from)
    }
}

impl From<Vec<Node>> for SlotChild {
    fn from(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => SlotChild::Empty,
            1 => nodes.pop().map_or(SlotChild::Empty, SlotChild::from),
            n => SlotChild::Many(n),
        }
    }
}

impl SlotChild {
    pub fn into_element(self) -> Result<Element, InvalidChildError> {
        match self {
            SlotChild::One(e) => Ok(e),
            SlotChild::Empty => Err(InvalidChildError::Empty),
            SlotChild::Many(n) => Err(InvalidChildError::Many(n)),
            SlotChild::Text(t) => Err(InvalidChildError::Text(t)),
        }
    }
}

/// Wrapper-side props and ref waiting for a child to land on.
#[derive(Clone, Debug, Default)]
pub struct Slot {
    props: Props,
    node_ref: Option<NodeRef>,
}

impl Slot {
    pub fn new(props: Props) -> Self {
        Slot {
            props,
            node_ref: None,
        }
    }
    pub fn node_ref(mut self, r: NodeRef) -> Self {
        self.node_ref = Some(r);
        self
    }
    pub fn maybe_node_ref(mut self, r: Option<NodeRef>) -> Self {
        self.node_ref = r;
        self
    }

    pub fn compose(self, child: impl Into<SlotChild>) -> Result<Element, InvalidChildError> {
        let child = child.into().into_element()?;
        let Slot {
            props: mut merged,
            node_ref,
        } = self;

        let outer_class = merged.remove(CLASS);
        let mut inner_class = None;

        for (key, value) in child.props {
            if key == CLASS {
                inner_class = Some(value);
                continue;
            }
            match value {
                Prop::Handler(inner) if is_handler_key(&key) => {
                    let handler = match merged.remove(&key) {
                        Some(Prop::Handler(outer)) => compose_handlers(outer, inner),
                        _ => inner,
                    };
                    merged.insert(key, Prop::Handler(handler));
                }
                other => {
                    merged.insert(key, other);
                }
            }
        }

        let classes = join_classes(
            outer_class.as_ref().and_then(Prop::as_text),
            inner_class.as_ref().and_then(Prop::as_text),
        );
        if let Some(classes) = classes {
            merged.insert(CLASS, Prop::Value(classes.into()));
        }

        Ok(Element {
            tag: child.tag,
            props: merged,
            node_ref: NodeRef::merge([node_ref, child.node_ref]),
            children: child.children,
        })
    }
}

/// Free-function form of [`Slot::compose`].
pub fn slot(
    props: Props,
    node_ref: Option<NodeRef>,
    child: impl Into<SlotChild>,
) -> Result<Element, InvalidChildError> {
    Slot::new(props).maybe_node_ref(node_ref).compose(child)
}

/// `onClick`, `onChange`, ... but not `once` or `on`.
pub fn is_handler_key(key: &str) -> bool {
    key.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Calls `outer` then `inner` with the same arguments.
pub fn compose_handlers(outer: Handler, inner: Handler) -> Handler {
    Rc::new(move |args| {
        outer(args);
        inner(args);
    })
}

fn join_classes(outer: Option<&str>, inner: Option<&str>) -> Option<String> {
    let joined = [outer, inner]
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}
