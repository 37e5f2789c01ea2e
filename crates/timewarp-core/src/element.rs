//! Element descriptions: the node shape shared by the slot composer and every
//! component in `timewarp-ui`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::rc::Rc;

pub type NodeId = u64;

/// Property key holding the space separated style classes.
pub const CLASS: &str = "class";

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Primitive {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Primitive {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Primitive::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Primitive::Text(s.to_string())
    }
}
impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Primitive::Text(s)
    }
}
impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Primitive::Bool(b)
    }
}
impl From<f64> for Primitive {
    fn from(n: f64) -> Self {
        Primitive::Number(n)
    }
}
/// Exact up to 2^53 in magnitude, which covers millisecond timestamps;
/// larger values are rounded to the nearest `f64`.
impl From<i64> for Primitive {
    fn from(n: i64) -> Self {
        Primitive::Number(n as f64)
    }
}

/// Event handler. Every handler receives the same argument slice the
/// dispatcher was called with.
pub type Handler = Rc<dyn Fn(&[Primitive])>;

#[derive(Clone)]
pub enum Prop {
    Value(Primitive),
    Handler(Handler),
}

impl Prop {
    pub fn as_value(&self) -> Option<&Primitive> {
        match self {
            Prop::Value(v) => Some(v),
            Prop::Handler(_) => None,
        }
    }
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Prop::Handler(h) => Some(h),
            Prop::Value(_) => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        self.as_value().and_then(Primitive::as_text)
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(v) => v.fmt(f),
            Prop::Handler(_) => write!(f, "<handler>"),
        }
    }
}

/// Property bag keyed by name. Iteration order is the key order.
#[derive(Clone, Default)]
pub struct Props(BTreeMap<String, Prop>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Primitive>) -> Self {
        self.0.insert(key.into(), Prop::Value(value.into()));
        self
    }
    pub fn class(self, class: impl Into<String>) -> Self {
        let class: String = class.into();
        self.set(CLASS, class)
    }
    pub fn on(mut self, key: impl Into<String>, f: impl Fn(&[Primitive]) + 'static) -> Self {
        self.0.insert(key.into(), Prop::Handler(Rc::new(f)));
        self
    }
    pub fn on_handler(mut self, key: impl Into<String>, handler: Handler) -> Self {
        self.0.insert(key.into(), Prop::Handler(handler));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, prop: Prop) -> Option<Prop> {
        self.0.insert(key.into(), prop)
    }
    pub fn remove(&mut self, key: &str) -> Option<Prop> {
        self.0.remove(key)
    }
    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.0.get(key)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Prop::as_text)
    }
    pub fn handler(&self, key: &str) -> Option<&Handler> {
        self.get(key).and_then(Prop::as_handler)
    }
    pub fn class_name(&self) -> Option<&str> {
        self.text(CLASS)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> btree_map::Iter<'_, String, Prop> {
        self.0.iter()
    }
}

impl IntoIterator for Props {
    type Item = (String, Prop);
    type IntoIter = btree_map::IntoIter<String, Prop>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Where a committed node's id gets published.
#[derive(Clone)]
pub enum NodeRef {
    /// Plain mutable cell, read after commit.
    Cell(Rc<RefCell<Option<NodeId>>>),
    /// Called with the node on commit and with `None` on release.
    Callback(Rc<dyn Fn(Option<NodeId>)>),
    /// Fans one assignment out to several refs.
    Composite(Vec<NodeRef>),
}

impl NodeRef {
    pub fn cell() -> Self {
        NodeRef::Cell(Rc::new(RefCell::new(None)))
    }
    pub fn callback(f: impl Fn(Option<NodeId>) + 'static) -> Self {
        NodeRef::Callback(Rc::new(f))
    }

    pub fn attach(&self, node: Option<NodeId>) {
        match self {
            NodeRef::Cell(cell) => *cell.borrow_mut() = node,
            NodeRef::Callback(f) => f(node),
            NodeRef::Composite(refs) => {
                for r in refs {
                    r.attach(node);
                }
            }
        }
    }

    /// Current value of a cell ref. Composites report their first cell;
    /// callback refs keep no value.
    pub fn current(&self) -> Option<NodeId> {
        match self {
            NodeRef::Cell(cell) => *cell.borrow(),
            NodeRef::Callback(_) => None,
            NodeRef::Composite(refs) => refs.iter().find_map(NodeRef::current),
        }
    }

    /// Combines the refs that are present; `None` when none are.
    pub fn merge(refs: impl IntoIterator<Item = Option<NodeRef>>) -> Option<NodeRef> {
        let mut present: Vec<NodeRef> = refs.into_iter().flatten().collect();
        match present.len() {
            0 => None,
            1 => present.pop(),
            _ => Some(NodeRef::Composite(present)),
        }
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Cell(cell) => f.debug_tuple("Cell").field(&*cell.borrow()).finish(),
            NodeRef::Callback(_) => write!(f, "Callback(<fn>)"),
            NodeRef::Composite(refs) => f.debug_tuple("Composite").field(refs).finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    pub props: Props,
    pub node_ref: Option<NodeRef>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}
impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}
impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            props: Props::default(),
            node_ref: None,
            children: vec![],
        }
    }
    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
    pub fn node_ref(mut self, r: NodeRef) -> Self {
        self.node_ref = Some(r);
        self
    }
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }
    pub fn with_children(mut self, kids: Vec<Node>) -> Self {
        self.children = kids;
        self
    }

    pub fn class_name(&self) -> Option<&str> {
        self.props.class_name()
    }
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name()
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Depth-first search, `self` included.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| match c {
            Node::Element(e) => e.find(pred),
            Node::Text(_) => None,
        })
    }
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.find(&|e| e.has_class(class))
    }
    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = vec![];
        collect_matching(self, pred, &mut out);
        out
    }

    /// Invokes the handler stored under `key`. Returns false when there is none.
    pub fn dispatch(&self, key: &str, args: &[Primitive]) -> bool {
        match self.props.handler(key) {
            Some(h) => {
                h(args);
                true
            }
            None => false,
        }
    }
}

fn collect_text(e: &Element, out: &mut String) {
    for c in &e.children {
        match c {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

fn collect_matching<'a>(e: &'a Element, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
    if pred(e) {
        out.push(e);
    }
    for c in &e.children {
        if let Node::Element(child) = c {
            collect_matching(child, pred, out);
        }
    }
}

/// Minimal commit pass: numbers elements depth-first starting at `next_id`
/// and publishes each id into the element's ref. Returns the root's id.
pub fn commit(root: &Element, next_id: &mut NodeId) -> NodeId {
    let id = *next_id;
    *next_id += 1;
    for c in &root.children {
        if let Node::Element(child) = c {
            commit(child, next_id);
        }
    }
    if let Some(r) = &root.node_ref {
        r.attach(Some(id));
    }
    id
}

/// Clears every ref in the tree, as on unmount.
pub fn release(root: &Element) {
    for c in &root.children {
        if let Node::Element(child) = c {
            release(child);
        }
    }
    if let Some(r) = &root.node_ref {
        r.attach(None);
    }
}
