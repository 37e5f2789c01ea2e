//! Building blocks for plugin panels, styled like the core widget.
//!
//! Every primitive puts its own `tm-*` class first and appends whatever
//! class the caller passed in `props`.

use timewarp_core::{CLASS, Element, InvalidChildError, Node, NodeRef, Prop, Props, Slot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Default,
    Primary,
    Danger,
}

impl Variant {
    fn class(self) -> &'static str {
        match self {
            Variant::Default => "tm-button",
            Variant::Primary => "tm-button tm-button-primary",
            Variant::Danger => "tm-button tm-button-danger",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ButtonProps {
    pub variant: Variant,
    pub as_child: bool,
    pub props: Props,
    pub node_ref: Option<NodeRef>,
    pub children: Vec<Node>,
}

impl ButtonProps {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn variant(mut self, v: Variant) -> Self {
        self.variant = v;
        self
    }
    pub fn as_child(mut self) -> Self {
        self.as_child = true;
        self
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
}

pub fn button(p: ButtonProps) -> Result<Element, InvalidChildError> {
    let props = with_class(p.props, p.variant.class());
    if p.as_child {
        return Slot::new(props).maybe_node_ref(p.node_ref).compose(p.children);
    }
    let mut el = Element::new("button").props(props).with_children(p.children);
    el.node_ref = p.node_ref;
    Ok(el)
}

pub fn label(props: Props, children: Vec<Node>) -> Element {
    Element::new("label")
        .props(with_class(props, "tm-label"))
        .with_children(children)
}

pub fn text_input(props: Props) -> Element {
    Element::new("input").props(with_class(props, "tm-input"))
}

/// `options` are `(value, label)` pairs.
pub fn select<V: Into<String>, L: Into<String>>(
    props: Props,
    options: impl IntoIterator<Item = (V, L)>,
) -> Element {
    let options = options
        .into_iter()
        .map(|(value, label)| {
            let (value, label): (String, String) = (value.into(), label.into());
            Node::from(
                Element::new("option")
                    .props(Props::new().set("value", value))
                    .child(label),
            )
        })
        .collect();
    Element::new("select")
        .props(with_class(props, "tm-select"))
        .with_children(options)
}

pub fn divider(props: Props) -> Element {
    Element::new("hr").props(with_class(props, "tm-divider"))
}

fn with_class(mut props: Props, intrinsic: &str) -> Props {
    let class = match props.remove(CLASS).as_ref().and_then(Prop::as_text) {
        Some(extra) if !extra.is_empty() => format!("{intrinsic} {extra}"),
        _ => intrinsic.to_string(),
    };
    props.insert(CLASS, Prop::Value(class.into()));
    props
}
