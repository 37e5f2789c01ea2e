//! Sub-components of the widget, each built from a [`Context`].
//!
//! `panel`, `activate_button` and `reset_button` accept `as_child`: instead
//! of their own element they render the single child passed in, with their
//! class and click handler merged onto it.

use timewarp_core::{Element, InvalidChildError, Node, Primitive, Props, Slot, format};

use crate::clock::Mode;
use crate::controller::Context;
use crate::plugin::CORE_TAB;

/// Children plus the `as_child` switch shared by slot-capable components.
#[derive(Clone, Debug, Default)]
pub struct SlotProps {
    pub as_child: bool,
    pub class: Option<String>,
    pub children: Vec<Node>,
}

impl SlotProps {
    pub fn new() -> Self {
        Self::default()
    }
    /// Render onto `child` instead of the component's own element.
    pub fn as_child(child: impl Into<Node>) -> Self {
        Self {
            as_child: true,
            class: None,
            children: vec![child.into()],
        }
    }
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }
}

pub fn status_text(ctx: &Context) -> String {
    let t = &ctx.translations;
    if !ctx.state.active {
        return format!("● {}", t.real_time);
    }
    format!(
        "● {}: {}",
        t.mode_label(ctx.state.mode),
        format::format(ctx.state.display_time, &ctx.date_format)
    )
}

pub fn status_bar(ctx: &Context) -> Element {
    let toggle = ctx.toggle_expand.clone();
    let indicator = if ctx.state.active {
        "time-machine-status-bar-active"
    } else {
        "time-machine-status-bar-inactive"
    };
    Element::new("div")
        .props(
            Props::new()
                .class("time-machine-status-bar")
                .on("onClick", move |_| toggle()),
        )
        .child(
            Element::new("span")
                .props(Props::new().class(indicator))
                .child(status_text(ctx)),
        )
}

pub fn panel(ctx: &Context, props: SlotProps) -> Result<Element, InvalidChildError> {
    let classes = [
        Some("time-machine-panel"),
        (!ctx.state.expanded).then_some("time-machine-panel-hidden"),
        props.class.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    if props.as_child {
        return Slot::new(Props::new().class(classes)).compose(props.children);
    }
    Ok(Element::new("div")
        .props(Props::new().class(classes))
        .with_children(props.children))
}

pub fn input(ctx: &Context) -> Element {
    let set = ctx.set_input_time.clone();
    Element::new("div")
        .props(Props::new().class("time-machine-input-group"))
        .child(Element::new("label").child(ctx.translations.target_date_time.clone()))
        .child(
            Element::new("input").props(
                Props::new()
                    .set("type", "text")
                    .class("time-machine-input")
                    .set("value", ctx.state.input_time.clone())
                    .set("placeholder", ctx.date_format.clone())
                    .on("onChange", move |args: &[Primitive]| {
                        if let Some(v) = args.first().and_then(Primitive::as_text) {
                            set(v.to_string());
                        }
                    }),
            ),
        )
}

pub fn mode_toggle(ctx: &Context) -> Element {
    let options = Mode::ALL.into_iter().map(|m| {
        let set = ctx.set_mode.clone();
        let class = if ctx.state.mode == m {
            "time-machine-toggle-option time-machine-toggle-option-active"
        } else {
            "time-machine-toggle-option"
        };
        Node::from(
            Element::new("div")
                .props(
                    Props::new()
                        .set("key", m.as_str())
                        .class(class)
                        .on("onClick", move |_| set(m)),
                )
                .child(ctx.translations.mode_label(m).to_string()),
        )
    });

    Element::new("div")
        .props(Props::new().class("time-machine-input-group"))
        .child(Element::new("label").child(ctx.translations.mode.clone()))
        .child(
            Element::new("div")
                .props(Props::new().class("time-machine-toggle"))
                .with_children(options.collect()),
        )
}

pub fn activate_button(ctx: &Context, props: SlotProps) -> Result<Element, InvalidChildError> {
    let activate = ctx.activate.clone();
    let own = Props::new()
        .class("time-machine-button")
        .on("onClick", move |_| activate());

    if props.as_child {
        return Slot::new(own).compose(props.children);
    }
    let children = if props.children.is_empty() {
        vec![Node::from(ctx.translations.activate.clone())]
    } else {
        props.children
    };
    Ok(Element::new("button").props(own).with_children(children))
}

/// `None` while not travelling.
pub fn reset_button(ctx: &Context, props: SlotProps) -> Result<Option<Element>, InvalidChildError> {
    if !ctx.state.active {
        return Ok(None);
    }
    let reset = ctx.reset.clone();
    let own = Props::new()
        .class("time-machine-button time-machine-button-reset")
        .on("onClick", move |_| reset());

    if props.as_child {
        return Slot::new(own).compose(props.children).map(Some);
    }
    let children = if props.children.is_empty() {
        vec![Node::from(ctx.translations.return_to_present.clone())]
    } else {
        props.children
    };
    Ok(Some(Element::new("button").props(own).with_children(children)))
}

/// Tab bar; `None` unless at least one plugin has a panel.
pub fn tabs(ctx: &Context) -> Option<Element> {
    let plugin_tabs = ctx
        .plugins
        .iter()
        .filter(|p| p.has_panel())
        .map(|p| (p.name.as_str(), p.icon.as_deref()))
        .collect::<Vec<_>>();
    if plugin_tabs.is_empty() {
        return None;
    }

    let buttons = std::iter::once((CORE_TAB, None))
        .chain(plugin_tabs)
        .map(|(name, icon)| {
            let set = ctx.set_active_tab.clone();
            let tab = name.to_string();
            let label = if name == CORE_TAB {
                ctx.translations.core.clone()
            } else {
                name.to_string()
            };
            let class = if ctx.state.active_tab == name {
                "time-machine-tab time-machine-tab-active"
            } else {
                "time-machine-tab"
            };
            let mut button = Element::new("button").props(
                Props::new()
                    .set("key", name)
                    .class(class)
                    .on("onClick", move |_| set(tab.clone())),
            );
            if let Some(icon) = icon {
                button = button.child(
                    Element::new("span")
                        .props(Props::new().class("time-machine-tab-icon"))
                        .child(icon),
                );
            }
            Node::from(button.child(label))
        })
        .collect();

    Some(
        Element::new("div")
            .props(Props::new().class("time-machine-tabs"))
            .with_children(buttons),
    )
}

/// Content of the selected tab.
pub fn tab_content(ctx: &Context) -> Result<Element, InvalidChildError> {
    if ctx.state.active_tab != CORE_TAB
        && let Some(panel) = ctx
            .plugins
            .iter()
            .find(|p| p.name == ctx.state.active_tab)
            .and_then(|p| p.panel.as_ref())
    {
        return Ok(Element::new("div")
            .props(Props::new().class("time-machine-plugin-panel"))
            .child(panel()));
    }

    let mut core = Element::new("div")
        .props(Props::new().class("time-machine-core"))
        .child(input(ctx))
        .child(mode_toggle(ctx))
        .child(activate_button(ctx, SlotProps::new())?);
    if let Some(reset) = reset_button(ctx, SlotProps::new())? {
        core = core.child(reset);
    }
    Ok(core)
}

/// The whole widget: status bar plus the (possibly hidden) panel.
pub fn widget(ctx: &Context) -> Result<Element, InvalidChildError> {
    let mut body = SlotProps::new();
    if let Some(tabs) = tabs(ctx) {
        body = body.child(tabs);
    }
    body = body.child(tab_content(ctx)?);

    Ok(Element::new("div")
        .props(Props::new().class(format!("time-machine-widget {}", ctx.position.class())))
        .child(status_bar(ctx))
        .child(panel(ctx, body)?))
}
