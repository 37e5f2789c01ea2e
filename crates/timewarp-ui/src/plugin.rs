use std::fmt;
use std::rc::Rc;

use timewarp_core::Element;

use crate::clock::Mode;

/// Tab id of the built-in panel. Plugin tabs use the plugin name.
pub const CORE_TAB: &str = "Core";

pub type Callback = Rc<dyn Fn()>;
pub type PanelFn = Rc<dyn Fn() -> Element>;
pub type TravelFn = Rc<dyn Fn(i64, Mode)>;
pub type TickFn = Rc<dyn Fn(i64)>;

/// Extension of the widget. With a panel it gets a tab; without one it only
/// receives lifecycle callbacks.
#[derive(Clone)]
pub struct Plugin {
    /// Unique; doubles as the tab label.
    pub name: String,
    pub icon: Option<String>,
    pub panel: Option<PanelFn>,
    pub on_travel: Option<TravelFn>,
    pub on_return_to_present: Option<Callback>,
    /// Called on every tick while travelling, with the simulated time.
    pub on_tick: Option<TickFn>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            panel: None,
            on_travel: None,
            on_return_to_present: None,
            on_tick: None,
        }
    }
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
    pub fn panel(mut self, f: impl Fn() -> Element + 'static) -> Self {
        self.panel = Some(Rc::new(f));
        self
    }
    pub fn on_travel(mut self, f: impl Fn(i64, Mode) + 'static) -> Self {
        self.on_travel = Some(Rc::new(f));
        self
    }
    pub fn on_return_to_present(mut self, f: impl Fn() + 'static) -> Self {
        self.on_return_to_present = Some(Rc::new(f));
        self
    }
    pub fn on_tick(mut self, f: impl Fn(i64) + 'static) -> Self {
        self.on_tick = Some(Rc::new(f));
        self
    }
    pub fn has_panel(&self) -> bool {
        self.panel.is_some()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("panel", &self.panel.as_ref().map(|_| "..."))
            .field("on_travel", &self.on_travel.as_ref().map(|_| "..."))
            .field(
                "on_return_to_present",
                &self.on_return_to_present.as_ref().map(|_| "..."),
            )
            .field("on_tick", &self.on_tick.as_ref().map(|_| "..."))
            .finish()
    }
}
