use std::fmt;
use std::rc::Rc;

use timewarp_core::format::DEFAULT_PATTERN;

use crate::clock::Mode;
use crate::plugin::{Callback, Plugin, TravelFn};
use crate::translations::Translations;

pub const DEFAULT_STORAGE_KEY: &str = "__timeMachine__";

/// Screen corner the widget is pinned to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    pub fn class(self) -> &'static str {
        match self {
            Position::BottomRight => "position-bottom-right",
            Position::BottomLeft => "position-bottom-left",
            Position::TopRight => "position-top-right",
            Position::TopLeft => "position-top-left",
        }
    }
}

#[derive(Clone)]
pub struct TimeMachineConfig {
    pub position: Position,
    /// Key the clock state is saved under, and removed on reset.
    pub storage_key: String,
    /// Pattern for the status bar and the target time input.
    pub date_format: String,
    pub translations: Translations,
    pub plugins: Vec<Plugin>,
    pub on_travel: Option<TravelFn>,
    pub on_return_to_present: Option<Callback>,
}

impl Default for TimeMachineConfig {
    fn default() -> Self {
        Self {
            position: Position::default(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            date_format: DEFAULT_PATTERN.into(),
            translations: Translations::default(),
            plugins: vec![],
            on_travel: None,
            on_return_to_present: None,
        }
    }
}

impl TimeMachineConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn position(mut self, p: Position) -> Self {
        self.position = p;
        self
    }
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }
    pub fn translations(mut self, t: Translations) -> Self {
        self.translations = t;
        self
    }
    pub fn plugin(mut self, p: Plugin) -> Self {
        self.plugins.push(p);
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

    /// Plugins that get a tab, in registration order.
    pub fn panel_plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().filter(|p| p.has_panel())
    }
}

impl fmt::Debug for TimeMachineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeMachineConfig")
            .field("position", &self.position)
            .field("storage_key", &self.storage_key)
            .field("date_format", &self.date_format)
            .field("translations", &self.translations)
            .field("plugins", &self.plugins)
            .field("on_travel", &self.on_travel.as_ref().map(|_| "..."))
            .field(
                "on_return_to_present",
                &self.on_return_to_present.as_ref().map(|_| "..."),
            )
            .finish()
    }
}
