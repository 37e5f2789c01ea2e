use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use timewarp_core::{Element, InvalidChildError, Signal, format, signal};
use timewarp_store::Store;
use web_time::Instant;

use crate::clock::{Mode, TimeControl};
use crate::components;
use crate::config::{Position, TimeMachineConfig};
use crate::plugin::{CORE_TAB, Callback, Plugin};
use crate::translations::Translations;

/// How often `poll` refreshes the display and ticks plugins.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetState {
    pub active: bool,
    pub display_time: i64,
    pub mode: Mode,
    /// Raw text of the target time field, in `date_format`.
    pub input_time: String,
    pub expanded: bool,
    pub active_tab: String,
}

/// Everything a component needs: a state snapshot plus handlers bound to
/// the controller. Handlers do nothing once the controller is gone.
#[derive(Clone)]
pub struct Context {
    pub state: WidgetState,
    pub position: Position,
    pub date_format: String,
    pub translations: Translations,
    pub plugins: Vec<Plugin>,
    pub set_input_time: Rc<dyn Fn(String)>,
    pub set_mode: Rc<dyn Fn(Mode)>,
    pub set_active_tab: Rc<dyn Fn(String)>,
    pub toggle_expand: Callback,
    pub activate: Callback,
    pub reset: Callback,
}

/// The time machine widget. Cloning shares the same mounted instance.
///
/// Mounting restores the clock state saved under the storage key, once.
/// Unmounting (explicitly, or by dropping the last handle) returns the clock
/// to the present.
#[derive(Clone)]
pub struct TimeMachine {
    inner: Rc<Inner>,
}

struct Inner {
    config: TimeMachineConfig,
    clock: Rc<dyn TimeControl>,
    store: Store,
    state: Signal<WidgetState>,
    last_tick: Cell<Option<Instant>>,
    mounted: Cell<bool>,
}

impl TimeMachine {
    pub fn mount(config: TimeMachineConfig, clock: Rc<dyn TimeControl>, store: Store) -> Self {
        clock.restore(&config.storage_key);
        let state = WidgetState {
            active: clock.is_active(),
            display_time: clock.now(),
            mode: Mode::Flowing,
            input_time: String::new(),
            expanded: false,
            active_tab: CORE_TAB.to_string(),
        };
        log::debug!(
            "time machine: mounted (key {:?}, active {})",
            config.storage_key,
            state.active
        );
        TimeMachine {
            inner: Rc::new(Inner {
                config,
                clock,
                store,
                state: signal(state),
                last_tick: Cell::new(None),
                mounted: Cell::new(true),
            }),
        }
    }

    pub fn state(&self) -> WidgetState {
        self.inner.state.get()
    }
    /// Subscribe here to re-render on change.
    pub fn signal(&self) -> Signal<WidgetState> {
        self.inner.state.clone()
    }
    pub fn config(&self) -> &TimeMachineConfig {
        &self.inner.config
    }
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn set_input_time(&self, value: impl Into<String>) {
        self.inner.set_input_time(value.into());
    }
    pub fn set_mode(&self, mode: Mode) {
        self.inner.set_mode(mode);
    }
    /// Selects `Core` or a plugin tab; unknown names are ignored.
    pub fn set_active_tab(&self, tab: impl Into<String>) {
        self.inner.set_active_tab(tab.into());
    }
    pub fn toggle_expand(&self) {
        self.inner.toggle_expand();
    }
    /// Travels to the parsed input time. Returns false, leaving everything
    /// untouched, when the input does not match `date_format`.
    pub fn activate(&self) -> bool {
        self.inner.activate()
    }
    pub fn reset(&self) {
        self.inner.reset();
    }
    pub fn tick(&self) {
        self.inner.tick();
    }

    /// Drives the one-second interval from the host's frame loop. The first
    /// call arms the interval. Returns true when a tick ran.
    pub fn poll(&self, now: Instant) -> bool {
        let inner = &self.inner;
        match inner.last_tick.get() {
            Some(last) if now.saturating_duration_since(last) < TICK_INTERVAL => false,
            Some(_) => {
                inner.last_tick.set(Some(now));
                inner.tick();
                true
            }
            None => {
                inner.last_tick.set(Some(now));
                false
            }
        }
    }

    pub fn unmount(&self) {
        self.inner.unmount();
    }

    pub fn context(&self) -> Context {
        let cfg = &self.inner.config;
        let weak = Rc::downgrade(&self.inner);
        Context {
            state: self.state(),
            position: cfg.position,
            date_format: cfg.date_format.clone(),
            translations: cfg.translations.clone(),
            plugins: cfg.plugins.clone(),
            set_input_time: bind(&weak, |i, v: String| i.set_input_time(v)),
            set_mode: bind(&weak, |i, m: Mode| i.set_mode(m)),
            set_active_tab: bind(&weak, |i, t: String| i.set_active_tab(t)),
            toggle_expand: bind0(&weak, Inner::toggle_expand),
            activate: bind0(&weak, |i| {
                i.activate();
            }),
            reset: bind0(&weak, Inner::reset),
        }
    }

    pub fn render(&self) -> Result<Element, InvalidChildError> {
        components::widget(&self.context())
    }
}

fn bind<A: 'static>(weak: &Weak<Inner>, f: impl Fn(&Inner, A) + 'static) -> Rc<dyn Fn(A)> {
    let weak = weak.clone();
    Rc::new(move |a| {
        if let Some(inner) = weak.upgrade() {
            f(&inner, a);
        }
    })
}

fn bind0(weak: &Weak<Inner>, f: impl Fn(&Inner) + 'static) -> Callback {
    let weak = weak.clone();
    Rc::new(move || {
        if let Some(inner) = weak.upgrade() {
            f(&inner);
        }
    })
}

impl Inner {
    fn set_input_time(&self, value: String) {
        self.state.update(|s| s.input_time = value);
    }

    fn set_mode(&self, mode: Mode) {
        self.state.update(|s| s.mode = mode);
    }

    fn set_active_tab(&self, tab: String) {
        let known = tab == CORE_TAB || self.config.panel_plugins().any(|p| p.name == tab);
        if !known {
            log::warn!("time machine: no tab named {tab:?}");
            return;
        }
        self.state.update(|s| s.active_tab = tab);
    }

    fn toggle_expand(&self) {
        let expanding = !self.state.with(|s| s.expanded);
        let (input, mode) = if expanding {
            (
                Some(format::format(self.clock.now(), &self.config.date_format)),
                self.clock.mode(),
            )
        } else {
            (None, None)
        };
        self.state.update(|s| {
            if let Some(input) = input {
                s.input_time = input;
            }
            if let Some(mode) = mode {
                s.mode = mode;
            }
            s.expanded = expanding;
        });
    }

    fn activate(&self) -> bool {
        let (input, mode) = self.state.with(|s| (s.input_time.clone(), s.mode));
        let Some(timestamp) = format::parse(&input, &self.config.date_format) else {
            log::warn!(
                "time machine: {input:?} does not match {:?}, not travelling",
                self.config.date_format
            );
            return false;
        };

        self.clock.travel(timestamp, mode);
        self.clock.save(&self.config.storage_key);
        let now = self.clock.now();
        self.state.update(|s| {
            s.active = true;
            s.display_time = now;
        });
        log::info!("time machine: travelled to {timestamp} ({mode})");

        if let Some(cb) = &self.config.on_travel {
            cb(timestamp, mode);
        }
        for p in &self.config.plugins {
            if let Some(cb) = &p.on_travel {
                cb(timestamp, mode);
            }
        }
        true
    }

    fn reset(&self) {
        self.clock.return_to_present();
        // The clock saves under the bare key, whatever the store's prefix.
        self.store.scoped("").remove(&self.config.storage_key);
        let now = self.clock.now();
        self.state.update(|s| {
            s.active = false;
            s.display_time = now;
        });
        log::info!("time machine: returned to present");

        if let Some(cb) = &self.config.on_return_to_present {
            cb();
        }
        for p in &self.config.plugins {
            if let Some(cb) = &p.on_return_to_present {
                cb();
            }
        }
    }

    fn tick(&self) {
        let active = self.clock.is_active();
        let now = self.clock.now();
        self.state.update(|s| {
            s.active = active;
            s.display_time = now;
        });
        if active {
            for p in &self.config.plugins {
                if let Some(cb) = &p.on_tick {
                    cb(now);
                }
            }
        }
    }

    fn unmount(&self) {
        if self.mounted.replace(false) {
            self.clock.return_to_present();
            log::debug!("time machine: unmounted");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.unmount();
    }
}
