//! # Time machine widget
//!
//! A floating widget that lets a user send the host application's clock to
//! another date and bring it back. The widget never moves time itself: it
//! drives a [`TimeControl`] implementation.
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use timewarp_store::{MemoryStorage, Store};
//! use timewarp_ui::*;
//!
//! let tm = TimeMachine::mount(
//!     TimeMachineConfig::new()
//!         .date_format("dd/MM/yyyy HH:mm")
//!         .plugin(Plugin::new("Network").panel(|| network_panel()))
//!         .on_travel(|ts, mode| log::info!("now at {ts} ({mode})")),
//!     Rc::new(my_clock),
//!     Store::new(MemoryStorage::shared(), ""),
//! );
//!
//! tm.toggle_expand();
//! tm.set_input_time("24/12/2030 18:00");
//! tm.activate();
//! let view = tm.render()?;
//! ```
//!
//! - [`TimeMachine`] owns the state and handlers (the controller).
//! - [`components`] turns a [`Context`] snapshot into element trees; the
//!   buttons and panel support `as_child`.
//! - [`primitives`] are styled elements for plugin panels.
//! - [`TimeMachine::poll`] should be called from the host loop; it ticks once
//!   a second.

pub mod clock;
pub mod components;
pub mod config;
pub mod controller;
pub mod plugin;
pub mod primitives;
pub mod tests;
pub mod translations;

pub use clock::{Mode, TimeControl, UnknownMode};
pub use config::{DEFAULT_STORAGE_KEY, Position, TimeMachineConfig};
pub use controller::{Context, TICK_INTERVAL, TimeMachine, WidgetState};
pub use plugin::{CORE_TAB, Callback, Plugin};
pub use translations::Translations;
