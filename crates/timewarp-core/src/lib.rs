//! # Elements, slots and date patterns
//!
//! `timewarp-core` holds the two pure building blocks the time machine widget
//! is made of, plus the small observable cell its controller publishes state
//! through:
//!
//! - [`Element`] / [`Props`] / [`NodeRef`]: a plain description of a UI node.
//! - [`Slot`]: merges a wrapper's props, handlers, classes and ref onto one
//!   caller-supplied child (the `as_child` pattern).
//! - [`format`]: `yyyy`/`MM`/`dd`/`HH`/`mm` patterns, formatting and parsing.
//! - [`Signal`]: cloneable observable value.
//!
//! ## Slots
//!
//! ```rust
//! use timewarp_core::*;
//!
//! let r = NodeRef::cell();
//! let merged = slot(
//!     Props::new().class("time-machine-button"),
//!     Some(r.clone()),
//!     Element::new("a").props(Props::new().set("href", "#")),
//! )
//! .unwrap();
//!
//! commit(&merged, &mut 1);
//! assert_eq!(r.current(), Some(1));
//! ```
//!
//! A slot fails with [`InvalidChildError`] unless it gets exactly one element.
//!
//! ## Patterns
//!
//! ```rust
//! use timewarp_core::format::{format_in, parse_in};
//! use chrono::Utc;
//!
//! assert_eq!(format_in(&Utc, 0, "dd/MM/yyyy"), "01/01/1970");
//! assert_eq!(parse_in(&Utc, "01/01/1970", "dd/MM/yyyy"), Some(0));
//! assert_eq!(parse_in(&Utc, "yesterday", "dd/MM/yyyy"), None);
//! ```

pub mod element;
pub mod error;
pub mod format;
pub mod signal;
pub mod slot;

pub use element::*;
pub use error::*;
pub use signal::*;
pub use slot::*;
