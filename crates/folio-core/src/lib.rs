#![forbid(unsafe_code)]

//! Core: scroll-derived page state, one-shot triggers, and animation state machines.
//!
//! # Role in Folio
//! `folio-core` is the logic layer of the portfolio page. It owns every piece
//! of state the page derives from scroll position, viewport intersection, and
//! elapsed time, and it never touches a DOM type.
//!
//! # Primary responsibilities
//! - **ScrollStateAggregator**: active section, progress meter, back-to-top
//!   visibility, and one-shot reveal/skill/counter activation.
//! - **Animation state machines**: [`counter::CounterAnimation`] and
//!   [`typing::TypingEffect`], advanced by the deterministic
//!   [`scheduler::Scheduler`].
//! - **Collaborators**: carousel indexing, contact-form validation and mailto
//!   construction, ripple geometry, navigation math, footer year.
//! - **PageConfig**: every tunable constant, loadable from JSON.
//!
//! # How it fits in the system
//! `folio-web` wraps these types in a host-driven `PageController`, and
//! `folio-wasm` binds that controller to a real browser document.

pub mod carousel;
pub mod config;
pub mod contact;
pub mod counter;
pub mod error;
pub mod footer;
pub mod geometry;
pub mod navigation;
pub mod numeric;
pub mod ripple;
pub mod scheduler;
pub mod scroll;
pub mod skill_bar;
pub mod trigger;
pub mod typing;

pub use config::PageConfig;
pub use error::ConfigError;
pub use geometry::{ElementId, Rect};
pub use scroll::{ScrollMetrics, ScrollStateAggregator, ScrollUpdate, SectionDescriptor};
pub use trigger::{Activation, IntersectionSample, TriggerKind};
