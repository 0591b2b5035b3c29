//! pageflow
//!
//! A page management and transition engine for host-driven viewports.
//!
//! Hosts hand the engine a [`PageSource`] that builds content units on
//! demand and a [`Layouter`] that turns collection state into geometry;
//! the [`PageController`] keeps only the pages the layout requires loaded,
//! recycles retired units through a reuse pool, serializes structural
//! changes (navigation, insert, delete, move, reload, layouter swaps) and
//! raises show/hide, offset and rest notifications at well-defined points.
//!
//! The engine is passive and single-threaded: animated transitions only
//! advance through [`PageController::tick`], and reported scrolls come in
//! through [`PageController::scroll_to`]. See `src/main.rs` for a
//! terminal demo that drives all of it.

pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod registry;
pub mod scheduler;
pub mod source;
pub mod types;
pub mod viewport;
pub mod visibility;

pub use controller::PageController;
pub use easing::{Curve, Easing};
pub use error::PageError;
pub use events::PageEvents;
pub use geometry::{Point, Rect, Size};
pub use layout::{Axis, LayoutPlan, LayoutQuery, Layouter, LinearLayouter, StackedLayouter};
pub use scheduler::Completion;
pub use source::{PageSource, ReuseId, SharedSource, WeakSource};
pub use types::PageIndex;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
