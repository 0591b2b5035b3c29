//! Notification callbacks raised by the controller.
//!
//! Consumers opt into each notification independently; an unset slot costs
//! nothing and is skipped at emit time. This mirrors a delegate whose
//! methods are all optional, without forcing one monolithic trait on hosts
//! that only care about, say, offset changes.

use crate::geometry::Point;
use crate::types::PageIndex;

/// Optional callback slots for page lifecycle notifications.
///
/// All slots observe, never control: returning from a callback cannot veto
/// or reorder the transition that raised it.
pub struct PageEvents<U> {
    shown: Option<Box<dyn FnMut(&U, PageIndex)>>,
    hidden: Option<Box<dyn FnMut(&U, PageIndex)>>,
    offset_changed: Option<Box<dyn FnMut(Point)>>,
    rested_on: Option<Box<dyn FnMut(PageIndex)>>,
}

impl<U> PageEvents<U> {
    /// Create a capability set with every slot empty.
    pub fn new() -> Self {
        Self {
            shown: None,
            hidden: None,
            offset_changed: None,
            rested_on: None,
        }
    }

    /// A unit's visible fraction crossed from 0 to above 0.
    ///
    /// Raised after the unit is loaded and placed at its frame.
    pub fn on_shown(&mut self, callback: impl FnMut(&U, PageIndex) + 'static) {
        self.shown = Some(Box::new(callback));
    }

    /// A unit's visible fraction crossed from above 0 to 0.
    ///
    /// For units being unloaded, raised while the unit is still bound to its
    /// index, before it moves to the reuse pool.
    pub fn on_hidden(&mut self, callback: impl FnMut(&U, PageIndex) + 'static) {
        self.hidden = Some(Box::new(callback));
    }

    /// The viewport offset moved, programmatically or by a reported scroll.
    pub fn on_offset_changed(&mut self, callback: impl FnMut(Point) + 'static) {
        self.offset_changed = Some(Box::new(callback));
    }

    /// The viewport settled on a stable offset with the given current page.
    pub fn on_rested(&mut self, callback: impl FnMut(PageIndex) + 'static) {
        self.rested_on = Some(Box::new(callback));
    }

    pub(crate) fn emit_shown(&mut self, unit: &U, index: PageIndex) {
        if let Some(callback) = self.shown.as_mut() {
            callback(unit, index);
        }
    }

    pub(crate) fn emit_hidden(&mut self, unit: &U, index: PageIndex) {
        if let Some(callback) = self.hidden.as_mut() {
            callback(unit, index);
        }
    }

    pub(crate) fn emit_offset_changed(&mut self, offset: Point) {
        if let Some(callback) = self.offset_changed.as_mut() {
            callback(offset);
        }
    }

    pub(crate) fn emit_rested(&mut self, index: PageIndex) {
        if let Some(callback) = self.rested_on.as_mut() {
            callback(index);
        }
    }
}

impl<U> Default for PageEvents<U> {
    fn default() -> Self {
        Self::new()
    }
}
