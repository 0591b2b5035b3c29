//! Loaded-page bookkeeping and the content-unit reuse pool.
//!
//! The registry is the authoritative map of page index to loaded unit.
//! Reconciliation runs in two phases so the caller can raise notifications
//! at the contractual points: `evict_not_required` hands back units still
//! bound to their index (hide fires, then the caller pools them), and
//! `load_missing` fills the gaps, recycling pooled units by reuse id.
//!
//! # Invariants
//! - An index is present at most once; `load_missing` never replaces a
//!   resolved entry.
//! - A source returning `None` for an index leaves no entry behind, so the
//!   index is retried on the next reconcile.
//! - Structural shifts (`apply_insert`, `apply_delete`, `apply_move`) move
//!   entries exactly as positions in a dense sequence move; fractions and
//!   units travel with their logical page.

use crate::geometry::Rect;
use crate::source::{PageSource, ReuseId};
use crate::types::PageIndex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A unit removed from the registry, still carrying its binding context.
///
/// The caller decides what happens next: raise a hide notification while
/// `unit` is still addressable under `index`, then store it in the pool.
pub struct Evicted<U> {
    /// The index the unit was bound to when evicted.
    pub index: PageIndex,
    /// The unit itself, now owned by the caller.
    pub unit: U,
    /// Pool bucket the unit belongs in.
    pub reuse_id: Option<ReuseId>,
    /// Whether the unit's visible fraction was above zero at eviction.
    pub was_visible: bool,
}

struct PageEntry<U> {
    unit: U,
    reuse_id: Option<ReuseId>,
    frame: Option<Rect>,
    last_fraction: f32,
}

/// Retired content units awaiting reassignment, bucketed by reuse id.
pub struct ReusePool<U> {
    buckets: BTreeMap<ReuseId, Vec<U>>,
    anonymous: Vec<U>,
}

impl<U> ReusePool<U> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            anonymous: Vec::new(),
        }
    }

    /// Store a retired unit under `id`, or anonymously when `id` is `None`.
    pub fn store(&mut self, id: Option<ReuseId>, unit: U) {
        match id {
            Some(id) => self.buckets.entry(id).or_default().push(unit),
            None => self.anonymous.push(unit),
        }
    }

    /// Take a unit from the bucket for `id`. Buckets never cross: a typed
    /// request does not fall back to the anonymous bucket or vice versa.
    pub fn take(&mut self, id: Option<&ReuseId>) -> Option<U> {
        match id {
            Some(id) => {
                let bucket = self.buckets.get_mut(id)?;
                let unit = bucket.pop();
                if bucket.is_empty() {
                    self.buckets.remove(id);
                }
                unit
            }
            None => self.anonymous.pop(),
        }
    }

    /// Take any pooled unit, anonymous bucket first.
    pub fn take_any(&mut self) -> Option<U> {
        if let Some(unit) = self.anonymous.pop() {
            return Some(unit);
        }
        let id = self.buckets.keys().next().cloned()?;
        self.take(Some(&id))
    }

    /// Total pooled units across all buckets.
    pub fn len(&self) -> usize {
        self.anonymous.len() + self.buckets.values().map(Vec::len).sum::<usize>()
    }

    /// Whether the pool holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<U> Default for ReusePool<U> {
    fn default() -> Self {
        Self::new()
    }
}

/// Map of page index to loaded content unit with per-page frame and
/// visibility memory.
pub struct PageRegistry<U> {
    entries: BTreeMap<PageIndex, PageEntry<U>>,
}

impl<U> PageRegistry<U> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of loaded pages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no page is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `index` is loaded.
    pub fn contains(&self, index: PageIndex) -> bool {
        self.entries.contains_key(&index)
    }

    /// The set of loaded indices.
    pub fn loaded_indices(&self) -> BTreeSet<PageIndex> {
        self.entries.keys().copied().collect()
    }

    /// Loaded pages in ascending index order.
    pub fn loaded(&self) -> impl Iterator<Item = (PageIndex, &U)> {
        self.entries.iter().map(|(index, entry)| (*index, &entry.unit))
    }

    /// Loaded pages with a visible fraction above zero, ascending.
    pub fn visible(&self) -> impl Iterator<Item = (PageIndex, &U)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.last_fraction > 0.0)
            .map(|(index, entry)| (*index, &entry.unit))
    }

    /// The unit loaded at `index`, if any.
    pub fn unit(&self, index: PageIndex) -> Option<&U> {
        self.entries.get(&index).map(|entry| &entry.unit)
    }

    /// The index a unit is bound to, matched by address.
    pub fn index_of_unit(&self, unit: &U) -> Option<PageIndex> {
        self.entries
            .iter()
            .find(|(_, entry)| std::ptr::eq(&entry.unit, unit))
            .map(|(index, _)| *index)
    }

    /// The recorded visible fraction of a unit, matched by address.
    pub fn fraction_of_unit(&self, unit: &U) -> Option<f32> {
        self.entries
            .values()
            .find(|entry| std::ptr::eq(&entry.unit, unit))
            .map(|entry| entry.last_fraction)
    }

    /// The recorded visible fraction at `index`; 0 when not loaded.
    pub fn fraction(&self, index: PageIndex) -> f32 {
        self.entries
            .get(&index)
            .map_or(0.0, |entry| entry.last_fraction)
    }

    /// Record a freshly computed fraction for `index`.
    pub fn record_fraction(&mut self, index: PageIndex, fraction: f32) {
        if let Some(entry) = self.entries.get_mut(&index) {
            entry.last_fraction = fraction;
        }
    }

    /// The frame assigned to `index`, if one has been placed.
    pub fn frame(&self, index: PageIndex) -> Option<Rect> {
        self.entries.get(&index).and_then(|entry| entry.frame)
    }

    /// Place `index` at `frame`. Ignored for indices that are not loaded.
    pub fn set_frame(&mut self, index: PageIndex, frame: Rect) {
        if let Some(entry) = self.entries.get_mut(&index) {
            entry.frame = Some(frame);
        }
    }

    /// Frames of all placed pages, ascending by index.
    pub fn frames(&self) -> BTreeMap<PageIndex, Rect> {
        self.entries
            .iter()
            .filter_map(|(index, entry)| entry.frame.map(|frame| (*index, frame)))
            .collect()
    }

    /// Load every index in `required` that is not already loaded.
    ///
    /// Indices outside `[0, page_count)` are logged and skipped. For each
    /// loadable index the pool is consulted first under the source's reuse
    /// id; the (possibly recycled) unit request then goes to the source.
    /// A `None` answer leaves the index absent. Newly loaded entries have
    /// no frame and a zero fraction until the caller places them.
    ///
    /// Returns the newly loaded indices in ascending order.
    pub fn load_missing(
        &mut self,
        required: &BTreeSet<PageIndex>,
        page_count: usize,
        source: &mut dyn PageSource<U>,
        pool: &mut ReusePool<U>,
    ) -> Vec<PageIndex> {
        let mut loaded = Vec::new();
        for &index in required {
            if !index.in_bounds(page_count) {
                warn!(%index, page_count, "required index out of range, skipping");
                continue;
            }
            if self.entries.contains_key(&index) {
                continue;
            }
            let reuse_id = source.reuse_id(index);
            let recycled = pool.take(reuse_id.as_ref());
            match source.page_at(index, recycled) {
                Some(unit) => {
                    self.entries.insert(
                        index,
                        PageEntry {
                            unit,
                            reuse_id,
                            frame: None,
                            last_fraction: 0.0,
                        },
                    );
                    loaded.push(index);
                }
                None => {
                    debug!(%index, "source declined index, leaving unresolved");
                }
            }
        }
        if !loaded.is_empty() {
            debug!(count = loaded.len(), "loaded pages");
        }
        loaded
    }

    /// Remove every loaded page not in `required`, in ascending order.
    pub fn evict_not_required(&mut self, required: &BTreeSet<PageIndex>) -> Vec<Evicted<U>> {
        let departing: Vec<PageIndex> = self
            .entries
            .keys()
            .filter(|index| !required.contains(index))
            .copied()
            .collect();
        let evicted: Vec<Evicted<U>> = departing
            .into_iter()
            .filter_map(|index| self.evict(index))
            .collect();
        if !evicted.is_empty() {
            debug!(count = evicted.len(), "evicted pages");
        }
        evicted
    }

    /// Remove the page at `index`, if loaded.
    pub fn evict(&mut self, index: PageIndex) -> Option<Evicted<U>> {
        self.entries.remove(&index).map(|entry| Evicted {
            index,
            unit: entry.unit,
            reuse_id: entry.reuse_id,
            was_visible: entry.last_fraction > 0.0,
        })
    }

    /// Remove every loaded page, in ascending order.
    pub fn evict_all(&mut self) -> Vec<Evicted<U>> {
        self.evict_not_required(&BTreeSet::new())
    }

    /// Shift entries for pages inserted at `inserted` (positions in the
    /// post-insertion sequence).
    pub fn apply_insert(&mut self, inserted: &BTreeSet<PageIndex>) {
        let old = std::mem::take(&mut self.entries);
        for (index, entry) in old {
            self.entries.insert(index_after_insert(index, inserted), entry);
        }
    }

    /// Remove entries at `deleted` (pre-deletion positions) and shift the
    /// survivors down. Returns the removed entries in ascending order,
    /// keyed by their pre-deletion index.
    pub fn apply_delete(&mut self, deleted: &BTreeSet<PageIndex>) -> Vec<Evicted<U>> {
        let old = std::mem::take(&mut self.entries);
        let mut evicted = Vec::new();
        for (index, entry) in old {
            match index_after_delete(index, deleted) {
                Some(new_index) => {
                    self.entries.insert(new_index, entry);
                }
                None => evicted.push(Evicted {
                    index,
                    unit: entry.unit,
                    reuse_id: entry.reuse_id,
                    was_visible: entry.last_fraction > 0.0,
                }),
            }
        }
        evicted
    }

    /// Shift entries for the page at `from` moving to `to`.
    pub fn apply_move(&mut self, from: PageIndex, to: PageIndex) {
        let old = std::mem::take(&mut self.entries);
        for (index, entry) in old {
            self.entries.insert(index_after_move(index, from, to), entry);
        }
    }
}

impl<U> Default for PageRegistry<U> {
    fn default() -> Self {
        Self::new()
    }
}

/// Where `index` lands after inserting pages at `inserted` (post-insertion
/// positions, ascending application).
pub(crate) fn index_after_insert(index: PageIndex, inserted: &BTreeSet<PageIndex>) -> PageIndex {
    let mut shifted = index.get();
    for position in inserted {
        if position.get() <= shifted {
            shifted += 1;
        }
    }
    PageIndex::new(shifted)
}

/// Where `index` lands after deleting pages at `deleted` (pre-deletion
/// positions). `None` when `index` itself is deleted.
pub(crate) fn index_after_delete(
    index: PageIndex,
    deleted: &BTreeSet<PageIndex>,
) -> Option<PageIndex> {
    if deleted.contains(&index) {
        return None;
    }
    let removed_before = deleted.iter().filter(|d| **d < index).count();
    Some(PageIndex::new(index.get() - removed_before))
}

/// Where `index` lands after the page at `from` moves to `to` (remove at
/// `from`, then insert at `to`).
pub(crate) fn index_after_move(index: PageIndex, from: PageIndex, to: PageIndex) -> PageIndex {
    if index == from {
        return to;
    }
    let mut shifted = index.get();
    if index > from {
        shifted -= 1;
    }
    if shifted >= to.get() {
        shifted += 1;
    }
    PageIndex::new(shifted)
}
