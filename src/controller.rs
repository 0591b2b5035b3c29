//! The page controller facade.
//!
//! `PageController` owns the loaded-page registry, the viewport, the reuse
//! pool and the transition machinery, and exposes the structural operations
//! hosts call: navigate, insert, delete, move, reload and layouter swaps.
//! Structural operations are serialized; one transition runs at a time and
//! later requests queue behind it.
//!
//! # Notification order
//!
//! Within one settle, offset changes are reported first, then hides in
//! ascending index order, then shows in ascending index order, then the
//! rest notification, then completion callbacks. A unit that was visible
//! receives its hide while still bound to its index, before it enters the
//! reuse pool. The rest notification is suppressed when another request is
//! already queued; completions always fire.
//!
//! # Driving time
//!
//! The controller is passive: animated transitions progress only through
//! [`PageController::tick`]. Hosts with no frame clock can pass
//! `animated: false` everywhere and never call `tick`. During an animated
//! transition visible fractions are frozen at their pre-transition values;
//! they are recomputed once the transition settles, and the show/hide
//! notifications fall out of that comparison.

use crate::easing::{Curve, Easing};
use crate::error::PageError;
use crate::events::PageEvents;
use crate::geometry::{Point, Rect, Size};
use crate::layout::{LayoutQuery, Layouter};
use crate::registry::{
    index_after_delete, index_after_insert, index_after_move, Evicted, PageRegistry, ReusePool,
};
use crate::scheduler::{
    ActiveTransition, Completion, TransitionKind, TransitionRequest, TransitionScheduler, Tween,
};
use crate::source::{ReuseId, WeakSource};
use crate::types::PageIndex;
use crate::viewport::Viewport;
use crate::visibility::visible_fractions;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// Page management engine over host-supplied content units.
///
/// Generic over the unit type `U`; the engine never looks inside a unit
/// and identifies one by address when asked to map a unit back to a page.
pub struct PageController<U> {
    source: WeakSource<U>,
    registry: PageRegistry<U>,
    pool: ReusePool<U>,
    viewport: Viewport,
    layouter: Rc<dyn Layouter>,
    scheduler: TransitionScheduler<U>,
    events: PageEvents<U>,
    current_page: PageIndex,
    page_count: usize,
    animation_duration: Duration,
    easing: Rc<dyn Easing>,
    paging_enabled: bool,
    continuous_navigation_enabled: bool,
    layout_on_rest: bool,
    needs_rest_layout: bool,
}

impl<U> PageController<U> {
    /// Create a controller with an empty collection.
    ///
    /// The controller holds the source weakly; the host keeps it alive.
    /// Nothing is loaded until the first [`reload_data`](Self::reload_data).
    pub fn new(bounds: Size, layouter: Rc<dyn Layouter>, source: WeakSource<U>) -> Self {
        Self {
            source,
            registry: PageRegistry::new(),
            pool: ReusePool::new(),
            viewport: Viewport::new(bounds),
            layouter,
            scheduler: TransitionScheduler::new(),
            events: PageEvents::new(),
            current_page: PageIndex::new(0),
            page_count: 0,
            animation_duration: Duration::from_millis(250),
            easing: Rc::new(Curve::default()),
            paging_enabled: true,
            continuous_navigation_enabled: false,
            layout_on_rest: false,
            needs_rest_layout: false,
        }
    }

    // Accessors.

    /// The page the viewport is centered on, or navigating toward once the
    /// transition in flight settles.
    pub fn current_page(&self) -> PageIndex {
        self.current_page
    }

    /// Number of pages in the collection as of the last structural change.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Whether a transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Loaded units in ascending page order.
    pub fn loaded_units(&self) -> Vec<&U> {
        self.registry.loaded().map(|(_, unit)| unit).collect()
    }

    /// Units with a visible fraction above zero, ascending.
    pub fn visible_units(&self) -> Vec<&U> {
        self.registry.visible().map(|(_, unit)| unit).collect()
    }

    /// The unit loaded at `page`, if any.
    pub fn unit_for_page(&self, page: PageIndex) -> Option<&U> {
        self.registry.unit(page)
    }

    /// The page a loaded unit is bound to, matched by address.
    pub fn page_for_unit(&self, unit: &U) -> Option<PageIndex> {
        self.registry.index_of_unit(unit)
    }

    /// Visible fraction of a loaded unit, matched by address; `None` for
    /// units the controller does not hold.
    pub fn visible_percentage(&self, unit: &U) -> Option<f32> {
        self.registry.fraction_of_unit(unit)
    }

    /// Visible fraction of the page at `index`; 0 when not loaded.
    pub fn visible_percentage_at(&self, index: PageIndex) -> f32 {
        self.registry.fraction(index)
    }

    /// Frame of the page at `index` in content coordinates, if placed.
    ///
    /// During an animated transition this is the interpolated frame, so a
    /// host rendering loaded pages each tick draws them mid-flight.
    pub fn frame_for_page(&self, index: PageIndex) -> Option<Rect> {
        self.registry.frame(index)
    }

    /// Loaded pages with their units, in ascending page order.
    pub fn loaded_pages(&self) -> Vec<(PageIndex, &U)> {
        self.registry.loaded().collect()
    }

    /// Current viewport offset in content coordinates.
    pub fn offset(&self) -> Point {
        self.viewport.offset()
    }

    /// Total scrollable extent reported by the layouter.
    pub fn content_size(&self) -> Size {
        self.viewport.content_size()
    }

    /// Units parked in the reuse pool.
    pub fn pooled_units(&self) -> usize {
        self.pool.len()
    }

    /// Take a unit out of the reuse pool, bypassing the source.
    pub fn dequeue_unit(&mut self, id: Option<&ReuseId>) -> Option<U> {
        self.pool.take(id)
    }

    /// Notification slots. Assigning a slot replaces the previous callback.
    pub fn events_mut(&mut self) -> &mut PageEvents<U> {
        &mut self.events
    }

    // Behavior knobs.

    /// Duration used by animated transitions. Zero makes every transition
    /// settle synchronously.
    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.animation_duration = duration;
    }

    /// Easing applied to animated transitions. Transitions already in
    /// flight keep the curve they started with.
    pub fn set_easing(&mut self, easing: impl Easing + 'static) {
        self.easing = Rc::new(easing);
    }

    /// When set, a reported scroll rest snaps the offset to the nearest
    /// page boundary. On by default.
    pub fn set_paging_enabled(&mut self, enabled: bool) {
        self.paging_enabled = enabled;
    }

    /// Whether rest snapping is active.
    pub fn paging_enabled(&self) -> bool {
        self.paging_enabled
    }

    /// When unset, a rest snap lands at most one page away from the
    /// current page regardless of how far the scroll travelled. Off by
    /// default.
    pub fn set_continuous_navigation_enabled(&mut self, enabled: bool) {
        self.continuous_navigation_enabled = enabled;
    }

    /// Whether rest snapping may travel more than one page.
    pub fn continuous_navigation_enabled(&self) -> bool {
        self.continuous_navigation_enabled
    }

    /// When set, reported scrolls skip relayout and reconcile; the window
    /// is rebuilt once the scroll rests. Off by default.
    pub fn set_layout_on_rest(&mut self, enabled: bool) {
        self.layout_on_rest = enabled;
    }

    /// Resize the viewport. When idle, relayouts immediately; during a
    /// transition the new bounds take effect at settle.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.viewport.set_bounds(bounds);
        if !self.scheduler.is_running() {
            self.reconcile_live(None);
        }
    }

    // Structural operations.

    /// Make `page` the current page.
    ///
    /// Returns `PageError::OutOfRange` when `page` does not exist; the
    /// completion is not invoked on rejection. While a transition is in
    /// flight the request queues; a navigate already queued is superseded
    /// and folds its completion into this one.
    pub fn navigate_to(
        &mut self,
        page: PageIndex,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), PageError> {
        self.ensure_in_bounds(page, self.page_count)?;
        self.submit(TransitionKind::Navigate { target: page }, animated, completion);
        Ok(())
    }

    /// Insert pages at `indexes`, given as positions in the post-insertion
    /// sequence. The host must have grown its collection first.
    ///
    /// Loaded pages shift to keep their logical content, the current page
    /// follows its content, and queued navigates are retargeted the same
    /// way.
    pub fn insert_pages(
        &mut self,
        indexes: BTreeSet<PageIndex>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), PageError> {
        let final_count = self.page_count + indexes.len();
        for &index in &indexes {
            self.ensure_in_bounds(index, final_count)?;
        }
        self.submit(TransitionKind::Insert { indexes }, animated, completion);
        Ok(())
    }

    /// Delete the pages at `indexes`, given as pre-deletion positions. The
    /// host must have shrunk its collection first.
    ///
    /// Deleted units that were visible receive their hide notification at
    /// settle, then return to the reuse pool. A deleted current page falls
    /// to its successor, clamped to the shrunk collection.
    pub fn delete_pages(
        &mut self,
        indexes: BTreeSet<PageIndex>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), PageError> {
        for &index in &indexes {
            self.ensure_in_bounds(index, self.page_count)?;
        }
        self.submit(TransitionKind::Delete { indexes }, animated, completion);
        Ok(())
    }

    /// Move the page at `from` to position `to` (remove, then reinsert).
    pub fn move_page(
        &mut self,
        from: PageIndex,
        to: PageIndex,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), PageError> {
        self.ensure_in_bounds(from, self.page_count)?;
        self.ensure_in_bounds(to, self.page_count)?;
        self.submit(TransitionKind::Move { from, to }, animated, completion);
        Ok(())
    }

    /// Re-sync the page count and geometry against the source.
    ///
    /// Pages beyond the new count unload; surviving indices keep their
    /// units. Use [`reload_pages`](Self::reload_pages) to force fresh units
    /// for indices whose content changed. A dropped source reads as an
    /// empty collection.
    pub fn reload_data(&mut self) {
        self.submit(TransitionKind::Reload, false, None);
    }

    /// Drop the units at `indexes` and refetch those inside the required
    /// window; the rest reload lazily when scrolled to.
    pub fn reload_pages(
        &mut self,
        indexes: BTreeSet<PageIndex>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), PageError> {
        for &index in &indexes {
            self.ensure_in_bounds(index, self.page_count)?;
        }
        self.submit(TransitionKind::ReloadPages { indexes }, animated, completion);
        Ok(())
    }

    /// Swap the layout strategy. Loaded pages morph from their old frames
    /// to the new ones when animated.
    pub fn set_layouter(
        &mut self,
        layouter: Rc<dyn Layouter>,
        animated: bool,
        completion: Option<Completion>,
    ) {
        self.submit(
            TransitionKind::SetLayouter {
                layouter,
                focus: None,
            },
            animated,
            completion,
        );
    }

    /// Swap the layout strategy and land on `focus` in the new geometry.
    pub fn set_layouter_focused(
        &mut self,
        layouter: Rc<dyn Layouter>,
        focus: PageIndex,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), PageError> {
        self.ensure_in_bounds(focus, self.page_count)?;
        self.submit(
            TransitionKind::SetLayouter {
                layouter,
                focus: Some(focus),
            },
            animated,
            completion,
        );
        Ok(())
    }

    // Time and scroll input.

    /// Advance the transition in flight by `dt`. No-op while idle.
    pub fn tick(&mut self, dt: Duration) {
        let sample = match self.scheduler.active_mut() {
            Some(active) => active.advance(dt),
            None => return,
        };
        if self.viewport.set_offset(sample.offset) {
            self.events.emit_offset_changed(self.viewport.offset());
        }
        for (index, frame) in &sample.frames {
            self.registry.set_frame(*index, *frame);
        }
        if sample.finished {
            self.finish_active();
        }
    }

    /// Report a host-driven scroll to `offset` (clamped).
    ///
    /// Ignored while a transition is in flight; the transition owns the
    /// offset. Show/hide notifications fire live as fractions cross zero,
    /// unless layout-on-rest defers the window rebuild.
    pub fn scroll_to(&mut self, offset: Point) {
        if self.scheduler.is_running() {
            debug!("ignoring reported scroll while a transition is in flight");
            return;
        }
        if !self.viewport.set_offset(offset) {
            return;
        }
        self.events.emit_offset_changed(self.viewport.offset());
        if self.layout_on_rest {
            self.needs_rest_layout = true;
            // Frames stay put; only the visible window moved.
            self.refresh_visibility();
        } else {
            self.reconcile_live(None);
        }
    }

    /// Report that a host-driven scroll came to rest.
    ///
    /// Applies the paging snap, performs any deferred relayout, rederives
    /// the current page and raises the rest notification.
    pub fn scroll_rested(&mut self) {
        if self.scheduler.is_running() {
            return;
        }
        let mut snapped = false;
        if self.paging_enabled {
            let derived = self.derive_current();
            let mut target = derived;
            if !self.continuous_navigation_enabled {
                let floor = self.current_page.prev();
                let ceiling = self.current_page.next().clamped(self.page_count).max(floor);
                target = target.max(floor).min(ceiling);
            }
            // The clamped neighbor may not be loaded after a far fling;
            // the derived page always is.
            let snap = self
                .registry
                .frame(target)
                .or_else(|| self.registry.frame(derived));
            if let Some(frame) = snap {
                if self.viewport.set_offset(frame.origin()) {
                    self.events.emit_offset_changed(self.viewport.offset());
                    snapped = true;
                }
            }
        }
        if snapped || self.needs_rest_layout {
            self.needs_rest_layout = false;
            self.reconcile_live(None);
        } else {
            self.refresh_visibility();
        }
        self.current_page = self.derive_current();
        self.events.emit_rested(self.current_page);
    }

    // Transition machinery.

    fn ensure_in_bounds(&self, index: PageIndex, count: usize) -> Result<(), PageError> {
        if index.in_bounds(count) {
            Ok(())
        } else {
            Err(PageError::OutOfRange { index, count })
        }
    }

    fn submit(&mut self, kind: TransitionKind, animated: bool, completion: Option<Completion>) {
        let request = TransitionRequest::new(kind, animated, completion);
        if self.scheduler.is_running() {
            debug!(kind = request.kind.name(), "transition in flight, queueing");
            self.scheduler.enqueue(request);
        } else {
            self.begin(request);
        }
    }

    /// Start a transition: apply the structural mutation, compute target
    /// geometry, load what the target requires, and either settle now or
    /// arm the interpolation for `tick`.
    fn begin(&mut self, request: TransitionRequest) {
        let TransitionRequest {
            kind,
            animated,
            completions,
        } = request;
        let kind_name = kind.name();
        debug!(kind = kind_name, animated, "transition starting");

        // Mutation phase. Indices invalid by execution time (the count may
        // have drifted while the request was queued) are dropped with a
        // warning rather than failing a request already accepted.
        let mut departing: Vec<Evicted<U>> = Vec::new();
        let mut settle_focus: Option<PageIndex> = None;
        match kind {
            TransitionKind::Navigate { target } => {
                settle_focus = Some(target.clamped(self.page_count));
            }
            TransitionKind::Insert { indexes } => {
                let final_count = self.page_count + indexes.len();
                let indexes: BTreeSet<PageIndex> = indexes
                    .into_iter()
                    .filter(|index| {
                        let ok = index.in_bounds(final_count);
                        if !ok {
                            warn!(%index, final_count, "stale insert position, dropping");
                        }
                        ok
                    })
                    .collect();
                if !indexes.is_empty() {
                    self.page_count += indexes.len();
                    self.registry.apply_insert(&indexes);
                    self.current_page = index_after_insert(self.current_page, &indexes);
                    self.scheduler
                        .retarget_navigates(|target| index_after_insert(target, &indexes));
                    settle_focus = Some(self.current_page);
                }
            }
            TransitionKind::Delete { indexes } => {
                let count = self.page_count;
                let indexes: BTreeSet<PageIndex> = indexes
                    .into_iter()
                    .filter(|index| {
                        let ok = index.in_bounds(count);
                        if !ok {
                            warn!(%index, count, "stale delete index, dropping");
                        }
                        ok
                    })
                    .collect();
                if !indexes.is_empty() {
                    self.page_count -= indexes.len();
                    departing.extend(self.registry.apply_delete(&indexes));
                    let shrunk = self.page_count;
                    let remap = |index: PageIndex| {
                        index_after_delete(index, &indexes).unwrap_or_else(|| {
                            // A deleted page falls to its successor.
                            let before = indexes.iter().filter(|d| **d < index).count();
                            PageIndex::new(index.get() - before).clamped(shrunk)
                        })
                    };
                    self.current_page = remap(self.current_page);
                    self.scheduler.retarget_navigates(remap);
                    settle_focus = Some(self.current_page);
                }
            }
            TransitionKind::Move { from, to } => {
                if !from.in_bounds(self.page_count) || !to.in_bounds(self.page_count) {
                    warn!(%from, %to, count = self.page_count, "stale move, dropping");
                } else if from != to {
                    self.registry.apply_move(from, to);
                    self.current_page = index_after_move(self.current_page, from, to);
                    self.scheduler
                        .retarget_navigates(|target| index_after_move(target, from, to));
                    settle_focus = Some(self.current_page);
                }
            }
            TransitionKind::Reload => {
                self.page_count = match self.source.upgrade() {
                    Some(source) => source.borrow().page_count(),
                    None => {
                        warn!("page source dropped, treating collection as empty");
                        0
                    }
                };
                let in_bounds: BTreeSet<PageIndex> = self
                    .registry
                    .loaded_indices()
                    .into_iter()
                    .filter(|index| index.in_bounds(self.page_count))
                    .collect();
                departing.extend(self.registry.evict_not_required(&in_bounds));
                self.current_page = self.current_page.clamped(self.page_count);
            }
            TransitionKind::ReloadPages { indexes } => {
                for index in indexes {
                    if !index.in_bounds(self.page_count) {
                        warn!(%index, count = self.page_count, "stale reload index, dropping");
                        continue;
                    }
                    departing.extend(self.registry.evict(index));
                }
            }
            TransitionKind::SetLayouter { layouter, focus } => {
                self.layouter = layouter;
                settle_focus = focus.map(|focus| focus.clamped(self.page_count));
            }
        }

        // Geometry pass. Frames do not depend on the offset, so a first
        // plan at the current offset yields the focus frame the target
        // offset derives from; the second plan at the target offset then
        // decides the required window.
        let loaded = self.registry.loaded_indices();
        let geometry = self
            .layouter
            .plan(&LayoutQuery {
                page_count: self.page_count,
                viewport: self.viewport.visible_rect(),
                loaded: &loaded,
                focus: settle_focus,
            })
            .sanitized(self.page_count);
        self.viewport.set_content_size(geometry.content_size);
        let start_offset = self.viewport.offset();
        let target_offset = settle_focus
            .and_then(|focus| geometry.frames.get(&focus))
            .map_or(start_offset, |frame| self.viewport.clamp(frame.origin()));
        let plan = self
            .layouter
            .plan(&LayoutQuery {
                page_count: self.page_count,
                viewport: Rect::from_origin_size(target_offset, self.viewport.bounds()),
                loaded: &loaded,
                focus: settle_focus,
            })
            .sanitized(self.page_count);

        // Load what the target geometry requires. Pages outside the new
        // window stay loaded until settle so an animated change can carry
        // them out of view.
        let newly_loaded = match self.source.upgrade() {
            Some(source) => self.registry.load_missing(
                &plan.required,
                self.page_count,
                &mut *source.borrow_mut(),
                &mut self.pool,
            ),
            None => {
                if !plan.required.is_empty() {
                    warn!("page source dropped, required pages stay unresolved");
                }
                Vec::new()
            }
        };

        // Fresh pages appear directly at their target frame; existing
        // pages whose frame changes tween there when animated.
        let animated = animated && !self.animation_duration.is_zero();
        let mut frame_tweens = Vec::new();
        for index in self.registry.loaded_indices() {
            let Some(&target) = plan.frames.get(&index) else {
                continue;
            };
            match self.registry.frame(index) {
                Some(current) if animated && current != target => {
                    frame_tweens.push((index, Tween::new(current, target)));
                }
                _ => self.registry.set_frame(index, target),
            }
        }

        let no_op = start_offset == target_offset
            && frame_tweens.is_empty()
            && departing.is_empty()
            && newly_loaded.is_empty()
            && self.registry.loaded_indices() == plan.required;
        let duration = if animated && !no_op {
            self.animation_duration
        } else {
            Duration::ZERO
        };

        self.scheduler.activate(ActiveTransition {
            kind_name,
            offset: Tween::new(start_offset, target_offset),
            frames: frame_tweens,
            duration,
            elapsed: Duration::ZERO,
            easing: Rc::clone(&self.easing),
            completions,
            departing,
            settle_focus,
        });
        if duration.is_zero() {
            self.finish_active();
        }
    }

    /// Settle the active transition: pin terminal geometry, reconcile the
    /// window at the rest offset, raise notifications and start the next
    /// queued request.
    fn finish_active(&mut self) {
        let Some(transition) = self.scheduler.take_active() else {
            return;
        };
        let ActiveTransition {
            kind_name,
            offset,
            frames,
            completions,
            departing,
            settle_focus,
            ..
        } = transition;

        if self.viewport.set_offset(offset.target()) {
            self.events.emit_offset_changed(self.viewport.offset());
        }
        for (index, tween) in &frames {
            self.registry.set_frame(*index, tween.target());
        }
        if let Some(focus) = settle_focus {
            self.current_page = focus.clamped(self.page_count);
        }

        // Rest reconcile: the window at the terminal offset decides what
        // stays loaded.
        let loaded = self.registry.loaded_indices();
        let plan = self
            .layouter
            .plan(&LayoutQuery {
                page_count: self.page_count,
                viewport: self.viewport.visible_rect(),
                loaded: &loaded,
                focus: None,
            })
            .sanitized(self.page_count);
        self.viewport.set_content_size(plan.content_size);
        let mut departures = departing;
        departures.extend(self.registry.evict_not_required(&plan.required));
        if let Some(source) = self.source.upgrade() {
            self.registry.load_missing(
                &plan.required,
                self.page_count,
                &mut *source.borrow_mut(),
                &mut self.pool,
            );
        }
        for (index, frame) in &plan.frames {
            self.registry.set_frame(*index, *frame);
        }

        self.apply_visibility(departures);

        debug!(kind = kind_name, current = %self.current_page, "transition settled");
        if !self.scheduler.has_pending() {
            self.events.emit_rested(self.current_page);
        }
        for completion in completions {
            completion();
        }
        if let Some(next) = self.scheduler.pop_pending() {
            self.begin(next);
        }
    }

    /// Relayout and reconcile at the current offset with live
    /// notifications. Used outside transitions.
    ///
    /// Departing units are hidden and pooled before the incoming pages
    /// load, so a scroll that swaps the whole window recycles the units it
    /// just retired. Hide decisions are therefore made against the planned
    /// frames rather than the loaded ones.
    fn reconcile_live(&mut self, focus: Option<PageIndex>) {
        let loaded = self.registry.loaded_indices();
        let plan = self
            .layouter
            .plan(&LayoutQuery {
                page_count: self.page_count,
                viewport: self.viewport.visible_rect(),
                loaded: &loaded,
                focus,
            })
            .sanitized(self.page_count);
        self.viewport.set_content_size(plan.content_size);
        let departures = self.registry.evict_not_required(&plan.required);
        for (index, frame) in &plan.frames {
            self.registry.set_frame(*index, *frame);
        }

        let mut projected = self.registry.frames();
        for index in &plan.required {
            if let Some(frame) = plan.frames.get(index) {
                projected.entry(*index).or_insert(*frame);
            }
        }
        let fractions = visible_fractions(&projected, &self.viewport.visible_rect());
        self.emit_hides(departures, &fractions);

        if let Some(source) = self.source.upgrade() {
            self.registry.load_missing(
                &plan.required,
                self.page_count,
                &mut *source.borrow_mut(),
                &mut self.pool,
            );
        }
        for (index, frame) in &plan.frames {
            self.registry.set_frame(*index, *frame);
        }
        self.emit_shows_and_record();
    }

    fn refresh_visibility(&mut self) {
        self.apply_visibility(Vec::new());
    }

    /// Compare fresh fractions against the per-page memory, raise hides
    /// then shows in ascending index order, pool departed units after
    /// their hide, and record the new fractions.
    fn apply_visibility(&mut self, departures: Vec<Evicted<U>>) {
        let fractions =
            visible_fractions(&self.registry.frames(), &self.viewport.visible_rect());
        self.emit_hides(departures, &fractions);
        self.emit_shows_and_record();
    }

    /// Raise hides in ascending index order: departures that were visible,
    /// merged with loaded pages whose fraction drops to zero under
    /// `fractions`. Every departure ends up in the pool, after its hide
    /// when it has one.
    fn emit_hides(&mut self, departures: Vec<Evicted<U>>, fractions: &BTreeMap<PageIndex, f32>) {
        let mut hides: Vec<(PageIndex, Option<Evicted<U>>)> = Vec::new();
        for departure in departures {
            if departure.was_visible {
                hides.push((departure.index, Some(departure)));
            } else {
                self.pool.store(departure.reuse_id, departure.unit);
            }
        }
        for index in self.registry.loaded_indices() {
            let now = fractions.get(&index).copied().unwrap_or(0.0);
            if self.registry.fraction(index) > 0.0 && now == 0.0 {
                hides.push((index, None));
            }
        }
        hides.sort_by_key(|(index, _)| *index);
        for (index, departed) in hides {
            match departed {
                Some(evicted) => {
                    self.events.emit_hidden(&evicted.unit, index);
                    self.pool.store(evicted.reuse_id, evicted.unit);
                }
                None => {
                    if let Some(unit) = self.registry.unit(index) {
                        self.events.emit_hidden(unit, index);
                    }
                    self.registry.record_fraction(index, 0.0);
                }
            }
        }
    }

    /// Raise shows for loaded pages whose fraction crossed above zero,
    /// then refresh the per-page fraction memory.
    fn emit_shows_and_record(&mut self) {
        let fractions =
            visible_fractions(&self.registry.frames(), &self.viewport.visible_rect());
        for (&index, &fraction) in &fractions {
            if fraction > 0.0 && self.registry.fraction(index) == 0.0 {
                if let Some(unit) = self.registry.unit(index) {
                    self.events.emit_shown(unit, index);
                }
            }
        }
        for (&index, &fraction) in &fractions {
            self.registry.record_fraction(index, fraction);
        }
    }

    /// The loaded page whose frame center sits nearest the viewport
    /// center; ties fall to the lower index.
    fn derive_current(&self) -> PageIndex {
        let center = self.viewport.visible_rect().center();
        let mut best: Option<(f32, PageIndex)> = None;
        for (index, frame) in self.registry.frames() {
            let page_center = frame.center();
            let dx = page_center.x - center.x;
            let dy = page_center.y - center.y;
            let distance = dx * dx + dy * dy;
            let better = match best {
                None => true,
                Some((best_distance, _)) => distance < best_distance,
            };
            if better {
                best = Some((distance, index));
            }
        }
        match best {
            Some((_, index)) => index,
            None => self.current_page.clamped(self.page_count),
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
