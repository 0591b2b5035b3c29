//! Shared fixtures for controller-level tests.
//!
//! Provides a label-backed page source that counts what the controller
//! asks of it, a notification recorder that flattens units to their
//! labels, and a controller builder over the linear layouter.

use crate::controller::PageController;
use crate::geometry::{Point, Size};
use crate::layout::{Axis, LinearLayouter};
use crate::scheduler::Completion;
use crate::source::{PageSource, ReuseId, SharedSource};
use crate::types::PageIndex;
use std::cell::RefCell;
use std::rc::Rc;

/// Source over a vector of labels, counting controller requests.
pub struct LabelSource {
    pub labels: Vec<String>,
    pub builds: usize,
    pub recycled_seen: usize,
    pub reuse_id: Option<ReuseId>,
}

impl LabelSource {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|label| label.to_string()).collect(),
            builds: 0,
            recycled_seen: 0,
            reuse_id: None,
        }
    }
}

impl PageSource<String> for LabelSource {
    fn page_count(&self) -> usize {
        self.labels.len()
    }

    fn page_at(&mut self, index: PageIndex, recycled: Option<String>) -> Option<String> {
        self.builds += 1;
        if recycled.is_some() {
            self.recycled_seen += 1;
        }
        self.labels.get(index.get()).cloned()
    }

    fn reuse_id(&self, _index: PageIndex) -> Option<ReuseId> {
        self.reuse_id.clone()
    }
}

/// One observed notification, with units flattened to their label.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Shown(String, usize),
    Hidden(String, usize),
    Offset(Point),
    Rested(usize),
}

impl Recorded {
    pub fn shown(label: &str, index: usize) -> Self {
        Self::Shown(label.to_string(), index)
    }

    pub fn hidden(label: &str, index: usize) -> Self {
        Self::Hidden(label.to_string(), index)
    }

    pub fn offset(x: f32, y: f32) -> Self {
        Self::Offset(Point::new(x, y))
    }
}

/// Wire all four notification slots to a shared log.
pub fn record_events(controller: &mut PageController<String>) -> Rc<RefCell<Vec<Recorded>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let events = controller.events_mut();
    let sink = Rc::clone(&log);
    events.on_shown(move |unit, index| {
        sink.borrow_mut()
            .push(Recorded::Shown(unit.clone(), index.get()));
    });
    let sink = Rc::clone(&log);
    events.on_hidden(move |unit, index| {
        sink.borrow_mut()
            .push(Recorded::Hidden(unit.clone(), index.get()));
    });
    let sink = Rc::clone(&log);
    events.on_offset_changed(move |offset| {
        sink.borrow_mut().push(Recorded::Offset(offset));
    });
    let sink = Rc::clone(&log);
    events.on_rested(move |index| {
        sink.borrow_mut().push(Recorded::Rested(index.get()));
    });
    log
}

/// Controller over a 100x100 viewport and a horizontal linear layouter,
/// loaded from `labels`. The returned handle keeps the source alive and
/// open for inspection.
pub fn linear_controller(labels: &[&str]) -> (PageController<String>, Rc<RefCell<LabelSource>>) {
    let source = Rc::new(RefCell::new(LabelSource::new(labels)));
    let shared: SharedSource<String> = source.clone();
    let mut controller = PageController::new(
        Size::new(100.0, 100.0),
        Rc::new(LinearLayouter::new(Axis::Horizontal)),
        Rc::downgrade(&shared),
    );
    controller.reload_data();
    (controller, source)
}

/// Counter plus a completion that bumps it, for exactly-once assertions.
pub fn completion_flag() -> (Rc<RefCell<usize>>, Completion) {
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    (count, Box::new(move || *sink.borrow_mut() += 1))
}
