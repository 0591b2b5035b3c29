//! Occlusion-aware visible fractions.
//!
//! A page's visible fraction is the share of its own frame that survives
//! both clipping to the viewport's visible rectangle and occlusion by
//! pages stacked in front of it. The stacking rule is fixed: a strictly
//! higher index occludes a lower one, never the reverse.
//!
//! Fractions are exact, not sampled: the occluded region is measured as
//! the union area of the in-front frames clipped to the page's on-screen
//! region, via an x-slab sweep with a y-interval merge per slab.

use crate::geometry::Rect;
use crate::types::PageIndex;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Fraction of the frame at `index` that is on-screen and unoccluded.
///
/// Returns 0 for indices without a frame, degenerate frames, frames fully
/// outside `viewport`, and frames fully covered by higher-index frames.
/// Returns 1 only for a frame entirely inside the viewport with no
/// higher-index overlap.
pub fn visible_fraction(
    index: PageIndex,
    frames: &BTreeMap<PageIndex, Rect>,
    viewport: &Rect,
) -> f32 {
    let frame = match frames.get(&index) {
        Some(frame) => *frame,
        None => return 0.0,
    };
    let frame_area = frame.area();
    if frame_area <= 0.0 {
        return 0.0;
    }
    let on_screen = match frame.intersection(viewport) {
        Some(region) => region,
        None => return 0.0,
    };
    let in_front: Vec<Rect> = frames
        .range((Bound::Excluded(index), Bound::Unbounded))
        .filter_map(|(_, occluder)| occluder.intersection(&on_screen))
        .collect();
    let visible = (on_screen.area() - union_area(&in_front)).max(0.0);
    (visible / frame_area).clamp(0.0, 1.0)
}

/// Visible fraction for every framed page.
pub fn visible_fractions(
    frames: &BTreeMap<PageIndex, Rect>,
    viewport: &Rect,
) -> BTreeMap<PageIndex, f32> {
    frames
        .keys()
        .map(|&index| (index, visible_fraction(index, frames, viewport)))
        .collect()
}

/// Exact union area of a set of rectangles.
///
/// Slab edges are taken from the rectangles' own x edges, so a rectangle
/// overlapping a slab always spans it fully and the per-slab cover reduces
/// to a one-dimensional interval merge.
fn union_area(rects: &[Rect]) -> f32 {
    if rects.is_empty() {
        return 0.0;
    }
    let mut xs: Vec<f32> = rects.iter().flat_map(|r| [r.x, r.max_x()]).collect();
    xs.sort_by(f32::total_cmp);
    xs.dedup();

    let mut total = 0.0;
    for pair in xs.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);
        let width = x1 - x0;
        if width <= 0.0 {
            continue;
        }
        let mut intervals: Vec<(f32, f32)> = rects
            .iter()
            .filter(|r| r.x <= x0 && r.max_x() >= x1)
            .map(|r| (r.y, r.max_y()))
            .collect();
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut covered = 0.0;
        let mut current: Option<(f32, f32)> = None;
        for (y0, y1) in intervals {
            match current {
                None => current = Some((y0, y1)),
                Some((cy0, cy1)) => {
                    if y0 <= cy1 {
                        current = Some((cy0, cy1.max(y1)));
                    } else {
                        covered += cy1 - cy0;
                        current = Some((y0, y1));
                    }
                }
            }
        }
        if let Some((cy0, cy1)) = current {
            covered += cy1 - cy0;
        }
        total += covered * width;
    }
    total
}
