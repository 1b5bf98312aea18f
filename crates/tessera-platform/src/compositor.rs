//! Z-order and overlap computation for a set of windows
//!
//! Windows are painted back to front in ascending `(y, x)` order of their top
//! left corner. For each window the compositor reports the regions where
//! other visible windows cover it:
//!
//! 1. intersect the window with every other window (pairwise, O(n²) per
//!    frame over all windows);
//! 2. merge those intersections in a single pass: each region not yet
//!    consumed absorbs every later unconsumed region that intersects it, and
//!    the bounding rectangle of the group is emitted.
//!
//! The merge is deliberately not a transitive closure. Two regions that only
//! touch through a third one that was absorbed elsewhere stay separate.

use smallvec::SmallVec;
use std::cmp::Ordering;
use tessera_core::Rect;

/// Overlap regions of one window. Most windows overlap only a few others.
pub type OverlapRegions = SmallVec<[Rect; 4]>;

/// Painting order: ascending `y`, then `x`, then name for identical corners.
pub fn paint_order(a: (&str, Rect), b: (&str, Rect)) -> Ordering {
    a.1.y
        .cmp(&b.1.y)
        .then(a.1.x.cmp(&b.1.x))
        .then_with(|| a.0.cmp(b.0))
}

/// Sort `(name, bounds)` pairs into painting order.
///
/// ```rust
/// use tessera_core::Rect;
/// use tessera_platform::compositor::z_order;
///
/// let order = z_order(vec![
///     ("a", Rect::new(100, 100, 10, 10)),
///     ("b", Rect::new(500, 50, 10, 10)),
///     ("c", Rect::new(50, 100, 10, 10)),
/// ]);
/// let names: Vec<_> = order.iter().map(|(name, _)| *name).collect();
/// assert_eq!(names, ["b", "c", "a"]);
/// ```
pub fn z_order<'a, I>(windows: I) -> Vec<(&'a str, Rect)>
where
    I: IntoIterator<Item = (&'a str, Rect)>,
{
    let mut order: Vec<_> = windows.into_iter().collect();
    order.sort_by(|a, b| paint_order(*a, *b));
    order
}

/// Non-empty intersections of `target` with each of `others`, in order.
///
/// A zero-size window can pass the strict edge test against a window around
/// it, but covers no pixels, so it contributes nothing.
pub fn pairwise_overlaps<I>(target: Rect, others: I) -> OverlapRegions
where
    I: IntoIterator<Item = Rect>,
{
    others
        .into_iter()
        .map(|other| target.intersection(&other))
        .filter(|region| !region.is_empty())
        .collect()
}

/// Single merge pass over `regions`.
pub fn merge_overlaps(regions: &[Rect]) -> OverlapRegions {
    let mut merged = OverlapRegions::new();
    let mut consumed: SmallVec<[bool; 8]> = SmallVec::from_elem(false, regions.len());

    for (i, seed) in regions.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        let mut group = *seed;
        for (j, other) in regions.iter().enumerate().skip(i + 1) {
            if !consumed[j] && seed.intersects(other) {
                group = group.union(other);
                consumed[j] = true;
            }
        }
        merged.push(group);
    }
    merged
}

/// Merged regions of `target` covered by any of `others`.
pub fn overlapping_areas<I>(target: Rect, others: I) -> OverlapRegions
where
    I: IntoIterator<Item = Rect>,
{
    let pairwise = pairwise_overlaps(target, others);
    if pairwise.len() < 2 {
        return pairwise;
    }
    merge_overlaps(&pairwise)
}
