use num_traits::{One, Zero};
use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Div},
};

/// Closed interval `[start, stop]` carrying a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval<Scalar, Value> {
    pub start: Scalar,
    pub stop: Scalar,
    pub value: Value,
}

impl<Scalar, Value> Interval<Scalar, Value>
where
    Scalar: PartialOrd + Copy,
{
    pub fn new(s: Scalar, e: Scalar, v: Value) -> Self {
        let (start, stop) = if s <= e { (s, e) } else { (e, s) };
        Self {
            start,
            stop,
            value: v,
        }
    }

    #[inline]
    pub fn overlaps(&self, start: Scalar, stop: Scalar) -> bool {
        self.stop >= start && self.start <= stop
    }
}

impl<Scalar, Value> fmt::Display for Interval<Scalar, Value>
where
    Scalar: fmt::Display,
    Value: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]: {}", self.start, self.stop, self.value)
    }
}

/// Centered interval tree over closed intervals.
pub struct IntervalTree<Scalar, Value> {
    intervals: Vec<Interval<Scalar, Value>>,
    left: Option<Box<IntervalTree<Scalar, Value>>>,
    right: Option<Box<IntervalTree<Scalar, Value>>>,
    center: Scalar,
}

impl<Scalar, Value> IntervalTree<Scalar, Value>
where
    Scalar: PartialOrd + Copy + Add<Output = Scalar> + Div<Output = Scalar> + Zero + One,
{
    const MAX_DEPTH: usize = 16;
    const MIN_BUCKET: usize = 64;

    fn empty() -> Self {
        Self {
            intervals: Vec::new(),
            left: None,
            right: None,
            center: Scalar::zero(),
        }
    }

    pub fn new(mut intervals: Vec<Interval<Scalar, Value>>) -> Self {
        if intervals.is_empty() {
            return Self::empty();
        }
        intervals.sort_unstable_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
        let left_extent = intervals[0].start;
        let right_extent = intervals
            .iter()
            .map(|i| i.stop)
            .fold(left_extent, |acc, stop| if stop > acc { stop } else { acc });
        Self::build_tree(intervals, Self::MAX_DEPTH, left_extent, right_extent)
    }

    fn build_tree(
        intervals: Vec<Interval<Scalar, Value>>,
        depth: usize,
        left_extent: Scalar,
        right_extent: Scalar,
    ) -> Self {
        let center = (left_extent + right_extent) / (Scalar::one() + Scalar::one());

        if depth == 0 || intervals.len() < Self::MIN_BUCKET {
            return Self {
                intervals,
                left: None,
                right: None,
                center,
            };
        }

        let (lefts, centers): (Vec<_>, Vec<_>) =
            intervals.into_iter().partition(|i| i.stop < center);
        let (centers, rights): (Vec<_>, Vec<_>) =
            centers.into_iter().partition(|i| i.start <= center);

        let left = (!lefts.is_empty())
            .then(|| Box::new(Self::build_tree(lefts, depth - 1, left_extent, center)));
        let right = (!rights.is_empty())
            .then(|| Box::new(Self::build_tree(rights, depth - 1, center, right_extent)));

        Self {
            intervals: centers,
            left,
            right,
            center,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left.as_ref().is_none_or(|l| l.is_empty())
            && self.intervals.is_empty()
            && self.right.as_ref().is_none_or(|r| r.is_empty())
    }

    /// Calls `f` for every interval overlapping `[start, stop]` until it returns `false`.
    /// Returns `false` when the visit was stopped early.
    fn visit_overlapping<'a, F>(&'a self, start: Scalar, stop: Scalar, f: &mut F) -> bool
    where
        F: FnMut(&'a Interval<Scalar, Value>) -> bool,
    {
        for interval in &self.intervals {
            if interval.overlaps(start, stop) && !f(interval) {
                return false;
            }
        }

        if start <= self.center {
            if let Some(ref left) = self.left {
                if !left.visit_overlapping(start, stop, f) {
                    return false;
                }
            }
        }

        if stop >= self.center {
            if let Some(ref right) = self.right {
                if !right.visit_overlapping(start, stop, f) {
                    return false;
                }
            }
        }
        true
    }

    pub fn overlaps_any(&self, start: Scalar, stop: Scalar) -> bool {
        !self.visit_overlapping(start, stop, &mut |_| false)
    }

    pub fn find_overlapping(&self, start: Scalar, stop: Scalar) -> Vec<&Interval<Scalar, Value>> {
        let mut result = Vec::new();
        self.visit_overlapping(start, stop, &mut |i| {
            result.push(i);
            true
        });
        result
    }
}
