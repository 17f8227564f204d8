/// A closed scalar range `[min, max]`, used mostly to bound ray parameters.
///
/// `EMPTY` (`min = +inf`, `max = -inf`) and `UNIVERSE` (`min = -inf`,
/// `max = +inf`) are ordinary values, not error states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// True when the interval contains no value at all.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn is_universe(&self) -> bool {
        self.min == f32::NEG_INFINITY && self.max == f32::INFINITY
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Returns true if `other` lies entirely inside this interval.
    /// The empty interval is contained in everything.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        other.is_empty() || (self.min <= other.min && other.max <= self.max)
    }

    /// Returns true if the two intervals share at least one value.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// # Panics
    ///
    /// Panics on an empty interval, which has no value to clamp to.
    pub fn clamp(&self, x: f32) -> f32 {
        assert!(!self.is_empty(), "cannot clamp to an empty interval");
        x.max(self.min).min(self.max)
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Overlap of two intervals, or `EMPTY` when they are disjoint.
    pub fn intersection(&self, other: &Interval) -> Interval {
        let result = Interval::new(self.min.max(other.min), self.max.min(other.max));
        if result.is_empty() {
            Interval::EMPTY
        } else {
            result
        }
    }

    /// Smallest interval containing both inputs.
    pub fn union(&self, other: &Interval) -> Interval {
        Interval::surrounding(self, other)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        match (a.is_empty(), b.is_empty()) {
            (true, _) => *b,
            (_, true) => *a,
            _ => Interval::new(a.min.min(b.min), a.max.max(b.max)),
        }
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 10.0);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(5.0), 5.0);
        assert_eq!(interval.clamp(15.0), 10.0);
    }

    #[test]
    fn test_clamp_universe_is_identity() {
        for x in [-1e30, -3.5, 0.0, 42.0, 1e30, f32::INFINITY] {
            assert_eq!(Interval::UNIVERSE.clamp(x), x);
        }
    }

    #[test]
    #[should_panic(expected = "empty interval")]
    fn test_clamp_empty_panics() {
        Interval::EMPTY.clamp(1.0);
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);

        // Expanded by 2.0 on each side (4.0 / 2)
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }

    #[test]
    fn test_intersection_empty_iff_disjoint() {
        let cases = [
            (Interval::new(0.0, 1.0), Interval::new(0.5, 2.0), true),
            (Interval::new(0.0, 1.0), Interval::new(1.0, 2.0), true),
            (Interval::new(0.0, 1.0), Interval::new(1.5, 2.0), false),
            (Interval::new(-3.0, -1.0), Interval::new(0.0, 2.0), false),
            (Interval::new(-3.0, 3.0), Interval::new(-1.0, 1.0), true),
        ];
        for (a, b, overlap) in cases {
            assert_eq!(!a.intersection(&b).is_empty(), overlap, "{a:?} {b:?}");
            assert_eq!(a.overlaps(&b), overlap);
            assert_eq!(a.intersection(&b), b.intersection(&a));
        }
        assert_eq!(
            Interval::new(0.0, 1.0).intersection(&Interval::new(2.0, 3.0)),
            Interval::EMPTY
        );
    }

    #[test]
    fn test_union_contains_both() {
        let pairs = [
            (Interval::new(0.0, 1.0), Interval::new(5.0, 6.0)),
            (Interval::new(-2.0, 8.0), Interval::new(1.0, 2.0)),
            (Interval::new(3.0, 4.0), Interval::EMPTY),
        ];
        for (a, b) in pairs {
            let u = a.union(&b);
            assert!(u.contains_interval(&a));
            assert!(u.contains_interval(&b));
        }
    }

    #[test]
    fn test_empty_absorbs_intersection() {
        let a = Interval::new(-1.0, 1.0);
        assert!(a.intersection(&Interval::EMPTY).is_empty());
        assert!(Interval::EMPTY.intersection(&Interval::UNIVERSE).is_empty());
        // Union with EMPTY gives back the other operand.
        assert_eq!(a.union(&Interval::EMPTY), a);
        assert_eq!(Interval::EMPTY.union(&a), a);
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(empty.is_empty());
        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f32::INFINITY));
        assert_eq!(Interval::default(), Interval::EMPTY);
    }

    #[test]
    fn test_interval_universe() {
        let universe = Interval::UNIVERSE;

        assert!(universe.is_universe());
        assert!(universe.contains(1e10));
        assert!(universe.contains(-1e10));
        assert_eq!(universe.size(), f32::INFINITY);
        assert!(!Interval::new(0.0, 1.0).is_universe());
    }
}
