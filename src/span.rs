/// Half-open byte range `[start, end)` within a single input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span runs backwards: [{start}, {end})");
        Self { start, end }
    }

    /// Zero-length span marking an insertion point.
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the two ranges share at least one byte.
    ///
    /// Adjacent ranges do not overlap, and neither does an empty span
    /// sitting inside another range: it covers no bytes of its own.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_requires_common_byte() {
        assert!(Span::new(0, 10).overlaps(&Span::new(5, 15)));
        assert!(Span::new(5, 15).overlaps(&Span::new(0, 10)));
        assert!(Span::new(0, 10).overlaps(&Span::new(2, 8)));
    }

    #[test]
    fn test_adjacent_spans_do_not_overlap() {
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 10)));
        assert!(!Span::new(5, 10).overlaps(&Span::new(0, 5)));
    }

    #[test]
    fn test_disjoint_spans_do_not_overlap() {
        assert!(!Span::new(0, 10).overlaps(&Span::new(20, 30)));
    }

    #[test]
    fn test_insertion_point_overlaps_nothing() {
        let point = Span::at(5);
        assert!(point.is_empty());
        assert_eq!(point.len(), 0);
        assert!(!point.overlaps(&Span::new(0, 10)));
        assert!(!Span::new(0, 10).overlaps(&point));
    }

    #[test]
    fn test_len() {
        assert_eq!(Span::new(3, 9).len(), 6);
        assert!(!Span::new(3, 9).is_empty());
    }
}
