/// Half-open column interval `[start, end)` occupied by one glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterBox {
    pub start: u32,
    pub end: u32,
}

impl LetterBox {
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    /// Check if two boxes share any column
    pub fn overlaps(&self, other: &LetterBox) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Split a box wider than `max_width` into `ceil(width / max_width)`
    /// near-equal parts, left to right. Boxes within bounds come back as-is.
    pub fn split(&self, max_width: u32) -> Vec<LetterBox> {
        let width = self.width();
        if max_width == 0 || width <= max_width {
            return vec![*self];
        }

        let parts = u64::from(width.div_ceil(max_width));
        let width = u64::from(width);
        // offset <= width, so the narrowing back to u32 is lossless
        let offset = |i: u64| (i * width / parts) as u32;

        (0..parts)
            .map(|i| LetterBox {
                start: self.start + offset(i),
                end: self.start + offset(i + 1),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_box_width() {
        let letter_box = LetterBox { start: 10, end: 30 };
        assert_eq!(letter_box.width(), 20);
    }

    #[test]
    fn test_letter_box_overlap() {
        let a = LetterBox { start: 0, end: 10 };
        let b = LetterBox { start: 5, end: 15 };
        let c = LetterBox { start: 10, end: 20 };

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // adjacent
    }

    #[test]
    fn test_split_within_bounds() {
        let letter_box = LetterBox { start: 0, end: 33 };
        assert_eq!(letter_box.split(33), vec![letter_box]);
    }

    #[test]
    fn test_split_fused_pair() {
        let letter_box = LetterBox { start: 100, end: 160 };
        let parts = letter_box.split(33);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], LetterBox { start: 100, end: 130 });
        assert_eq!(parts[1], LetterBox { start: 130, end: 160 });
    }

    #[test]
    fn test_split_parts_are_contiguous_and_bounded() {
        let letter_box = LetterBox { start: 7, end: 107 };
        let parts = letter_box.split(33);

        assert_eq!(parts.len(), 4);
        assert_eq!(parts.first().unwrap().start, 7);
        assert_eq!(parts.last().unwrap().end, 107);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(!pair[0].overlaps(&pair[1]));
        }
        assert!(parts.iter().all(|p| p.width() <= 33 && p.width() > 0));
    }

    #[test]
    fn test_split_very_wide_run() {
        // i * width exceeds u32::MAX for runs this wide
        let letter_box = LetterBox { start: 0, end: 1_000_000 };
        let parts = letter_box.split(33);

        assert_eq!(parts.len(), 30_304);
        assert_eq!(parts.last().unwrap().end, 1_000_000);
        assert!(parts.iter().all(|p| p.width() <= 33 && p.width() > 0));
    }
}
