use super::preprocessing::{is_foreground, BACKGROUND, FOREGROUND};
use crate::models::config::SegmentationConfig;
use crate::models::letter_box::LetterBox;
use crate::models::solution::CAPTCHA_LENGTH;
use image::{imageops, GrayImage, Luma};

/// Box count produced when the first glyph wraps around the frame edge
const WRAPPED_LENGTH: usize = CAPTCHA_LENGTH + 1;

/// Splits a monochrome captcha into its six glyphs
pub struct LetterSegmenter {
    config: SegmentationConfig,
}

impl LetterSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Segment a monochrome bitmap into exactly six trimmed glyphs in reading order.
    ///
    /// Unreliable segmentations (box count outside {6, 7}, or a six-box result
    /// whose first box is narrower than `min_letter_width`) are replaced by
    /// blank placeholders. A seven-box result is a wrapped first glyph: the
    /// rightmost box is joined in front of the leftmost one.
    pub fn segment(&self, bitmap: &GrayImage) -> Vec<GrayImage> {
        // Step 1: Locate glyph column ranges
        let boxes = find_letter_boxes(bitmap, self.config.max_letter_width);
        tracing::debug!(count = boxes.len(), "letter boxes found");

        // Step 2: Crop each box at full image height
        let mut letters: Vec<GrayImage> = boxes
            .iter()
            .map(|letter_box| crop_columns(bitmap, letter_box))
            .collect();

        let first_too_narrow = letters.len() == CAPTCHA_LENGTH
            && letters[0].width() < self.config.min_letter_width;

        // Step 3: Replace unreliable segmentations with blank placeholders
        if first_too_narrow || (letters.len() != CAPTCHA_LENGTH && letters.len() != WRAPPED_LENGTH) {
            tracing::warn!(
                count = letters.len(),
                first_too_narrow,
                "unreliable segmentation, substituting placeholders"
            );
            letters = self.placeholders();
        }

        // Step 4: Rejoin a first glyph wrapped around the frame edge
        if letters.len() == WRAPPED_LENGTH {
            let head = letters.remove(0);
            if let Some(tail) = letters.last_mut() {
                *tail = merge_horizontally(tail, &head);
            }
            // Joined glyph takes the first reading position
            letters.rotate_right(1);
        }

        // Step 5: Trim background borders
        letters.iter().map(trim_background).collect()
    }

    fn placeholders(&self) -> Vec<GrayImage> {
        (0..CAPTCHA_LENGTH)
            .map(|_| {
                GrayImage::from_pixel(
                    self.config.placeholder_width,
                    self.config.placeholder_height,
                    Luma([BACKGROUND]),
                )
            })
            .collect()
    }
}

impl Default for LetterSegmenter {
    fn default() -> Self {
        Self::new(SegmentationConfig::default())
    }
}

/// Find maximal runs of columns containing ink, left to right.
/// Runs wider than `max_width` are split into near-equal parts.
pub fn find_letter_boxes(bitmap: &GrayImage, max_width: u32) -> Vec<LetterBox> {
    let (width, height) = bitmap.dimensions();
    let column_has_ink =
        |x: u32| (0..height).any(|y| is_foreground(bitmap.get_pixel(x, y)));

    let mut boxes = Vec::new();
    let mut run_start: Option<u32> = None;

    for x in 0..=width {
        let inked = x < width && column_has_ink(x);
        match (run_start, inked) {
            (None, true) => run_start = Some(x),
            (Some(start), false) => {
                boxes.extend(LetterBox { start, end: x }.split(max_width));
                run_start = None;
            }
            _ => {}
        }
    }

    boxes
}

/// Copy the full-height column range of a box out of the bitmap
pub fn crop_columns(bitmap: &GrayImage, letter_box: &LetterBox) -> GrayImage {
    imageops::crop_imm(bitmap, letter_box.start, 0, letter_box.width(), bitmap.height()).to_image()
}

/// Place `right` directly after `left`; the shorter image is padded with background
pub fn merge_horizontally(left: &GrayImage, right: &GrayImage) -> GrayImage {
    let height = left.height().max(right.height());
    let mut merged = GrayImage::from_pixel(left.width() + right.width(), height, Luma([BACKGROUND]));
    imageops::replace(&mut merged, left, 0, 0);
    imageops::replace(&mut merged, right, i64::from(left.width()), 0);
    merged
}

/// Crop away background-only border rows and columns.
/// A glyph with no ink at all is returned unchanged.
pub fn trim_background(glyph: &GrayImage) -> GrayImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in glyph.enumerate_pixels() {
        if pixel[0] != FOREGROUND {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    match bounds {
        Some((min_x, min_y, max_x, max_y)) => {
            imageops::crop_imm(glyph, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image()
        }
        None => glyph.clone(),
    }
}
