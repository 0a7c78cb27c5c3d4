use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// Highest intensity still treated as glyph ink
pub const MONOWEIGHT: u8 = 1;

/// Pixel value of glyph strokes after thresholding
pub const FOREGROUND: u8 = 0;

/// Pixel value of everything else after thresholding
pub const BACKGROUND: u8 = 255;

/// Convert image to single-channel grayscale
///
/// Colour input uses the ITU-R 601-2 integer luma transform
/// `(R*19595 + G*38470 + B*7471 + 0x8000) >> 16`, the weighting the corpus
/// glyphs were thresholded with. Grayscale input is used as-is.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
            image.to_luma8()
        }
        _ => {
            let rgb = image.to_rgb8();
            ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Luma([luma_601(r, g, b)])
            })
        }
    }
}

fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471;
    ((weighted + 0x8000) >> 16) as u8
}

/// Full normalization: grayscale, then hard threshold at `MONOWEIGHT`.
///
/// Intensities 0..=MONOWEIGHT become `FOREGROUND`, all others `BACKGROUND`,
/// so anti-aliasing and background noise vanish entirely.
pub fn monochrome(image: &DynamicImage) -> GrayImage {
    threshold(&to_grayscale(image), MONOWEIGHT)
}

/// Apply a binary threshold to a grayscale image
pub fn threshold(gray: &GrayImage, level: u8) -> GrayImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] <= level {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Check whether a pixel belongs to a glyph
pub fn is_foreground(pixel: &Luma<u8>) -> bool {
    pixel[0] == FOREGROUND
}
