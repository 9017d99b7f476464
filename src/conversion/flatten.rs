use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

/// Produce an opaque 8-bit RGB image ready for JPEG encoding
///
/// Images with an alpha channel (RGBA, luma+alpha, and palettes with a tRNS
/// chunk, which the decoder expands to RGBA) are composited onto
/// `background`. Everything else is converted to RGB as-is.
pub fn flatten(img: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    if img.color().has_alpha() {
        composite_over(&img.to_rgba8(), background)
    } else {
        img.to_rgb8()
    }
}

/// Composite `img` over a solid canvas of `background`
///
/// Per channel: `(a * src + (255 - a) * bg) / 255`, rounded. Fully opaque
/// pixels come out unchanged whatever the background.
pub fn composite_over(img: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut canvas = RgbImage::from_pixel(width, height, background);

    for (src, dst) in img.pixels().zip(canvas.pixels_mut()) {
        let alpha = src[3] as u32;
        let inv_alpha = 255 - alpha;
        for channel in 0..3 {
            let blended = (src[channel] as u32 * alpha + dst[channel] as u32 * inv_alpha + 127) / 255;
            dst[channel] = blended as u8;
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, LumaA, Rgba};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 17) as u8, (y * 29) as u8, ((x + y) * 7) as u8])
        })
    }

    #[test]
    fn test_opaque_alpha_ignores_background() {
        let rgb = gradient(8, 6);
        let rgba = RgbaImage::from_fn(8, 6, |x, y| {
            let p = rgb.get_pixel(x, y);
            Rgba([p[0], p[1], p[2], 255])
        });

        let opaque = flatten(&DynamicImage::ImageRgb8(rgb.clone()), Rgb([255, 255, 255]));
        for background in [Rgb([0, 0, 0]), Rgb([255, 255, 255]), Rgb([12, 200, 99])] {
            let flattened = flatten(&DynamicImage::ImageRgba8(rgba.clone()), background);
            assert_eq!(flattened.as_raw(), opaque.as_raw());
        }
    }

    #[test]
    fn test_transparent_pixels_take_background() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let flattened = composite_over(&rgba, Rgb([200, 100, 50]));
        assert!(flattened.pixels().all(|p| *p == Rgb([200, 100, 50])));
    }

    #[test]
    fn test_half_alpha_blends() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let flattened = composite_over(&rgba, Rgb([0, 0, 255]));
        // 255 * 128 / 255 = 128, 255 * 127 / 255 = 127
        assert_eq!(*flattened.get_pixel(0, 0), Rgb([128, 0, 127]));
    }

    #[test]
    fn test_luma_alpha_is_flattened() {
        let la = image::ImageBuffer::from_pixel(3, 3, LumaA([100u8, 0]));
        let flattened = flatten(&DynamicImage::ImageLumaA8(la), Rgb([1, 2, 3]));
        assert!(flattened.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }

    #[test]
    fn test_grayscale_becomes_rgb() {
        let gray = GrayImage::from_pixel(4, 2, Luma([77]));
        let flattened = flatten(&DynamicImage::ImageLuma8(gray), Rgb([0, 0, 0]));
        assert_eq!(flattened.dimensions(), (4, 2));
        assert!(flattened.pixels().all(|p| *p == Rgb([77, 77, 77])));
    }
}
