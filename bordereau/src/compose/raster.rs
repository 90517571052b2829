//! Conversions between `image` buffers and tiny-skia pixmaps.
//!
//! `RgbaImage` stores straight alpha while `Pixmap` is premultiplied.

use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, Pixmap};

/// Premultiplies `image` into a new pixmap. `None` for a zero-sized image.
pub fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Demultiplies `pixmap` into a straight-alpha image of the same size.
pub fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_pixels_survive() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 0]));
        image.put_pixel(2, 1, Rgba([200, 100, 50, 255]));

        let back = to_image(&to_pixmap(&image).unwrap());
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1), &Rgba([200, 100, 50, 255]));
        assert_eq!(back.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_translucent_pixels_are_premultiplied() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let pixmap = to_pixmap(&image).unwrap();
        let pixel = pixmap.pixels()[0];

        assert_eq!(pixel.alpha(), 128);
        assert_eq!(pixel.red(), 128);
    }

    #[test]
    fn test_zero_sized_image() {
        assert!(to_pixmap(&RgbaImage::new(0, 4)).is_none());
    }
}
