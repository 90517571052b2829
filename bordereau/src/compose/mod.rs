//! Final image composition.
//!
//! Layers are painted bottom to top: basemap, parcel raster, highlighted
//! parcel, compass, scale bar. Rasters are drawn at the origin with
//! source-over blending and are neither scaled nor cropped.

mod annotations;
mod raster;
mod text;

pub use annotations::{format_distance_label, scale_max_value};
pub use text::{FontBook, FontError, FontFace, TextAlign, TextStyle};

use geo::MultiPolygon;
use image::RgbaImage;
use tiny_skia::{Pixmap, PixmapPaint, Transform};
use tracing::{debug, error, warn};

use crate::geometry::{BoundingBox, GroundDistance};

/// Everything drawn into one composite.
#[derive(Debug, Clone, Copy)]
pub struct CompositionInput<'a> {
    pub parcel: &'a RgbaImage,
    pub basemap: Option<&'a RgbaImage>,
    pub highlight: Option<&'a MultiPolygon<f64>>,
    /// World extent covered by the canvas
    pub frame: &'a BoundingBox,
    pub ground_distance: GroundDistance,
    pub width: u32,
    pub height: u32,
}

/// Paints rasters and annotations onto a fixed-size canvas.
#[derive(Debug, Clone)]
pub struct ImageCompositor {
    fonts: FontBook,
    scale_unit: String,
}

impl ImageCompositor {
    pub fn new(fonts: FontBook, scale_unit: impl Into<String>) -> Self {
        Self {
            fonts,
            scale_unit: scale_unit.into(),
        }
    }

    /// Composes `input` into an image of exactly `width` x `height`.
    pub fn compose(&self, input: &CompositionInput<'_>) -> RgbaImage {
        let Some(mut canvas) = Pixmap::new(input.width, input.height) else {
            error!(
                width = input.width,
                height = input.height,
                "Cannot allocate canvas"
            );
            return RgbaImage::new(input.width, input.height);
        };

        match input.basemap {
            Some(basemap) => draw_raster(&mut canvas, basemap, "basemap"),
            None => debug!("No basemap, area left transparent"),
        }
        draw_raster(&mut canvas, input.parcel, "parcel");

        match input.highlight {
            Some(shape) => annotations::draw_highlight(&mut canvas, shape, input.frame),
            None => error!("No parcel geometry, highlight skipped"),
        }

        annotations::draw_compass(&mut canvas, &self.fonts);
        annotations::draw_scale_bar(
            &mut canvas,
            input.ground_distance,
            &self.scale_unit,
            &self.fonts,
        );

        raster::to_image(&canvas)
    }
}

fn draw_raster(canvas: &mut Pixmap, image: &RgbaImage, layer: &str) {
    let Some(source) = raster::to_pixmap(image) else {
        warn!(layer, "Empty raster, layer skipped");
        return;
    };
    if source.width() != canvas.width() || source.height() != canvas.height() {
        debug!(
            layer,
            width = source.width(),
            height = source.height(),
            "Raster size differs from canvas"
        );
    }
    canvas.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use image::Rgba;

    const W: u32 = 200;
    const H: u32 = 100;

    fn frame() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 200.0, 100.0, None)
    }

    fn compositor() -> ImageCompositor {
        ImageCompositor::new(FontBook::empty(), "mètres")
    }

    /// Opaque green on the right half, transparent on the left.
    fn parcel_raster() -> RgbaImage {
        RgbaImage::from_fn(W, H, |x, _| {
            if x >= W / 2 {
                Rgba([0, 200, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    fn input<'a>(
        parcel: &'a RgbaImage,
        basemap: Option<&'a RgbaImage>,
        highlight: Option<&'a MultiPolygon<f64>>,
        frame: &'a BoundingBox,
        meters: f64,
    ) -> CompositionInput<'a> {
        CompositionInput {
            parcel,
            basemap,
            highlight,
            frame,
            ground_distance: GroundDistance::meters(meters),
            width: W,
            height: H,
        }
    }

    #[test]
    fn test_output_has_canvas_size() {
        let parcel = RgbaImage::new(13, 7);
        let frame = frame();
        let image = compositor().compose(&input(&parcel, None, None, &frame, 0.0));
        assert_eq!(image.dimensions(), (W, H));
    }

    #[test]
    fn test_parcel_raster_over_basemap() {
        let parcel = parcel_raster();
        let basemap = RgbaImage::from_pixel(W, H, Rgba([200, 0, 0, 255]));
        let frame = frame();

        let image = compositor().compose(&input(&parcel, Some(&basemap), None, &frame, 0.0));

        assert_eq!(image.get_pixel(20, 50), &Rgba([200, 0, 0, 255]));
        assert_eq!(image.get_pixel(150, 50), &Rgba([0, 200, 0, 255]));
    }

    #[test]
    fn test_missing_basemap_stays_transparent() {
        let parcel = parcel_raster();
        let frame = frame();

        let image = compositor().compose(&input(&parcel, None, None, &frame, 0.0));

        assert_eq!(image.get_pixel(20, 50)[3], 0);
        assert_eq!(image.get_pixel(150, 50), &Rgba([0, 200, 0, 255]));
    }

    #[test]
    fn test_highlight_over_rasters() {
        let parcel = parcel_raster();
        let basemap = RgbaImage::from_pixel(W, H, Rgba([100, 100, 100, 255]));
        let frame = frame();
        // spans both raster halves, world y 20..80 maps to rows 20..80
        let shape = MultiPolygon::new(vec![polygon![
            (x: 60.0, y: 20.0),
            (x: 140.0, y: 20.0),
            (x: 140.0, y: 80.0),
            (x: 60.0, y: 80.0),
            (x: 60.0, y: 20.0),
        ]]);

        let image =
            compositor().compose(&input(&parcel, Some(&basemap), Some(&shape), &frame, 0.0));

        let over_basemap = image.get_pixel(80, 50);
        assert_eq!(over_basemap[3], 255);
        assert!(over_basemap[2] > 150 && over_basemap[0] < 80);

        let over_parcel = image.get_pixel(120, 50);
        assert!(over_parcel[2] > 100 && over_parcel[1] < 130);

        assert_eq!(image.get_pixel(30, 50), &Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_compass_over_highlight() {
        let parcel = RgbaImage::new(W, H);
        let frame = frame();
        let shape = MultiPolygon::new(vec![polygon![
            (x: 150.0, y: 0.0),
            (x: 200.0, y: 0.0),
            (x: 200.0, y: 100.0),
            (x: 150.0, y: 100.0),
            (x: 150.0, y: 0.0),
        ]]);

        let image = compositor().compose(&input(&parcel, None, Some(&shape), &frame, 0.0));

        // filled compass triangle sits on top of the translucent fill
        assert_eq!(image.get_pixel(W - 23, 40), &Rgba([255, 255, 255, 255]));
        assert!(image.get_pixel(W - 10, 80)[2] > 200);
    }

    #[test]
    fn test_scale_bar_only_with_distance() {
        let parcel = RgbaImage::new(W, H);
        let frame = frame();

        let without = compositor().compose(&input(&parcel, None, None, &frame, 0.0));
        assert_eq!(without.get_pixel(75, H - 18)[3], 0);

        let with = compositor().compose(&input(&parcel, None, None, &frame, 1000.0));
        assert!(with.get_pixel(75, H - 18)[3] > 127);
        assert!(with.get_pixel(47, H - 20)[3] > 0);
    }
}
