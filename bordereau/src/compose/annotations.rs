//! Overlays drawn on top of the rasters.

use geo::{LineString, MultiPolygon};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::{debug, warn};

use super::text::{FontBook, TextAlign, TextStyle};
use crate::geometry::{BoundingBox, GroundDistance};

const HIGHLIGHT_OUTLINE: (u8, u8, u8, u8) = (20, 255, 255, 128);
const HIGHLIGHT_FILL: (u8, u8, u8, u8) = (20, 20, 255, 128);

const COMPASS_LETTER_SIZE: f32 = 14.0;

/// Scale bar geometry, relative to the bottom-left corner.
pub const SCALE_X: f32 = 50.0;
pub const SCALE_MARGIN_BOTTOM: f32 = 10.0;
pub const SCALE_BAR_WIDTH: f32 = 100.0;
pub const SCALE_DIVISIONS: u32 = 2;
const SCALE_LABEL_SIZE: f32 = 11.0;
const SCALE_BACKING: (u8, u8, u8, u8) = (255, 255, 255, 127);
const SCALE_SHADES: [(u8, u8, u8, u8); 2] = [(83, 83, 83, 115), (25, 25, 25, 175)];

fn paint(rgba: (u8, u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(rgba.0, rgba.1, rgba.2, rgba.3));
    paint.anti_alias = true;
    paint
}

fn polygon_path(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.0, first.1);
    for (x, y) in rest {
        builder.line_to(*x, *y);
    }
    builder.close();
    builder.finish()
}

/// Outlines then fills `shape`, mapped through `frame` into the canvas.
///
/// Rings are filled even-odd so holes stay clear.
pub fn draw_highlight(pixmap: &mut Pixmap, shape: &MultiPolygon<f64>, frame: &BoundingBox) {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut builder = PathBuilder::new();
    let mut add_ring = |ring: &LineString<f64>| {
        let mut coords = ring.coords();
        let Some(first) = coords.next() else {
            return;
        };
        let (x, y) = frame.world_to_pixel(first.x, first.y, width, height);
        builder.move_to(x, y);
        for c in coords {
            let (x, y) = frame.world_to_pixel(c.x, c.y, width, height);
            builder.line_to(x, y);
        }
        builder.close();
    };
    for polygon in shape {
        add_ring(polygon.exterior());
        for interior in polygon.interiors() {
            add_ring(interior);
        }
    }

    let Some(path) = builder.finish() else {
        warn!("Highlight geometry is empty, nothing drawn");
        return;
    };

    let stroke = Stroke {
        width: 1.0,
        ..Default::default()
    };
    pixmap.stroke_path(
        &path,
        &paint(HIGHLIGHT_OUTLINE),
        &stroke,
        Transform::identity(),
        None,
    );
    pixmap.fill_path(
        &path,
        &paint(HIGHLIGHT_FILL),
        FillRule::EvenOdd,
        Transform::identity(),
        None,
    );
}

/// North arrow in the top-right corner; placement depends on width only.
pub fn draw_compass(pixmap: &mut Pixmap, fonts: &FontBook) {
    let w = pixmap.width() as f32;
    let white = paint((255, 255, 255, 255));

    match &fonts.heading {
        Some(face) => face.draw(
            pixmap,
            "N",
            w - 32.0,
            22.0,
            &TextStyle {
                size: COMPASS_LETTER_SIZE,
                align: TextAlign::Left,
                color: Color::WHITE,
            },
        ),
        None => debug!("No heading font, compass letter skipped"),
    }

    let left = polygon_path(&[(w - 32.0, 44.0), (w - 25.0, 42.0), (w - 25.0, 27.0)]);
    let right = polygon_path(&[(w - 19.0, 44.0), (w - 25.0, 42.0), (w - 25.0, 27.0)]);
    let stroke = Stroke {
        width: 1.0,
        ..Default::default()
    };

    if let Some(right) = &right {
        pixmap.fill_path(right, &white, FillRule::Winding, Transform::identity(), None);
    }
    for triangle in [&left, &right].into_iter().flatten() {
        pixmap.stroke_path(triangle, &white, &stroke, Transform::identity(), None);
    }
}

/// Value shown at the right end of the scale bar.
///
/// `pixel_size = width / distance`, then `(bar width × pixel_size) / divisions`.
pub fn scale_max_value(width: u32, distance: GroundDistance) -> Option<f64> {
    if !distance.is_known() {
        return None;
    }
    let pixel_size = f64::from(width) / distance.value();
    Some(f64::from(SCALE_BAR_WIDTH) * pixel_size / f64::from(SCALE_DIVISIONS))
}

/// Two decimals, trailing zeros dropped, then the unit.
pub fn format_distance_label(value: f64, unit: &str) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, unit)
}

/// Scale bar in the bottom-left corner. No-op when `distance` is unknown.
pub fn draw_scale_bar(pixmap: &mut Pixmap, distance: GroundDistance, unit: &str, fonts: &FontBook) {
    let Some(max_value) = scale_max_value(pixmap.width(), distance) else {
        warn!("No ground distance, scale bar skipped");
        return;
    };
    let scale_y = pixmap.height() as f32 - SCALE_MARGIN_BOTTOM;

    if let Some(backing) = Rect::from_xywh(
        SCALE_X - 5.0,
        scale_y - 23.0,
        SCALE_BAR_WIDTH + 10.0,
        23.0,
    ) {
        pixmap.fill_rect(backing, &paint(SCALE_BACKING), Transform::identity(), None);
    }

    let division_width = SCALE_BAR_WIDTH / SCALE_DIVISIONS as f32;
    for i in 0..SCALE_DIVISIONS {
        let shade = SCALE_SHADES[(i % 2) as usize];
        let x = SCALE_X + i as f32 * division_width;
        if let Some(division) = Rect::from_xywh(x, scale_y - 10.0, division_width, 5.0) {
            pixmap.fill_rect(division, &paint(shade), Transform::identity(), None);
        }
    }

    let label = format_distance_label(max_value, unit);
    debug!(label = %label, meters = distance.value(), "Drawing scale bar");

    let Some(face) = &fonts.label else {
        warn!("No label font, scale bar labels skipped");
        return;
    };
    let style = TextStyle {
        size: SCALE_LABEL_SIZE,
        align: TextAlign::Left,
        color: Color::BLACK,
    };
    face.draw(pixmap, "0", SCALE_X, scale_y - 12.0, &style);
    face.draw(
        pixmap,
        &label,
        SCALE_X + SCALE_BAR_WIDTH,
        scale_y - 12.0,
        &TextStyle {
            align: TextAlign::Right,
            ..style
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_value_for_595_over_1000() {
        let value = scale_max_value(595, GroundDistance::meters(1000.0)).unwrap();
        assert!((value - 29.75).abs() < 1e-9);
        assert_eq!(format_distance_label(value, "mètres"), "29.75 mètres");
    }

    #[test]
    fn test_scale_value_unknown_distance() {
        assert_eq!(scale_max_value(595, GroundDistance::UNKNOWN), None);
        assert_eq!(scale_max_value(595, GroundDistance::meters(-3.0)), None);
    }

    #[test]
    fn test_label_trims_zeros() {
        assert_eq!(format_distance_label(30.0, "m"), "30 m");
        assert_eq!(format_distance_label(0.5, "m"), "0.5 m");
        assert_eq!(format_distance_label(12.345, "m"), "12.35 m");
        assert_eq!(format_distance_label(100.0, "m"), "100 m");
    }

    #[test]
    fn test_scale_bar_noop_without_distance() {
        let mut pixmap = Pixmap::new(200, 100).unwrap();
        draw_scale_bar(&mut pixmap, GroundDistance::UNKNOWN, "m", &FontBook::empty());
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_scale_bar_divisions_alternate() {
        let mut pixmap = Pixmap::new(200, 100).unwrap();
        draw_scale_bar(&mut pixmap, GroundDistance::meters(500.0), "m", &FontBook::empty());

        let at = |x: u32, y: u32| pixmap.pixel(x, y).unwrap();
        // backing only, left margin
        assert!((126..=128).contains(&at(47, 80).alpha()));
        // first and second division, scale_y = 90
        let first = at(75, 82);
        let second = at(125, 82);
        assert!(first.alpha() > 127);
        assert!(second.alpha() > first.alpha());
        // outside the backing
        assert_eq!(at(47, 95).alpha(), 0);
        assert_eq!(at(160, 80).alpha(), 0);
    }

    #[test]
    fn test_compass_triangles() {
        let mut pixmap = Pixmap::new(100, 60).unwrap();
        draw_compass(&mut pixmap, &FontBook::empty());

        // inside the filled right triangle
        let filled = pixmap.pixel(77, 40).unwrap();
        assert_eq!(filled.alpha(), 255);
        assert_eq!(filled.red(), 255);
        // inside the outlined left triangle
        assert_eq!(pixmap.pixel(72, 40).unwrap().alpha(), 0);
        // away from the compass
        assert_eq!(pixmap.pixel(10, 10).unwrap().alpha(), 0);
    }

    #[test]
    fn test_highlight_even_odd_keeps_hole() {
        use geo::Polygon;

        let mut pixmap = Pixmap::new(100, 100).unwrap();
        let frame = BoundingBox::new(0.0, 0.0, 100.0, 100.0, None);
        let shape = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![
                (10.0, 10.0),
                (90.0, 10.0),
                (90.0, 90.0),
                (10.0, 90.0),
                (10.0, 10.0),
            ]),
            vec![LineString::from(vec![
                (40.0, 40.0),
                (60.0, 40.0),
                (60.0, 60.0),
                (40.0, 60.0),
                (40.0, 40.0),
            ])],
        )]);

        draw_highlight(&mut pixmap, &shape, &frame);

        let ring = pixmap.pixel(20, 20).unwrap().demultiply();
        assert!(ring.alpha() > 100);
        assert!(ring.blue() > 200 && ring.red() < 60);
        assert_eq!(pixmap.pixel(50, 50).unwrap().alpha(), 0);
        assert_eq!(pixmap.pixel(5, 5).unwrap().alpha(), 0);
    }
}
