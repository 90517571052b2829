//! Label rendering from font outlines.
//!
//! Faces are located with `fontdb` (or read from a configured file), parsed
//! with `ttf-parser`, and each glyph outline is filled as a tiny-skia path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::{debug, warn};

/// Errors raised while loading a font file.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unreadable font face in {0}")]
    Parse(PathBuf),
}

/// Horizontal anchoring of a label relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// Size, anchoring and color of a label.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub align: TextAlign,
    pub color: Color,
}

/// Raw face data plus its index inside a collection.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    /// Validates `data` as a face and wraps it.
    pub fn from_data(data: Vec<u8>, index: u32) -> Option<Self> {
        ttf_parser::Face::parse(&data, index).ok()?;
        Some(Self {
            data: Arc::new(data),
            index,
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }

    /// Advance width of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let scale = size / f32::from(face.units_per_em());
        text.chars()
            .filter_map(|c| face.glyph_index(c))
            .map(|glyph| f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale)
            .sum()
    }

    /// Fills `text` with its baseline starting at (`x`, `baseline`).
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, baseline: f32, style: &TextStyle) {
        let Some(face) = self.face() else {
            return;
        };
        let scale = style.size / f32::from(face.units_per_em());
        let mut pen = match style.align {
            TextAlign::Left => x,
            TextAlign::Right => x - self.measure(text, style.size),
        };

        let mut builder = GlyphPathBuilder {
            path: PathBuilder::new(),
            origin_x: pen,
            baseline,
            scale,
        };
        for c in text.chars() {
            let Some(glyph) = face.glyph_index(c) else {
                continue;
            };
            builder.origin_x = pen;
            face.outline_glyph(glyph, &mut builder);
            pen += f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
        }

        let Some(path) = builder.path.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(style.color);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Maps font units to pixel space; y grows downward from the baseline.
struct GlyphPathBuilder {
    path: PathBuilder,
    origin_x: f32,
    baseline: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.path.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

/// Faces used by the annotations.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    /// Bold serif face for the compass letter
    pub heading: Option<FontFace>,
    /// Sans-serif face for the scale labels
    pub label: Option<FontFace>,
}

impl FontBook {
    /// A book with no faces; labels are skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Uses the face in `path` for every label.
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let face =
            FontFace::from_data(data, 0).ok_or_else(|| FontError::Parse(path.to_path_buf()))?;
        Ok(Self {
            heading: Some(face.clone()),
            label: Some(face),
        })
    }

    /// Searches installed system fonts.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "Loaded system font database");

        let heading = query_face(
            &db,
            &[fontdb::Family::Serif, fontdb::Family::SansSerif],
            fontdb::Weight::BOLD,
        );
        let label = query_face(&db, &[fontdb::Family::SansSerif], fontdb::Weight::NORMAL);
        Self { heading, label }
    }

    /// Configured file when given and readable, system fonts otherwise.
    pub fn load(font: Option<&Path>) -> Self {
        if let Some(path) = font {
            match Self::from_file(path) {
                Ok(book) => return book,
                Err(e) => warn!(error = %e, "Configured font unusable, searching system fonts"),
            }
        }

        let book = Self::system();
        if book.label.is_none() || book.heading.is_none() {
            warn!("No usable system font found, image labels will be skipped");
        }
        book
    }

    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.label.is_none()
    }
}

fn query_face(
    db: &fontdb::Database,
    families: &[fontdb::Family<'_>],
    weight: fontdb::Weight,
) -> Option<FontFace> {
    let id = db.query(&fontdb::Query {
        families,
        weight,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    })?;
    db.with_face_data(id, |data, index| FontFace::from_data(data.to_vec(), index))
        .flatten()
}
