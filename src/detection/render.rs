use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::point::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MeasureError, Result};
use crate::models::{Candidate, Category};

static LABEL_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

pub const CIRCLE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const CENTER_MARKER_RADIUS: i32 = 3;
/// Left end of the label baseline.
pub const LABEL_ANCHOR: (i32, i32) = (10, 30);
const LABEL_SCALE: f32 = 24.0;

/// Chooses the outline color of each contour.
pub trait ContourPalette {
    fn color_for(&mut self, index: usize) -> Rgb<u8>;
}

/// Hue walks the golden angle with the contour index; same input, same colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexPalette;

impl ContourPalette for IndexPalette {
    fn color_for(&mut self, index: usize) -> Rgb<u8> {
        let hue = (index as f64 * 0.618_033_988_749_895).fract();
        hsv_to_rgb(hue, 0.85, 1.0)
    }
}

/// Independent random color per contour from an owned RNG.
#[derive(Debug, Clone)]
pub struct RandomPalette {
    rng: StdRng,
}

impl RandomPalette {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ContourPalette for RandomPalette {
    fn color_for(&mut self, _index: usize) -> Rgb<u8> {
        Rgb([
            self.rng.gen_range(0..=255),
            self.rng.gen_range(0..=255),
            self.rng.gen_range(0..=255),
        ])
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb<u8> {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match sector as i32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

/// `[<category>] <diameter>mm`
pub fn label_text(category: Category, diameter_mm: u32) -> String {
    format!("[{category}] {diameter_mm}mm")
}

/// Draws the annotated overlay for one measurement.
pub struct Renderer<P> {
    palette: P,
    font: FontRef<'static>,
}

impl<P: ContourPalette> Renderer<P> {
    pub fn new(palette: P) -> Result<Self> {
        let font = FontRef::try_from_slice(LABEL_FONT)
            .map_err(|e| MeasureError::Internal(format!("label font: {e}")))?;
        Ok(Self { palette, font })
    }

    /// Draw every candidate outline, the dominant circle with its center, and
    /// the label onto a black canvas of the given size.
    pub fn render(
        &mut self,
        (width, height): (u32, u32),
        candidates: &[Candidate],
        dominant: &Candidate,
        label: &str,
    ) -> RgbImage {
        let mut canvas = RgbImage::new(width, height);

        for (index, candidate) in candidates.iter().enumerate() {
            let color = self.palette.color_for(index);
            draw_closed_polygon(&mut canvas, &candidate.polygon, color);
        }

        let center = dominant.circle.center();
        let center = (center.center_x, center.center_y);
        let radius = dominant.radius_pixels() as i32;
        draw_hollow_circle_mut(&mut canvas, center, radius, CIRCLE_COLOR);
        if radius > 1 {
            draw_hollow_circle_mut(&mut canvas, center, radius - 1, CIRCLE_COLOR);
        }
        draw_filled_circle_mut(&mut canvas, center, CENTER_MARKER_RADIUS, CENTER_COLOR);

        self.draw_label(&mut canvas, label);
        canvas
    }

    fn draw_label(&self, canvas: &mut RgbImage, label: &str) {
        let scale = PxScale::from(LABEL_SCALE);
        let ascent = self.font.as_scaled(scale).ascent().round() as i32;
        let (x, baseline) = LABEL_ANCHOR;
        let top = baseline - ascent;
        // Second pass one pixel over for a bolder stroke.
        draw_text_mut(canvas, LABEL_COLOR, x, top, scale, &self.font, label);
        draw_text_mut(canvas, LABEL_COLOR, x + 1, top, scale, &self.font, label);
    }
}

fn draw_closed_polygon(canvas: &mut RgbImage, polygon: &[Point<i32>], color: Rgb<u8>) {
    match polygon {
        [] => {}
        [p] => {
            let (x, y) = (p.x as u32, p.y as u32);
            if p.x >= 0 && p.y >= 0 && x < canvas.width() && y < canvas.height() {
                canvas.put_pixel(x, y, color);
            }
        }
        _ => {
            for (i, start) in polygon.iter().enumerate() {
                let end = &polygon[(i + 1) % polygon.len()];
                draw_line_segment_mut(
                    canvas,
                    (start.x as f32, start.y as f32),
                    (end.x as f32, end.y as f32),
                    color,
                );
            }
        }
    }
}
