// Drawing of the pie charts with plotters.

use std::fmt::Display;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use survey_report::{ChartImage, ChartRenderer, ChartSpec, Slice};

/// Draws the charts as 800x600 bitmaps (an 8x6 inches figure at 100 dpi).
#[derive(Debug, Clone)]
pub struct PieChartRenderer {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

impl Default for PieChartRenderer {
    fn default() -> Self {
        PieChartRenderer {
            width: 800,
            height: 600,
            font_family: "sans-serif".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawError(pub String);

impl Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn draw_error<E: Display>(e: E) -> DrawError {
    DrawError(e.to_string())
}

const TITLE_SIZE: f64 = 20.0;
const TITLE_LINE_HEIGHT: i32 = 26;
const LABEL_SIZE: f64 = 16.0;
const SHADOW_OFFSET: f64 = 5.0;
const MARGIN: i32 = 10;

impl ChartRenderer for PieChartRenderer {
    type Error = DrawError;

    fn render(&self, spec: &ChartSpec) -> Result<ChartImage, DrawError> {
        let mut buf = vec![0u8; (self.width * self.height * 3) as usize];
        self.draw(spec, &mut buf)?;
        let png = encode_png(&buf, self.width, self.height)?;
        debug!(
            "render: chart {} encoded in {} bytes",
            spec.index,
            png.len()
        );
        Ok(ChartImage {
            png,
            width_px: self.width,
            height_px: self.height,
        })
    }
}

impl PieChartRenderer {
    fn draw(&self, spec: &ChartSpec, buf: &mut [u8]) -> Result<(), DrawError> {
        let root = BitMapBackend::with_buffer(buf, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let title_style = TextStyle::from(FontDesc::new(
            FontFamily::Name(&self.font_family),
            TITLE_SIZE,
            FontStyle::Bold,
        ))
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
        let cx = self.width as i32 / 2;
        for (i, line) in spec.title_lines.iter().enumerate() {
            let y = MARGIN + i as i32 * TITLE_LINE_HEIGHT;
            root.draw(&Text::new(line.clone(), (cx, y), title_style.clone()))
                .map_err(draw_error)?;
        }

        // An empty line after the title, then the pie.
        let top = MARGIN + (spec.title_lines.len() as i32 + 1) * TITLE_LINE_HEIGHT;
        let (center, radius) = pie_geometry(self.width, self.height, top);

        for slice in spec.slices.iter() {
            let shadow_center = (center.0 + SHADOW_OFFSET, center.1 + SHADOW_OFFSET);
            let pts = wedge_polygon(shadow_center, radius, slice);
            root.draw(&Polygon::new(pts, BLACK.mix(0.25).filled()))
                .map_err(draw_error)?;
        }

        let label_font = FontDesc::new(
            FontFamily::Name(&self.font_family),
            LABEL_SIZE,
            FontStyle::Normal,
        );
        for slice in spec.slices.iter() {
            let color = RGBColor(slice.color.0, slice.color.1, slice.color.2);
            root.draw(&Polygon::new(
                wedge_polygon(center, radius, slice),
                color.filled(),
            ))
            .map_err(draw_error)?;

            if slice.end_angle - slice.start_angle <= 0.0 {
                continue;
            }
            let mid = slice.mid_angle();
            let slice_center = offset_center(center, radius, slice);

            // The name of the category, outside of the pie.
            let outside = polar(slice_center, radius * 1.1, mid);
            let hpos = if mid.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            let style = TextStyle::from(label_font.clone())
                .color(&BLACK)
                .pos(Pos::new(hpos, VPos::Center));
            root.draw(&Text::new(slice.category.label(), outside, style))
                .map_err(draw_error)?;

            // The count and percentage, inside the slice.
            let inside = polar(slice_center, radius * 0.6, mid);
            let style = TextStyle::from(label_font.clone())
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(slice.value_label.clone(), inside, style))
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

/// Center and radius of the pie, below the title, with room left for the
/// category labels on the sides.
fn pie_geometry(width: u32, height: u32, top: i32) -> ((f64, f64), f64) {
    let w = width as f64;
    let h = height as f64;
    let available_h = (h - top as f64 - 2.0 * MARGIN as f64) / 1.25;
    let available_w = w / 2.0 - 180.0;
    let radius = (available_h / 2.0).min(available_w).max(20.0);
    let center = (w / 2.0, top as f64 + (h - top as f64) / 2.0);
    (center, radius)
}

fn offset_center(center: (f64, f64), radius: f64, slice: &Slice) -> (f64, f64) {
    let mid = slice.mid_angle().to_radians();
    (
        center.0 + slice.explode * radius * mid.cos(),
        center.1 - slice.explode * radius * mid.sin(),
    )
}

/// A point at the given angle (degrees, counter-clockwise) and distance from
/// the center. The y axis of the bitmap points down.
fn polar(center: (f64, f64), radius: f64, angle_deg: f64) -> (i32, i32) {
    let a = angle_deg.to_radians();
    (
        (center.0 + radius * a.cos()).round() as i32,
        (center.1 - radius * a.sin()).round() as i32,
    )
}

/// The outline of a slice: its center (moved out if the slice is exploded),
/// then the arc, one point every two degrees at most.
fn wedge_polygon(center: (f64, f64), radius: f64, slice: &Slice) -> Vec<(i32, i32)> {
    let c = offset_center(center, radius, slice);
    let sweep = slice.end_angle - slice.start_angle;
    let steps = (sweep.abs() / 2.0).ceil().max(1.0) as usize;
    let mut pts = vec![(c.0.round() as i32, c.1.round() as i32)];
    for i in 0..=steps {
        let a = slice.start_angle + sweep * i as f64 / steps as f64;
        pts.push(polar(c, radius, a));
    }
    pts
}

pub(crate) fn encode_png(buf: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DrawError> {
    let mut png: Vec<u8> = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(buf, width, height, ColorType::Rgb8)
        .map_err(draw_error)?;
    Ok(png)
}
