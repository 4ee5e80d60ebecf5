//! # PDF Writer
//!
//! Replays a [`PageLayout`] onto a single printpdf page. All positioning
//! decisions were made by the layout; this module only converts units
//! (points, top-down) into printpdf's millimetres measured from the bottom
//! edge.

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};
use std::io::BufWriter;

use crate::error::{RenderError, RenderResult};
use crate::layout::{DrawOp, PageLayout, Rgb8, PAGE_HEIGHT, PAGE_WIDTH};
use crate::logo::Logo;
use crate::metrics::FontFace;

/// Helvetica ascender, as a fraction of the font size.
const ASCENT: f32 = 0.718;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// A top-down point flipped into PDF space.
fn point(x: f32, y: f32) -> Point {
    Point::new(mm(x), mm(PAGE_HEIGHT - y))
}

fn color(c: Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        c.0 as f32 / 255.0,
        c.1 as f32 / 255.0,
        c.2 as f32 / 255.0,
        None,
    ))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Oblique => &self.oblique,
        }
    }
}

/// Encodes the layout as a one-page PDF.
pub fn write_pdf(layout: &PageLayout, title: &str, logo: Option<&Logo>) -> RenderResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Invoice");

    let font = |builtin: BuiltinFont| {
        doc.add_builtin_font(builtin)
            .map_err(|e| RenderError::Font(format!("{builtin:?}: {e:?}")))
    };
    let fonts = Fonts {
        regular: font(BuiltinFont::Helvetica)?,
        bold: font(BuiltinFont::HelveticaBold)?,
        oblique: font(BuiltinFont::HelveticaOblique)?,
    };

    let layer = doc.get_page(page).get_layer(layer);
    for op in &layout.ops {
        draw(&layer, &fonts, op, logo);
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Pdf(format!("{e:?}")))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp, logo: Option<&Logo>) {
    match op {
        DrawOp::Text { text, x, y, size, face, color: c } => {
            layer.set_fill_color(color(*c));
            let baseline = y + size * ASCENT;
            layer.use_text(text.as_str(), *size, mm(*x), mm(PAGE_HEIGHT - baseline), fonts.get(*face));
        }
        DrawOp::Line { x1, y1, x2, y2, color: c, thickness } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(*thickness);
            layer.add_line(Line {
                points: vec![(point(*x1, *y1), false), (point(*x2, *y2), false)],
                is_closed: false,
            });
        }
        DrawOp::Rect { x, y, width, height, color: c, thickness } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(*thickness);
            layer.add_line(Line {
                points: vec![
                    (point(*x, *y), false),
                    (point(x + width, *y), false),
                    (point(x + width, y + height), false),
                    (point(*x, y + height), false),
                ],
                is_closed: true,
            });
        }
        DrawOp::Image { x, y, width, height } => {
            let Some(logo) = logo else { return };
            let dpi = logo.width_px as f32 * 72.0 / width;
            Image::from_dynamic_image(&logo.image).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(mm(*x)),
                    translate_y: Some(mm(PAGE_HEIGHT - y - height)),
                    dpi: Some(dpi),
                    ..ImageTransform::default()
                },
            );
        }
    }
}
