//! # Page Layout
//!
//! Computes every mark on the page, in points, before any PDF exists.
//! Coordinates are top-down (y grows towards the bottom edge); the PDF
//! writer flips them.
//!
//! ## Page Map (A4 portrait, 595.28 x 841.89 pt)
//! ```text
//! ┌──────────────────────────────────────────────────────────┐ ← margin 48
//! │ INVOICE                                      [logo 72pt] │
//! │                                            Business name │
//! │ Billed to                                        Address │
//! │ Client name                                         City │
//! │ Address / City                                           │
//! │                                                          │
//! │ Invoice #  / Invoice date / Reference / Due date         │
//! │ ┌──────────────────────────────────────────────────────┐ │
//! │ │ Services                 Qty      Rate    Line total │ │
//! │ ├──────────────────────────────────────────────────────┤ │
//! │ │ row 1..N  (N = min(cap, rows that fit))              │ │
//! │ └──────────────────────────────────────────────────────┘ │
//! │                                  Subtotal        xxx.xx  │
//! │                                  Tax (p%)        xxx.xx  │
//! │                                  Total due       xxx.xx  │
//! │            Please pay within 15 days ...                 │
//! │                                                          │
//! │ website               phone                      email   │
//! └──────────────────────────────────────────────────────────┘ ← margin 64
//! ```
//!
//! The table height comes from the visible row count, and the visible row
//! count comes from the space left after reserving the totals, note and
//! footer. Nothing is positioned below the bottom margin, so the document is
//! always exactly one page.

use chrono::{DateTime, Duration, NaiveDate};
use folio_core::summary::summarize;
use folio_core::{Footer, Invoice, Money, Summary, DEFAULT_CURRENCY, DEFAULT_DUE_DAYS};
use rust_decimal::Decimal;

use crate::error::{RenderError, RenderResult};
use crate::metrics::{clip_to_width, sanitize, text_width, FontFace};

// =============================================================================
// Page Geometry
// =============================================================================

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

pub const MARGIN_TOP: f32 = 48.0;
pub const MARGIN_LEFT: f32 = 48.0;
pub const MARGIN_RIGHT: f32 = 48.0;
pub const MARGIN_BOTTOM: f32 = 64.0;

pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

/// Rows shown in the services table unless configured otherwise.
pub const DEFAULT_MAX_ROWS: usize = 10;

const ROW_HEIGHT: f32 = 22.0;
const HEADER_HEIGHT: f32 = 24.0;
const LOGO_BOX: f32 = 72.0;
const TOTALS_WIDTH: f32 = 220.0;
const TOTALS_LABEL_WIDTH: f32 = 120.0;
const TOTALS_GAP: f32 = 24.0;
const NOTE_HEIGHT: f32 = 12.0;
const FOOTER_GAP: f32 = 8.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - MARGIN_BOTTOM - 20.0;
const EPSILON: f32 = 0.01;

pub const DEFAULT_PAYMENT_NOTE: &str = "Please pay within 15 days of receiving this invoice.";

// =============================================================================
// Draw Model
// =============================================================================

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const PRIMARY: Rgb8 = Rgb8(0x4F, 0x6E, 0xF7);
pub const TEXT: Rgb8 = Rgb8(0x11, 0x18, 0x27);
pub const SECONDARY: Rgb8 = Rgb8(0x6B, 0x72, 0x80);
pub const BORDER: Rgb8 = Rgb8(0xE5, 0xE7, 0xEB);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One mark on the page. `y` is the top edge.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        face: FontFace,
        color: Rgb8,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb8,
        thickness: f32,
    },
    /// Stroked outline.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb8,
        thickness: f32,
    },
    /// The logo slot.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl DrawOp {
    /// `(left, top, right, bottom)` in points.
    fn bounds(&self) -> (f32, f32, f32, f32) {
        match self {
            DrawOp::Text { text, x, y, size, face, .. } => {
                (*x, *y, x + text_width(text, *face, *size), y + size)
            }
            DrawOp::Line { x1, y1, x2, y2, .. } => (x1.min(*x2), y1.min(*y2), x1.max(*x2), y1.max(*y2)),
            DrawOp::Rect { x, y, width, height, .. } | DrawOp::Image { x, y, width, height } => {
                (*x, *y, x + width, y + height)
            }
        }
    }
}

/// The finished page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
    /// Service lines drawn in the table.
    pub visible_rows: usize,
    /// Service lines left out of the table (still counted in the totals).
    pub truncated_rows: usize,
    /// The totals printed on the page.
    pub summary: Summary,
}

impl PageLayout {
    /// Every text run, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Fails if any mark leaves the printable area.
    pub fn check_bounds(&self) -> RenderResult<()> {
        for op in &self.ops {
            let (left, top, right, bottom) = op.bounds();
            let inside = left >= MARGIN_LEFT - EPSILON
                && right <= PAGE_WIDTH - MARGIN_RIGHT + EPSILON
                && top >= MARGIN_TOP - EPSILON
                && bottom <= PAGE_HEIGHT - MARGIN_BOTTOM + EPSILON;
            if !inside {
                return Err(RenderError::Overflow(format!(
                    "mark at ({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) leaves the page body"
                )));
            }
        }
        Ok(())
    }
}

/// Inputs that do not come from the invoice itself.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Upper bound on table rows.
    pub max_rows: usize,
    /// Business identity used where the invoice footer is blank.
    pub business: Footer,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            max_rows: DEFAULT_MAX_ROWS,
            business: Footer::default(),
        }
    }
}

// =============================================================================
// Canvas
// =============================================================================

#[derive(Default)]
struct Canvas {
    ops: Vec<DrawOp>,
}

impl Canvas {
    /// Single-line text clipped to `width` and aligned inside it.
    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        raw: &str,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
        face: FontFace,
        size: f32,
        color: Rgb8,
    ) {
        let clipped = clip_to_width(&sanitize(raw), face, size, width);
        if clipped.is_empty() {
            return;
        }

        let w = text_width(&clipped, face, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x + (width - w) / 2.0,
            Align::Right => x + width - w,
        };

        self.ops.push(DrawOp::Text {
            text: clipped,
            x: left,
            y,
            size,
            face,
            color,
        });
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32) {
        self.ops.push(DrawOp::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            color: BORDER,
            thickness: 1.0,
        });
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Lays out `invoice` on one page.
///
/// `logo_px` is the pixel size of the resolved logo, if any; the image is
/// scaled into a 72pt box keeping its aspect ratio.
pub fn layout_invoice(
    invoice: &Invoice,
    options: &LayoutOptions,
    logo_px: Option<(u32, u32)>,
) -> RenderResult<PageLayout> {
    let mut canvas = Canvas::default();
    let footer = invoice.footer.clone().or_defaults(&options.business);
    let currency = match sanitize(&invoice.currency) {
        c if c.is_empty() => DEFAULT_CURRENCY.to_string(),
        c => c,
    };
    let money = |value: Money| value.format_with(&currency);

    let half = CONTENT_WIDTH / 2.0;

    // Title
    let mut cursor_y = MARGIN_TOP;
    canvas.text("INVOICE", MARGIN_LEFT, cursor_y, half, Align::Left, FontFace::Bold, 26.0, TEXT);

    // Business identity, top right
    let right_x = PAGE_WIDTH - MARGIN_RIGHT - half;
    let mut right_y = cursor_y;

    if let Some((w_px, h_px)) = logo_px.filter(|(w, h)| *w > 0 && *h > 0) {
        let scale = (LOGO_BOX / w_px as f32).min(LOGO_BOX / h_px as f32);
        let width = w_px as f32 * scale;
        let height = h_px as f32 * scale;
        canvas.ops.push(DrawOp::Image {
            x: right_x + half - width,
            y: right_y,
            width,
            height,
        });
        right_y += LOGO_BOX + 8.0;
    }

    if let Some(name) = &footer.business_name {
        canvas.text(name, right_x, right_y, half, Align::Right, FontFace::Bold, 12.0, PRIMARY);
        right_y += 18.0;
    }
    for line in [&footer.address, &footer.city].into_iter().flatten() {
        canvas.text(line, right_x, right_y, half, Align::Right, FontFace::Regular, 9.0, SECONDARY);
        right_y += 14.0;
    }

    // Billed to
    cursor_y += 64.0;
    canvas.text("Billed to", MARGIN_LEFT, cursor_y, half, Align::Left, FontFace::Regular, 9.0, SECONDARY);
    cursor_y += 14.0;
    canvas.text(&invoice.client.name, MARGIN_LEFT, cursor_y, half, Align::Left, FontFace::Bold, 11.0, TEXT);
    cursor_y += 16.0;
    for line in [&invoice.client.address, &invoice.client.city].into_iter().flatten() {
        canvas.text(line, MARGIN_LEFT, cursor_y, half, Align::Left, FontFace::Regular, 9.0, SECONDARY);
        cursor_y += 14.0;
    }

    // Metadata column
    cursor_y += 12.0;
    let number = invoice.invoice_number().to_string();
    let reference = non_blank(&invoice.reference).unwrap_or_else(|| number.clone());
    let (invoice_date, due_date) = display_dates(invoice);

    for (label, value) in [
        ("Invoice #", number),
        ("Invoice date", invoice_date),
        ("Reference", reference),
        ("Due date", due_date),
    ] {
        canvas.text(label, MARGIN_LEFT, cursor_y, half, Align::Left, FontFace::Regular, 9.0, SECONDARY);
        cursor_y += 12.0;
        let value = if value.is_empty() { "-".to_string() } else { value };
        canvas.text(&value, MARGIN_LEFT, cursor_y, half, Align::Left, FontFace::Bold, 10.0, TEXT);
        cursor_y += 20.0;
    }

    // Totals come from every line, not only the visible ones.
    let summary = summarize(
        &invoice.lines,
        &invoice.additional_charges,
        invoice.summary.tax_percent,
        invoice.summary.discount,
    );

    let mut totals: Vec<(String, String)> = vec![
        ("Subtotal".to_string(), money(summary.subtotal)),
        (
            format!("Tax ({})", percent_label(summary.tax_percent)),
            money(summary.tax_amount),
        ),
    ];
    if !summary.discount.is_zero() {
        totals.push(("Discount".to_string(), format!("- {}", money(summary.discount))));
    }
    let total_offset = 18.0 * (totals.len() - 1) as f32 + 22.0;
    let note_offset = total_offset + 32.0;

    // Table height is fixed here, before anything below it is placed.
    let table_top = cursor_y + 16.0;
    let reserve = TOTALS_GAP + note_offset + NOTE_HEIGHT + FOOTER_GAP;
    let body_space = FOOTER_Y - reserve - table_top - HEADER_HEIGHT - 16.0;
    let fit_rows = (body_space / ROW_HEIGHT).floor().max(0.0) as usize;
    let visible_rows = invoice.lines.len().min(options.max_rows).min(fit_rows);
    let truncated_rows = invoice.lines.len() - visible_rows;

    let body_height = visible_rows.max(1) as f32 * ROW_HEIGHT + 8.0;
    let table_height = HEADER_HEIGHT + body_height + 8.0;

    let services_w = CONTENT_WIDTH * 0.5;
    let qty_w = CONTENT_WIDTH * 0.1;
    let rate_w = CONTENT_WIDTH * 0.2;
    let total_w = CONTENT_WIDTH * 0.2;
    let qty_x = MARGIN_LEFT + services_w;
    let rate_x = qty_x + qty_w;
    let line_total_x = rate_x + rate_w;

    canvas.ops.push(DrawOp::Rect {
        x: MARGIN_LEFT,
        y: table_top,
        width: CONTENT_WIDTH,
        height: table_height,
        color: BORDER,
        thickness: 1.0,
    });

    let header_y = table_top + 10.0;
    let head = |canvas: &mut Canvas, text: &str, x: f32, w: f32, align: Align| {
        canvas.text(text, x, header_y, w, align, FontFace::Bold, 9.0, SECONDARY);
    };
    head(&mut canvas, "Services", MARGIN_LEFT + 12.0, services_w - 24.0, Align::Left);
    head(&mut canvas, "Qty", qty_x, qty_w, Align::Center);
    head(&mut canvas, "Rate", rate_x, rate_w - 8.0, Align::Right);
    head(&mut canvas, "Line total", line_total_x, total_w - 8.0, Align::Right);

    let rows_top = header_y + HEADER_HEIGHT - 6.0;
    canvas.rule(MARGIN_LEFT, MARGIN_LEFT + CONTENT_WIDTH, rows_top);

    for (index, line) in invoice.lines.iter().take(visible_rows).enumerate() {
        let y = rows_top + 4.0 + index as f32 * ROW_HEIGHT;
        let quantity = line.quantity.normalize().to_string();

        canvas.text(&line.name, MARGIN_LEFT + 12.0, y, services_w - 24.0, Align::Left, FontFace::Regular, 9.0, TEXT);
        canvas.text(&quantity, qty_x, y, qty_w, Align::Center, FontFace::Regular, 9.0, SECONDARY);
        canvas.text(&money(line.rate), rate_x, y, rate_w - 8.0, Align::Right, FontFace::Regular, 9.0, TEXT);
        canvas.text(&money(line.amount), line_total_x, y, total_w - 8.0, Align::Right, FontFace::Regular, 9.0, TEXT);
        canvas.rule(MARGIN_LEFT, MARGIN_LEFT + CONTENT_WIDTH, y + ROW_HEIGHT);
    }

    // Totals
    let totals_x = MARGIN_LEFT + CONTENT_WIDTH - TOTALS_WIDTH;
    let totals_y = table_top + table_height + TOTALS_GAP;
    let value_w = TOTALS_WIDTH - TOTALS_LABEL_WIDTH;

    for (index, (label, value)) in totals.iter().enumerate() {
        let y = totals_y + 18.0 * index as f32;
        canvas.text(label, totals_x, y, TOTALS_LABEL_WIDTH, Align::Left, FontFace::Regular, 10.0, TEXT);
        canvas.text(value, totals_x + TOTALS_LABEL_WIDTH, y, value_w, Align::Right, FontFace::Regular, 10.0, TEXT);
    }
    let total_y = totals_y + total_offset;
    canvas.text("Total due", totals_x, total_y, TOTALS_LABEL_WIDTH, Align::Left, FontFace::Bold, 10.0, PRIMARY);
    canvas.text(
        &money(summary.total),
        totals_x + TOTALS_LABEL_WIDTH,
        total_y,
        value_w,
        Align::Right,
        FontFace::Bold,
        10.0,
        PRIMARY,
    );

    // Payment note
    let note = footer
        .terms
        .as_deref()
        .and_then(|terms| terms.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or(DEFAULT_PAYMENT_NOTE);
    canvas.text(
        note,
        MARGIN_LEFT,
        totals_y + note_offset,
        CONTENT_WIDTH,
        Align::Center,
        FontFace::Oblique,
        9.0,
        SECONDARY,
    );

    // Footer contacts
    let third = CONTENT_WIDTH / 3.0;
    let contacts = [
        (&footer.website, MARGIN_LEFT, Align::Left),
        (&footer.phone, MARGIN_LEFT + third, Align::Center),
        (&footer.email, MARGIN_LEFT + 2.0 * third, Align::Right),
    ];
    for (value, x, align) in contacts {
        if let Some(value) = value {
            canvas.text(value, x, FOOTER_Y, third, align, FontFace::Regular, 8.0, SECONDARY);
        }
    }

    let layout = PageLayout {
        ops: canvas.ops,
        visible_rows,
        truncated_rows,
        summary,
    };
    layout.check_bounds()?;
    Ok(layout)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d %b %Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// `(invoice date, due date)` as printed.
///
/// Explicit values that parse as dates are normalised to `DD Mon YYYY`;
/// anything else is printed as written. A missing due date is the invoice
/// date (or the creation day) plus the standard term.
fn display_dates(invoice: &Invoice) -> (String, String) {
    let created = invoice.created_at.date_naive();
    let explicit_invoice = non_blank(&invoice.invoice_date);

    let invoice_date = explicit_invoice
        .clone()
        .unwrap_or_else(|| format_date(created));

    let due_date = match non_blank(&invoice.due_date) {
        Some(raw) => parse_date(&raw).map(format_date).unwrap_or(raw),
        None => {
            let base = explicit_invoice
                .as_deref()
                .and_then(parse_date)
                .unwrap_or(created);
            format_date(base + Duration::days(DEFAULT_DUE_DAYS))
        }
    };

    (invoice_date, due_date)
}

fn percent_label(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use folio_core::{AdditionalCharges, ClientInfo, PaymentStatus, ServiceLine};

    fn invoice_with_lines(count: usize) -> Invoice {
        let lines: Vec<ServiceLine> = (0..count)
            .map(|i| ServiceLine::new(format!("Service {}", i + 1), Decimal::from(2), Money::from_major(150)))
            .collect();
        let charges = AdditionalCharges::default();
        let summary = summarize(&lines, &charges, Decimal::from(10), Money::zero());

        Invoice {
            id: "inv_test".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            client: ClientInfo {
                name: "Acme Co".to_string(),
                address: Some("1 Market St".to_string()),
                city: Some("Springfield".to_string()),
                ..ClientInfo::default()
            },
            project_name: None,
            project_id: None,
            reference: None,
            invoice_date: None,
            due_date: None,
            lines,
            additional_charges: charges,
            summary,
            currency: "US$".to_string(),
            status: PaymentStatus::Unpaid,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            notes: None,
            footer: Footer {
                website: Some("studio.example".to_string()),
                phone: Some("+1 555 0100".to_string()),
                email: Some("hello@studio.example".to_string()),
                ..Footer::default()
            },
        }
    }

    fn business() -> LayoutOptions {
        LayoutOptions {
            max_rows: DEFAULT_MAX_ROWS,
            business: Footer {
                business_name: Some("Northwind Studio".to_string()),
                address: Some("12 Harbour Rd".to_string()),
                city: Some("Portsmouth".to_string()),
                ..Footer::default()
            },
        }
    }

    #[test]
    fn test_scenario_totals_are_printed() {
        let layout = layout_invoice(&invoice_with_lines(1), &business(), None).unwrap();
        let texts: Vec<&str> = layout.texts().collect();

        assert!(texts.contains(&"US$ 300.00"));
        assert!(texts.contains(&"Tax (10%)"));
        assert!(texts.contains(&"US$ 30.00"));
        assert!(texts.contains(&"US$ 330.00"));
        assert!(texts.contains(&"Northwind Studio"));
        assert!(texts.contains(&DEFAULT_PAYMENT_NOTE));
    }

    #[test]
    fn test_fifty_lines_stay_on_one_page() {
        let invoice = invoice_with_lines(50);
        let layout = layout_invoice(&invoice, &business(), Some((400, 200))).unwrap();

        assert_eq!(layout.visible_rows, DEFAULT_MAX_ROWS);
        assert_eq!(layout.truncated_rows, 40);
        // 50 x 300 = 15000, tax 1500, total 16500
        assert_eq!(layout.summary.total, Money::from_major(16500));
        let texts: Vec<&str> = layout.texts().collect();
        assert!(texts.contains(&"US$ 16500.00"));
        assert!(texts.contains(&"Service 10"));
        assert!(!texts.contains(&"Service 11"));
        layout.check_bounds().unwrap();
    }

    #[test]
    fn test_large_cap_is_limited_by_space() {
        let options = LayoutOptions {
            max_rows: 500,
            ..business()
        };
        let layout = layout_invoice(&invoice_with_lines(50), &options, None).unwrap();

        assert!(layout.visible_rows > DEFAULT_MAX_ROWS);
        assert!(layout.visible_rows < 50);
        assert_eq!(layout.visible_rows + layout.truncated_rows, 50);
    }

    #[test]
    fn test_long_names_are_clipped_not_wrapped() {
        let mut invoice = invoice_with_lines(1);
        invoice.lines[0].name = "Extremely long service name ".repeat(10);
        invoice.client.name = "Client ".repeat(40);

        let layout = layout_invoice(&invoice, &business(), None).unwrap();
        let clipped: Vec<&str> = layout.texts().filter(|t| t.ends_with("...")).collect();
        assert_eq!(clipped.len(), 2);
    }

    #[test]
    fn test_empty_table_still_lays_out() {
        let layout = layout_invoice(&invoice_with_lines(0), &business(), None).unwrap();
        assert_eq!(layout.visible_rows, 0);
        assert!(layout.texts().any(|t| t == "US$ 0.00"));
    }

    #[test]
    fn test_due_date_defaults_to_fifteen_days() {
        let invoice = invoice_with_lines(1);
        assert_eq!(
            display_dates(&invoice),
            ("01 Mar 2024".to_string(), "16 Mar 2024".to_string())
        );

        let mut dated = invoice.clone();
        dated.invoice_date = Some("2024-04-10".to_string());
        assert_eq!(display_dates(&dated).1, "25 Apr 2024");

        dated.due_date = Some("end of month".to_string());
        assert_eq!(display_dates(&dated).1, "end of month");
    }

    #[test]
    fn test_reference_and_number_fall_back() {
        let mut invoice = invoice_with_lines(1);
        invoice.project_id = Some("PRJ-7".to_string());
        let layout = layout_invoice(&invoice, &business(), None).unwrap();
        let texts: Vec<&str> = layout.texts().collect();

        assert_eq!(texts.iter().filter(|t| **t == "PRJ-7").count(), 2);
    }

    #[test]
    fn test_discount_and_terms_are_shown() {
        let mut invoice = invoice_with_lines(1);
        invoice.summary.discount = Money::from_major(20);
        invoice.footer.terms = Some("\nNet 30, bank transfer only\nLate fees apply".to_string());

        let layout = layout_invoice(&invoice, &business(), None).unwrap();
        let texts: Vec<&str> = layout.texts().collect();

        assert!(texts.contains(&"- US$ 20.00"));
        assert!(texts.contains(&"US$ 310.00"));
        assert!(texts.contains(&"Net 30, bank transfer only"));
    }

    #[test]
    fn test_logo_keeps_aspect_ratio() {
        let layout = layout_invoice(&invoice_with_lines(1), &business(), Some((200, 100))).unwrap();
        let image = layout
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Image { width, height, x, .. } => Some((*width, *height, *x)),
                _ => None,
            })
            .unwrap();

        assert!((image.0 - 72.0).abs() < 1e-3);
        assert!((image.1 - 36.0).abs() < 1e-3);
        assert!((image.2 + image.0 - (PAGE_WIDTH - MARGIN_RIGHT)).abs() < 1e-3);
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(Decimal::new(825, 2)), "8.25%");
    }
}
