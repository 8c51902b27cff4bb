//! Fixed receipt layout and composition into positioned paint operations.
//!
//! Coordinates are millimetres from the top-left corner of the page. Text
//! baselines follow the usual cell convention: vertically centred in the
//! box, offset by 0.3 of the font height.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{PaymentCategory, ReceiptDocument};

pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Horizontal padding inside a field box.
const CELL_PADDING_MM: f32 = 1.0;

/// Smallest size text is shrunk to before it is truncated.
const MIN_FONT_SIZE: f32 = 6.0;

const ELLIPSIS: &str = "...";

const MARK_GLYPH: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Position and text style of one field on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub align: Align,
    pub font_size: f32,
}

impl FieldBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32, align: Align, font_size: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            align,
            font_size,
        }
    }

    fn shifted_down(&self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }
}

/// Static placement table for the printed receipt form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub receipt_number: FieldBox,
    pub ticket_number: FieldBox,
    pub date: FieldBox,
    pub payor: FieldBox,
    /// First violation row; later rows move down by `row_pitch`.
    pub line_label: FieldBox,
    pub line_amount: FieldBox,
    pub row_pitch: f32,
    pub max_rows: usize,
    pub total: FieldBox,
    /// Multi-line box; `height` is the line height.
    pub amount_in_words: FieldBox,
    pub cash_mark: FieldBox,
    pub electronic_mark: FieldBox,
    pub reference_number: FieldBox,
    pub currency_prefix: &'static str,
}

/// The 100 x 200 mm official receipt form.
pub const REFERENCE_LAYOUT: FixedLayout = FixedLayout {
    page_width: 100.0,
    page_height: 200.0,
    receipt_number: FieldBox::new(55.0, 30.0, 38.0, 6.0, Align::Right, 11.0),
    ticket_number: FieldBox::new(55.0, 37.0, 38.0, 5.0, Align::Right, 8.0),
    date: FieldBox::new(55.0, 44.0, 38.0, 6.0, Align::Left, 9.0),
    payor: FieldBox::new(10.0, 54.0, 83.0, 6.0, Align::Left, 9.0),
    line_label: FieldBox::new(8.0, 70.0, 55.0, 5.0, Align::Left, 8.0),
    line_amount: FieldBox::new(63.0, 70.0, 30.0, 5.0, Align::Right, 8.0),
    row_pitch: 5.5,
    max_rows: 10,
    total: FieldBox::new(63.0, 128.0, 30.0, 6.0, Align::Right, 10.0),
    amount_in_words: FieldBox::new(8.0, 140.0, 85.0, 4.5, Align::Left, 8.0),
    cash_mark: FieldBox::new(12.0, 166.0, 4.0, 4.0, Align::Center, 10.0),
    electronic_mark: FieldBox::new(12.0, 173.0, 4.0, 4.0, Align::Center, 10.0),
    reference_number: FieldBox::new(40.0, 173.0, 53.0, 4.0, Align::Left, 8.0),
    currency_prefix: "PHP ",
};

impl Default for FixedLayout {
    fn default() -> Self {
        REFERENCE_LAYOUT
    }
}

/// Which part of the receipt a paint operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "row")]
pub enum Field {
    ReceiptNumber,
    TicketNumber,
    Date,
    Payor,
    ViolationLabel(usize),
    FineAmount(usize),
    Total,
    AmountInWords,
    CashMark,
    ElectronicMark,
    ReferenceNumber,
}

/// A single text run at an absolute position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintOp {
    pub field: Field,
    pub text: String,
    /// Left edge of the text, millimetres from the page's left edge.
    pub x: f32,
    /// Text baseline, millimetres from the page's top edge.
    pub baseline: f32,
    pub font_size: f32,
}

/// Helvetica advance widths (1/1000 em) for printable ASCII, starting at space.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => u32::from(HELVETICA_WIDTHS[(code - 32) as usize]),
            _ => 556,
        })
        .sum();

    units as f32 / 1000.0 * font_size * PT_TO_MM
}

impl FieldBox {
    /// Width available to text. Centred cells have no side padding.
    fn usable_width(&self) -> f32 {
        match self.align {
            Align::Center => self.width,
            Align::Left | Align::Right => (self.width - 2.0 * CELL_PADDING_MM).max(0.0),
        }
    }
}

/// Shrink `text` to the cell's usable width, first by font size down to
/// `MIN_FONT_SIZE`, then by cutting characters and appending an ellipsis.
fn fit_text(text: &str, cell: &FieldBox) -> (String, f32) {
    let max_width = cell.usable_width();
    let natural = text_width(text, cell.font_size);
    if natural <= max_width {
        return (text.to_string(), cell.font_size);
    }

    let floor = MIN_FONT_SIZE.min(cell.font_size);
    // Slightly under the exact ratio so rounding cannot land past the edge.
    let scaled = (cell.font_size * max_width / natural * 0.999).max(floor);
    if text_width(text, scaled) <= max_width {
        return (text.to_string(), scaled);
    }

    let budget = max_width - text_width(ELLIPSIS, floor);
    let mut kept = String::new();
    for c in text.chars() {
        kept.push(c);
        if text_width(&kept, floor) > budget {
            kept.pop();
            break;
        }
    }
    let kept = kept.trim_end();
    let truncated = if kept.is_empty() {
        String::new()
    } else {
        format!("{}{}", kept, ELLIPSIS)
    };

    (truncated, floor)
}

fn place(field: Field, text: &str, cell: &FieldBox) -> PaintOp {
    let (text, font_size) = fit_text(text, cell);
    let width = text_width(&text, font_size);
    let x = match cell.align {
        Align::Left => cell.x + CELL_PADDING_MM,
        Align::Center => cell.x + (cell.width - width) / 2.0,
        Align::Right => cell.x + cell.width - CELL_PADDING_MM - width,
    };
    let baseline = cell.y + cell.height / 2.0 + 0.3 * font_size * PT_TO_MM;

    PaintOp {
        field,
        text,
        x,
        baseline,
        font_size,
    }
}

/// Greedy word wrap to the usable width of `cell`. Words wider than a full
/// line are kept whole on their own line and fitted when placed.
pub fn wrap_text(text: &str, cell: &FieldBox) -> Vec<String> {
    let max_width = cell.usable_width();
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if current.is_empty() || text_width(&candidate, cell.font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Money as printed on the form: prefix, thousands separators, two decimals.
pub fn format_money(prefix: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}{}{}.{}", prefix, sign, grouped, cents)
}

/// Lay out every field of `doc` on `layout`.
///
/// Violation rows beyond `layout.max_rows` are not painted; the total still
/// includes them.
pub fn compose(doc: &ReceiptDocument, layout: &FixedLayout) -> Vec<PaintOp> {
    let mut ops = vec![
        place(Field::ReceiptNumber, &doc.receipt_number, &layout.receipt_number),
        place(Field::TicketNumber, &doc.ticket_number, &layout.ticket_number),
        place(Field::Date, &doc.date, &layout.date),
        place(Field::Payor, &doc.payor, &layout.payor),
    ];

    for (row, line) in doc.lines.iter().take(layout.max_rows).enumerate() {
        let offset = row as f32 * layout.row_pitch;
        ops.push(place(
            Field::ViolationLabel(row),
            &line.label,
            &layout.line_label.shifted_down(offset),
        ));
        ops.push(place(
            Field::FineAmount(row),
            &format_money(layout.currency_prefix, line.amount),
            &layout.line_amount.shifted_down(offset),
        ));
    }

    ops.push(place(
        Field::Total,
        &format_money(layout.currency_prefix, doc.total),
        &layout.total,
    ));

    let words_box = &layout.amount_in_words;
    for (i, line) in wrap_text(&doc.amount_in_words, words_box).iter().enumerate() {
        ops.push(place(
            Field::AmountInWords,
            line,
            &words_box.shifted_down(i as f32 * words_box.height),
        ));
    }

    match doc.payment_category {
        PaymentCategory::Cash => ops.push(place(Field::CashMark, MARK_GLYPH, &layout.cash_mark)),
        PaymentCategory::Electronic => ops.push(place(
            Field::ElectronicMark,
            MARK_GLYPH,
            &layout.electronic_mark,
        )),
        PaymentCategory::Unmarked => {}
    }

    if let Some(reference) = &doc.reference_number {
        ops.push(place(
            Field::ReferenceNumber,
            &format!("REF: {}", reference),
            &layout.reference_number,
        ));
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_money() {
        let amount = Decimal::from_str("1500").unwrap();
        assert_eq!(format_money("PHP ", amount), "PHP 1,500.00");

        let amount = Decimal::from_str("0.3").unwrap();
        assert_eq!(format_money("PHP ", amount), "PHP 0.30");

        let amount = Decimal::from_str("1234567.891").unwrap();
        assert_eq!(format_money("", amount), "1,234,567.89");

        let amount = Decimal::from_str("999.995").unwrap();
        assert_eq!(format_money("", amount), "1,000.00");
    }

    #[test]
    fn test_text_width_scales_with_font_size() {
        let narrow = text_width("1000.00", 8.0);
        let wide = text_width("1000.00", 16.0);
        assert!((wide - 2.0 * narrow).abs() < 1e-4);
        // Seven glyphs: six digits (556) and a period (278).
        let expected = (6.0 * 556.0 + 278.0) / 1000.0 * 8.0 * PT_TO_MM;
        assert!((narrow - expected).abs() < 1e-4);
    }

    #[test]
    fn test_right_alignment_ends_at_padding() {
        let cell = FieldBox::new(60.0, 10.0, 30.0, 5.0, Align::Right, 8.0);
        let op = place(Field::Total, "PHP 1,500.00", &cell);
        let right_edge = op.x + text_width(&op.text, cell.font_size);
        assert!((right_edge - (60.0 + 30.0 - CELL_PADDING_MM)).abs() < 1e-4);
    }

    #[test]
    fn test_center_alignment() {
        let cell = FieldBox::new(10.0, 10.0, 4.0, 4.0, Align::Center, 10.0);
        let op = place(Field::CashMark, "X", &cell);
        let width = text_width("X", 10.0);
        assert!((op.x + width / 2.0 - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_baseline_sits_inside_box() {
        let cell = FieldBox::new(0.0, 20.0, 30.0, 6.0, Align::Left, 10.0);
        let op = place(Field::Payor, "JUAN DELA CRUZ", &cell);
        assert!(op.baseline > 20.0 && op.baseline < 26.0);
    }

    #[test]
    fn test_wrap_respects_width() {
        let cell = REFERENCE_LAYOUT.amount_in_words;
        let text = "NINE HUNDRED NINETY NINE THOUSAND NINE HUNDRED NINETY NINE PESOS AND NINETY NINE CENTAVOS ONLY";
        let lines = wrap_text(text, &cell);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, cell.font_size) <= cell.width - 2.0 * CELL_PADDING_MM);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let lines = wrap_text("ONE HUNDRED PESOS ONLY", &REFERENCE_LAYOUT.amount_in_words);
        assert_eq!(lines, vec!["ONE HUNDRED PESOS ONLY".to_string()]);
    }

    fn assert_within(op: &PaintOp, cell: &FieldBox) {
        let end = op.x + text_width(&op.text, op.font_size);
        assert!(op.x >= cell.x - 1e-3, "{:?} starts before its box", op.field);
        assert!(
            end <= cell.x + cell.width + 1e-3,
            "{:?} ends at {} past box edge {}",
            op.field,
            end,
            cell.x + cell.width
        );
    }

    #[test]
    fn test_slightly_long_text_is_shrunk_not_cut() {
        let cell = REFERENCE_LAYOUT.line_label;
        let text = "RECKLESS DRIVING IN A SCHOOL ZONE AREA";
        assert!(text_width(text, cell.font_size) > cell.usable_width());

        let op = place(Field::ViolationLabel(0), text, &cell);
        assert_eq!(op.text, text);
        assert!(op.font_size < cell.font_size && op.font_size >= MIN_FONT_SIZE);
        assert_within(&op, &cell);
    }

    #[test]
    fn test_very_long_text_is_truncated_with_ellipsis() {
        let cell = REFERENCE_LAYOUT.line_label;
        let text = "FAILURE TO CARRY DRIVER'S LICENSE OR CERTIFICATE OF REGISTRATION";

        let op = place(Field::ViolationLabel(0), text, &cell);
        assert!(op.text.ends_with(ELLIPSIS));
        assert!(text.starts_with(op.text.trim_end_matches(ELLIPSIS)));
        assert_eq!(op.font_size, MIN_FONT_SIZE);
        assert_within(&op, &cell);
    }

    #[test]
    fn test_long_right_aligned_text_stays_in_box() {
        let cell = REFERENCE_LAYOUT.receipt_number;
        let op = place(Field::ReceiptNumber, &"R".repeat(40), &cell);
        assert_within(&op, &cell);
        let right_edge = op.x + text_width(&op.text, op.font_size);
        assert!((right_edge - (cell.x + cell.width - CELL_PADDING_MM)).abs() < 1e-3);
    }

    #[test]
    fn test_short_text_keeps_font_size() {
        let cell = REFERENCE_LAYOUT.payor;
        let op = place(Field::Payor, "JUAN DELA CRUZ", &cell);
        assert_eq!(op.font_size, cell.font_size);
        assert_eq!(op.text, "JUAN DELA CRUZ");
    }

    #[test]
    fn test_rows_fit_above_total() {
        let layout = REFERENCE_LAYOUT;
        let last_row = layout
            .line_amount
            .shifted_down((layout.max_rows - 1) as f32 * layout.row_pitch);
        assert!(last_row.y + last_row.height <= layout.total.y);
    }
}
