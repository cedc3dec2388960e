//! Table rendering
//!
//! Turns one page block into content-stream operations: a light-gray
//! header band, gray hairline cell borders, and padded cell text. Bold
//! markup runs render with synthetic emboldening (fill-and-stroke text
//! mode), since the document embeds a single typeface.

use lopdf::content::{Content, Operation};
use lopdf::Object;

use crate::fonts::FontContext;
use crate::generator::{FONT_RESOURCE, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::markup::{resolve_markup, StyledRun};
use crate::paginate::PageBlock;

/// Distance from the top margin down to the table's top edge. Leaves the
/// page title clear of the header row.
pub const TABLE_TOP_OFFSET: f32 = 50.0;

const HEADER_FONT_SIZE: f32 = 14.0;
const CELL_FONT_SIZE: f32 = 12.0;
const HEADER_ROW_HEIGHT: f32 = 29.5;
const DATA_ROW_HEIGHT: f32 = 22.0;
const CELL_PAD_LEFT: f32 = 2.5;
const CELL_PAD_BOTTOM: f32 = 5.5;
const HEADER_PAD_BOTTOM: f32 = 10.0;
const BORDER_WIDTH: f32 = 0.15;
const BORDER_GRAY: f32 = 0.5;
const HEADER_BG_GRAY: f32 = 0.753;
const BOLD_STROKE_WIDTH: f32 = 0.4;

/// Render one page block at the fixed table position. The table spans the
/// full content width, flush against the right margin like the original
/// layout, with equal column widths.
pub fn render_block(content: &mut Content, fonts: &FontContext, block: &PageBlock) {
    let columns = block.header.len();
    if columns == 0 {
        return;
    }
    let table_width = PAGE_WIDTH - 2.0 * MARGIN;
    let column_width = table_width / columns as f32;
    let table_left = PAGE_WIDTH - MARGIN - table_width;
    let mut row_top = PAGE_HEIGHT - MARGIN - TABLE_TOP_OFFSET;

    render_header_row(content, fonts, block.header, table_left, row_top, column_width);
    row_top -= HEADER_ROW_HEIGHT;

    for row in block.rows {
        render_data_row(content, fonts, row, table_left, row_top, column_width);
        row_top -= DATA_ROW_HEIGHT;
    }
}

fn render_header_row(
    content: &mut Content,
    fonts: &FontContext,
    header: &[String],
    table_left: f32,
    row_top: f32,
    column_width: f32,
) {
    let row_bottom = row_top - HEADER_ROW_HEIGHT;
    for (column, title) in header.iter().enumerate() {
        let x = table_left + column as f32 * column_width;
        fill_rect(content, x, row_bottom, column_width, HEADER_ROW_HEIGHT, HEADER_BG_GRAY);
        stroke_rect(content, x, row_bottom, column_width, HEADER_ROW_HEIGHT);
        show_text(
            content,
            fonts,
            title,
            x + CELL_PAD_LEFT,
            row_bottom + HEADER_PAD_BOTTOM,
            HEADER_FONT_SIZE,
            true,
        );
    }
}

fn render_data_row(
    content: &mut Content,
    fonts: &FontContext,
    row: &[String],
    table_left: f32,
    row_top: f32,
    column_width: f32,
) {
    let row_bottom = row_top - DATA_ROW_HEIGHT;
    for (column, cell) in row.iter().enumerate() {
        let x = table_left + column as f32 * column_width;
        stroke_rect(content, x, row_bottom, column_width, DATA_ROW_HEIGHT);

        // Cells are single-line; where the original word lists would
        // never overflow a column, pathological text is clipped to the
        // cell instead of wrapped.
        let max_text_width = column_width - 2.0 * CELL_PAD_LEFT;
        let runs = fit_runs(resolve_markup(cell), max_text_width, |text| {
            fonts.text_width(text, CELL_FONT_SIZE)
        });
        if runs.is_empty() {
            continue;
        }
        content.operations.push(Operation::new("BT", vec![]));
        content.operations.push(Operation::new(
            "Tm",
            vec![
                Object::Real(1.0),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(1.0),
                Object::Real(x + CELL_PAD_LEFT),
                Object::Real(row_bottom + CELL_PAD_BOTTOM),
            ],
        ));
        content.operations.push(Operation::new(
            "Tf",
            vec![FONT_RESOURCE.into(), Object::Real(CELL_FONT_SIZE)],
        ));
        for run in &runs {
            push_weight_ops(content, run.bold);
            // TJ leaves the text position after the shown text, so runs
            // concatenate with no added spacing.
            content.operations.push(Operation::new(
                "TJ",
                vec![Object::Array(fonts.tj_array(&run.text, CELL_FONT_SIZE))],
            ));
        }
        content.operations.push(Operation::new("ET", vec![]));
    }
}

/// One text object at a fixed position in a single weight.
pub(crate) fn show_text(
    content: &mut Content,
    fonts: &FontContext,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    bold: bool,
) {
    if text.is_empty() {
        return;
    }
    content.operations.push(Operation::new("BT", vec![]));
    content.operations.push(Operation::new(
        "Tm",
        vec![
            Object::Real(1.0),
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(1.0),
            Object::Real(x),
            Object::Real(baseline),
        ],
    ));
    content
        .operations
        .push(Operation::new("Tf", vec![FONT_RESOURCE.into(), Object::Real(size)]));
    push_weight_ops(content, bold);
    content.operations.push(Operation::new(
        "TJ",
        vec![Object::Array(fonts.tj_array(text, size))],
    ));
    content.operations.push(Operation::new("ET", vec![]));
}

/// Text rendering mode 2 (fill + stroke) fakes a bold weight with the
/// regular outlines; mode 0 restores the plain fill. The mode persists in
/// the graphics state, so it is set explicitly for every run.
fn push_weight_ops(content: &mut Content, bold: bool) {
    if bold {
        content
            .operations
            .push(Operation::new("w", vec![Object::Real(BOLD_STROKE_WIDTH)]));
        content.operations.push(Operation::new("Tr", vec![2.into()]));
    } else {
        content.operations.push(Operation::new("Tr", vec![0.into()]));
    }
}

fn stroke_rect(content: &mut Content, x: f32, y: f32, width: f32, height: f32) {
    content.operations.push(Operation::new("q", vec![]));
    content
        .operations
        .push(Operation::new("G", vec![Object::Real(BORDER_GRAY)]));
    content
        .operations
        .push(Operation::new("w", vec![Object::Real(BORDER_WIDTH)]));
    content.operations.push(Operation::new(
        "re",
        vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(width),
            Object::Real(height),
        ],
    ));
    content.operations.push(Operation::new("S", vec![]));
    content.operations.push(Operation::new("Q", vec![]));
}

fn fill_rect(content: &mut Content, x: f32, y: f32, width: f32, height: f32, gray: f32) {
    content.operations.push(Operation::new("q", vec![]));
    content
        .operations
        .push(Operation::new("g", vec![Object::Real(gray)]));
    content.operations.push(Operation::new(
        "re",
        vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(width),
            Object::Real(height),
        ],
    ));
    content.operations.push(Operation::new("f", vec![]));
    content.operations.push(Operation::new("Q", vec![]));
}

/// Keep only as much of `runs` as fits `max_width` under `measure`,
/// truncating the first overflowing run at a character boundary and
/// dropping the rest. Run order and weights are preserved.
fn fit_runs<F>(runs: Vec<StyledRun>, max_width: f32, measure: F) -> Vec<StyledRun>
where
    F: Fn(&str) -> f32,
{
    let mut fitted = Vec::with_capacity(runs.len());
    let mut used = 0.0;
    for run in runs {
        let run_width = measure(&run.text);
        if used + run_width <= max_width {
            used += run_width;
            fitted.push(run);
            continue;
        }
        let mut kept = String::new();
        for ch in run.text.chars() {
            let mut candidate = kept.clone();
            candidate.push(ch);
            if used + measure(&candidate) > max_width {
                break;
            }
            kept = candidate;
        }
        if !kept.is_empty() {
            fitted.push(StyledRun {
                text: kept,
                bold: run.bold,
            });
        }
        break;
    }
    fitted
}

/// Pixel budget check used by the generator: a full page of rows plus the
/// header must fit between the table's top edge and the bottom margin.
pub fn page_capacity_fits(per_page: usize) -> bool {
    let available = PAGE_HEIGHT - 2.0 * MARGIN - TABLE_TOP_OFFSET;
    HEADER_ROW_HEIGHT + per_page as f32 * DATA_ROW_HEIGHT <= available
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_fits_the_page() {
        assert!(page_capacity_fits(crate::config::DEFAULT_ROWS_PER_PAGE));
    }

    #[test]
    fn absurd_capacity_does_not_fit() {
        assert!(!page_capacity_fits(500));
    }

    // One point per character keeps the clipping arithmetic obvious.
    fn char_count(text: &str) -> f32 {
        text.chars().count() as f32
    }

    fn run(text: &str, bold: bool) -> StyledRun {
        StyledRun {
            text: text.to_string(),
            bold,
        }
    }

    #[test]
    fn fitting_runs_pass_through_unchanged() {
        let runs = vec![run("foo ", false), run("bar", true)];
        let fitted = fit_runs(runs.clone(), 10.0, char_count);
        assert_eq!(fitted, runs);
    }

    #[test]
    fn overlong_run_is_clipped_at_a_character_boundary() {
        let fitted = fit_runs(vec![run("abcdefgh", false)], 5.0, char_count);
        assert_eq!(fitted, vec![run("abcde", false)]);
    }

    #[test]
    fn runs_past_the_overflow_are_dropped_and_weights_kept() {
        let runs = vec![run("abcd", false), run("efgh", true), run("ijkl", false)];
        let fitted = fit_runs(runs, 6.0, char_count);
        assert_eq!(fitted, vec![run("abcd", false), run("ef", true)]);
    }

    #[test]
    fn zero_width_budget_yields_no_runs() {
        assert!(fit_runs(vec![run("abc", false)], 0.0, char_count).is_empty());
    }
}
