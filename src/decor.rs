//! Page decorations
//!
//! The overlay drawn on every page independent of table content: the
//! document title at the top margin, and a footer line holding the
//! 1-based page number (right-aligned) and a gray attribution link
//! (left-aligned) on a shared baseline below the bottom margin.

use lopdf::content::{Content, Operation};
use lopdf::Object;

use crate::fonts::FontContext;
use crate::generator::{FONT_RESOURCE, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::table::show_text;

pub const ATTRIBUTION_LINK: &str =
    "https://github.com/nazrulworld/simpla-java/tree/main/pdf-tables";

const TITLE_FONT_SIZE: f32 = 16.0;
const FOOTER_FONT_SIZE: f32 = 12.0;
/// Footer baseline sits this far below the bottom margin line.
const FOOTER_BASELINE_DROP: f32 = 5.0;
const LINK_GRAY: f32 = 0.5;

/// Draw the title and footer for one page. `page_number` is 1-based.
pub fn draw(content: &mut Content, fonts: &FontContext, title: &str, page_number: usize) {
    draw_title(content, fonts, title);
    draw_footer(content, fonts, page_number);
}

/// Bold running title, baseline one title-height below the top margin.
fn draw_title(content: &mut Content, fonts: &FontContext, title: &str) {
    let baseline = PAGE_HEIGHT - MARGIN - TITLE_FONT_SIZE;
    show_text(content, fonts, title, MARGIN, baseline, TITLE_FONT_SIZE, true);
}

fn draw_footer(content: &mut Content, fonts: &FontContext, page_number: usize) {
    let baseline = MARGIN - FOOTER_BASELINE_DROP;

    // Right-aligned page number, inset by one digit width as in the
    // original footer.
    let text = format!("Page {page_number}");
    let text_width = fonts.text_width(&text, FOOTER_FONT_SIZE);
    let digit_width = fonts.text_width("0", FOOTER_FONT_SIZE);
    let x = PAGE_WIDTH - MARGIN - text_width - digit_width;
    show_text(content, fonts, &text, x, baseline, FOOTER_FONT_SIZE, false);

    // Gray attribution link at the left margin. Fill color is scoped so
    // nothing after the footer inherits the gray.
    content.operations.push(Operation::new("q", vec![]));
    content
        .operations
        .push(Operation::new("g", vec![Object::Real(LINK_GRAY)]));
    show_text(
        content,
        fonts,
        ATTRIBUTION_LINK,
        MARGIN,
        baseline,
        FOOTER_FONT_SIZE,
        false,
    );
    content.operations.push(Operation::new("Q", vec![]));
}
