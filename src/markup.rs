//! Bold-span markup resolution
//!
//! Cell text may carry `<b>…</b>` spans marking substrings for bold
//! rendering. `resolve_markup` splits such a string into ordered runs of
//! regular and bold text. Concatenating the run texts always yields the
//! input with the tags stripped.

const OPEN_TAG: &str = "<b>";
const CLOSE_TAG: &str = "</b>";

/// One stretch of cell text rendered in a single weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
}

/// Split cell text into regular/bold runs.
///
/// A scanner walks the string looking for the two tag delimiters:
/// - text without tags becomes a single regular run;
/// - every well-formed `<b>…</b>` pair becomes one bold run;
/// - an unterminated `<b>` is stripped and the remainder stays regular;
/// - a `</b>` with no open span is kept as literal text;
/// - empty runs are never emitted, so an empty cell yields no runs.
pub fn resolve_markup(raw: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut bold = false;
    let mut rest = raw;

    while !rest.is_empty() {
        if !bold && rest.starts_with(OPEN_TAG) {
            rest = &rest[OPEN_TAG.len()..];
            // A span only opens when its terminator exists further on;
            // a dangling open tag is stripped and the text stays regular.
            if rest.contains(CLOSE_TAG) {
                flush(&mut runs, &mut current, false);
                bold = true;
            }
        } else if bold && rest.starts_with(CLOSE_TAG) {
            rest = &rest[CLOSE_TAG.len()..];
            flush(&mut runs, &mut current, true);
            bold = false;
        } else if let Some(ch) = rest.chars().next() {
            current.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    flush(&mut runs, &mut current, bold);
    runs
}

fn flush(runs: &mut Vec<StyledRun>, current: &mut String, bold: bool) {
    if !current.is_empty() {
        runs.push(StyledRun { text: std::mem::take(current), bold });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl StyledRun {
        fn regular(text: impl Into<String>) -> Self {
            StyledRun { text: text.into(), bold: false }
        }

        fn bold(text: impl Into<String>) -> Self {
            StyledRun { text: text.into(), bold: true }
        }
    }

    fn stripped(raw: &str) -> String {
        resolve_markup(raw).into_iter().map(|r| r.text).collect()
    }

    #[test]
    fn plain_text_is_one_regular_run() {
        let runs = resolve_markup("at løbe");
        assert_eq!(runs, vec![StyledRun::regular("at løbe")]);
    }

    #[test]
    fn single_span_splits_into_three_runs() {
        let runs = resolve_markup("foo <b>bar</b> baz");
        assert_eq!(
            runs,
            vec![
                StyledRun::regular("foo "),
                StyledRun::bold("bar"),
                StyledRun::regular(" baz"),
            ]
        );
    }

    #[test]
    fn concatenation_equals_tag_stripped_input() {
        assert_eq!(stripped("foo <b>bar</b> baz"), "foo bar baz");
        assert_eq!(stripped("<b>alt</b>"), "alt");
        assert_eq!(stripped("ingen tags"), "ingen tags");
    }

    #[test]
    fn span_at_string_edges() {
        assert_eq!(
            resolve_markup("<b>en</b> hund"),
            vec![StyledRun::bold("en"), StyledRun::regular(" hund")]
        );
        assert_eq!(
            resolve_markup("hunden <b>gør</b>"),
            vec![StyledRun::regular("hunden "), StyledRun::bold("gør")]
        );
    }

    #[test]
    fn multiple_spans_all_render_bold() {
        let runs = resolve_markup("<b>en</b> ko, <b>et</b> får");
        assert_eq!(
            runs,
            vec![
                StyledRun::bold("en"),
                StyledRun::regular(" ko, "),
                StyledRun::bold("et"),
                StyledRun::regular(" får"),
            ]
        );
    }

    #[test]
    fn unterminated_open_tag_is_stripped() {
        let runs = resolve_markup("foo <b>bar baz");
        assert_eq!(runs, vec![StyledRun::regular("foo bar baz")]);
    }

    #[test]
    fn stray_close_tag_stays_literal() {
        let runs = resolve_markup("foo </b> bar");
        assert_eq!(runs, vec![StyledRun::regular("foo </b> bar")]);
    }

    #[test]
    fn empty_cell_yields_no_runs() {
        assert!(resolve_markup("").is_empty());
        assert!(resolve_markup("<b></b>").is_empty());
    }
}
