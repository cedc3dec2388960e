//! Table pagination
//!
//! Splits a word list into page blocks: the header row plus up to
//! `per_page` data rows, in original order. The header repeats on every
//! block. An exact multiple of `per_page` produces no trailing empty
//! block, and an empty list produces no blocks at all.

use crate::resource::WordList;

/// One page worth of table content. Borrowed views into the word list;
/// consumed by the renderer, never stored.
#[derive(Debug, Clone, Copy)]
pub struct PageBlock<'a> {
    pub header: &'a [String],
    pub rows: &'a [Vec<String>],
}

/// Lazily yield the page blocks of `list`, `per_page` data rows each.
///
/// `per_page` must be non-zero; the assembly entry point validates it.
pub fn paginate(list: &WordList, per_page: usize) -> impl Iterator<Item = PageBlock<'_>> {
    debug_assert!(per_page > 0);
    list.rows.chunks(per_page.max(1)).map(move |rows| PageBlock {
        header: &list.header,
        rows,
    })
}
