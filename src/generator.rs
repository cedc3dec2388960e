//! Document assembly
//!
//! Builds one PDF per word list: document skeleton (catalog, page tree,
//! info), embedded Type0/CIDFontType2 typeface with Identity-H encoding,
//! then one page per paginator block with decorations and the rendered
//! table. The three documents are generated sequentially and
//! best-effort: a failure in one is logged and the rest are still
//! attempted.

use anyhow::{bail, Context, Result};
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::fs;

use crate::config::GeneratorConfig;
use crate::decor::{self, ATTRIBUTION_LINK};
use crate::fonts::FontContext;
use crate::paginate::{paginate, PageBlock};
use crate::resource::{DataResource, WordList};
use crate::table;

/// A4 landscape, in points.
pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;
pub const MARGIN: f32 = 36.0;

/// Resource name the single typeface is registered under on every page.
pub(crate) const FONT_RESOURCE: &str = "F1";

const PRODUCER: &str = "pdf-tables";

/// Generates the word-list table documents of one run.
pub struct PdfTableGenerator<'a> {
    fonts: &'a FontContext,
    config: &'a GeneratorConfig,
}

impl<'a> PdfTableGenerator<'a> {
    pub fn new(fonts: &'a FontContext, config: &'a GeneratorConfig) -> Result<Self> {
        if config.rows_per_page == 0 {
            bail!("rows per page must be at least 1");
        }
        if !table::page_capacity_fits(config.rows_per_page) {
            bail!(
                "{} rows per page do not fit between the table offset and the bottom margin",
                config.rows_per_page
            );
        }
        Ok(PdfTableGenerator { fonts, config })
    }

    /// Generate all three documents in the fixed order. Each failure is
    /// logged and collected; the error names every failed file.
    pub fn generate_all(&self, resource: &DataResource) -> Result<()> {
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "creating output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let documents: [(&str, &str, &WordList); 3] = [
            (
                "Adjektiver.pdf",
                "Det er meste brugte adjektiver",
                &resource.adjectives,
            ),
            (
                "Substantiver.pdf",
                "Det er meste brugte substantiver",
                &resource.nouns,
            ),
            ("Verber.pdf", "Det er meste brugte verber", &resource.verbs),
        ];

        let mut failed = Vec::new();
        for (file_name, title, list) in documents {
            if let Err(err) = self.generate_doc(file_name, title, list) {
                error!("generating {file_name}: {err:#}");
                failed.push(file_name);
            }
        }
        report_failures(failed)
    }

    /// Build and write one document for one word list.
    fn generate_doc(&self, file_name: &str, title: &str, list: &WordList) -> Result<()> {
        let mut doc = Document::with_version("1.5");

        let charset = self.collect_charset(title, list);
        let font_id = self.add_font_to_document(&mut doc, &charset)?;

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(vec![]),
            "Count" => 0,
        });

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(PRODUCER),
            "Creator" => Object::string_literal(ATTRIBUTION_LINK),
        });

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set(b"Root", catalog_id);
        doc.trailer.set(b"Info", info_id);

        let blocks = page_blocks(list, self.config.rows_per_page);
        let page_count = blocks.len();

        for (index, block) in blocks.iter().enumerate() {
            let mut content = Content {
                operations: Vec::new(),
            };
            decor::draw(&mut content, self.fonts, title, index + 1);
            table::render_block(&mut content, self.fonts, block);

            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        FONT_RESOURCE => font_id,
                    },
                },
                "Contents" => content_id,
            });
            add_page_to_tree(&mut doc, pages_id, page_id)?;
        }

        let path = self.config.output_dir.join(file_name);
        doc.compress();
        doc.save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            "wrote {} ({} pages, {} data rows)",
            path.display(),
            page_count,
            list.data_row_count()
        );
        Ok(())
    }

    /// Every character the document will show. Drives the CID width
    /// array so viewers advance glyphs correctly.
    fn collect_charset(&self, title: &str, list: &WordList) -> BTreeSet<char> {
        let mut charset: BTreeSet<char> = BTreeSet::new();
        charset.extend(title.chars());
        charset.extend(ATTRIBUTION_LINK.chars());
        charset.extend("Page 0123456789".chars());
        for cell in list.header.iter().chain(list.rows.iter().flatten()) {
            for run in crate::markup::resolve_markup(cell) {
                charset.extend(run.text.chars());
            }
        }
        charset.retain(|ch| (*ch as u32) <= 0xFFFF);
        charset
    }

    /// Register the typeface as a composite Type0 font with a CIDFontType2
    /// descendant: Identity-H encoding, per-character width array, full-BMP
    /// CIDToGIDMap when the file is embedded, identity ToUnicode CMap.
    fn add_font_to_document(
        &self,
        doc: &mut Document,
        charset: &BTreeSet<char>,
    ) -> Result<ObjectId> {
        let base_font_name = self.fonts.pdf_font_name();
        let line_metrics = self.fonts.font.horizontal_line_metrics(1000.0);
        let ascent = line_metrics.map(|m| m.ascent).unwrap_or(800.0) as i64;
        let descent = line_metrics.map(|m| m.descent).unwrap_or(-200.0) as i64;

        let mut font_descriptor = dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(base_font_name.clone().into_bytes()),
            "Flags" => 4,
            "FontBBox" => vec![
                (-200).into(),
                (-300).into(),
                1200.into(),
                1000.into(),
            ],
            "ItalicAngle" => 0,
            "Ascent" => ascent,
            "Descent" => descent,
            "CapHeight" => 700,
            "StemV" => 80,
        };

        let embedded = self.fonts.is_embeddable();
        if embedded {
            let stream_dict = dictionary! {
                "Length1" => self.fonts.font_data.len() as i64,
            };
            let font_file_id =
                doc.add_object(Stream::new(stream_dict, self.fonts.font_data.clone()));
            font_descriptor.set("FontFile2", font_file_id);
        } else {
            warn!(
                "font {} is not a raw TrueType file; referencing it by name without embedding",
                self.fonts.font_path.display()
            );
        }
        let descriptor_id = doc.add_object(font_descriptor);

        let mut cidfont = dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(base_font_name.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => Object::Array(self.width_array(charset)),
        };
        if embedded {
            // Explicit map keeps CID-to-glyph resolution deterministic for
            // the embedded file.
            let map_id = doc.add_object(self.cid_to_gid_map_stream());
            cidfont.set("CIDToGIDMap", map_id);
        } else {
            cidfont.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
        }
        let cidfont_id = doc.add_object(cidfont);

        let tounicode_id = doc.add_object(identity_tounicode_cmap_stream());

        let type0_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(base_font_name.into_bytes()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cidfont_id)],
            "ToUnicode" => tounicode_id,
        });
        Ok(type0_id)
    }

    /// CID width entries, one `cid [width]` pair per character used.
    fn width_array(&self, charset: &BTreeSet<char>) -> Vec<Object> {
        let mut w = Vec::with_capacity(charset.len() * 2);
        for &ch in charset {
            w.push(Object::Integer(ch as i64));
            w.push(Object::Array(vec![Object::Real(
                self.fonts.advance_per_mille(ch),
            )]));
        }
        w
    }

    /// Full BMP CID-to-glyph map, two bytes per CID. CID codes equal
    /// UTF-16 BMP code units in the content streams.
    fn cid_to_gid_map_stream(&self) -> Stream {
        let mut map = vec![0u8; 65536 * 2];
        for cid in 0u32..=0xFFFF {
            if let Some(ch) = char::from_u32(cid) {
                let gid = self.fonts.glyph_index(ch);
                let offset = (cid as usize) * 2;
                map[offset] = (gid >> 8) as u8;
                map[offset + 1] = (gid & 0xFF) as u8;
            }
        }
        Stream::new(Dictionary::new(), map)
    }
}

/// Page blocks for one document: the paginator's output, or a single
/// header-only block when the list has no data rows.
fn page_blocks(list: &WordList, per_page: usize) -> Vec<PageBlock<'_>> {
    let mut blocks: Vec<PageBlock> = paginate(list, per_page).collect();
    if blocks.is_empty() {
        blocks.push(PageBlock {
            header: &list.header,
            rows: &[],
        });
    }
    blocks
}

/// Best-effort outcome of one run: `Ok` only when every document was
/// written, otherwise an error naming each failed file.
fn report_failures(failed: Vec<&str>) -> Result<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        bail!("failed to generate: {}", failed.join(", "));
    }
}

fn add_page_to_tree(doc: &mut Document, pages_id: ObjectId, page_id: ObjectId) -> Result<()> {
    let pages_obj = doc.get_object_mut(pages_id)?;
    if let Object::Dictionary(ref mut pages_dict) = pages_obj {
        let count = {
            let kids = pages_dict.get_mut(b"Kids")?.as_array_mut()?;
            kids.push(Object::Reference(page_id));
            kids.len() as i64
        };
        pages_dict.set("Count", count);
        Ok(())
    } else {
        bail!("pages object is not a dictionary");
    }
}

fn identity_tounicode_cmap_stream() -> Stream {
    let cmap = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0000> <FFFF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end"
    .to_vec();
    Stream::new(Dictionary::new(), cmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_rows(count: usize) -> WordList {
        let mut raw = vec![vec!["Dansk".to_string(), "Engelsk".to_string()]];
        for i in 0..count {
            raw.push(vec![format!("ord {i}"), format!("word {i}")]);
        }
        WordList::new("testliste", raw).unwrap()
    }

    #[test]
    fn empty_list_still_gets_a_header_only_page() {
        let list = list_with_rows(0);
        let blocks = page_blocks(&list, 20);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header, &["Dansk".to_string(), "Engelsk".to_string()]);
        assert!(blocks[0].rows.is_empty());
    }

    #[test]
    fn non_empty_list_keeps_the_paginator_blocks() {
        let list = list_with_rows(41);
        let blocks = page_blocks(&list, 20);
        let sizes: Vec<usize> = blocks.iter().map(|b| b.rows.len()).collect();
        assert_eq!(sizes, vec![20, 20, 1]);
        for block in &blocks {
            assert_eq!(block.header, &["Dansk".to_string(), "Engelsk".to_string()]);
        }
    }

    #[test]
    fn no_failures_is_success() {
        assert!(report_failures(Vec::new()).is_ok());
    }

    #[test]
    fn failure_report_names_every_failed_file() {
        let err = report_failures(vec!["Adjektiver.pdf", "Verber.pdf"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Adjektiver.pdf"));
        assert!(message.contains("Verber.pdf"));
    }
}
