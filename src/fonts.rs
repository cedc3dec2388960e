//! Typeface loading and text metrics
//!
//! Loads the single embedded typeface used for every table, keeps the raw
//! bytes for embedding, and answers metric questions (text widths with
//! kerning, line metrics, glyph indices) through fontdue.

use anyhow::{anyhow, Result};
use fontdue::{Font, FontSettings};
use lopdf::{Object, StringFormat};
use std::path::{Path, PathBuf};

/// Fonts probed when no font path is configured, in priority order.
/// All of these carry wide Unicode coverage.
const FONT_CANDIDATES: &[(&str, &str)] = &[
    ("DejaVu Sans", "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
    ("Noto Sans", "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf"),
    (
        "Liberation Sans",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    ),
    ("Arial Unicode MS", "C:\\Windows\\Fonts\\ARIALUNI.TTF"),
    ("Arial", "C:\\Windows\\Fonts\\arial.ttf"),
    ("Arial Unicode MS", "/Library/Fonts/Arial Unicode.ttf"),
];

/// The loaded typeface plus everything embedding needs.
#[derive(Clone)]
pub struct FontContext {
    pub font: Font,
    pub font_name: String,
    pub font_path: PathBuf,
    /// Raw file bytes, embedded into each document as FontFile2.
    pub font_data: Vec<u8>,
}

impl FontContext {
    /// Load the configured typeface, or probe the candidate list when no
    /// path was configured. A missing or unparsable font is fatal.
    pub fn load(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            let name = font_display_name(path);
            return Self::load_file(&name, path);
        }
        for (name, path) in FONT_CANDIDATES {
            let path = Path::new(path);
            if path.exists() {
                return Self::load_file(name, path);
            }
        }
        Err(anyhow!(
            "no usable typeface found; pass a font file path explicitly"
        ))
    }

    fn load_file(name: &str, path: &Path) -> Result<Self> {
        log::info!("loading typeface {} from {}", name, path.display());
        let font_data = std::fs::read(path)
            .map_err(|e| anyhow!("reading font file {}: {}", path.display(), e))?;
        let font = Font::from_bytes(font_data.clone(), FontSettings::default())
            .map_err(|e| anyhow!("parsing font file {}: {}", path.display(), e))?;
        Ok(FontContext {
            font,
            font_name: name.to_string(),
            font_path: path.to_path_buf(),
            font_data,
        })
    }

    /// Width of `text` at `size` points, kerning included.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let chars: Vec<char> = text.chars().collect();
        let mut width = 0.0;
        for (i, &ch) in chars.iter().enumerate() {
            width += self.font.metrics(ch, size).advance_width;
            if i + 1 < chars.len() {
                if let Some(kern) = self.font.horizontal_kern(ch, chars[i + 1], size) {
                    width += kern;
                }
            }
        }
        width
    }

    /// Baseline-to-top distance at `size` points.
    pub fn ascent(&self, size: f32) -> f32 {
        self.font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size * 0.8)
    }

    /// Glyph advance in thousandths of an em, as PDF width arrays want it.
    pub fn advance_per_mille(&self, ch: char) -> f32 {
        self.font.metrics(ch, 1000.0).advance_width
    }

    pub fn glyph_index(&self, ch: char) -> u16 {
        self.font.lookup_glyph_index(ch)
    }

    /// Only a raw TrueType file can go into a FontFile2 stream; TTC and
    /// OTF/CFF sources are referenced by name instead of embedded.
    pub fn is_embeddable(&self) -> bool {
        self.font_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("ttf"))
            .unwrap_or(false)
    }

    /// PDF name for the font: ASCII alphanumerics, hyphens for spaces.
    pub fn pdf_font_name(&self) -> String {
        let mut out = String::with_capacity(self.font_name.len());
        for ch in self.font_name.chars() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                out.push(ch);
            } else if ch.is_whitespace() {
                out.push('-');
            }
        }
        if out.is_empty() {
            "EmbeddedFont".to_string()
        } else {
            out
        }
    }

    /// Build the operand array for a `TJ` operation showing `text` at
    /// `size` points: UTF-16BE hex strings (Identity-H maps CID to BMP
    /// code unit) interleaved with kerning adjustments in thousandths of
    /// an em.
    pub fn tj_array(&self, text: &str, size: f32) -> Vec<Object> {
        let chars: Vec<char> = text.chars().collect();
        let mut tj = Vec::with_capacity(chars.len() * 2);
        for (i, &ch) in chars.iter().enumerate() {
            let mut utf16be = Vec::with_capacity(2);
            for unit in ch.encode_utf16(&mut [0; 2]).iter() {
                utf16be.extend_from_slice(&unit.to_be_bytes());
            }
            tj.push(Object::String(utf16be, StringFormat::Hexadecimal));

            if i + 1 < chars.len() {
                if let Some(kern) = self.font.horizontal_kern(ch, chars[i + 1], size) {
                    // TJ numbers shift the next glyph left, so a positive
                    // kern becomes a negative adjustment.
                    let adjust = -kern * 1000.0 / size;
                    if adjust != 0.0 {
                        tj.push(Object::Real(adjust));
                    }
                }
            }
        }
        tj
    }
}

/// Display name for a configured font: the file stem, so the BaseFont
/// entry names the actual typeface.
fn font_display_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .unwrap_or_else(|| "EmbeddedFont".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_font_is_named_after_its_file_stem() {
        assert_eq!(
            font_display_name(Path::new("fonts/DejaVuSans.ttf")),
            "DejaVuSans"
        );
        assert_eq!(
            font_display_name(Path::new("/usr/share/fonts/Arial Unicode.ttf")),
            "Arial Unicode"
        );
    }

    #[test]
    fn pathological_font_path_falls_back_to_a_generic_name() {
        assert_eq!(font_display_name(Path::new("..")), "EmbeddedFont");
    }
}
