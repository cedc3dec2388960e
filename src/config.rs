//! Run configuration
//!
//! Everything the generator needs from the outside world in one struct:
//! where the resource file lives, where output goes, which typeface to
//! embed, and how many data rows fit on a page.

use std::path::PathBuf;

/// Rows per page used by the original tables.
pub const DEFAULT_ROWS_PER_PAGE: usize = 20;

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// JSON resource file with the word lists.
    pub input_path: PathBuf,
    /// Directory the PDF files are written into.
    pub output_dir: PathBuf,
    /// Typeface to embed. `None` probes a list of common system fonts.
    pub font_path: Option<PathBuf>,
    /// Data rows per page, header excluded.
    pub rows_per_page: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            input_path: PathBuf::from("resources/resource.json"),
            output_dir: PathBuf::from("output"),
            font_path: None,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl GeneratorConfig {
    /// Build a config from positional arguments: input JSON, output
    /// directory, font file. Missing arguments keep their defaults.
    pub fn from_args<I>(mut args: I) -> Self
    where
        I: Iterator<Item = String>,
    {
        let mut config = GeneratorConfig::default();
        if let Some(input) = args.next() {
            config.input_path = PathBuf::from(input);
        }
        if let Some(output) = args.next() {
            config.output_dir = PathBuf::from(output);
        }
        if let Some(font) = args.next() {
            config.font_path = Some(PathBuf::from(font));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_args() {
        let config = GeneratorConfig::from_args(std::iter::empty());
        assert_eq!(config.input_path, PathBuf::from("resources/resource.json"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.font_path.is_none());
        assert_eq!(config.rows_per_page, 20);
    }

    #[test]
    fn positional_args_override_defaults() {
        let args = ["data.json", "out", "fonts/unicode.ttf"]
            .iter()
            .map(|s| s.to_string());
        let config = GeneratorConfig::from_args(args);
        assert_eq!(config.input_path, PathBuf::from("data.json"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.font_path, Some(PathBuf::from("fonts/unicode.ttf")));
    }
}
