use anyhow::Result;
use log::error;
use std::process;

use pdf_tables::{DataResource, FontContext, GeneratorConfig, PdfTableGenerator};

fn main() {
    env_logger::init();
    let config = GeneratorConfig::from_args(std::env::args().skip(1));
    if let Err(err) = run(&config) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(config: &GeneratorConfig) -> Result<()> {
    let resource = DataResource::load(&config.input_path)?;
    let fonts = FontContext::load(config.font_path.as_deref())?;
    let generator = PdfTableGenerator::new(&fonts, config)?;
    generator.generate_all(&resource)
}
