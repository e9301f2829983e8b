use clap::Parser;
use fixpdf::{ConvertError, Converter, ConverterBuilder, ExecutorImpl};
use std::path::PathBuf;
use std::time::Instant;

/// Converts a fixed-layout JSON document into a PDF.
#[derive(Parser, Debug)]
#[command(name = "fixpdf", version, about)]
struct Cli {
    /// Source document (JSON)
    input: PathBuf,

    /// Destination PDF file
    output: PathBuf,

    /// Additional directory to scan for fonts (repeatable)
    #[arg(long = "font-dir", value_name = "DIR")]
    font_dirs: Vec<PathBuf>,

    /// Directory embedded parts are resolved against [default: the input's directory]
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,

    /// Do not scan the system's installed fonts
    #[arg(long)]
    no_system_fonts: bool,

    /// Label for this document in log output and errors
    #[arg(long, default_value_t = 0)]
    doc_index: usize,
}

fn main() -> Result<(), ConvertError> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let resource_root = cli.resources.clone().unwrap_or_else(|| {
        cli.input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let builder = ConverterBuilder::new()
        .with_resource_dir(resource_root)
        .with_executor(ExecutorImpl::sequential());
    let converter = configure_fonts(builder, &cli).build()?;

    let source = Converter::read_source(&cli.input)?;
    let report = converter.convert(&source, &cli.output, cli.doc_index)?;

    println!(
        "Wrote {} ({} page(s), {} skipped, {} font(s), {} bytes) in {:.2?}",
        cli.output.display(),
        report.pages,
        report.skipped,
        report.fonts,
        report.bytes,
        start.elapsed()
    );
    Ok(())
}

#[cfg(feature = "system-fonts")]
fn configure_fonts(builder: ConverterBuilder, cli: &Cli) -> ConverterBuilder {
    use fixpdf::SystemFontProvider;
    use std::sync::Arc;

    if cli.font_dirs.is_empty() && !cli.no_system_fonts {
        return builder.with_global_cache();
    }
    let provider = if cli.no_system_fonts {
        SystemFontProvider::new()
    } else {
        SystemFontProvider::with_system_fonts()
    };
    for dir in &cli.font_dirs {
        provider.add_font_dir(dir);
    }
    log::info!("Font database holds {} face(s)", provider.face_count());
    builder.with_font_provider(Arc::new(provider))
}

#[cfg(not(feature = "system-fonts"))]
fn configure_fonts(builder: ConverterBuilder, cli: &Cli) -> ConverterBuilder {
    if !cli.font_dirs.is_empty() {
        log::warn!("--font-dir ignored: built without the `system-fonts` feature");
    }
    builder.with_global_cache()
}
