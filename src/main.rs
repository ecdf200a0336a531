use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pdf_docx::{
    CancellationToken, ConversionConfig, ConversionMode, Converter, ProgressEvent, output_filename,
    sanitize_filename,
};

/// Convert a PDF's text layer into an editable DOCX document.
#[derive(Parser, Debug)]
#[command(name = "pdf-docx", version, about)]
struct Cli {
    /// PDF file to convert
    input: PathBuf,

    /// Write the document here instead of next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title heading of the document (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,

    /// TOML file with conversion settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log pipeline details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(path) => {
            eprintln!("Output written to: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf, String> {
    let mut config = match &cli.config {
        Some(path) => ConversionConfig::from_toml_file(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        None => ConversionConfig::default(),
    };
    if let Some(title) = &cli.title {
        config.title = Some(title.clone());
    }
    let file_title = cli
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());

    eprintln!("Reading: {}", cli.input.display());
    let data = fs::read(&cli.input).map_err(|e| format!("Failed to read file: {}", e))?;

    let mut converter = Converter::native(config);
    let mut progress = |event: ProgressEvent| {
        log::info!("[{:>3}%] {}", event.percent, event.status);
    };
    let output = converter
        .convert_with_title(
            ConversionMode::Text,
            &data,
            file_title.as_deref(),
            &mut progress,
            &CancellationToken::new(),
        )
        .map_err(|e| format!("Conversion failed: {}", e))?;

    for warning in &output.warnings {
        eprintln!("Warning: {}", warning);
    }
    eprintln!("Pages converted: {}", output.page_count);

    let path = output_path(cli);
    fs::write(&path, &output.document).map_err(|e| format!("Failed to write output: {}", e))?;
    Ok(path)
}

fn output_path(cli: &Cli) -> PathBuf {
    match &cli.output {
        Some(path) => {
            let name = path
                .file_name()
                .map(|n| sanitize_filename(&n.to_string_lossy(), "docx"))
                .unwrap_or_else(|| sanitize_filename("", "docx"));
            path.with_file_name(name)
        }
        None => {
            let source = cli
                .input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let dir = cli.input.parent().unwrap_or_else(|| Path::new(""));
            dir.join(output_filename(&source))
        }
    }
}
