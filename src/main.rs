//! # utf8-convert CLI
//!
//! Command-line interface for detecting the encoding of text files and
//! normalizing them to UTF-8.

#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;
#[cfg(feature = "cli")]
use tracing::{debug, info};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use utf8_convert::scoring::Candidate;
#[cfg(feature = "cli")]
use utf8_convert::{Conversion, Encoding, convert_from, convert_to_utf8, detect, fs};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// utf8-convert: detect text encodings and convert to UTF-8
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "utf8-convert")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Detect the encoding of a file
    Detect(DetectArgs),

    /// Convert a file to UTF-8
    Convert(ConvertArgs),

    /// List all supported encodings
    List(ListArgs),
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct DetectArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Show single-byte candidate scores
    #[arg(long)]
    scores: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ConvertArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert in-place (atomically replace the input file)
    #[arg(long, conflicts_with = "output", requires = "input")]
    in_place: bool,

    /// Source encoding; detected when not given
    #[arg(short = 'f', long = "from")]
    from: Option<Encoding>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ListArgs {
    /// Show encoding details
    #[arg(long)]
    details: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct DetectReport<'a> {
    file: Option<&'a Path>,
    encoding: Encoding,
    method: &'static str,
    bom_detected: bool,
    bom_len: Option<usize>,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<&'a [Candidate]>,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionReport<'a> {
    success: bool,
    encoding: Encoding,
    forced: bool,
    bom_stripped: bool,
    bytes_read: usize,
    bytes_written: usize,
    output: Option<&'a Path>,
    processing_time_ms: u64,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct EncodingInfo {
    name: &'static str,
    category: &'static str,
    description: &'static str,
    bom: Option<String>,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Detect(ref args) => detect_command(args, &cli)?,
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::List(ref args) => list_command(args, &cli)?,
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise `--verbose` selects debug.
#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => {
            debug!(path = %path.display(), "reading input file");
            fs::read_all_bytes(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            debug!("reading from stdin");
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn detect_command(args: &DetectArgs, cli: &Cli) -> Result<()> {
    let data = read_input(args.input.as_deref())?;
    let result = detect(&data);

    match cli.format {
        OutputFormat::Json => {
            let report = DetectReport {
                file: args.input.as_deref(),
                encoding: result.encoding,
                method: result.method.name(),
                bom_detected: result.bom_detected(),
                bom_len: result.bom_len,
                size: data.len(),
                candidates: args.scores.then_some(result.candidates.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Detected encoding: {}", result.encoding);
            println!("Method: {}", result.method.name());

            if let Some(len) = result.bom_len {
                println!("BOM detected: Yes ({len} bytes)");
            }

            println!("Size: {} bytes", data.len());

            if args.scores {
                if result.candidates.is_empty() {
                    println!("\nNo single-byte scoring was needed");
                } else {
                    println!("\nCandidate scores:");
                    for candidate in &result.candidates {
                        println!("  {:15} {:.4}", candidate.encoding.name(), candidate.score);
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = std::time::Instant::now();

    let input_data = read_input(args.input.as_deref())?;

    let converted: Conversion<'_> = match args.from {
        Some(encoding) => {
            debug!(encoding = encoding.name(), "using forced source encoding");
            convert_from(&input_data, encoding)
        }
        None => convert_to_utf8(&input_data),
    };
    let encoding = converted.encoding;
    let bom_stripped = converted.bom_len.is_some();
    let output_data = converted.as_bytes();

    let written_to = if args.in_place {
        let path = args
            .input
            .as_deref()
            .context("Cannot use --in-place without input file")?;
        fs::replace_atomically(path, output_data)
            .with_context(|| format!("Failed to replace input file: {}", path.display()))?;
        info!(path = %path.display(), "updated file in place");
        Some(path)
    } else if let Some(ref output_path) = args.output {
        fs::write_all_bytes(output_path, output_data)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
        info!(path = %output_path.display(), "wrote output file");
        Some(output_path.as_path())
    } else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(output_data)
            .and_then(|()| stdout.flush())
            .context("Failed to write to stdout")?;
        None
    };

    let processing_time = start_time.elapsed();
    debug!(
        bytes_read = input_data.len(),
        bytes_written = output_data.len(),
        ?processing_time,
        "conversion finished"
    );

    match cli.format {
        OutputFormat::Json => {
            let report = ConversionReport {
                success: true,
                encoding,
                forced: args.from.is_some(),
                bom_stripped,
                bytes_read: input_data.len(),
                bytes_written: output_data.len(),
                output: written_to,
                processing_time_ms: processing_time.as_millis() as u64,
            };
            let json = serde_json::to_string_pretty(&report)?;
            // Converted text owns stdout when no output file was given
            if written_to.is_some() {
                println!("{json}");
            } else {
                eprintln!("{json}");
            }
        }
        OutputFormat::Text => {
            if let Some(path) = written_to {
                println!("Converted {} from {} to UTF-8", path.display(), encoding);
            } else if cli.verbose {
                eprintln!("Converted from {encoding} to UTF-8");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn list_command(args: &ListArgs, cli: &Cli) -> Result<()> {
    let encodings: Vec<EncodingInfo> = Encoding::ALL
        .iter()
        .map(|&encoding| EncodingInfo {
            name: encoding.name(),
            category: if encoding.is_unicode() { "unicode" } else { "cyrillic" },
            description: encoding_description(encoding),
            bom: encoding.bom().map(|bom| format!("{bom:02X?}")),
        })
        .collect();

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&encodings)?);
        }
        OutputFormat::Text => {
            println!("Supported Encodings ({} total):", encodings.len());
            println!();

            for info in &encodings {
                println!(
                    "{:15} {:11} {}",
                    info.name,
                    format!("[{}]", info.category),
                    info.description
                );

                if args.details {
                    match info.bom {
                        Some(ref bom) => println!("                BOM: {bom}"),
                        None => println!("                BOM: None"),
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn encoding_description(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::UTF8 => "Unicode Transformation Format 8-bit, variable-length encoding",
        Encoding::UTF16LE => "Unicode Transformation Format 16-bit, little-endian",
        Encoding::UTF16BE => "Unicode Transformation Format 16-bit, big-endian",
        Encoding::UTF32LE => "Unicode Transformation Format 32-bit, little-endian",
        Encoding::UTF32BE => "Unicode Transformation Format 32-bit, big-endian",
        Encoding::WINDOWS_1251 => "Windows code page for Cyrillic languages",
        Encoding::KOI8_R => "KOI8 Russian, common in Unix mail and Usenet",
        Encoding::ISO_8859_5 => "Latin/Cyrillic alphabet, ISO 8859 part 5",
        Encoding::MAC_CYRILLIC => "Classic Macintosh Cyrillic character encoding",
    }
}
