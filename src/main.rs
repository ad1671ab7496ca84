use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use clap::Parser;
use anyhow::{Result, bail};

use gnl::{BufferedLineStream, ReaderConfig, summarize_lines};

// Used through the library.
#[cfg(unix)]
use libc as _;
use serde as _;
use thiserror as _;
#[cfg(test)]
use proptest as _;

/// Print a file one line at a time
#[derive(Parser, Debug)]
#[command(name = "gnl")]
#[command(about = "Read a file line by line through the incremental line reader")]
#[command(version)]
struct Args {
    /// Chunk size for each read (e.g., 4, 1KB, 1MB)
    #[arg(
        short = 'c',
        long = "chunk-size",
        help = "Bytes requested per read (supports KB/MB suffixes)"
    )]
    chunk_size: Option<String>,

    /// JSON file with reader settings
    #[arg(long = "config", help = "JSON file with reader settings")]
    config: Option<PathBuf>,

    /// Print a JSON summary instead of the lines
    #[arg(short = 's', long = "summary")]
    summary: bool,

    /// File to read
    #[arg(help = "File to read")]
    file: PathBuf,
}

/// Parse chunk size string (e.g., "4", "64KB", "1MB") to bytes
fn parse_chunk_size(size_str: &str) -> Result<usize> {
    let size_str = size_str.to_uppercase();

    if let Some(num_str) = size_str.strip_suffix("MB") {
        let num: f64 = num_str.parse()?;
        Ok((num * 1024.0 * 1024.0) as usize)
    } else if let Some(num_str) = size_str.strip_suffix("KB") {
        let num: f64 = num_str.parse()?;
        Ok((num * 1024.0) as usize)
    } else {
        // Assume bytes if no suffix
        Ok(size_str.parse()?)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Settings from `--config`, then `--chunk-size` on top
fn resolve_config(args: &Args) -> Result<ReaderConfig> {
    let mut config = match &args.config {
        Some(path) => ReaderConfig::load(path)?,
        None => ReaderConfig::default(),
    };
    if let Some(raw) = &args.chunk_size {
        config.chunk_size = parse_chunk_size(raw)?;
    }
    if let Err(e) = config.validate() {
        bail!("{e}");
    }
    Ok(config)
}

/// Open `path`, or fall back to an empty source so the reader yields nothing
fn open_source(path: &Path) -> Box<dyn Read> {
    match File::open(path) {
        Ok(file) => Box::new(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot open file");
            Box::new(io::empty())
        }
    }
}

fn write_line(out: &mut impl Write, line: &[u8]) -> io::Result<()> {
    out.write_all(b"LINE: ")?;
    out.write_all(line)?;
    out.write_all(b"\n")
}

/// Print every line, reading through the raw descriptor of the opened file
#[cfg(unix)]
fn print_lines(path: &Path, config: ReaderConfig, out: &mut impl Write) -> Result<()> {
    use gnl::LineReader;
    use std::os::unix::io::AsRawFd;

    let file = match File::open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot open file");
            None
        }
    };
    // A failed open leaves an invalid descriptor, for which the reader returns no lines.
    let fd = file.as_ref().map_or(-1, |file| file.as_raw_fd());

    let mut reader = LineReader::new(config);
    while let Some(line) = reader.next_line(fd) {
        write_line(out, line.as_bytes())?;
    }
    reader.forget(fd);
    drop(file);
    Ok(())
}

#[cfg(not(unix))]
fn print_lines(path: &Path, config: ReaderConfig, out: &mut impl Write) -> Result<()> {
    let mut stream = BufferedLineStream::with_chunk_size(open_source(path), config.chunk_size);
    while let Some(line) = stream.next_line() {
        write_line(out, line.as_bytes())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage errors exit with 1; --help and --version exit cleanly.
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print()?;
            std::process::exit(code);
        }
    };

    let config = resolve_config(&args)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.summary {
        let mut stream = BufferedLineStream::try_with_config(open_source(&args.file), &config)?;
        let summary = summarize_lines(&mut stream);
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        print_lines(&args.file, config, &mut out)?;
    }

    out.flush()?;
    Ok(())
}
