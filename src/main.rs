//! readlines - print the lines of a file using the chunked line splitter
//!
//! Lines are written to stdout as raw bytes, each followed by `\n`, whatever
//! terminator they had in the input.

use anyhow::{Context, Result};
use bstr::ByteSlice;
use clap::{value_parser, Arg, ArgAction, Command};
use readlines::{FileSource, ReaderConfig};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = Command::new("readlines")
        .version(readlines::VERSION)
        .about("Print the lines of a file, splitting on LF, CR and CR+LF")
        .long_about(
            "readlines reads a file in fixed-size chunks and prints one line at a time \
             without loading the whole file into memory.",
        )
        .arg(
            Arg::new("file")
                .help("Path to the file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("buffer-size")
                .short('b')
                .long("buffer-size")
                .help("Bytes requested per read")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("offset")
                .short('o')
                .long("offset")
                .help("Byte offset to start reading from")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("number")
                .short('n')
                .long("number")
                .help("Prefix each line with its line number")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("escape")
                .short('e')
                .long("escape")
                .help("Print lines quoted with non-printable bytes escaped")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .help("Only print the number of lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let file_path = PathBuf::from(
        matches
            .get_one::<String>("file")
            .context("file argument is required")?,
    );

    let mut config = load_config()?;
    if let Some(&buffer_size) = matches.get_one::<usize>("buffer-size") {
        config.buffer_size = buffer_size;
    }
    if let Some(&offset) = matches.get_one::<u64>("offset") {
        config.start_offset = offset;
    }
    log::debug!("reader configuration: {:?}", config);

    let source = FileSource::open(&file_path)
        .with_context(|| format!("Cannot read {}", file_path.display()))?;
    let lines = source
        .lines(config.options())
        .context("Invalid reader settings")?;

    let output = OutputMode {
        number: matches.get_flag("number"),
        escape: matches.get_flag("escape"),
        count: matches.get_flag("count"),
    };

    match print_lines(lines, output) {
        Err(e) if is_broken_pipe(&e) => Ok(()),
        other => other,
    }
}

#[derive(Debug, Clone, Copy)]
struct OutputMode {
    number: bool,
    escape: bool,
    count: bool,
}

fn print_lines(
    lines: impl Iterator<Item = readlines::Result<Vec<u8>>>,
    mode: OutputMode,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut total: u64 = 0;

    for line in lines {
        let line = line.context("Failed while reading lines")?;
        total += 1;
        if mode.count {
            continue;
        }
        if mode.number {
            write!(out, "{:>6}\t", total)?;
        }
        if mode.escape {
            write!(out, "{:?}", line.as_bstr())?;
        } else {
            out.write_all(&line)?;
        }
        out.write_all(b"\n")?;
    }

    if mode.count {
        writeln!(out, "{}", total)?;
    }
    out.flush()?;
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

/// Initialize logging based on verbosity level; `RUST_LOG` still wins
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

#[cfg(feature = "config")]
fn load_config() -> Result<ReaderConfig> {
    ReaderConfig::load().context("Failed to load configuration")
}

#[cfg(not(feature = "config"))]
fn load_config() -> Result<ReaderConfig> {
    Ok(ReaderConfig::default())
}
