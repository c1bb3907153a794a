//! strungs - print the strings of printable characters in files
//!
//! The classic strings(1) front end over the scanning engine, honoring the
//! option dialects the command accumulated over the years.

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use strungs::{scan_file, scan_reader, Encoding, Flavour, Run, ScanConfig, Scanner, Window};

#[derive(Parser, Debug)]
#[command(name = "strungs")]
#[command(
    author,
    version,
    about = "Print the strings of printable characters in files"
)]
#[command(long_about = "
strungs walks files (or standard input) and prints every run of printable
characters that is long enough to look like text. Runs can be decoded as
7-bit or 8-bit bytes, 16-bit or 32-bit units in either byte order, or
UTF-8 with resynchronization on malformed sequences.

The FLAVOUR and STRINGS_FLAVOUR environment variables select a historical
option dialect (posix, unix, bsd, gnu, plan9, inferno); POSIXLY_CORRECT
selects posix. The default dialect accepts every option below.

EXAMPLES:
    strungs a.out                    # Classic scan
    strungs -n 8 -t x core           # Longer minimum, hex offsets
    strungs -e l firmware.bin        # UTF-16LE strings
    strungs -O 512 -L 1024 disk.img  # One on-disk window only
    strungs --json a.out             # JSON output for tooling
")]
struct Cli {
    /// Files to scan; standard input when none are given
    files: Vec<String>,

    /// Scan the entire file for strings
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Use the ':' separated list of character values as delimiters
    #[arg(short = 'D', long = "delimiters", value_name = "LIST")]
    delimiters: Option<String>,

    /// Select the character encoding to use (s, S, l, b, L, B, u)
    #[arg(short = 'e', long = "encoding", value_name = "CHAR")]
    encoding: Option<char>,

    /// Print the file name before each string
    #[arg(short = 'f', long = "print-file-name")]
    print_file_name: bool,

    /// Read NUM bytes from offset
    #[arg(short = 'L', long = "length", value_name = "NUM")]
    length: Option<u64>,

    /// Print sequences with NUM or more characters
    #[arg(short = 'n', short_alias = 'm', long = "bytes", value_name = "NUM")]
    bytes: Option<usize>,

    /// Print offsets in octal
    #[arg(short = 'o')]
    octal: bool,

    /// Skip NUM bytes from beginning of file
    #[arg(short = 'O', long = "offset", value_name = "NUM")]
    offset: Option<u64>,

    /// Use STRING as the output record separator
    #[arg(short = 's', long = "output-separator", value_name = "STRING")]
    output_separator: Option<String>,

    /// Split long lines in chunks of 70 characters
    #[arg(short = 'S', long = "split-lines")]
    split_lines: bool,

    /// Print offsets using the radix named by CHAR (d, o, x)
    #[arg(short = 't', long = "radix", value_name = "CHAR")]
    radix: Option<char>,

    /// All whitespace characters are considered to be part of a string
    #[arg(short = 'w', long = "include-all-whitespace")]
    include_all_whitespace: bool,

    /// Only print strings from initialized, loaded data sections
    #[arg(short = 'd', long = "data")]
    data: bool,

    /// Specify an object code format other than your system's default
    #[arg(short = 'T', long = "target", value_name = "FORMAT")]
    target: Option<String>,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Print machine-readable JSON records instead of plain lines
    #[arg(long)]
    json: bool,
}

/// Chunk size applied by -S and the Plan 9 dialect.
const SPLIT_CHUNK: usize = 70;
/// A very long line: splitting never triggers by default.
const NO_SPLIT: usize = 1_000_000_000;

/// How offsets render in front of each string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Decimal,
    Octal,
    Hexadecimal,
}

/// Presentation settings, resolved from the dialect preset plus flags.
#[derive(Debug)]
struct Presentation {
    print_file_name: bool,
    radix: Option<Radix>,
    split_limit: usize,
    separator: String,
    json: bool,
}

/// One reported string, as emitted by --json.
#[derive(Debug, Serialize)]
struct RunRecord {
    file: String,
    offset: u64,
    text: String,
}

fn main() -> Result<()> {
    let flavour = flavour_from_env()?;
    let argv = expand_args(std::env::args().collect(), flavour);
    let cli = Cli::parse_from(argv);

    init_tracing(cli.debug || std::env::var_os("STRINGS_DEBUG").is_some());
    debug!(?flavour, "resolved command flavour");

    refuse_unimplemented(&cli, flavour)?;

    let config = resolve_config(&cli, flavour)?;
    let presentation = resolve_presentation(&cli, flavour)?;
    debug!(?config, "resolved scan configuration");

    let mut records: Vec<RunRecord> = Vec::new();
    let mut exit_status = 0;

    if cli.files.is_empty() {
        // Standard input is always scanned whole; windows need a file.
        let stdin_config = ScanConfig {
            window: Window::Whole,
            ..config.clone()
        };
        let stdin = io::stdin();
        let scanner = scan_reader(stdin.lock(), &stdin_config)?;
        consume(scanner, "{standard input}", &presentation, &mut records);
    } else {
        let mut scan_whole = cli.all;
        for name in &cli.files {
            let path = Path::new(name);
            if path.is_file() {
                let mut file_config = config.clone();
                if scan_whole {
                    file_config.window = Window::Whole;
                }
                let scanner = scan_file(path, &file_config)?;
                consume(scanner, name, &presentation, &mut records);
            } else if name == "-" && matches!(flavour, Flavour::Posix | Flavour::Gnu) {
                // In these dialects a lone dash means "scan the remaining
                // operands entirely", not standard input.
                scan_whole = true;
            } else {
                tracing::error!("\"{name}\" is not a file name");
                exit_status = 1;
            }
        }
    }

    if presentation.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    if exit_status != 0 {
        std::process::exit(exit_status);
    }
    Ok(())
}

/// Drain one scanner, printing or collecting as the output mode asks.
fn consume<R: io::Read>(
    scanner: Scanner<R>,
    name: &str,
    presentation: &Presentation,
    records: &mut Vec<RunRecord>,
) {
    for run in scanner {
        if presentation.json {
            records.push(RunRecord {
                file: name.to_string(),
                offset: run.offset,
                text: run.text,
            });
        } else {
            print_run(name, &run, presentation);
        }
    }
}

/// Render one run, splitting long text into fixed-size chunks.
///
/// Each chunk repeats the filename and offset prefixes, a continued chunk
/// ends in "...", and the rendered offset advances by the chunk size.
fn print_run(name: &str, run: &Run, presentation: &Presentation) {
    let mut offset = run.offset;
    let mut rest = run.text.as_str();
    while !rest.is_empty() {
        let (chunk, tail) = split_chars(rest, presentation.split_limit);
        if presentation.print_file_name {
            print!("{name}: ");
        }
        match presentation.radix {
            Some(Radix::Decimal) => print!("{offset:>7} "),
            Some(Radix::Octal) => print!("{offset:>7o} "),
            Some(Radix::Hexadecimal) => print!("{offset:>7x} "),
            None => {}
        }
        print!("{chunk}");
        if !tail.is_empty() {
            print!("...");
        }
        if presentation.separator.is_empty() {
            println!();
        } else {
            println!("\n{}", presentation.separator);
        }
        rest = tail;
        offset += presentation.split_limit as u64;
    }
}

/// Split off the first `limit` characters, at a character boundary.
fn split_chars(text: &str, limit: usize) -> (&str, &str) {
    match text.char_indices().nth(limit) {
        Some((index, _)) => text.split_at(index),
        None => (text, ""),
    }
}

/// Build the scan configuration: dialect preset first, explicit flags on
/// top of it.
fn resolve_config(cli: &Cli, flavour: Flavour) -> Result<ScanConfig> {
    let mut config = flavour.scan_preset();
    if let Some(flag) = cli.encoding {
        config.encoding = Encoding::from_flag(flag)
            .ok_or_else(|| anyhow!("Invalid -e argument: must be one of {{s, S, l, b, L, B, u}}"))?;
    }
    if let Some(minimum) = cli.bytes {
        if minimum < 1 {
            bail!("Invalid -n argument: must be a positive integer");
        }
        config.min_length = minimum;
    }
    if cli.include_all_whitespace {
        config.include_whitespaces = true;
    }
    if let Some(list) = &cli.delimiters {
        for item in list.split(':') {
            let value: i64 = item
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid -D argument: list items must be integers"))?;
            // Values outside the unit range can never match a terminator;
            // keep only the ones that could.
            if let Ok(value) = u32::try_from(value) {
                config.terminators.push(value);
            }
        }
    }
    if cli.offset.is_some() || cli.length.is_some() {
        config.window = Window::Part {
            offset: cli.offset.unwrap_or(0),
            length: cli.length,
        };
    }
    config.validate()?;
    Ok(config)
}

/// Resolve how runs get printed: dialect preset, then -o, -t, -S, -s, -f.
fn resolve_presentation(cli: &Cli, flavour: Flavour) -> Result<Presentation> {
    let (mut radix, mut split_limit) = match flavour {
        Flavour::Plan9 | Flavour::Inferno => (Some(Radix::Decimal), SPLIT_CHUNK),
        _ => (None, NO_SPLIT),
    };
    if cli.octal {
        radix = Some(Radix::Octal);
    }
    if let Some(flag) = cli.radix {
        radix = Some(match flag.to_ascii_lowercase() {
            'd' => Radix::Decimal,
            'o' => Radix::Octal,
            'x' => Radix::Hexadecimal,
            _ => bail!("Invalid -t argument: must be (d)ecimal, (o)ctal or he(x)adecimal"),
        });
    }
    if cli.split_lines {
        split_limit = SPLIT_CHUNK;
    }
    Ok(Presentation {
        print_file_name: cli.print_file_name,
        radix,
        split_limit,
        separator: cli.output_separator.clone().unwrap_or_default(),
        json: cli.json,
    })
}

/// The object-code options every dialect recognizes but none implements.
fn refuse_unimplemented(cli: &Cli, flavour: Flavour) -> Result<()> {
    if cli.data {
        if flavour == Flavour::Unix {
            bail!("Looking for strings in the data segment of an a.out object file is not implemented");
        }
        bail!("Looking for strings in the initialized & loaded data sections of a file is not implemented");
    }
    if cli.target.is_some() {
        bail!("Specifying an object code format is not implemented");
    }
    if flavour == Flavour::Unix {
        if cli.output_separator.is_some() {
            bail!("Looking for symbol strings in the symbol table of an a.out object file is not implemented");
        }
        if cli.radix.is_some() {
            bail!("Looking for strings in the text segment of an a.out object file is not implemented");
        }
    }
    Ok(())
}

/// Resolve the command dialect from the environment, the way the strings
/// family always has: FLAVOUR, then STRINGS_FLAVOUR, then POSIXLY_CORRECT.
fn flavour_from_env() -> Result<Flavour> {
    let mut tag: Option<String> = None;
    if let Ok(value) = std::env::var("FLAVOUR") {
        tag = Some(value.to_lowercase());
    }
    if let Ok(value) = std::env::var("STRINGS_FLAVOUR") {
        tag = Some(value.to_lowercase());
    }
    if std::env::var_os("POSIXLY_CORRECT").is_some() {
        tag = Some("posix".to_string());
    }
    match tag {
        None => Ok(Flavour::default()),
        Some(tag) => {
            Flavour::from_tag(&tag).ok_or_else(|| anyhow!("Unimplemented command FLAVOUR: {tag}"))
        }
    }
}

/// Maximum @file nesting. A chain deeper than this (a self-referential
/// file, in practice) stops expanding and the argument stays verbatim.
const RESPONSE_FILE_DEPTH: usize = 8;

/// Rewrite the raw command line before clap sees it: expand @file response
/// arguments (honored by the default and gnu dialects) and turn the
/// historical -NUM shorthand into -n NUM. Spliced parts go through the
/// same rewriting, so a response file can say -6, end the options with --,
/// or name another @file.
fn expand_args(argv: Vec<String>, flavour: Flavour) -> Vec<String> {
    let expand_files = matches!(flavour, Flavour::Pnu | Flavour::Gnu);
    let mut out = Vec::with_capacity(argv.len());
    let mut options_done = false;
    let mut argv = argv.into_iter();
    if let Some(binary) = argv.next() {
        out.push(binary);
    }
    for arg in argv {
        expand_one(arg, expand_files, &mut options_done, 0, &mut out);
    }
    out
}

/// Process one raw argument, recursively for the parts of an @file.
fn expand_one(
    arg: String,
    expand_files: bool,
    options_done: &mut bool,
    depth: usize,
    out: &mut Vec<String>,
) {
    if !*options_done && arg == "--" {
        *options_done = true;
        out.push(arg);
        return;
    }
    if expand_files && depth < RESPONSE_FILE_DEPTH && arg.starts_with('@') {
        if let Some(parts) = response_file_parts(&arg) {
            for part in parts {
                expand_one(part, expand_files, options_done, depth + 1, out);
            }
            return;
        }
    }
    if !*options_done {
        if let Some(digits) = numeric_shorthand(&arg) {
            out.push("-n".to_string());
            out.push(digits.to_string());
            return;
        }
    }
    out.push(arg);
}

/// `-NUM` sets the minimum length: a single dash followed by digits only.
fn numeric_shorthand(arg: &str) -> Option<&str> {
    let digits = arg.strip_prefix('-')?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// The first line of an @file argument, split like a shell would. `None`
/// when the name is not a readable file; the caller then keeps the
/// argument verbatim.
fn response_file_parts(arg: &str) -> Option<Vec<String>> {
    let path = Path::new(&arg[1..]);
    if !path.is_file() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    let first_line = content.lines().next().unwrap_or_default();
    Some(shlex::split(first_line).unwrap_or_default())
}

/// Route diagnostics through tracing: quiet by default, everything at
/// debug level when --debug or STRINGS_DEBUG asks for it, RUST_LOG
/// respected otherwise.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
