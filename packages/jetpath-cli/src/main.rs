//! # jetpath CLI
//!
//! Streams a JSON file through the extractor and prints every value matching
//! the given selectors, one per line, in document order.
//!
//! ## Usage
//! ```sh
//! jetpath --src feed.json '$.store.book[*].price'
//! jetpath --src feed.json --key -o prices.txt '$.store.book[*].price' '$.expensive'
//! ```

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use jetpath::{HandlerError, RawHandler, StreamDecoder, StreamHandler};

#[derive(Parser, Debug)]
#[command(author, version, about = "Stream raw JSON values matching JSONPath selectors")]
struct Cli {
    /// Input file to read
    #[arg(long)]
    src: PathBuf,

    /// Print the matched path before each value
    #[arg(long)]
    key: bool,

    /// Output file (defaults to stdout)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Selectors to extract, e.g. '$.store.book[*]'
    #[arg(required = true, value_name = "SELECTOR")]
    selectors: Vec<String>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let source = File::open(&cli.src)
        .with_context(|| format!("cannot open input file {}", cli.src.display()))?;

    let sink: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    // Callbacks are serialized by the decoder, so a single shared writer is
    // safe; the RefCell only bridges the per-handler closures.
    let sink = Rc::new(RefCell::new(sink));

    log::info!(
        "extracting {} from {}",
        cli.selectors.join(", "),
        cli.src.display()
    );

    let print_key = cli.key;
    let mut handlers: Vec<RawHandler<_>> = cli
        .selectors
        .iter()
        .map(|selector| {
            let out = Rc::clone(&sink);
            RawHandler::new(
                selector.clone(),
                move |path: &[u8], value: &[u8]| -> Result<(), HandlerError> {
                    let mut out = out.borrow_mut();
                    if print_key {
                        out.write_all(path)?;
                        out.write_all(b" ")?;
                    }
                    out.write_all(value)?;
                    out.write_all(b"\n")?;
                    Ok(())
                },
            )
        })
        .collect();

    let mut dyn_handlers: Vec<&mut dyn StreamHandler> = handlers
        .iter_mut()
        .map(|h| h as &mut dyn StreamHandler)
        .collect();

    StreamDecoder::new(BufReader::new(source))
        .decode(&mut dyn_handlers)
        .context("decode failed")?;

    sink.borrow_mut().flush().context("cannot flush output")?;
    Ok(())
}
