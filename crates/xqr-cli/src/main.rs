use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xqr::{Executor, OutputConfig, Query};

const QUERY_SYNTAX: &str = "\
    SELECT element FROM element|element.attribute|ROOT|empty\n\
    \tWHERE condition LIMIT n";

const TRY_HELP: &str = "Try '--help' for more information.";

mod exit {
    pub const ARGS: u8 = 1;
    pub const READ: u8 = 2;
    pub const WRITE: u8 = 3;
    pub const INPUT_FORMAT: u8 = 4;
    pub const QUERY_FORMAT: u8 = 80;
}

#[derive(Debug, Parser)]
#[command(
    name = "xqr",
    version,
    about = "Apply an SQL-like query to an XML document and output the selected elements"
)]
struct Args {
    /// Input XML file (defaults to stdin)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Query text
    #[arg(
        long,
        value_name = "QUERY",
        conflicts_with = "qf",
        required_unless_present = "qf"
    )]
    query: Option<String>,
    /// File holding the query (cannot be combined with --query)
    #[arg(long, value_name = "FILE")]
    qf: Option<PathBuf>,
    /// Do not emit the XML declaration
    #[arg(short = 'n')]
    no_declaration: bool,
    /// Wrap the results in a root element with this name
    #[arg(long, value_name = "ELEMENT")]
    root: Option<String>,
}

impl Args {
    fn output_config(&self) -> OutputConfig {
        OutputConfig::default()
            .xml_declaration(!self.no_declaration)
            .root_element(self.root.clone())
    }
}

#[derive(Debug, Error)]
enum Failure {
    #[error("{0:#}")]
    Read(anyhow::Error),
    #[error("{0:#}")]
    Write(anyhow::Error),
    #[error("bad xml file format: {0}")]
    Xml(xqr::Error),
    #[error("bad xml query format: {0}")]
    Query(xqr::Error),
}

impl Failure {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Read(_) => exit::READ,
            Self::Write(_) => exit::WRITE,
            Self::Xml(_) => exit::INPUT_FORMAT,
            Self::Query(_) => exit::QUERY_FORMAT,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(exit::ARGS),
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("xqr: {failure}");
            if let Failure::Query(_) = failure {
                eprintln!("xml query informal specification:\n{QUERY_SYNTAX}");
                eprintln!("{TRY_HELP}");
            }
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<(), Failure> {
    let input = read_input(args.input.as_deref()).map_err(Failure::Read)?;
    let doc = xqr::from_xml_bytes(&input).map_err(Failure::Xml)?;
    debug!(root = %doc.root.name, "parsed input document");

    let query_text = match (&args.query, &args.qf) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => read_file(path).map_err(Failure::Read)?,
        (None, None) => String::new(),
    };
    let query = Query::parse(&query_text).map_err(Failure::Query)?;
    info!(%query, "running query");

    let outcome = Executor::new(&query).run(&doc.root);
    let output = xqr::render(&outcome, &args.output_config());

    write_output(args.output.as_deref(), output.as_bytes()).map_err(Failure::Write)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("couldn't open '{}' for reading", path.display()))
}

/// Raw document bytes; decoding is left to the XML layer
fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("couldn't open '{}' for reading", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("couldn't write output to '{}'", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}
