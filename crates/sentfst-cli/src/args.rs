// Command line arguments for sent-to-fst.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use sentfst_core::{ConfigError, MarkerIds};
use sentfst_fst::{CommandCompiler, FstCompiler};
use sentfst_fst::compile::DEFAULT_COMPILER;
use stderrlog::Timestamp;

use crate::convert::Converter;

/// Convert a set of sentences into a set of FSTs.
///
/// Each input line is one sentence of integer word ids (typically produced by
/// sym2int.pl) and yields one FST. Blank lines are skipped.
///
/// Example: sent-to-fst --disambig-symbol-id=1 < data/dev.int > data/dev.fsts
#[derive(clap::Parser, Debug)]
#[command(name = "sent-to-fst")]
pub struct Args {
    /// Id of the disambiguation symbol. If given, every state gets a
    /// self-loop on it.
    #[arg(long, allow_negative_numbers = true)]
    pub disambig_symbol_id: Option<i64>,

    /// Id of the begin-of-sentence symbol. If given, it is prepended to every
    /// sentence.
    #[arg(long, allow_negative_numbers = true)]
    pub bos_symbol_id: Option<i64>,

    /// Id of the end-of-sentence symbol. If given, it is appended to every
    /// sentence.
    #[arg(long, allow_negative_numbers = true)]
    pub eos_symbol_id: Option<i64>,

    /// Whether to compile each FST to OpenFst binary format.
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub compile_fst: bool,

    /// Compiler program used with --compile-fst=true.
    #[arg(long, default_value = DEFAULT_COMPILER)]
    pub fstcompile: PathBuf,

    /// Extra argument passed to the compiler (repeatable), e.g.
    /// --fstcompile-arg=--keep_isymbols.
    #[arg(long = "fstcompile-arg", allow_hyphen_values = true)]
    pub fstcompile_args: Vec<OsString>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub logging: LogArgs,
}

impl Args {
    /// Validate the marker options.
    pub fn markers(&self) -> Result<MarkerIds, ConfigError> {
        MarkerIds::new(
            self.disambig_symbol_id,
            self.bos_symbol_id,
            self.eos_symbol_id,
        )
    }

    /// The compiler to pipe FSTs through, if --compile-fst=true.
    pub fn compiler(&self) -> Option<CommandCompiler> {
        self.compile_fst.then(|| {
            self.fstcompile_args
                .iter()
                .fold(CommandCompiler::new(&self.fstcompile), |c, arg| c.arg(arg))
        })
    }

    /// Build the converter for these arguments, validating markers first.
    pub fn converter(&self) -> Result<Converter, ConfigError> {
        let markers = self.markers()?;
        let compiler = self
            .compiler()
            .map(|c| Box::new(c) as Box<dyn FstCompiler>);
        Ok(Converter::new(markers, compiler))
    }
}

fn squash_standard_io(path: &Option<PathBuf>) -> Option<&Path> {
    match path.as_deref() {
        Some(p) if p.as_os_str() == "-" => None,
        Some(p) => Some(p),
        None => None,
    }
}

/// Input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Optional input file; "-" or absent means stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    pub fn open_reader(&self) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
        Ok(match squash_standard_io(&self.input) {
            None => Box::new(BufReader::new(std::io::stdin().lock())),
            Some(p) => Box::new(BufReader::new(
                File::open(p).map_err(|e| format!("failed to open {}: {e}", p.display()))?,
            )),
        })
    }
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Optional output file; "-" or absent means stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match squash_standard_io(&self.output) {
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
            Some(p) => Box::new(BufWriter::new(
                File::create(p).map_err(|e| format!("failed to create {}: {e}", p.display()))?,
            )),
        })
    }
}

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[arg(short, long)]
    pub quiet: bool,

    /// Turn debugging information on (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable timestamped logging.
    #[arg(long)]
    pub ts: bool,
}

impl LogArgs {
    /// Initialise stderr logging. Warnings and errors show by default.
    pub fn setup_logging(&self) -> Result<(), Box<dyn std::error::Error>> {
        let log_level = match self.verbose {
            0 => stderrlog::LogLevelNum::Warn,
            1 => stderrlog::LogLevelNum::Info,
            2 => stderrlog::LogLevelNum::Debug,
            _ => stderrlog::LogLevelNum::Trace,
        };

        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(log_level)
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}
