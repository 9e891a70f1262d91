// sent-to-fst: Convert integer-encoded sentences into linear FSTs.
//
// Reads one sentence per line (whitespace-separated word ids) and writes one
// FST per sentence:
//   t<N>           text mode header, then AT&T text, then </FST>
//   b<N>           compiled mode header, then the compiler's output
// where N is the number of words plus one.
//
// Usage:
//   sent-to-fst [--disambig-symbol-id N] [--bos-symbol-id N] [--eos-symbol-id N]
//               [--compile-fst true|false] [--fstcompile PROGRAM]
//               [--input PATH] [--output PATH] [-q] [-v...] [--ts]

use clap::Parser;
use sentfst_cli::Args;

fn main() {
    eprintln!("{}", sentfst_cli::echo_command_line(std::env::args_os()));

    let args = Args::parse();

    if let Err(e) = args.logging.setup_logging() {
        sentfst_cli::fatal(&format!("failed to set up logging: {e}"));
    }

    match sentfst_cli::run(&args) {
        Ok(summary) => eprintln!("{}", sentfst_cli::success_message(&summary)),
        Err(e) => sentfst_cli::fatal(&e.to_string()),
    }
}
