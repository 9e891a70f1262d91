// sentfst-cli: sentence-to-FST conversion driver shared by the binary and tests.

pub mod args;
pub mod convert;

use std::ffi::OsString;
use std::process;

pub use args::Args;
pub use convert::{ConvertError, ConvertSummary, Converter, FST_SENTINEL, Framing};

/// The invoked command line, as echoed to stderr at startup.
///
/// Arguments that are not valid UTF-8 are rendered lossily.
pub fn echo_command_line(args: impl IntoIterator<Item = OsString>) -> String {
    args.into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary line written to stderr after all input was consumed.
pub fn success_message(summary: &ConvertSummary) -> String {
    format!("Success to convert {} FSTs.", summary.fsts)
}

/// Run a full conversion as configured by `args`.
///
/// Markers are validated before the input is opened, so configuration errors
/// never consume input.
pub fn run(args: &Args) -> Result<ConvertSummary, Box<dyn std::error::Error>> {
    let converter = args.converter()?;
    let input = args.input.open_reader()?;
    let output = args.output.open_writer()?;
    Ok(converter.convert_stream(input, output)?)
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_joins_arguments() {
        let args = ["sent-to-fst", "--bos-symbol-id=1", "--compile-fst", "true"].map(OsString::from);
        assert_eq!(
            echo_command_line(args),
            "sent-to-fst --bos-symbol-id=1 --compile-fst true"
        );
    }

    #[cfg(unix)]
    #[test]
    fn echo_renders_non_utf8_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("sent-to-fst"),
            OsString::from("--input"),
            OsString::from_vec(b"dev\xff.int".to_vec()),
        ];
        assert_eq!(echo_command_line(args), "sent-to-fst --input dev\u{fffd}.int");
    }

    #[test]
    fn success_message_counts_fsts() {
        let summary = ConvertSummary { fsts: 12, skipped: 3 };
        assert_eq!(success_message(&summary), "Success to convert 12 FSTs.");
    }
}
