// Line-oriented conversion of sentences into framed FSTs.
//
// Each non-blank input line is one sentence of word ids. For every sentence
// the converter writes a header line (`t<N>` for text, `b<N>` for compiled
// output) followed by the FST; text output is closed by a `</FST>` line.

use std::io::{self, BufRead, Write};

use sentfst_core::{Label, MarkerIds};
use sentfst_fst::{CompileError, FstCompiler, FstError, build_sentence_fst};

/// Closing line of a text-framed FST.
pub const FST_SENTINEL: &str = "</FST>";

/// Error raised while converting a stream. Carries the 1-based line number.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read input line {line_no}: {source}")]
    Read {
        line_no: usize,
        #[source]
        source: io::Error,
    },

    #[error("line {line_no}: invalid word id '{token}' in \"{line}\"")]
    InvalidToken {
        line_no: usize,
        token: String,
        line: String,
    },

    #[error("line {line_no}: {source} in \"{line}\"")]
    InvalidInput {
        line_no: usize,
        line: String,
        #[source]
        source: FstError,
    },

    #[error("line {line_no}: failed to compile fst for \"{line}\": {source}")]
    Compile {
        line_no: usize,
        line: String,
        #[source]
        source: CompileError,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

/// Output framing for each converted sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `t<N>`, the AT&T text, `</FST>`.
    Text,
    /// `b<N>`, then the compiler output verbatim.
    Compiled,
}

impl Framing {
    /// First character of the per-sentence header line.
    pub fn header_prefix(self) -> char {
        match self {
            Framing::Text => 't',
            Framing::Compiled => 'b',
        }
    }
}

/// Totals for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Number of non-blank lines converted.
    pub fsts: usize,
    /// Number of blank lines skipped.
    pub skipped: usize,
}

/// Converts sentences to framed FSTs with a fixed marker configuration.
pub struct Converter {
    markers: MarkerIds,
    compiler: Option<Box<dyn FstCompiler>>,
}

impl Converter {
    /// Create a converter. With a `compiler` every FST is piped through it
    /// and framed as compiled output; without one, FSTs are framed as text.
    pub fn new(markers: MarkerIds, compiler: Option<Box<dyn FstCompiler>>) -> Self {
        Self { markers, compiler }
    }

    pub fn framing(&self) -> Framing {
        if self.compiler.is_some() {
            Framing::Compiled
        } else {
            Framing::Text
        }
    }

    /// Convert one input line and write its framed FST to `out`.
    ///
    /// Returns `Ok(false)` without writing anything when the line is blank.
    /// On error nothing is written for this line.
    pub fn convert_line<W: Write + ?Sized>(
        &self,
        line_no: usize,
        line: &str,
        out: &mut W,
    ) -> Result<bool, ConvertError> {
        let words = parse_words(line_no, line)?;
        if words.is_empty() {
            return Ok(false);
        }

        let fst = build_sentence_fst(&words, &self.markers).map_err(|source| {
            ConvertError::InvalidInput {
                line_no,
                line: line.trim().to_string(),
                source,
            }
        })?;
        let text = fst.to_text();
        let framing = self.framing();

        let body = match &self.compiler {
            None => text.into_bytes(),
            Some(compiler) => compiler.compile(&text).map_err(|source| ConvertError::Compile {
                line_no,
                line: line.trim().to_string(),
                source,
            })?,
        };

        writeln!(out, "{}{}", framing.header_prefix(), fst.label_count())?;
        out.write_all(&body)?;
        if framing == Framing::Text {
            writeln!(out, "{FST_SENTINEL}")?;
        }

        log::debug!(
            "line {line_no}: {} words, {} arcs",
            words.len(),
            fst.arcs().len()
        );
        Ok(true)
    }

    /// Convert every line of `input`, writing framed FSTs to `output`.
    ///
    /// Stops at the first error. The output is flushed before returning
    /// successfully.
    pub fn convert_stream<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<ConvertSummary, ConvertError> {
        let mut summary = ConvertSummary::default();
        log::debug!("converting with {:?} framing", self.framing());

        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| ConvertError::Read { line_no, source })?;
            if self.convert_line(line_no, &line, &mut output)? {
                summary.fsts += 1;
            } else {
                summary.skipped += 1;
            }
        }

        output.flush()?;
        log::info!(
            "converted {} sentences ({} blank lines skipped)",
            summary.fsts,
            summary.skipped
        );
        Ok(summary)
    }
}

/// Split a line into word ids. Word ids must be positive integers.
pub fn parse_words(line_no: usize, line: &str) -> Result<Vec<Label>, ConvertError> {
    line.split_whitespace()
        .map(|token| match token.parse::<Label>() {
            Ok(word) if word > 0 => Ok(word),
            _ => Err(ConvertError::InvalidToken {
                line_no,
                token: token.to_string(),
                line: line.trim().to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn convert(converter: &Converter, input: &str) -> (Result<ConvertSummary, ConvertError>, String) {
        let mut out = Vec::new();
        let result = converter.convert_stream(input.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    /// Compiler stand-in that records its inputs and echoes a marker.
    struct RecordingCompiler {
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl FstCompiler for RecordingCompiler {
        fn compile(&self, fst_text: &str) -> Result<Vec<u8>, CompileError> {
            self.seen.borrow_mut().push(fst_text.to_string());
            Ok(format!("<bin:{}>", fst_text.lines().count()).into_bytes())
        }
    }

    struct FailingCompiler;

    impl FstCompiler for FailingCompiler {
        fn compile(&self, _fst_text: &str) -> Result<Vec<u8>, CompileError> {
            Err(CompileError::Write(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "broken pipe",
            )))
        }
    }

    #[test]
    fn header_prefixes() {
        assert_eq!(Framing::Text.header_prefix(), 't');
        assert_eq!(Framing::Compiled.header_prefix(), 'b');
    }

    #[test]
    fn parse_words_splits_on_whitespace() {
        assert_eq!(parse_words(1, " 5\t7  9 ").unwrap(), vec![5, 7, 9]);
        assert!(parse_words(1, "   ").unwrap().is_empty());
    }

    #[test]
    fn parse_words_rejects_garbage() {
        for bad in ["5 x 7", "5 -2", "0", "5 99999999999"] {
            assert!(
                matches!(
                    parse_words(4, bad),
                    Err(ConvertError::InvalidToken { line_no: 4, .. })
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn text_framing() {
        let converter = Converter::new(MarkerIds::none(), None);
        assert_eq!(converter.framing(), Framing::Text);
        let (result, out) = convert(&converter, "5 7\n");
        assert_eq!(result.unwrap().fsts, 1);
        assert_eq!(out, "t3\n0 1 5 5\n1 2 7 7\n2\n</FST>\n");
    }

    #[test]
    fn blank_lines_are_skipped_and_not_counted() {
        let converter = Converter::new(MarkerIds::none(), None);
        let (result, out) = convert(&converter, "\n5\n   \n\t\n6 8\n");
        let summary = result.unwrap();
        assert_eq!(summary, ConvertSummary { fsts: 2, skipped: 3 });
        assert_eq!(out, "t2\n0 1 5 5\n1\n</FST>\nt3\n0 1 6 6\n1 2 8 8\n2\n</FST>\n");
    }

    #[test]
    fn compiled_framing_has_no_sentinel() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let converter = Converter::new(
            MarkerIds::none(),
            Some(Box::new(RecordingCompiler { seen: seen.clone() })),
        );
        assert_eq!(converter.framing(), Framing::Compiled);

        let (result, out) = convert(&converter, "5 7\n9\n");
        assert_eq!(result.unwrap().fsts, 2);
        assert_eq!(out, "b3\n<bin:3>b2\n<bin:2>");
        assert_eq!(
            *seen.borrow(),
            vec!["0 1 5 5\n1 2 7 7\n2\n".to_string(), "0 1 9 9\n1\n".to_string()]
        );
    }

    #[test]
    fn collision_aborts_with_line_context() {
        let markers = MarkerIds::new(Some(7), None, None).unwrap();
        let converter = Converter::new(markers, None);
        let (result, out) = convert(&converter, "5\n\n5 7\n8\n");
        match result.unwrap_err() {
            ConvertError::InvalidInput {
                line_no,
                line,
                source,
            } => {
                assert_eq!(line_no, 3);
                assert_eq!(line, "5 7");
                assert_eq!(
                    source,
                    FstError::InvalidInput {
                        disambig_id: 7,
                        position: 2
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        // Only the first sentence made it out.
        assert_eq!(out, "t2\n0 1 5 5\n0 0 7 7\n1 1 7 7\n1\n</FST>\n");
    }

    #[test]
    fn compiler_failure_is_fatal_for_the_line() {
        let converter = Converter::new(MarkerIds::none(), Some(Box::new(FailingCompiler)));
        let (result, out) = convert(&converter, "4 2\n");
        let err = result.unwrap_err();
        assert!(matches!(err, ConvertError::Compile { line_no: 1, .. }));
        assert!(err.to_string().contains("\"4 2\""));
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_token_reports_line() {
        let converter = Converter::new(MarkerIds::none(), None);
        let (result, _) = convert(&converter, "1 2\n3 four\n");
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: invalid word id 'four' in \"3 four\""
        );
    }
}
