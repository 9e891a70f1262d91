// External FST compiler collaborator.
//
// The builder only ever produces text. Turning that text into a binary FST
// is delegated to an external program (OpenFst's `fstcompile` by default)
// that reads AT&T text on stdin and writes the compiled FST to stdout.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

/// Default compiler program name, looked up on `PATH`.
pub const DEFAULT_COMPILER: &str = "fstcompile";

/// Error raised by an [`FstCompiler`].
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Writing the FST text to the compiler's stdin failed.
    #[error("failed to write fst text to compiler: {0}")]
    Write(#[source] io::Error),

    /// Waiting for the compiler or reading its output failed.
    #[error("failed to read compiler output: {0}")]
    Wait(#[source] io::Error),

    /// The compiler exited unsuccessfully.
    #[error("{program} exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Something that compiles AT&T FST text into its binary form.
pub trait FstCompiler {
    /// Compile one FST description, returning the compiler's raw output.
    fn compile(&self, fst_text: &str) -> Result<Vec<u8>, CompileError>;
}

/// Compiles by piping the text through an external program.
///
/// One process is spawned per call. The call blocks until the process has
/// exited and is always reaped before returning, on success and on error.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandCompiler {
    /// Use `program` with no extra arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument passed to every invocation.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program().display().to_string()
    }
}

impl Default for CommandCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER)
    }
}

impl FstCompiler for CommandCompiler {
    fn compile(&self, fst_text: &str) -> Result<Vec<u8>, CompileError> {
        log::debug!("running {} on {} bytes", self.program_name(), fst_text.len());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: self.program_name(),
                source,
            })?;

        // stdin is written from a scoped thread so a compiler that starts
        // writing output before reading all input cannot deadlock us. The
        // pipe is closed when the thread drops it.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(fst_text.as_bytes()),
                None => Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "compiler stdin was not captured",
                )),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(CompileError::Wait)?;
        if !output.status.success() {
            return Err(CompileError::Failed {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(CompileError::Write)?;

        log::debug!("{} produced {} bytes", self.program_name(), output.stdout.len());
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_program_is_fstcompile() {
        let compiler = CommandCompiler::default();
        assert_eq!(compiler.program(), Path::new("fstcompile"));
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let compiler = CommandCompiler::new("/nonexistent/sentfst-no-such-compiler");
        let err = compiler.compile("0\n").unwrap_err();
        assert!(matches!(err, CompileError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn passthrough_program_returns_its_output() {
        let compiler = CommandCompiler::new("cat");
        let out = compiler.compile("0 1 5 5\n1\n").unwrap();
        assert_eq!(out, b"0 1 5 5\n1\n");
    }

    #[cfg(unix)]
    #[test]
    fn large_input_does_not_deadlock() {
        let text: String = (0..200_000u32)
            .map(|i| format!("{} {} 7 7\n", i, i + 1))
            .collect();
        let out = CommandCompiler::new("cat").compile(&text).unwrap();
        assert_eq!(out.len(), text.len());
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_status() {
        let compiler = CommandCompiler::new("sh")
            .arg("-c")
            .arg("cat >/dev/null; echo bad input >&2; exit 3");
        let err = compiler.compile("0\n").unwrap_err();
        match err {
            CompileError::Failed {
                status, stderr, ..
            } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "bad input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failure_message_includes_stderr() {
        let err = CommandCompiler::new("sh")
            .arg("-c")
            .arg("echo no symbols >&2; exit 2")
            .compile("0\n")
            .unwrap_err();
        assert_eq!(err.to_string(), "sh exited with exit status: 2: no symbols");
    }

    #[cfg(unix)]
    #[test]
    fn silent_failure_message_has_no_separator() {
        let err = CommandCompiler::new("false").compile("0\n").unwrap_err();
        assert_eq!(err.to_string(), "false exited with exit status: 1");
    }
}
