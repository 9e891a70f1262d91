//! Linear sentence FSTs.
//!
//! This crate turns one sentence of integer word ids into a linear
//! acceptor in AT&T text form, optionally with begin/end-of-sentence arcs and
//! disambiguation self-loops, and can hand that text to an external
//! compiler such as OpenFst's `fstcompile`.
//!
//! # Architecture
//!
//! - [`builder`] -- Per-sentence chain construction
//! - [`text`] -- AT&T text serialization and a small acceptor reader
//! - [`compile`] -- External compiler collaborator (subprocess)

pub mod builder;
pub mod compile;
pub mod text;

pub use builder::{SentenceFst, build_sentence_fst};
pub use compile::{CommandCompiler, CompileError, FstCompiler};

use sentfst_core::Label;

/// Error type for FST construction and text parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FstError {
    /// The disambiguation symbol occurs among the sentence's words.
    #[error("disambiguation symbol {disambig_id} appears as word {position} of the sentence")]
    InvalidInput { disambig_id: Label, position: usize },

    /// A line of AT&T text could not be read.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The FST is not a single chain from the start state to a final state.
    #[error("not a linear acceptor: {0}")]
    NotLinear(String),
}
