// Sentence-to-FST builder.
//
// A sentence becomes a chain 0 -> 1 -> ... -> n over its effective token
// sequence ([bos] ++ words ++ [eos]). With a disambiguation symbol
// configured, every state of the chain also carries a self-loop on it, so the
// symbol can be consumed anywhere without advancing.

use std::fmt;

use sentfst_core::{Arc, Label, MarkerIds, StateId};

use crate::FstError;
use crate::text;

/// A linear acceptor built from one sentence.
///
/// Arcs are kept in emission order: each primary arc is directly followed by
/// the self-loop on its source state when disambiguation is enabled, and the
/// self-loop on the final state comes last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceFst {
    arcs: Vec<Arc>,
    final_state: StateId,
    label_count: usize,
}

impl SentenceFst {
    /// All arcs, in emission order.
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// The unique accepting state (the end of the chain).
    pub fn final_state(&self) -> StateId {
        self.final_state
    }

    /// Number of words in the sentence plus one for the end-of-sentence
    /// transition.
    ///
    /// This counts the sentence's own words only: configured BOS/EOS markers do
    /// not change it. Downstream readers of the `t<N>`/`b<N>` framing rely on
    /// this accounting.
    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// Arcs that advance along the chain.
    pub fn chain_arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.iter().filter(|arc| !arc.is_self_loop())
    }

    /// Disambiguation self-loops.
    pub fn self_loops(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.iter().filter(|arc| arc.is_self_loop())
    }

    /// Render the FST in AT&T text form (arc lines, then the final state).
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SentenceFst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        text::write_fst(f, &self.arcs, self.final_state)
    }
}

/// Build the linear FST for one sentence.
///
/// `words` is the sentence as parsed from one input line. Markers are taken
/// as already validated.
///
/// Fails with [`FstError::InvalidInput`] if the disambiguation symbol is one
/// of the words; `position` in the error is 1-based.
///
/// An empty `words` slice is accepted. Without BOS/EOS it yields a single
/// accepting state 0 and no chain arcs.
pub fn build_sentence_fst(words: &[Label], markers: &MarkerIds) -> Result<SentenceFst, FstError> {
    let disambig = markers.disambig();
    if let Some(d) = disambig {
        if let Some(pos) = words.iter().position(|&w| w == d) {
            return Err(FstError::InvalidInput {
                disambig_id: d,
                position: pos + 1,
            });
        }
    }

    let label_count = words.len() + 1;

    let effective = markers
        .bos()
        .into_iter()
        .chain(words.iter().copied())
        .chain(markers.eos());

    let chain_len = words.len()
        + usize::from(markers.bos().is_some())
        + usize::from(markers.eos().is_some());
    let per_step = if disambig.is_some() { 2 } else { 1 };
    let mut arcs = Vec::with_capacity(chain_len * per_step + 1);

    let mut state: StateId = 0;
    for label in effective {
        arcs.push(Arc::new(state, state + 1, label));
        if let Some(d) = disambig {
            arcs.push(Arc::self_loop(state, d));
        }
        state += 1;
    }
    if let Some(d) = disambig {
        arcs.push(Arc::self_loop(state, d));
    }

    log::trace!(
        "built sentence fst: {} words, {} arcs, final state {}",
        words.len(),
        arcs.len(),
        state
    );

    Ok(SentenceFst {
        arcs,
        final_state: state,
        label_count,
    })
}
