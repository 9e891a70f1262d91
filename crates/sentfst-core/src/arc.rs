// Arc and label types for linear acceptors.

/// Integer word id as it appears on an arc.
///
/// Label 0 is epsilon in the AT&T text format, so real words start at 1.
pub type Label = u32;

/// Index of a state in the chain, starting at 0.
pub type StateId = u32;

/// A single arc of an acceptor-style FST.
///
/// Input and output labels are always identical; the struct still carries
/// both so that serialization writes the four-column transducer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    pub from: StateId,
    pub to: StateId,
    pub ilabel: Label,
    pub olabel: Label,
}

impl Arc {
    /// Create an arc from `from` to `to` carrying `label` on both tapes.
    pub fn new(from: StateId, to: StateId, label: Label) -> Self {
        Self {
            from,
            to,
            ilabel: label,
            olabel: label,
        }
    }

    /// Create a self-loop on `state`.
    pub fn self_loop(state: StateId, label: Label) -> Self {
        Self::new(state, state, label)
    }

    /// Whether this arc starts and ends in the same state.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
