// AT&T text format: writer for sentence FSTs and a small reader.
//
// Arc lines are `src dest ilabel olabel [weight]` (transducer form) or
// `src dest label [weight]` (acceptor form), final-state lines are
// `state [weight]`. The start state is the source state of the first line.
// Missing weights mean zero cost in the tropical semiring.

use std::fmt;

use hashbrown::HashMap;
use sentfst_core::{Arc, Label, StateId};

use crate::FstError;

/// Write one arc line.
pub fn write_arc<W: fmt::Write>(out: &mut W, arc: &Arc) -> fmt::Result {
    writeln!(out, "{} {} {} {}", arc.from, arc.to, arc.ilabel, arc.olabel)
}

/// Write all arcs followed by the final-state line (no final weight).
pub fn write_fst<W: fmt::Write>(out: &mut W, arcs: &[Arc], final_state: StateId) -> fmt::Result {
    for arc in arcs {
        write_arc(out, arc)?;
    }
    writeln!(out, "{final_state}")
}

/// An arc read back from text, with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextArc {
    pub to: StateId,
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: f32,
}

/// An FST read from AT&T text.
#[derive(Debug, Clone, Default)]
pub struct TextFst {
    start: Option<StateId>,
    arcs: HashMap<StateId, Vec<TextArc>>,
    finals: HashMap<StateId, f32>,
}

impl TextFst {
    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    /// Outgoing arcs of `state`, in file order.
    pub fn arcs_from(&self, state: StateId) -> &[TextArc] {
        self.arcs.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Final weight of `state`, or `None` if it is not accepting.
    pub fn final_weight(&self, state: StateId) -> Option<f32> {
        self.finals.get(&state).copied()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.values().map(Vec::len).sum()
    }

    /// Follow the unique path from the start state to a final state.
    ///
    /// Self-loops are ignored. Returns the labels along the path and the
    /// total cost (arc weights plus the final weight). Fails if some state
    /// offers more than one way forward, if a label pair differs (not an
    /// acceptor), or if the path ends in a non-final state.
    pub fn single_path(&self) -> Result<(Vec<Label>, f32), FstError> {
        let mut state = self
            .start
            .ok_or_else(|| FstError::NotLinear("no start state".to_string()))?;
        let mut labels = Vec::new();
        let mut cost = 0.0f32;

        // A simple path visits every non-loop arc at most once.
        let limit = self.num_arcs();
        loop {
            let mut forward = self.arcs_from(state).iter().filter(|a| a.to != state);
            let next = forward.next();
            if forward.next().is_some() {
                return Err(FstError::NotLinear(format!(
                    "state {state} has more than one outgoing arc"
                )));
            }

            match (next, self.final_weight(state)) {
                (None, Some(final_weight)) => return Ok((labels, cost + final_weight)),
                (None, None) => {
                    return Err(FstError::NotLinear(format!(
                        "path ends in non-final state {state}"
                    )));
                }
                (Some(_), Some(_)) => {
                    return Err(FstError::NotLinear(format!(
                        "final state {state} has an outgoing arc"
                    )));
                }
                (Some(arc), None) => {
                    if arc.ilabel != arc.olabel {
                        return Err(FstError::NotLinear(format!(
                            "arc from state {state} has labels {}:{}",
                            arc.ilabel, arc.olabel
                        )));
                    }
                    if labels.len() >= limit {
                        return Err(FstError::NotLinear(format!(
                            "cycle through state {state}"
                        )));
                    }
                    labels.push(arc.ilabel);
                    cost += arc.weight;
                    state = arc.to;
                }
            }
        }
    }
}

/// Column layout of AT&T arc lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// `src dest ilabel olabel [weight]`
    Transducer,
    /// `src dest label [weight]`
    Acceptor,
}

impl TextFormat {
    /// Number of fields of an arc line without a weight.
    fn arc_fields(self) -> usize {
        match self {
            TextFormat::Transducer => 4,
            TextFormat::Acceptor => 3,
        }
    }
}

/// Parse AT&T text in the four-column transducer form.
///
/// This is the form written by [`write_fst`].
pub fn parse_text(text: &str) -> Result<TextFst, FstError> {
    parse_with_format(text, TextFormat::Transducer)
}

/// Parse AT&T text in the three-column acceptor form.
pub fn parse_acceptor(text: &str) -> Result<TextFst, FstError> {
    parse_with_format(text, TextFormat::Acceptor)
}

/// Parse AT&T text with the given arc layout.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn parse_with_format(text: &str, format: TextFormat) -> Result<TextFst, FstError> {
    let mut fst = TextFst::default();
    let arc_fields = format.arc_fields();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let state = parse_field::<StateId>(fields[0], line_no, "state")?;
        if fst.start.is_none() {
            fst.start = Some(state);
        }

        let n = fields.len();
        if n <= 2 {
            let weight = match fields.get(1) {
                Some(w) => parse_field::<f32>(w, line_no, "weight")?,
                None => 0.0,
            };
            fst.finals.insert(state, weight);
        } else if n == arc_fields || n == arc_fields + 1 {
            let to = parse_field::<StateId>(fields[1], line_no, "state")?;
            let ilabel = parse_field::<Label>(fields[2], line_no, "label")?;
            let olabel = match format {
                TextFormat::Transducer => parse_field::<Label>(fields[3], line_no, "label")?,
                TextFormat::Acceptor => ilabel,
            };
            let weight = match fields.get(arc_fields) {
                Some(w) => parse_field::<f32>(w, line_no, "weight")?,
                None => 0.0,
            };
            fst.arcs.entry(state).or_default().push(TextArc {
                to,
                ilabel,
                olabel,
                weight,
            });
        } else {
            return Err(FstError::Parse {
                line: line_no,
                message: format!(
                    "expected 1, 2, {arc_fields} or {} fields, got {n}",
                    arc_fields + 1
                ),
            });
        }
    }

    Ok(fst)
}

fn parse_field<T: std::str::FromStr>(field: &str, line: usize, what: &str) -> Result<T, FstError> {
    field.parse().map_err(|_| FstError::Parse {
        line,
        message: format!("invalid {what} '{field}'"),
    })
}
