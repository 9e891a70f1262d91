// Marker symbol configuration: disambiguation, begin- and end-of-sentence ids.
//
// Marker ids come from the command line as signed integers and are checked
// once, before any sentence is read. Everything downstream works with the
// validated `MarkerIds` and never re-checks them.

use crate::arc::Label;

/// Error raised while validating marker configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A marker id was zero or negative.
    #[error("{option} must be a positive integer, got {value}")]
    NonPositiveMarker { option: &'static str, value: i64 },

    /// A marker id does not fit in a label.
    #[error("{option} is out of range: {value} exceeds {max}", max = Label::MAX)]
    MarkerOutOfRange { option: &'static str, value: i64 },
}

/// Command line option names, used in diagnostics.
pub const DISAMBIG_OPTION: &str = "--disambig-symbol-id";
pub const BOS_OPTION: &str = "--bos-symbol-id";
pub const EOS_OPTION: &str = "--eos-symbol-id";

/// Validated marker symbol ids.
///
/// Each field is `None` when the marker is not configured, otherwise a
/// strictly positive label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerIds {
    disambig: Option<Label>,
    bos: Option<Label>,
    eos: Option<Label>,
}

impl MarkerIds {
    /// Validate raw marker ids.
    ///
    /// Every supplied id must be in `1..=Label::MAX`. The first offending
    /// option (in disambig, bos, eos order) is reported.
    pub fn new(
        disambig: Option<i64>,
        bos: Option<i64>,
        eos: Option<i64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            disambig: validate(DISAMBIG_OPTION, disambig)?,
            bos: validate(BOS_OPTION, bos)?,
            eos: validate(EOS_OPTION, eos)?,
        })
    }

    /// No markers configured.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn disambig(&self) -> Option<Label> {
        self.disambig
    }

    pub fn bos(&self) -> Option<Label> {
        self.bos
    }

    pub fn eos(&self) -> Option<Label> {
        self.eos
    }
}

fn validate(option: &'static str, value: Option<i64>) -> Result<Option<Label>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value <= 0 {
        return Err(ConfigError::NonPositiveMarker { option, value });
    }
    Label::try_from(value)
        .map(Some)
        .map_err(|_| ConfigError::MarkerOutOfRange { option, value })
}
