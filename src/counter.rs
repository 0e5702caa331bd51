//! Candidate enumeration protocol: selections, the per-run session and the
//! error taxonomy shared by every pass.

use crate::hint::{HintBundle, HintScope, HintsBuilder};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by candidate enumeration and realization.
#[derive(Debug, Error)]
pub enum PassError {
    /// The requested candidate index lies beyond the enumerated count. The
    /// outer driver reads this as "the pass is exhausted at this index".
    #[error("counter {requested} exceeds the number of available instances ({available})")]
    CounterOutOfRange { requested: usize, available: usize },

    /// Realizing the selected candidates would change nothing.
    #[error("transformation produced no text modification")]
    NoTextModification,

    /// The pass cannot perform the requested operation.
    #[error("pass '{pass}' does not support {operation}")]
    Capability {
        pass: &'static str,
        operation: &'static str,
    },

    /// A frontend inconsistency while realizing a candidate.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Candidate counters are 1-based.
    #[error("invalid counter: candidate counters start at 1")]
    ZeroCounter,

    #[error("counter range runs backwards: {to} is smaller than {from}")]
    BackwardsRange { from: usize, to: usize },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which enumerated candidates a run realizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Count opportunities; realize nothing.
    Count,
    /// Realize the K-th opportunity (1-based).
    Single(usize),
    /// Realize every opportunity in the inclusive 1-based range.
    Range { from: usize, to: usize },
    /// Realize every opportunity.
    All,
}

impl Selection {
    /// Validate the selection before any enumeration work happens.
    ///
    /// Counters are 1-based, ranges must run forward, and a range is only
    /// meaningful for passes whose candidates can be realized as one batch.
    pub fn verify(&self, pass: &'static str, batch_capable: bool) -> Result<(), PassError> {
        match *self {
            Selection::Count | Selection::All => Ok(()),
            Selection::Single(k) => {
                if k == 0 {
                    return Err(PassError::ZeroCounter);
                }
                Ok(())
            }
            Selection::Range { from, to } => {
                if from == 0 {
                    return Err(PassError::ZeroCounter);
                }
                if to < from {
                    return Err(PassError::BackwardsRange { from, to });
                }
                if !batch_capable {
                    return Err(PassError::Capability {
                        pass,
                        operation: "batched counter ranges",
                    });
                }
                Ok(())
            }
        }
    }

    fn selects(&self, index: usize) -> bool {
        match *self {
            Selection::Count => false,
            Selection::Single(k) => index == k,
            Selection::Range { from, to } => from <= index && index <= to,
            Selection::All => true,
        }
    }
}

/// Per-run enumeration state threaded through a pass.
///
/// Every discovered opportunity reports in through [`Session::next_candidate`],
/// which answers whether that opportunity is selected for realization under
/// the active [`Selection`]. Selected opportunities build their hint through
/// [`Session::hint`]. [`Session::finish`] settles the bookkeeping: a
/// selection pointing past the final count becomes the out-of-range error
/// the driver uses to detect exhaustion.
#[derive(Debug)]
pub struct Session {
    selection: Selection,
    seen: usize,
    builder: HintsBuilder,
}

/// What one finished run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Total number of opportunities the pass enumerated.
    pub candidates: usize,
    /// Committed hints plus their vocabulary.
    pub bundle: HintBundle,
}

impl Session {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            seen: 0,
            builder: HintsBuilder::new(),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Register the next opportunity; `true` means "realize this one".
    pub fn next_candidate(&mut self) -> bool {
        self.seen += 1;
        self.selection.selects(self.seen)
    }

    /// Opportunities seen so far.
    pub fn candidates(&self) -> usize {
        self.seen
    }

    /// Open the hint for the current candidate.
    pub fn hint(&mut self) -> HintScope<'_> {
        self.builder.scope()
    }

    /// Fix a vocabulary id before realization starts, so ids do not depend
    /// on which candidates end up selected.
    pub fn intern(&mut self, text: &str) -> usize {
        self.builder.intern(text)
    }

    /// Record one corpus file path, returning its file index.
    pub fn add_file(&mut self, path: &str) -> usize {
        self.builder.add_file(path)
    }

    /// Set the file index stamped onto subsequently added patches.
    pub fn set_current_file(&mut self, file: Option<usize>) {
        self.builder.set_current_file(file);
    }

    pub fn current_file(&self) -> Option<usize> {
        self.builder.current_file()
    }

    /// Reverse the committed hint order (see [`HintsBuilder::reverse`]).
    pub fn reverse_hints(&mut self) {
        self.builder.reverse();
    }

    /// Close the run, checking the selection against the final count.
    pub fn finish(self) -> Result<RunReport, PassError> {
        let available = self.seen;
        let out_of_range = match self.selection {
            Selection::Single(k) if k > available => Some(k),
            Selection::Range { from, .. } if from > available => Some(from),
            Selection::Range { to, .. } if to > available => Some(to),
            _ => None,
        };
        if let Some(requested) = out_of_range {
            return Err(PassError::CounterOutOfRange {
                requested,
                available,
            });
        }
        Ok(RunReport {
            candidates: available,
            bundle: self.builder.into_bundle(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn enumerate(selection: Selection, total: usize) -> Result<RunReport, PassError> {
        let mut session = Session::new(selection);
        for index in 0..total {
            if session.next_candidate() {
                let mut hint = session.hint();
                hint.add_deletion(Span::new(index * 10, index * 10 + 5));
            }
        }
        session.finish()
    }

    #[test]
    fn test_counter_past_the_end_is_out_of_range() {
        let err = enumerate(Selection::Single(4), 3).unwrap_err();
        match err {
            PassError::CounterOutOfRange {
                requested,
                available,
            } => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_last_counter_is_in_range() {
        let report = enumerate(Selection::Single(3), 3).unwrap();
        assert_eq!(report.candidates, 3);
        assert_eq!(report.bundle.hints.len(), 1);
        assert_eq!(report.bundle.hints[0].patches[0].start, 20);
    }

    #[test]
    fn test_count_mode_realizes_nothing() {
        let report = enumerate(Selection::Count, 5).unwrap();
        assert_eq!(report.candidates, 5);
        assert!(report.bundle.hints.is_empty());
    }

    #[test]
    fn test_all_mode_realizes_everything() {
        let report = enumerate(Selection::All, 4).unwrap();
        assert_eq!(report.bundle.hints.len(), 4);
    }

    #[test]
    fn test_range_realizes_inclusive_bounds() {
        let report = enumerate(Selection::Range { from: 2, to: 3 }, 4).unwrap();
        assert_eq!(report.bundle.hints.len(), 2);
        assert_eq!(report.bundle.hints[0].patches[0].start, 10);
        assert_eq!(report.bundle.hints[1].patches[0].start, 20);
    }

    #[test]
    fn test_range_upper_bound_past_the_end_is_out_of_range() {
        let err = enumerate(Selection::Range { from: 2, to: 5 }, 3).unwrap_err();
        assert!(matches!(
            err,
            PassError::CounterOutOfRange {
                requested: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn test_range_lower_bound_past_the_end_is_out_of_range() {
        let err = enumerate(Selection::Range { from: 7, to: 9 }, 3).unwrap_err();
        assert!(matches!(
            err,
            PassError::CounterOutOfRange {
                requested: 7,
                available: 3
            }
        ));
    }

    #[test]
    fn test_verify_rejects_zero_counters() {
        assert!(matches!(
            Selection::Single(0).verify("erase-namespace", false),
            Err(PassError::ZeroCounter)
        ));
        assert!(matches!(
            Selection::Range { from: 0, to: 3 }.verify("remove-function", true),
            Err(PassError::ZeroCounter)
        ));
    }

    #[test]
    fn test_verify_rejects_backwards_ranges() {
        assert!(matches!(
            Selection::Range { from: 3, to: 2 }.verify("remove-function", true),
            Err(PassError::BackwardsRange { from: 3, to: 2 })
        ));
    }

    #[test]
    fn test_verify_rejects_ranges_without_batch_support() {
        // Rejection happens before any enumeration work: no session exists.
        let err = Selection::Range { from: 2, to: 5 }
            .verify("erase-namespace", false)
            .unwrap_err();
        match err {
            PassError::Capability { pass, .. } => assert_eq!(pass, "erase-namespace"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_allows_bulk_modes_everywhere() {
        assert!(Selection::All.verify("erase-namespace", false).is_ok());
        assert!(Selection::Count.verify("erase-namespace", false).is_ok());
    }
}
