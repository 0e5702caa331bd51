//! Splices a hint bundle's patches into source text.

use crate::counter::PassError;
use crate::hint::HintBundle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("patch range [{left}, {right}) does not fit an input of length {len}")]
    InvalidRange {
        left: usize,
        right: usize,
        len: usize,
    },

    #[error("patch refers to vocabulary entry {id}, but only {len} entries exist")]
    UnknownVocabularyEntry { id: usize, len: usize },
}

impl From<ApplyError> for PassError {
    fn from(err: ApplyError) -> Self {
        PassError::Internal {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingPatch {
    left: usize,
    right: usize,
    value: Option<usize>,
}

/// Rewrite `text` by applying every hint in the bundle.
///
/// Patches arrive in whatever order their hints were generated. They are
/// sorted by start offset, widest range first at equal starts and deletions
/// before replacements, then really-overlapping patches (sharing at least
/// one byte) are merged by extending the earlier range. The survivors are
/// spliced left to right in one forward sweep.
pub fn apply_hints(text: &str, bundle: &HintBundle) -> Result<String, ApplyError> {
    let mut pending: Vec<PendingPatch> = bundle
        .hints
        .iter()
        .flat_map(|hint| &hint.patches)
        .map(|patch| PendingPatch {
            left: patch.start,
            right: patch.end,
            value: patch.value,
        })
        .collect();

    pending.sort_by(|a, b| {
        a.left
            .cmp(&b.left)
            .then_with(|| b.right.cmp(&a.right))
            .then_with(|| a.value.is_some().cmp(&b.value.is_some()))
    });

    let mut merged: Vec<PendingPatch> = Vec::with_capacity(pending.len());
    for patch in pending {
        if let Some(prev) = merged.last_mut() {
            if prev.left.max(patch.left) < prev.right.min(patch.right) {
                // Overlapping edits collapse into the earlier, wider one;
                // the swallowed patch's replacement is dropped.
                prev.right = prev.right.max(patch.right);
                continue;
            }
        }
        merged.push(patch);
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0usize;
    for patch in &merged {
        if patch.left > patch.right {
            return Err(ApplyError::InvalidRange {
                left: patch.left,
                right: patch.right,
                len: text.len(),
            });
        }
        // An insertion point inside an already-consumed range still inserts
        // its text, but never re-emits consumed bytes.
        let left = patch.left.max(pos);
        out.push_str(slice(text, pos, left)?);
        if let Some(id) = patch.value {
            let entry =
                bundle
                    .vocab
                    .replacement(id)
                    .ok_or(ApplyError::UnknownVocabularyEntry {
                        id,
                        len: bundle.vocab.replacements().len(),
                    })?;
            out.push_str(entry);
        }
        pos = pos.max(patch.right);
    }
    out.push_str(slice(text, pos, text.len())?);
    Ok(out)
}

fn slice(text: &str, start: usize, end: usize) -> Result<&str, ApplyError> {
    text.get(start..end).ok_or(ApplyError::InvalidRange {
        left: start,
        right: end,
        len: text.len(),
    })
}
