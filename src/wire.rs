//! Line-oriented wire format for hint bundles.
//!
//! The first line is a JSON array holding the vocabulary in id order; in
//! multi-file runs the input paths are appended after the replacement
//! entries, so a file's wire id is `replacement count + file index`. Every
//! following line is one hint:
//!
//! ```text
//! {"t":T,"p":[{"l":L,"r":R,"v":V,"f":F}, ...]}
//! ```
//!
//! `t` (optional) is the hint kind discriminator, `l`/`r` are the byte
//! range, `v` (optional) the replacement's vocabulary id and `f` (optional)
//! the file's wire id. Consumers treat unknown discriminators as opaque.

use crate::hint::{Hint, HintBundle, Patch};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct PatchRecord {
    #[serde(rename = "l")]
    left: usize,
    #[serde(rename = "r")]
    right: usize,
    #[serde(rename = "v", skip_serializing_if = "Option::is_none")]
    value: Option<usize>,
    #[serde(rename = "f", skip_serializing_if = "Option::is_none")]
    file: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HintRecord {
    #[serde(rename = "t", skip_serializing_if = "Option::is_none")]
    kind: Option<usize>,
    #[serde(rename = "p")]
    patches: Vec<PatchRecord>,
}

fn patch_record(patch: &Patch, file_base: usize) -> PatchRecord {
    PatchRecord {
        left: patch.start,
        right: patch.end,
        value: patch.value,
        file: patch.file.map(|index| file_base + index),
    }
}

fn hint_record(hint: &Hint, file_base: usize) -> HintRecord {
    HintRecord {
        kind: hint.kind,
        patches: hint
            .patches
            .iter()
            .map(|patch| patch_record(patch, file_base))
            .collect(),
    }
}

/// Write the vocabulary line followed by one line per hint.
///
/// Strings go through full JSON escaping, so arbitrary file paths and
/// replacement text are safe on the wire.
pub fn write_bundle<W: Write>(out: &mut W, bundle: &HintBundle) -> io::Result<()> {
    let vocab: Vec<&str> = bundle
        .vocab
        .replacements()
        .iter()
        .chain(bundle.vocab.files().iter())
        .map(String::as_str)
        .collect();
    serde_json::to_writer(&mut *out, &vocab)?;
    out.write_all(b"\n")?;

    let file_base = bundle.vocab.file_id_base();
    for hint in &bundle.hints {
        serde_json::to_writer(&mut *out, &hint_record(hint, file_base))?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
