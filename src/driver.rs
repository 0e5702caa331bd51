//! Corpus loading and end-to-end pass execution.

use crate::apply::apply_hints;
use crate::counter::{PassError, RunReport, Selection, Session};
use crate::hint::HintBundle;
use crate::passes::{PassConfig, PassKind};
use crate::syntax::CxxParser;
use std::fs;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions treated as C/C++ sources when walking a directory.
const SOURCE_EXTENSIONS: [&str; 8] = ["c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx"];

/// One input file: the label that goes into the vocabulary's file region
/// plus the file's contents.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub label: String,
    pub text: String,
}

/// The set of inputs for one run.
///
/// Multi-file corpora stamp file ids onto every patch and extend the
/// vocabulary with the file labels; single-file corpora keep both off the
/// wire.
#[derive(Debug)]
pub struct Corpus {
    files: Vec<SourceFile>,
    multi_file: bool,
}

impl Corpus {
    /// Load a corpus from a path: the file itself, or every C/C++ source
    /// under a directory. The walk is sorted so file ids are stable across
    /// runs.
    pub fn load(path: &Path) -> Result<Self, PassError> {
        let meta = fs::metadata(path).map_err(|source| PassError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Ok(Self {
                files: vec![SourceFile {
                    label: path.to_string_lossy().into_owned(),
                    text: read_file(path)?,
                }],
                multi_file: false,
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|err| walk_error(path, err))?;
            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }
            let label = entry
                .path()
                .strip_prefix(path)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            files.push(SourceFile {
                label,
                text: read_file(entry.path())?,
            });
        }
        Ok(Self {
            files,
            multi_file: true,
        })
    }

    /// Single in-memory input.
    pub fn from_source(text: impl Into<String>) -> Self {
        Self {
            files: vec![SourceFile {
                label: String::new(),
                text: text.into(),
            }],
            multi_file: false,
        }
    }

    /// In-memory multi-file corpus; labels become vocabulary entries.
    pub fn from_files(files: Vec<SourceFile>) -> Self {
        Self {
            files,
            multi_file: true,
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn is_multi_file(&self) -> bool {
        self.multi_file
    }

    /// Sole file of a single-file corpus.
    pub fn single(&self) -> Option<&SourceFile> {
        if self.multi_file {
            None
        } else {
            self.files.first()
        }
    }
}

/// Run one pass over the corpus under the given selection.
///
/// The selection is verified against the pass's capabilities before any
/// file is touched.
pub fn run(
    kind: PassKind,
    config: &PassConfig,
    selection: Selection,
    corpus: &Corpus,
) -> Result<RunReport, PassError> {
    selection.verify(kind.name(), kind.supports_multiple())?;

    let mut pass = kind.instantiate(config)?;
    let mut session = Session::new(selection);
    for text in pass.vocabulary() {
        session.intern(text);
    }

    let mut parser = CxxParser::new()?;
    for file in corpus.files() {
        let file_id = if corpus.is_multi_file() {
            Some(session.add_file(&file.label))
        } else {
            None
        };
        session.set_current_file(file_id);
        let unit = parser.parse(file_id, &file.text)?;
        pass.process_file(&unit, &mut session)?;
    }
    session.set_current_file(None);
    pass.finalize(&mut session)?;
    session.finish()
}

/// Realize a bundle against single-file input.
///
/// A rewrite that leaves the text untouched reports
/// [`PassError::NoTextModification`]: the selected candidate was vacuous
/// and the driver should not mistake the echo for progress.
pub fn rewrite(source: &str, bundle: &HintBundle) -> Result<String, PassError> {
    let rewritten = apply_hints(source, bundle)?;
    if rewritten == source {
        return Err(PassError::NoTextModification);
    }
    Ok(rewritten)
}

/// Atomically replace `path` with `content` (tempfile + fsync + rename),
/// so a crash mid-write never leaves a truncated test case behind.
pub fn write_output(path: &Path, content: &[u8]) -> Result<(), PassError> {
    let io_err = |source: std::io::Error| PassError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    temp.write_all(content).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

fn read_file(path: &Path) -> Result<String, PassError> {
    fs::read_to_string(path).map_err(|source| PassError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn walk_error(root: &Path, err: walkdir::Error) -> PassError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    PassError::Io {
        path,
        source: err.into(),
    }
}
