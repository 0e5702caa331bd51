//! Whittle: syntax-guided reduction hints for C/C++ test cases
//!
//! A hint generator for automated test-case minimization, built on
//! tree-sitter parsing and byte-span patch primitives.
//!
//! # Architecture
//!
//! All transformations compile down to a single primitive: [`Patch`], a
//! byte-span replacement whose text lives in a shared [`Vocabulary`].
//! Passes walk the parse tree, enumerate reduction opportunities in a
//! deterministic order, and emit the selected ones as [`Hint`]s. One
//! hint covers one opportunity and holds every patch that must land
//! together. The driver realizes a [`Selection`] over those opportunities and
//! serializes the result as line-delimited JSON for an outer reduction
//! loop to consume.
//!
//! # Determinism
//!
//! - Candidate order depends only on the corpus, never on the selection
//! - Vocabulary ids are interned up front, so identical inputs produce
//!   identical wire output under any selection
//! - Malformed sources still parse; passes work with whatever tree the
//!   grammar recovers
//! - Output files are written atomically (tempfile + fsync + rename)
//!
//! # Example
//!
//! ```
//! use whittle::driver::{run, Corpus};
//! use whittle::passes::{PassConfig, PassKind};
//! use whittle::Selection;
//!
//! let corpus = Corpus::from_source("namespace n { int x; }\n");
//! let report = run(
//!     PassKind::EraseNamespace,
//!     &PassConfig::default(),
//!     Selection::All,
//!     &corpus,
//! )?;
//! assert_eq!(report.candidates, 1);
//! # Ok::<(), whittle::PassError>(())
//! ```

pub mod apply;
pub mod counter;
pub mod driver;
pub mod hint;
pub mod order;
pub mod overlap;
pub mod passes;
pub mod span;
pub mod syntax;
pub mod vocab;
pub mod wire;

// Re-exports
pub use apply::{apply_hints, ApplyError};
pub use counter::{PassError, RunReport, Selection, Session};
pub use driver::{run, rewrite, Corpus, SourceFile};
pub use hint::{Hint, HintBundle, HintsBuilder, Patch};
pub use span::Span;
pub use vocab::Vocabulary;
pub use wire::write_bundle;
