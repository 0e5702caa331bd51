//! Transformation passes over parsed C/C++ corpora.

mod func_def;
mod functions;
mod namespaces;

pub use func_def::FuncDefReplacer;
pub use functions::FunctionRemover;
pub use namespaces::NamespaceEraser;

use crate::counter::{PassError, Session};
use crate::syntax::SourceUnit;

/// Per-run pass configuration.
#[derive(Debug, Clone, Default)]
pub struct PassConfig {
    /// Function name the remove-function pass must leave untouched.
    pub preserve: Option<String>,
}

/// One syntax-guided transformation.
///
/// A pass walks every corpus file exactly once through `process_file`.
/// Every discovered opportunity goes through [`Session::next_candidate`],
/// and the selected ones are realized as hints. Passes that group
/// candidates across files hold their state and emit from `finalize`.
pub trait Transformation {
    /// Strings the pass's hints may refer to. These are interned before
    /// processing starts, so their vocabulary ids do not depend on which
    /// candidates end up selected.
    fn vocabulary(&self) -> &'static [&'static str] {
        &[]
    }

    fn process_file(
        &mut self,
        unit: &SourceUnit<'_>,
        session: &mut Session,
    ) -> Result<(), PassError>;

    /// Called once after the last file.
    fn finalize(&mut self, _session: &mut Session) -> Result<(), PassError> {
        Ok(())
    }
}

/// The closed set of shipped passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    ReplaceFunctionDefWithDecl,
    EraseNamespace,
    RemoveFunction,
}

impl PassKind {
    pub const ALL: [PassKind; 3] = [
        PassKind::ReplaceFunctionDefWithDecl,
        PassKind::EraseNamespace,
        PassKind::RemoveFunction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::ReplaceFunctionDefWithDecl => "replace-function-def-with-decl",
            PassKind::EraseNamespace => "erase-namespace",
            PassKind::RemoveFunction => "remove-function",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PassKind::ReplaceFunctionDefWithDecl => {
                "replace function definition bodies with bare declarations"
            }
            PassKind::EraseNamespace => "empty out namespace bodies",
            PassKind::RemoveFunction => {
                "delete every declaration and definition of one function name"
            }
        }
    }

    /// Whether a contiguous range of this pass's candidates can be
    /// realized in one batch without the edits colliding.
    pub fn supports_multiple(self) -> bool {
        match self {
            PassKind::ReplaceFunctionDefWithDecl | PassKind::RemoveFunction => true,
            // Nested namespace bodies overlap, so batched ranges would
            // produce conflicting patches.
            PassKind::EraseNamespace => false,
        }
    }

    pub fn from_name(name: &str) -> Option<PassKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn instantiate(self, config: &PassConfig) -> Result<Box<dyn Transformation>, PassError> {
        Ok(match self {
            PassKind::ReplaceFunctionDefWithDecl => Box::new(FuncDefReplacer::new()?),
            PassKind::EraseNamespace => Box::new(NamespaceEraser::new()?),
            PassKind::RemoveFunction => Box::new(FunctionRemover::new(config.preserve.clone())?),
        })
    }
}
