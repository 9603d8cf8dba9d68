//! Error adapter for converting AstrolabeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Script errors carry the script source and the span of the offending step,
//! so they are rendered with a labeled snippet. Every other error is rendered
//! as a plain message with an error code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use astrolabe::{AstrolabeError, script::ScriptError};

/// Adapter for a script error together with the script source.
pub struct ScriptAdapter<'a> {
    /// The wrapped script error
    err: &'a ScriptError,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> ScriptAdapter<'a> {
    /// Create a new script adapter.
    pub fn new(err: &'a ScriptError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for ScriptAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ScriptAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for ScriptAdapter<'_> {}

impl MietteDiagnostic for ScriptAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            ScriptError::Syntax { .. } => "astrolabe::script::syntax",
            ScriptError::UnknownId { .. } => "astrolabe::script::unknown_id",
            ScriptError::DuplicateId { .. } => "astrolabe::script::duplicate_id",
            ScriptError::UnknownKind { .. } => "astrolabe::script::unknown_kind",
            ScriptError::Recipe { .. } => "astrolabe::script::recipe",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let label = match self.err {
            ScriptError::Syntax { .. } => "here",
            _ => "in this step",
        };
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(label.to_string()), span),
        )))
    }
}

/// Adapter for non-script [`AstrolabeError`] variants.
///
/// This adapter handles errors that don't have source information, such as
/// I/O errors, configuration errors, and metamodel errors.
pub struct ErrorAdapter<'a>(pub &'a AstrolabeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AstrolabeError::Io(_) => "astrolabe::io",
            AstrolabeError::Script { .. } => return None,
            AstrolabeError::Metamodel(_) => "astrolabe::metamodel",
            AstrolabeError::Recipe(_) => "astrolabe::recipe",
            AstrolabeError::Model(_) => "astrolabe::model",
            AstrolabeError::Config(_) => "astrolabe::config",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a script error with its source or a plain error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A script error with source location information.
    Script(ScriptAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Script(s) => fmt::Display::fmt(s, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Script(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Script(s) => s.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Script(s) => s.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Script(s) => s.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Script(s) => s.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an [`AstrolabeError`] into a list of reportable errors.
pub fn to_reportables(err: &AstrolabeError) -> Vec<Reportable<'_>> {
    match err {
        AstrolabeError::Script { err, src } => {
            vec![Reportable::Script(ScriptAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
