//! Diagnostics sink.
//!
//! Windowing and graphics layers report non-fatal problems here instead of
//! through a process-wide callback. The sink is handed to the bootstrap
//! explicitly; [`LogSink`] forwards everything to the `log` facade.

use std::fmt;

/// Subsystem a diagnostic originates from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticSource {
    Windowing,
    Graphics,
    Shader,
    Geometry,
}

impl fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticSource::Windowing => "windowing",
            DiagnosticSource::Graphics => "graphics",
            DiagnosticSource::Shader => "shader",
            DiagnosticSource::Geometry => "geometry",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single reported diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub source: DiagnosticSource,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self {
            source,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self {
            source,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self {
            source,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source, self.message)
    }
}

/// Receives diagnostics. Reporting never stops execution.
///
/// `Send + Sync` because wgpu may invoke its error handler from internal threads.
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards diagnostics to `log`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => log::info!("{diagnostic}"),
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
    }
}
