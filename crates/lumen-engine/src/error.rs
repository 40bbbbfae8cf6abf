//! Failure taxonomy.
//!
//! Three fatal classes, one per pipeline phase:
//! - [`SetupError`]: the window or graphics context could not be brought up
//! - [`BuildError`]: shaders, program or geometry were rejected
//! - [`FrameError`]: the frame loop hit a condition it cannot recover from
//!
//! Non-fatal conditions are not errors; they are reported to a
//! [`DiagnosticsSink`](crate::diagnostics::DiagnosticsSink).

use thiserror::Error;

use crate::shader::ShaderStage;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create event loop")]
    EventLoop(#[source] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(String),

    #[error("windowing layer never resumed; no window was created")]
    NotResumed,

    #[error("failed to create surface")]
    Surface(#[source] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter: {0}")]
    Adapter(String),

    #[error("failed to create device/queue: {0}")]
    Device(String),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("window has zero size")]
    ZeroSizedWindow,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{stage} shader `{label}` failed to compile:\n{log}")]
    Compile {
        stage: ShaderStage,
        label: String,
        log: String,
    },

    #[error("{stage} shader `{label}` has no {stage} entry point `{entry_point}`")]
    MissingEntryPoint {
        stage: ShaderStage,
        label: String,
        entry_point: String,
    },

    #[error("program `{label}` failed to link:\n{log}")]
    Link { label: String, log: String },

    #[error("geometry `{label}` is invalid: {reason}")]
    Geometry { label: String, reason: String },

    #[error("{0} handle does not refer to a live resource")]
    StaleHandle(&'static str),
}

impl BuildError {
    /// Diagnostic text for this failure.
    ///
    /// Compile and link failures return the compiler/linker log; every other
    /// variant returns its display message. Never empty.
    pub fn log(&self) -> String {
        match self {
            BuildError::Compile { log, .. } | BuildError::Link { log, .. } if !log.is_empty() => {
                log.clone()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface ran out of memory")]
    OutOfMemory,

    #[error("{0} handle does not refer to a live resource")]
    StaleHandle(&'static str),
}

/// Coarse classification of a [`Failure`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FailureKind {
    Setup,
    Build,
    Frame,
}

/// Any fatal failure of the render bootstrap.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("setup failed")]
    Setup(#[from] SetupError),

    #[error("build failed")]
    Build(#[from] BuildError),

    #[error("frame loop failed")]
    Frame(#[from] FrameError),
}

impl Failure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Setup(_) => FailureKind::Setup,
            Failure::Build(_) => FailureKind::Build,
            Failure::Frame(_) => FailureKind::Frame,
        }
    }

    /// Process exit code for this failure. `0` and `1` are never returned.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            FailureKind::Setup => 2,
            FailureKind::Build => 3,
            FailureKind::Frame => 4,
        }
    }
}
