//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  usage error (bad, missing or extra arguments, bad sizes)
//! - 10: input error (unreadable file, malformed or unsupported shader)
//! - 11: context or OpenGL error
//! - 12: shader error (compile, link, missing attribute)
//! - 13: PNG encoding error

use clap::error::{ContextKind as ClapContext, ContextValue, ErrorKind};
use getimage_core::RenderError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Unusable command line.
    Usage(String),
    /// A pipeline stage failed.
    Render(RenderError),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Render(e) => match e {
                RenderError::Usage(_) => 2,
                RenderError::FileNotFound { .. }
                | RenderError::MalformedShader(_)
                | RenderError::UnsupportedVersion { .. } => 10,
                RenderError::ContextInit { .. } | RenderError::GraphicsApi { .. } => 11,
                RenderError::ShaderCompile { .. }
                | RenderError::ProgramLink { .. }
                | RenderError::AttributeNotFound(_) => 12,
                RenderError::Encode(_) => 13,
            },
        }
    }

    /// Pipeline stage reported in the `(<function>)` slot of the diagnostic.
    pub fn stage(&self) -> &'static str {
        match self {
            CliError::Usage(_) => "parse_args",
            CliError::Render(e) => e.stage(),
        }
    }

    /// Compiler or linker log to print before the diagnostic line.
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            CliError::Usage(_) => None,
            CliError::Render(e) => e.driver_log(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Usage(msg) => CliError::Usage(msg),
            other => CliError::Render(other),
        }
    }
}

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        let invalid = match e.get(ClapContext::InvalidArg) {
            Some(ContextValue::String(arg)) => Some(arg.clone()),
            _ => None,
        };
        match (e.kind(), invalid) {
            (ErrorKind::UnknownArgument, Some(arg)) if arg.starts_with("--") => {
                CliError::Usage(format!("no such option: {arg}"))
            }
            (ErrorKind::UnknownArgument, Some(arg)) if !arg.starts_with('-') => {
                CliError::Usage(format!("unexpected extra argument: {arg}"))
            }
            _ => {
                let rendered = e.to_string();
                let first = rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ");
                CliError::Usage(first.to_string())
            }
        }
    }
}
