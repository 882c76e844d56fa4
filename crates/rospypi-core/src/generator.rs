//! Generation engine seam.
//!
//! The engine turns schema files into importable Python modules. It is an
//! external program; [`CommandGenerator`] drives genpy's `genmsg_py.py` and
//! `gensrv_py.py` scripts, and tests substitute their own implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use rospypi_schema::SchemaKind;

use crate::error::SchemaError;
use crate::process::{FAILURE_TAIL_LINES, display_command, output_tail};
use crate::search::SearchIndex;

/// Default message generator script.
pub const DEFAULT_GENMSG: &str = "genmsg_py.py";

/// Default service generator script.
pub const DEFAULT_GENSRV: &str = "gensrv_py.py";

/// One generation call: all files of one kind for one package.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub package: &'a str,
    pub kind: SchemaKind,
    pub files: &'a [PathBuf],
    pub out_dir: &'a Path,
    pub search: &'a SearchIndex,
}

impl GenerateRequest<'_> {
    pub(crate) fn failed(&self, detail: impl Into<String>) -> SchemaError {
        SchemaError::Generation {
            package: self.package.to_string(),
            kind: self.kind,
            detail: detail.into(),
        }
    }
}

pub trait MessageGenerator {
    /// Emit one module per schema file in `request.files` into
    /// `request.out_dir`, resolving foreign types through `request.search`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Generation`] if any type reference cannot be
    /// resolved or the engine fails for another reason.
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), SchemaError>;
}

impl<T: MessageGenerator + ?Sized> MessageGenerator for &T {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), SchemaError> {
        (**self).generate(request)
    }
}

/// Runs genpy's command-line generators.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    genmsg: String,
    gensrv: String,
}

impl Default for CommandGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_GENMSG, DEFAULT_GENSRV)
    }
}

impl CommandGenerator {
    pub fn new(genmsg: impl Into<String>, gensrv: impl Into<String>) -> Self {
        Self {
            genmsg: genmsg.into(),
            gensrv: gensrv.into(),
        }
    }

    fn program(&self, kind: SchemaKind) -> &str {
        match kind {
            SchemaKind::Srv => &self.gensrv,
            SchemaKind::Msg | SchemaKind::Action => &self.genmsg,
        }
    }

    /// `-p <package> -o <out_dir> -I<pkg>:<dir>... <files...>`
    pub fn arguments(request: &GenerateRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-p".into(),
            request.package.into(),
            "-o".into(),
            request.out_dir.as_os_str().to_owned(),
        ];
        for (package, dirs) in request.search.iter() {
            for dir in dirs {
                let mut include = OsString::from(format!("-I{package}:"));
                include.push(dir);
                args.push(include);
            }
        }
        args.extend(request.files.iter().map(|f| f.as_os_str().to_owned()));
        args
    }
}

impl MessageGenerator for CommandGenerator {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), SchemaError> {
        let program = self.program(request.kind);
        let resolved = which::which(program)
            .map_err(|e| request.failed(format!("generator '{program}' not found: {e}")))?;

        let mut cmd = Command::new(resolved);
        cmd.args(Self::arguments(request));
        tracing::debug!(command = %display_command(&cmd), "running generator");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(request.failed(output_tail(&output, FAILURE_TAIL_LINES)));
        }
        Ok(())
    }
}
