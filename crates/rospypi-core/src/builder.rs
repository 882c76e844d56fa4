//! Package builds.
//!
//! A package directory is handed to a build frontend which leaves a source
//! distribution and a universal wheel in `<package>/dist/`. The frontend
//! always receives the package directory as its working directory; the
//! process-wide current directory is never changed.
//!
//! Some packages also get a wheel built by a legacy interpreter. That build
//! is best effort: its failure is reported as a warning and the run
//! continues.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BuildError;
use crate::paths::{BUILD_DESCRIPTOR, dist_dir};
use crate::process::{FAILURE_TAIL_LINES, display_command, output_tail};

/// Default interpreter for the primary build.
pub const DEFAULT_PYTHON: &str = "python3";

/// Default interpreter for the legacy wheel.
pub const DEFAULT_LEGACY_PYTHON: &str = "python2";

pub trait BuildFrontend {
    /// Produce the source distribution and the universal wheel.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the frontend cannot be run or fails.
    fn build(&self, package_dir: &Path) -> Result<(), BuildError>;

    /// Produce an extra wheel with the legacy interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the frontend cannot be run or fails.
    fn build_legacy(&self, package_dir: &Path) -> Result<(), BuildError>;
}

impl<T: BuildFrontend + ?Sized> BuildFrontend for &T {
    fn build(&self, package_dir: &Path) -> Result<(), BuildError> {
        (**self).build(package_dir)
    }

    fn build_legacy(&self, package_dir: &Path) -> Result<(), BuildError> {
        (**self).build_legacy(package_dir)
    }
}

/// Builds with `setup.py`:
/// `<python> setup.py sdist bdist_wheel --universal`, and
/// `<legacy> setup.py bdist_wheel` for the legacy wheel.
#[derive(Debug, Clone)]
pub struct SetupPyFrontend {
    python: String,
    legacy_python: String,
}

impl Default for SetupPyFrontend {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON, DEFAULT_LEGACY_PYTHON)
    }
}

impl SetupPyFrontend {
    pub fn new(python: impl Into<String>, legacy_python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            legacy_python: legacy_python.into(),
        }
    }

    fn run(&self, program: &str, args: &[&str], package_dir: &Path) -> Result<(), BuildError> {
        let resolved = which::which(program).map_err(|_| BuildError::FrontendMissing {
            program: program.to_string(),
        })?;

        let mut cmd = Command::new(resolved);
        cmd.arg(BUILD_DESCRIPTOR).args(args).current_dir(package_dir);
        tracing::debug!(
            command = %display_command(&cmd),
            dir = %package_dir.display(),
            "running build frontend"
        );

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(BuildError::Failed {
                path: package_dir.to_path_buf(),
                code: output.status.code(),
                tail: output_tail(&output, FAILURE_TAIL_LINES),
            });
        }
        Ok(())
    }
}

impl BuildFrontend for SetupPyFrontend {
    fn build(&self, package_dir: &Path) -> Result<(), BuildError> {
        self.run(
            &self.python,
            &["sdist", "bdist_wheel", "--universal"],
            package_dir,
        )
    }

    fn build_legacy(&self, package_dir: &Path) -> Result<(), BuildError> {
        self.run(&self.legacy_python, &["bdist_wheel"], package_dir)
    }
}

/// Outcome of the optional legacy wheel build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyBuild {
    NotRequested,
    Built,
    /// The build was attempted and failed; the message says why.
    Failed(String),
}

/// What a successful [`build`] left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Files in `dist/`, sorted.
    pub artifacts: Vec<PathBuf>,
    pub legacy: LegacyBuild,
}

/// Build `package_dir`, then optionally the legacy wheel.
///
/// # Errors
///
/// Returns the primary build's [`BuildError`]. A legacy build failure is
/// logged and recorded in [`BuildReport::legacy`] instead.
pub fn build<F: BuildFrontend + ?Sized>(
    package_dir: &Path,
    legacy: bool,
    frontend: &F,
) -> Result<BuildReport, BuildError> {
    frontend.build(package_dir)?;

    let legacy = if legacy {
        match frontend.build_legacy(package_dir) {
            Ok(()) => LegacyBuild::Built,
            Err(e) => {
                tracing::warn!(
                    package = %package_dir.display(),
                    error = %e,
                    "legacy wheel build failed, continuing"
                );
                LegacyBuild::Failed(e.to_string())
            }
        }
    } else {
        LegacyBuild::NotRequested
    };

    Ok(BuildReport {
        artifacts: list_artifacts(package_dir)?,
        legacy,
    })
}

/// Files directly under `<package_dir>/dist`, sorted. Empty if the directory
/// does not exist.
///
/// # Errors
///
/// Returns an IO error if `dist/` exists but cannot be read.
pub fn list_artifacts(package_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let dist = dist_dir(package_dir);
    if !dist.is_dir() {
        return Ok(Vec::new());
    }
    let mut artifacts = Vec::new();
    for entry in fs::read_dir(&dist)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            artifacts.push(entry.path());
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct ScriptedFrontend {
        fail_primary: bool,
        fail_legacy: bool,
    }

    impl BuildFrontend for ScriptedFrontend {
        fn build(&self, package_dir: &Path) -> Result<(), BuildError> {
            if self.fail_primary {
                return Err(BuildError::Failed {
                    path: package_dir.to_path_buf(),
                    code: Some(1),
                    tail: "error: invalid command".into(),
                });
            }
            let dist = dist_dir(package_dir);
            fs::create_dir_all(&dist)?;
            fs::write(dist.join("pkg-1.0.tar.gz"), "sdist")?;
            fs::write(dist.join("pkg-1.0-py2.py3-none-any.whl"), "wheel")?;
            Ok(())
        }

        fn build_legacy(&self, package_dir: &Path) -> Result<(), BuildError> {
            if self.fail_legacy {
                return Err(BuildError::FrontendMissing {
                    program: "python2".into(),
                });
            }
            fs::write(
                dist_dir(package_dir).join("pkg-1.0-cp27-cp27m-linux_x86_64.whl"),
                "legacy",
            )?;
            Ok(())
        }
    }

    #[test]
    fn test_build_lists_artifacts() {
        let dir = tempdir().unwrap();
        let frontend = ScriptedFrontend {
            fail_primary: false,
            fail_legacy: false,
        };

        let report = build(dir.path(), false, &frontend).unwrap();

        assert_eq!(report.legacy, LegacyBuild::NotRequested);
        assert_eq!(
            report.artifacts,
            vec![
                dir.path().join("dist/pkg-1.0-py2.py3-none-any.whl"),
                dir.path().join("dist/pkg-1.0.tar.gz"),
            ]
        );
    }

    #[test]
    fn test_legacy_failure_is_tolerated() {
        let dir = tempdir().unwrap();
        let frontend = ScriptedFrontend {
            fail_primary: false,
            fail_legacy: true,
        };

        let report = build(dir.path(), true, &frontend).unwrap();

        assert!(matches!(report.legacy, LegacyBuild::Failed(ref m) if m.contains("python2")));
        assert_eq!(report.artifacts.len(), 2);
    }

    #[test]
    fn test_legacy_success_adds_wheel() {
        let dir = tempdir().unwrap();
        let frontend = ScriptedFrontend {
            fail_primary: false,
            fail_legacy: false,
        };

        let report = build(dir.path(), true, &frontend).unwrap();

        assert_eq!(report.legacy, LegacyBuild::Built);
        assert_eq!(report.artifacts.len(), 3);
    }

    #[test]
    fn test_primary_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let frontend = ScriptedFrontend {
            fail_primary: true,
            fail_legacy: false,
        };

        let err = build(dir.path(), true, &frontend).unwrap_err();
        assert!(matches!(err, BuildError::Failed { code: Some(1), .. }));
    }

    #[test]
    fn test_missing_frontend() {
        let dir = tempdir().unwrap();
        let frontend = SetupPyFrontend::new("rospypi-no-such-python", "rospypi-no-such-python2");

        let err = frontend.build(dir.path()).unwrap_err();
        assert!(
            matches!(err, BuildError::FrontendMissing { ref program } if program == "rospypi-no-such-python")
        );
    }

    // `sh setup.py ...` stands in for the interpreter so the real command
    // line and working directory are exercised.
    #[cfg(unix)]
    #[test]
    fn test_setup_py_frontend_runs_in_package_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("setup.py"),
            "mkdir -p dist\necho \"$@\" > dist/args.txt\ntouch dist/demo-0.1.tar.gz\n",
        )
        .unwrap();
        let frontend = SetupPyFrontend::new("sh", "sh");

        let report = build(dir.path(), false, &frontend).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("dist/args.txt")).unwrap(),
            "sdist bdist_wheel --universal\n"
        );
        assert!(report.artifacts.contains(&dir.path().join("dist/demo-0.1.tar.gz")));
    }

    #[cfg(unix)]
    #[test]
    fn test_setup_py_frontend_failure_carries_output_tail() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("setup.py"),
            "echo building\necho 'error: no module named setuptools' >&2\nexit 3\n",
        )
        .unwrap();
        let frontend = SetupPyFrontend::new("sh", "sh");

        let err = frontend.build(dir.path()).unwrap_err();
        match err {
            BuildError::Failed { code, tail, .. } => {
                assert_eq!(code, Some(3));
                assert!(tail.ends_with("error: no module named setuptools"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
