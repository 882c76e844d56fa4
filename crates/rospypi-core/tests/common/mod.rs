//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use rospypi_core::error::{BuildError, SchemaError};
use rospypi_core::{BuildFrontend, GenerateRequest, MessageGenerator, Reporter, Stage};
use zip::write::SimpleFileOptions;

const BUILTIN_TYPES: &[&str] = &[
    "bool", "byte", "char", "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64",
    "uint64", "float32", "float64", "string", "time", "duration", "Header",
];

/// Stand-in for the real generation engine: checks that every field type
/// resolves through the search index the way genpy would, then writes one
/// `_<Type>.py` per schema file.
pub struct ResolvingGenerator;

impl ResolvingGenerator {
    fn resolve(request: &GenerateRequest<'_>, field_type: &str) -> bool {
        let base = field_type.split('[').next().unwrap_or(field_type);
        if BUILTIN_TYPES.contains(&base) {
            return true;
        }
        let (package, type_name) = base.split_once('/').unwrap_or((request.package, base));
        request.search.get(package).is_some_and(|dirs| {
            dirs.iter()
                .any(|dir| dir.join(format!("{type_name}.msg")).is_file())
        })
    }
}

impl MessageGenerator for ResolvingGenerator {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), SchemaError> {
        for file in request.files {
            let text = fs::read_to_string(file)?;
            for line in text.lines() {
                let line = line.split('#').next().unwrap_or("").trim();
                if line.is_empty() || line.starts_with("---") {
                    continue;
                }
                let field_type = line.split_whitespace().next().unwrap_or("");
                if !Self::resolve(request, field_type) {
                    return Err(SchemaError::Generation {
                        package: request.package.to_string(),
                        kind: request.kind,
                        detail: format!("Unknown type {field_type} in {}", file.display()),
                    });
                }
            }
            let stem = file.file_stem().unwrap().to_string_lossy();
            fs::write(
                request.out_dir.join(format!("_{stem}.py")),
                format!("# generated from {}\n", file.display()),
            )?;
        }
        Ok(())
    }
}

/// Writes an sdist and a wheel named after the package directory; the
/// legacy build always fails.
pub struct ScriptedFrontend;

impl BuildFrontend for ScriptedFrontend {
    fn build(&self, package_dir: &Path) -> Result<(), BuildError> {
        let name = package_dir.file_name().unwrap().to_string_lossy();
        let dist = package_dir.join("dist");
        fs::create_dir_all(&dist)?;
        fs::write(dist.join(format!("{name}-1.0.tar.gz")), "sdist")?;
        fs::write(dist.join(format!("{name}-1.0-py2.py3-none-any.whl")), "wheel")?;
        Ok(())
    }

    fn build_legacy(&self, _package_dir: &Path) -> Result<(), BuildError> {
        Err(BuildError::FrontendMissing {
            program: "python2".into(),
        })
    }
}

/// Keeps every warning it is given.
#[derive(Default)]
pub struct RecordingReporter {
    pub warnings: Mutex<Vec<String>>,
    pub done: Mutex<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn section(&self, _: &str) {}
    fn stage(&self, _: &str, _: Stage) {}
    fn done(&self, package: &str, _: &str) {
        self.done.lock().unwrap().push(package.to_string());
    }
    fn info(&self, _: &str) {}
    fn warning(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }
    fn summary(&self, _: usize, _: &str, _: f64) {}
}

/// Zip bytes shaped like a code-host snapshot: every file under `root/`.
pub fn snapshot(root: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.zip");
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, contents) in files {
        zip.start_file(format!("{root}/{name}"), options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    fs::read(&path).unwrap()
}

/// Lay out `<ws>/<package>/<package>/msg/<Type>.msg` files.
pub fn message_package(ws: &Path, package: &str, messages: &[(&str, &str)]) {
    let msg_dir = ws.join(package).join(package).join("msg");
    fs::create_dir_all(&msg_dir).unwrap();
    for (name, body) in messages {
        fs::write(msg_dir.join(format!("{name}.msg")), body).unwrap();
    }
}
