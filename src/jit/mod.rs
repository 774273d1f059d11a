//! Native-code backend: compile a DFA to a shared library and call into it.
//!
//! The emitter writes a C rendition of the DFA next to the process, shells
//! out to the host C compiler for a dynamic shared object, loads it, and
//! resolves the `jitted` entry point. The matcher owns the library handle
//! and both on-disk artifacts for its whole lifetime; dropping it unloads
//! the library and deletes the files.

mod codegen;

pub use codegen::emit_c_source;

use crate::automaton::Dfa;
use libloading::Library;
use log::{debug, warn};
use std::env;
use std::fs;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Signature of the generated entry point.
type JittedFn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;

/// Failure while compiling or loading a generated matcher.
///
/// All of these are environmental: a broken toolchain or a mangled
/// artifact, never bad input data.
#[derive(Debug, Error)]
pub enum JitError {
    #[error("failed to write {}: {source}", .path.display())]
    WriteSource {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to run C compiler `{compiler}`: {source}")]
    SpawnCompiler {
        compiler: String,
        source: std::io::Error,
    },
    #[error("C compiler exited with {status}: {stderr}")]
    CompileFailed { status: ExitStatus, stderr: String },
    #[error("failed to load {}: {source}", .path.display())]
    LoadLibrary {
        path: PathBuf,
        source: libloading::Error,
    },
    #[error("entry symbol `jitted` missing from {}: {source}", .path.display())]
    ResolveSymbol {
        path: PathBuf,
        source: libloading::Error,
    },
}

// Artifact basenames must stay unique for the process lifetime even when
// matchers are created and dropped repeatedly.
static NEXT_ARTIFACT: AtomicU64 = AtomicU64::new(0);

/// A DFA compiled to native code and loaded into the current process.
pub struct JitMatcher {
    func: JittedFn,
    lib: Option<Library>,
    c_path: PathBuf,
    lib_path: PathBuf,
}

impl JitMatcher {
    /// Emit C for `dfa`, build it into a shared library in the working
    /// directory, and resolve the `jitted` entry point.
    ///
    /// The compiler defaults to `cc` and honors the `CC` environment
    /// variable. A nonzero compiler exit is an error carrying the captured
    /// stderr.
    pub fn compile(dfa: &Dfa) -> Result<JitMatcher, JitError> {
        let basename = format!(
            "jitted_{}_{}",
            std::process::id(),
            NEXT_ARTIFACT.fetch_add(1, Ordering::Relaxed)
        );
        let c_path = PathBuf::from(format!("{basename}.c"));
        let lib_path = PathBuf::from(format!("{basename}.{}", env::consts::DLL_EXTENSION));

        fs::write(&c_path, emit_c_source(dfa)).map_err(|source| JitError::WriteSource {
            path: c_path.clone(),
            source,
        })?;

        let compiler = env::var("CC").unwrap_or_else(|_| "cc".to_string());
        let mut cmd = Command::new(&compiler);
        cmd.arg("-O3");
        if cfg!(target_os = "macos") {
            cmd.args(["-dynamiclib", "-undefined", "dynamic_lookup"]);
        } else {
            cmd.args(["-shared", "-fPIC"]);
        }
        cmd.arg("-o").arg(&lib_path).arg(&c_path);

        debug!("compiling {} with `{compiler}`", c_path.display());
        let output = cmd.output().map_err(|source| JitError::SpawnCompiler {
            compiler: compiler.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(JitError::CompileFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // The runtime loader resolves bare file names against the library
        // search path, not the working directory, so hand it an absolute
        // path.
        let loader_path = env::current_dir()
            .map(|dir| dir.join(&lib_path))
            .unwrap_or_else(|_| lib_path.clone());
        // SAFETY: the library was just produced by the trusted host compiler
        // from our own generated source.
        let lib = unsafe { Library::new(&loader_path) }.map_err(|source| JitError::LoadLibrary {
            path: lib_path.clone(),
            source,
        })?;
        // SAFETY: the generated translation unit defines `jitted` with
        // exactly the `JittedFn` signature.
        let func = unsafe {
            lib.get::<JittedFn>(b"jitted\0")
                .map(|sym| *sym)
                .map_err(|source| JitError::ResolveSymbol {
                    path: lib_path.clone(),
                    source,
                })?
        };

        Ok(JitMatcher {
            func,
            lib: Some(lib),
            c_path,
            lib_path,
        })
    }

    /// Run the compiled matcher over `input`.
    pub fn is_match(&self, input: &[u8]) -> bool {
        debug_assert!(input.len() <= c_int::MAX as usize);
        // SAFETY: `func` stays valid while the library handle is held, and
        // the generated code never reads past `input + len`.
        let verdict =
            unsafe { (self.func)(input.as_ptr().cast::<c_char>(), input.len() as c_int) };
        verdict != 0
    }

    /// Path of the generated C source.
    pub fn source_path(&self) -> &Path {
        &self.c_path
    }

    /// Path of the compiled shared library.
    pub fn library_path(&self) -> &Path {
        &self.lib_path
    }
}

impl Drop for JitMatcher {
    fn drop(&mut self) {
        // The handle must be closed before the object file underneath it
        // disappears. Neither failure is fatal.
        if let Some(lib) = self.lib.take() {
            if let Err(err) = lib.close() {
                warn!("failed to unload {}: {err}", self.lib_path.display());
            }
        }
        for path in [&self.c_path, &self.lib_path] {
            if let Err(err) = fs::remove_file(path) {
                warn!("failed to remove {}: {err}", path.display());
            }
        }
    }
}
