//! Locating the demo executable and running it through the host shell.
//!
//! Two entry points:
//!
//! - [`execute_binary`] runs an executable given by path.
//! - [`execute_binary_with_directories`] looks the executable up in a [`SearchPath`]
//!   (current directory first) and runs the first hit.
//!
//! Both return exactly one [`Invocation`] per call, or fail before any process is
//! started. Whether a missing executable is fatal is the caller's decision.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::run_command;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Executable '{name}' does not exist in {}.", SearchedList(.searched))]
    MissingExecutable { name: String, searched: Vec<PathBuf> },
    #[error("could not start shell for `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

struct SearchedList<'a>(&'a [PathBuf]);

impl fmt::Display for SearchedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "'{}'", p.display())?;
        }
        Ok(())
    }
}

/// A command that was handed to the shell, and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    /// `None` when the child was killed by a signal.
    pub exit_code: Option<i32>,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Ordered list of directories probed for an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    /// Probe exactly `roots`, in order.
    #[allow(dead_code)]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// `./` followed by `dirs`, so a locally built binary shadows an installed one.
    pub fn current_dir_first<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut roots = vec![PathBuf::from("./")];
        roots.extend(dirs.into_iter().map(Into::into));
        Self { roots }
    }

    #[allow(dead_code)]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Candidate paths for `name`, in probe order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        self.roots.iter().map(|root| root.join(name)).collect()
    }

    /// First candidate that is an existing file.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, InvokeError> {
        for candidate in self.candidates(name) {
            debug!(path = %candidate.display(), "probing for executable");
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(InvokeError::MissingExecutable {
            name: name.to_string(),
            searched: self.roots.clone(),
        })
    }
}

pub fn build_command(executable: &Path, arguments: &str) -> String {
    format!("{} {}", executable.display(), arguments)
}

/// Run `executable` with `arguments` through the shell, blocking until it exits.
///
/// `arguments` is not escaped.
pub fn execute_binary(
    executable: &Path,
    arguments: &str,
    print_command: bool,
) -> Result<Invocation, InvokeError> {
    if !executable.is_file() {
        let name = executable
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| executable.display().to_string());
        // a bare name lives in the current directory
        let searched = match executable.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => vec![dir.to_path_buf()],
            _ => vec![PathBuf::from("./")],
        };
        return Err(InvokeError::MissingExecutable { name, searched });
    }
    spawn(executable, arguments, print_command)
}

/// Resolve `name` in `search` and run the first hit like [`execute_binary`].
pub fn execute_binary_with_directories(
    search: &SearchPath,
    name: &str,
    arguments: &str,
    print_command: bool,
) -> Result<Invocation, InvokeError> {
    let executable = search.resolve(name)?;
    spawn(&executable, arguments, print_command)
}

fn spawn(executable: &Path, arguments: &str, print_command: bool) -> Result<Invocation, InvokeError> {
    let command = build_command(executable, arguments);
    if print_command {
        println!("{}", command);
    }
    debug!(%command, "running");
    let status = run_command(&command).map_err(|source| InvokeError::Spawn {
        command: command.clone(),
        source,
    })?;
    if !status.success() {
        warn!(%command, code = ?status.code(), "executable exited unsuccessfully");
    }
    Ok(Invocation { command, exit_code: status.code() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    fn fake_executable(dir: &Path, name: &str, log: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        let script = format!("#!/bin/sh\necho \"$0 $@\" >> '{}'\n", log.display());
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn current_dir_is_probed_first() {
        let search = SearchPath::current_dir_first(["../../bin/"]);
        assert_eq!(
            search.roots(),
            &[PathBuf::from("./"), PathBuf::from("../../bin/")]
        );
        assert_eq!(
            search.candidates("demo"),
            vec![PathBuf::from("./demo"), PathBuf::from("../../bin/demo")]
        );
    }

    #[test]
    fn earlier_root_shadows_later_root() {
        let local = tempfile::tempdir().unwrap();
        let installed = tempfile::tempdir().unwrap();
        fs::write(local.path().join("demo"), "").unwrap();
        fs::write(installed.path().join("demo"), "").unwrap();

        let search = SearchPath::new(vec![local.path().into(), installed.path().into()]);
        assert_eq!(search.resolve("demo").unwrap(), local.path().join("demo"));
    }

    #[test]
    fn falls_through_to_later_root() {
        let local = tempfile::tempdir().unwrap();
        let installed = tempfile::tempdir().unwrap();
        fs::write(installed.path().join("demo"), "").unwrap();

        let search = SearchPath::new(vec![local.path().into(), installed.path().into()]);
        assert_eq!(search.resolve("demo").unwrap(), installed.path().join("demo"));
    }

    #[test]
    fn directory_with_executable_name_does_not_count() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("demo")).unwrap();
        let search = SearchPath::new(vec![root.path().into()]);
        assert!(matches!(
            search.resolve("demo"),
            Err(InvokeError::MissingExecutable { .. })
        ));
    }

    #[test]
    fn missing_everywhere_names_all_locations() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let search = SearchPath::new(vec![a.path().into(), b.path().into()]);
        let err = execute_binary_with_directories(&search, "demo", "out euler", false).unwrap_err();
        match &err {
            InvokeError::MissingExecutable { name, searched } => {
                assert_eq!(name, "demo");
                assert_eq!(searched, &vec![a.path().to_path_buf(), b.path().to_path_buf()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("'demo'"));
        assert!(msg.contains(&a.path().display().to_string()));
        assert!(msg.contains(" or "));
    }

    #[test]
    fn direct_invocation_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute_binary(&dir.path().join("nope"), "x", false).unwrap_err();
        assert!(matches!(err, InvokeError::MissingExecutable { ref name, .. } if name == "nope"));
    }

    #[test]
    fn bare_name_reports_current_dir() {
        let err = execute_binary(Path::new("not-built"), "x", false).unwrap_err();
        match &err {
            InvokeError::MissingExecutable { name, searched } => {
                assert_eq!(name, "not-built");
                assert_eq!(searched, &vec![PathBuf::from("./")]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("does not exist in './'"), "{msg}");
        assert!(!msg.contains("''"));
    }

    #[test]
    fn command_is_path_space_arguments() {
        assert_eq!(
            build_command(Path::new("../../bin/demo"), "outdir labelA"),
            "../../bin/demo outdir labelA"
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_resolved_executable_once() {
        let local = tempfile::tempdir().unwrap();
        let installed = tempfile::tempdir().unwrap();
        let log = local.path().join("calls.log");
        fake_executable(local.path(), "demo", &log);
        fake_executable(installed.path(), "demo", &log);

        let search = SearchPath::new(vec![local.path().into(), installed.path().into()]);
        let inv = execute_binary_with_directories(&search, "demo", "outdir labelA", false).unwrap();

        let expected = format!("{} outdir labelA", local.path().join("demo").display());
        assert_eq!(inv.command, expected);
        assert!(inv.success());
        let calls = fs::read_to_string(&log).unwrap();
        assert_eq!(calls.lines().count(), 1);
        assert_eq!(calls.trim(), expected);
    }

    #[cfg(unix)]
    #[test]
    fn direct_invocation_reports_exit_code() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failing");
        fs::write(&path, "#!/bin/sh\nexit 4\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let inv = execute_binary(&path, "", false).unwrap();
        assert_eq!(inv.exit_code, Some(4));
        assert!(!inv.success());
    }
}
