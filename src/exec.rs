use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::errors::BenchError;

/// A fully-formed external command: program plus argument list.
///
/// Built once per (tool, corpus) pair and reused verbatim for every warmup
/// and timed run, so all trials of a phase measure the same invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// One-line rendering for progress output and errors.
    pub fn display(&self) -> String {
        let mut out = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }
}

/// Outcome of a single trial: wall-clock elapsed time and the child's exit
/// code (`None` when terminated by a signal). The harness records the code
/// but never treats it as a failure — the contract is "measure how long it
/// took", not "did the tool succeed".
#[derive(Debug, Clone, Copy)]
pub struct Trial {
    pub elapsed: Duration,
    pub exit_code: Option<i32>,
}

/// Capability seam for running one external command and timing it.
///
/// Tests substitute an executor with scripted durations so the collector
/// and aggregation layers are exercised without spawning processes.
pub trait TrialExecutor {
    fn run(&mut self, cmd: &CommandSpec) -> Result<Trial>;
}

/// Executes commands synchronously with stdout/stderr discarded.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl TrialExecutor for ProcessExecutor {
    fn run(&mut self, cmd: &CommandSpec) -> Result<Trial> {
        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // The clock starts immediately before invocation and stops after
        // process termination, on the monotonic clock.
        let start = Instant::now();
        let child = command.spawn().map_err(|source| BenchError::ProcessStart {
            program: cmd.program.clone(),
            source,
        })?;

        let mut guard = ChildGuard::new(child);
        let status = guard.wait().map_err(|source| BenchError::ProcessWait {
            program: cmd.program.clone(),
            source,
        })?;
        let elapsed = start.elapsed();

        Ok(Trial {
            elapsed,
            exit_code: status.code(),
        })
    }
}

/// Kills and reaps the child if the caller unwinds before `wait` completes,
/// so an interrupted benchmark leaves no orphaned tool process behind.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn wait(&mut self) -> std::io::Result<ExitStatus> {
        let status = self.child.wait();
        if status.is_ok() {
            self.reaped = true;
        }
        status
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_spec_builds_ordered_args() {
        let cmd = CommandSpec::new("/usr/bin/java")
            .arg("-jar")
            .arg("checkstyle.jar")
            .arg("-c")
            .arg("rules.xml");
        assert_eq!(cmd.program, PathBuf::from("/usr/bin/java"));
        assert_eq!(cmd.args.len(), 4);
        assert_eq!(cmd.args[0], "-jar");
        assert_eq!(cmd.display(), "/usr/bin/java -jar checkstyle.jar -c rules.xml");
    }

    #[test]
    fn missing_program_is_a_start_failure() {
        let mut executor = ProcessExecutor::new();
        let cmd = CommandSpec::new("/nonexistent/path/to/no-such-binary");
        let err = executor.run(&cmd).unwrap_err();
        assert!(
            err.to_string().contains("Failed to start"),
            "unexpected error: {err}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_still_returns_a_duration() {
        let mut executor = ProcessExecutor::new();
        let cmd = CommandSpec::new("/bin/sh").arg("-c").arg("exit 3");
        let trial = executor.run(&cmd).unwrap();
        assert_eq!(trial.exit_code, Some(3));
        assert!(trial.elapsed.as_secs_f64() >= 0.0);
        assert!(trial.elapsed.as_secs_f64().is_finite());
    }

    #[cfg(unix)]
    #[test]
    fn child_output_is_discarded() {
        let mut executor = ProcessExecutor::new();
        // Write enough to both streams to fill a pipe if one were attached.
        let cmd = CommandSpec::new("/bin/sh")
            .arg("-c")
            .arg("i=0; while [ $i -lt 2000 ]; do echo line $i; echo err $i >&2; i=$((i+1)); done");
        let trial = executor.run(&cmd).unwrap();
        assert_eq!(trial.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn elapsed_covers_the_child_runtime() {
        let mut executor = ProcessExecutor::new();
        let cmd = CommandSpec::new("/bin/sh").arg("-c").arg("sleep 0.1");
        let trial = executor.run(&cmd).unwrap();
        assert!(
            trial.elapsed >= Duration::from_millis(90),
            "elapsed {:?} shorter than the child's sleep",
            trial.elapsed
        );
    }
}
