use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Runs external programs to completion with inherited stdio.
pub trait ProcessRunner: Sync + Send {
    /// Returns the exit code (`-1` when the process was killed by a signal).
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<i32>;
}

pub type SharedRunner = Arc<dyn ProcessRunner>;

#[derive(Debug, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<i32> {
        let resolved = which::which(program)
            .with_context(|| format!("'{program}' not found on PATH"))?;
        let mut cmd = std::process::Command::new(&resolved);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        tracing::debug!(program = %resolved.display(), ?args, "spawning");
        let status = cmd
            .status()
            .with_context(|| format!("running {}", resolved.display()))?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Shared handle to the system runner, for wiring into the container.
pub fn shared_system() -> SharedRunner {
    Arc::new(SystemRunner)
}

/// Run and turn a non-zero exit into an error.
pub fn run_checked(
    runner: &dyn ProcessRunner,
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
) -> Result<()> {
    let code = runner.run(program, args, cwd)?;
    if code != 0 {
        anyhow::bail!("{program} {} exited with status {code}", args.join(" "));
    }
    Ok(())
}
