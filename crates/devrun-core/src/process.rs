use anyhow::{Context, Result};
use std::fmt;
use std::process::{Child, Command};

use crate::workload::{Workload, WorkloadCommand};

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// A running child owned by the launcher.
pub trait ProcessHandle {
    fn id(&self) -> u32;

    /// Non-blocking exit check. Reaps the process once it has exited.
    fn try_wait(&mut self) -> Result<Option<ExitReport>>;

    /// Ask the process to stop. A process that already exited is a no-op.
    fn terminate(&mut self) -> Result<()>;
}

/// Starts workloads as child processes.
pub trait Spawner {
    type Process: ProcessHandle;

    fn spawn(&mut self, workload: Workload, command: &WorkloadCommand) -> Result<Self::Process>;
}

/// Command interpreter used for commands marked `via_shell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub program: String,
    /// Flag that makes the interpreter run the next argument as a command line.
    pub command_flag: String,
}

impl Shell {
    pub fn new(program: &str, command_flag: &str) -> Self {
        Self {
            program: program.to_string(),
            command_flag: command_flag.to_string(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("sh", "-c")
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Spawns real OS processes that inherit the launcher's stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct SystemSpawner {
    pub shell: Shell,
}

impl SystemSpawner {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    pub fn build_command(&self, command: &WorkloadCommand) -> Command {
        let mut cmd = if command.via_shell {
            let mut cmd = Command::new(&self.shell.program);
            cmd.arg(&self.shell.command_flag)
                .arg(command.command_line());
            cmd
        } else {
            let mut cmd = Command::new(&command.program);
            cmd.args(&command.args);
            cmd
        };
        cmd.current_dir(&command.dir);
        cmd
    }
}

impl Spawner for SystemSpawner {
    type Process = SystemProcess;

    fn spawn(&mut self, workload: Workload, command: &WorkloadCommand) -> Result<SystemProcess> {
        let child = self.build_command(command).spawn().with_context(|| {
            format!(
                "Failed to start {} (`{}` in {})",
                workload,
                command.command_line(),
                command.dir.display()
            )
        })?;
        Ok(SystemProcess { child })
    }
}

pub struct SystemProcess {
    child: Child,
}

impl ProcessHandle for SystemProcess {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn try_wait(&mut self) -> Result<Option<ExitReport>> {
        let status = self.child.try_wait()?;
        Ok(status.map(|s| ExitReport { code: s.code() }))
    }

    fn terminate(&mut self) -> Result<()> {
        // Reaped children must not be signalled: their pid may be reused.
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            use nix::errno::Errno;
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            match kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM) {
                Ok(()) | Err(Errno::ESRCH) => Ok(()),
                Err(e) => anyhow::bail!("Failed to send SIGTERM to pid {}: {}", self.child.id(), e),
            }
        }

        #[cfg(not(unix))]
        {
            match self.child.kill() {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::Path;

    fn args_of(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn direct_command_execs_program() {
        let spawner = SystemSpawner::new(Shell::new("sh", "-c"));
        let wc = WorkloadCommand::default_for(Workload::Backend, Path::new("."));
        let cmd = spawner.build_command(&wc);

        assert_eq!(cmd.get_program(), "go");
        assert_eq!(args_of(&cmd), vec!["run", "main.go"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("./backend")));
    }

    #[test]
    fn shell_command_goes_through_interpreter() {
        let spawner = SystemSpawner::new(Shell::new("sh", "-c"));
        let wc = WorkloadCommand::default_for(Workload::Frontend, Path::new("."));
        let cmd = spawner.build_command(&wc);

        assert_eq!(cmd.get_program(), "sh");
        assert_eq!(args_of(&cmd), vec!["-c", "npm run dev"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("./frontend")));
    }

    #[test]
    fn shell_is_configurable() {
        let spawner = SystemSpawner::new(Shell::new("cmd", "/C"));
        let wc = WorkloadCommand::new("npm", &["run", "dev"], "web").via_shell();
        let cmd = spawner.build_command(&wc);

        assert_eq!(cmd.get_program(), "cmd");
        assert_eq!(args_of(&cmd), vec!["/C", "npm run dev"]);
    }

    #[test]
    fn exit_report_display() {
        assert_eq!(ExitReport { code: Some(1) }.to_string(), "exit code 1");
        assert_eq!(ExitReport { code: None }.to_string(), "terminated by signal");
        assert!(ExitReport { code: Some(0) }.success());
        assert!(!ExitReport { code: None }.success());
    }

    #[test]
    fn spawn_missing_program_names_workload() {
        let dir = tempfile::tempdir().unwrap();
        let mut spawner = SystemSpawner::default();
        let wc = WorkloadCommand::new("devrun-no-such-program", &[], dir.path());

        let err = match spawner.spawn(Workload::Backend, &wc) {
            Ok(_) => panic!("spawn should fail"),
            Err(e) => e,
        };
        let msg = format!("{:#}", err);
        assert!(msg.contains("Failed to start backend"), "{}", msg);
        assert!(msg.contains("devrun-no-such-program"), "{}", msg);
    }
}
