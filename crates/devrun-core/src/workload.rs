use colored::{ColoredString, Colorize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the two launchable units of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Backend,
    Frontend,
}

impl Workload {
    /// Spawn order. Backend always starts first.
    pub const ALL: [Workload; 2] = [Workload::Backend, Workload::Frontend];

    pub fn name(&self) -> &'static str {
        match self {
            Workload::Backend => "backend",
            Workload::Frontend => "frontend",
        }
    }

    /// Fixed-width coloured tag used in status lines.
    pub fn tag(&self) -> ColoredString {
        match self {
            Workload::Backend => format!("{:<8}", self.name()).cyan().bold(),
            Workload::Frontend => format!("{:<8}", self.name()).magenta().bold(),
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to execute for a workload and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadCommand {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    /// Run through the spawner's command interpreter instead of exec'ing
    /// `program` directly.
    pub via_shell: bool,
}

impl WorkloadCommand {
    pub fn new(program: &str, args: &[&str], dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            dir: dir.into(),
            via_shell: false,
        }
    }

    pub fn via_shell(mut self) -> Self {
        self.via_shell = true;
        self
    }

    /// Default command for a workload, rooted under `project_dir`.
    ///
    /// The backend is a Go service started with `go run main.go`; the
    /// frontend is a Vite app started with `npm run dev` through a shell.
    pub fn default_for(workload: Workload, project_dir: &Path) -> Self {
        match workload {
            Workload::Backend => {
                Self::new("go", &["run", "main.go"], project_dir.join("backend"))
            }
            Workload::Frontend => {
                Self::new("npm", &["run", "dev"], project_dir.join("frontend")).via_shell()
            }
        }
    }

    /// The command as a single line, e.g. `npm run dev`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_default_runs_go_in_backend_dir() {
        let cmd = WorkloadCommand::default_for(Workload::Backend, Path::new("."));
        assert_eq!(cmd.program, "go");
        assert_eq!(cmd.args, vec!["run", "main.go"]);
        assert_eq!(cmd.dir, Path::new("./backend"));
        assert!(!cmd.via_shell);
    }

    #[test]
    fn frontend_default_runs_npm_through_shell() {
        let cmd = WorkloadCommand::default_for(Workload::Frontend, Path::new("."));
        assert_eq!(cmd.command_line(), "npm run dev");
        assert_eq!(cmd.dir, Path::new("./frontend"));
        assert!(cmd.via_shell);
    }

    #[test]
    fn default_dirs_follow_project_dir() {
        let root = Path::new("/srv/app");
        let cmd = WorkloadCommand::default_for(Workload::Frontend, root);
        assert_eq!(cmd.dir, PathBuf::from("/srv/app/frontend"));
    }

    #[test]
    fn command_line_without_args() {
        let cmd = WorkloadCommand::new("make", &[], ".");
        assert_eq!(cmd.command_line(), "make");
    }

    #[test]
    fn spawn_order_is_backend_first() {
        assert_eq!(Workload::ALL, [Workload::Backend, Workload::Frontend]);
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(Workload::Backend.to_string(), "backend");
        assert_eq!(Workload::Frontend.to_string(), "frontend");
    }
}
