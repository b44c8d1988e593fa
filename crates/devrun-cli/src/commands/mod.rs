pub mod dev;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "devrun",
    version,
    about = "Run the backend and frontend development servers side by side"
)]
pub struct Cli {
    /// Run only the backend (go run main.go in ./backend)
    #[arg(short, long)]
    pub backend: bool,

    /// Run only the frontend (npm run dev in ./frontend)
    #[arg(short, long)]
    pub frontend: bool,

    /// Directory containing backend/ and frontend/
    #[arg(long, env = "DEVRUN_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

pub fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "devrun", &mut std::io::stdout());
        return Ok(());
    }

    dev::run(&cli)
}
