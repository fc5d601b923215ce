use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tracklog")]
#[command(about = "A single-screen terminal time tracker")]
#[command(long_about = "tracklog - a single-screen terminal time tracker

Start, pause, resume and stop a timed session, watch the elapsed time tick,
browse the sessions you completed and export them as JSON.

Sessions live in memory only: closing tracklog discards them, so export
anything you want to keep.

QUICK START:
  tracklog                          Open the tracker
  tracklog tui --name \"Review\"      Open with a session name pre-filled
  echo \"start\\nwait 5\\nstop\" | tracklog script --simulated

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON, same shape as exports")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Root directory for config, exports and logs
    #[arg(long, env = "TRACKLOG_HOME", global = true, hide_env_values = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive tracker (default)
    ///
    /// Keys: s start, p pause, r resume, x stop, n/o edit name/owner,
    /// c/C copy current/all, d/D download current/all, t theme,
    /// Tab switch view, q quit.
    Tui(TuiArgs),

    /// Drive the tracker from a command script
    ///
    /// Reads one command per line from FILE (or stdin) and prints the result
    /// of each. Lines starting with '#' are ignored.
    ///
    /// # Commands
    ///
    ///   name <text>         Set the name for the next session
    ///   owner <text>        Set the owner for the next session
    ///   start | pause | resume | stop
    ///   tick                Refresh the live total / fire a due reset
    ///   wait <duration>     Let time pass (e.g. 90, 5s, 2m, 1h30m)
    ///   status              Show the current session
    ///   history             Show completed sessions
    ///   export current|history [PATH]
    ///   amend <id> field=value...   Edit a history entry
    ///                       (name, owner, start, stop, pause, resume)
    #[command(alias = "run")]
    Script(ScriptArgs),

    /// Show or initialize the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   tracklog completions bash > ~/.local/share/bash-completion/completions/tracklog
    ///   tracklog completions zsh > ~/.zsh/completions/_tracklog
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the interactive tracker.
#[derive(Args, Debug, Default)]
pub struct TuiArgs {
    /// Pre-fill the session name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Pre-fill the session owner
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for script mode.
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Script file to read (stdin if omitted or '-')
    pub file: Option<PathBuf>,

    /// Use a simulated clock: 'wait' advances time instantly
    #[arg(long)]
    pub simulated: bool,

    /// Pre-fill the session name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Pre-fill the session owner
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, short = 'f')]
        force: bool,
    },
}
