use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "modcli",
    about = "Modular CLI: feature modules (git, release) contribute commands",
    after_help = "Run without a command to list what the enabled modules offer.\nExamples:\n  modcli git clone https://example.com/repo.git\n  modcli release note added \"longest-prefix command matching\"\n  modcli release cut 0.2.0"
)]
pub struct Cli {
    /// Path to config (defaults to ./modcli.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); MODCLI_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command tokens, routed verbatim to the module that declares them
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}
