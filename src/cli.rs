use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ratalert", version, about = "Demo of modal alerts for ratatui")]
pub struct Args {
    /// Theme name (e.g., "Catppuccin Mocha"); unknown names are fatal
    #[arg(short, long)]
    pub theme: Option<String>,
}
