use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "locket-relay")]
#[command(author, version, about = "Telegram bot that uploads your photos to Locket", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP listener and the bot
    Run,

    /// Run in production mode (loads .env.production)
    RunProduction,

    /// Run only the HTTP listener, without the bot
    Serve,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
