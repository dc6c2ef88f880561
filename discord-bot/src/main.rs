//! Binary for the Miku Discord bot.

use anyhow::Result;
use clap::Parser;
use discord_bot::{ask, load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Ask { prompt, model } => {
            let reply = ask(&prompt, model).await?;
            println!("{}", reply.text);
            Ok(())
        }
    }
}
