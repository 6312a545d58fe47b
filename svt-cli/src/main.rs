//! svt - command line tool for store visitor traffic data.

use clap::Parser;

#[derive(Parser)]
#[command(name = "svt", version, about = "Store visitor traffic toolkit")]
struct Cli {
    #[command(subcommand)]
    command: svt_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    svt_cmd::run(cli.command).await
}
