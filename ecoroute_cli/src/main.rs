use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::optimize::OptimizeArgs;

mod optimize;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the routes between two places and estimate their emissions
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Optimize { args }) => optimize::run(args).await?,
        None => {
            // Handle no command provided
        }
    }

    Ok(())
}
