//! gitlab-issue-creator - MCP server that creates GitLab issues.

use clap::{Parser, Subcommand};
use issue_creator_mcp::{McpServer, ToolHandler};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitlab-issue-creator")]
#[command(author, version, about = "MCP server that creates GitLab issues", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdin/stdout (default)
    Serve,

    /// Print the advertised tool catalog as JSON
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            McpServer::new().run().await?;
        }
        Commands::Tools => {
            let catalog = serde_json::json!({
                "tools": ToolHandler::new().available_tools(),
            });
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }

    Ok(())
}
