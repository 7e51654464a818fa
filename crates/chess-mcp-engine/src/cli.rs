//! Command-line interface.

use clap::{Parser, ValueEnum};

/// Chess Engine MCP Server.
#[derive(Debug, Parser)]
#[command(name = "chess-mcp-engine", about = "Chess Engine MCP Server")]
pub struct Cli {
    /// Transport mode for the MCP server.
    #[arg(long, value_enum, default_value_t = Transport::Sse)]
    pub transport: Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Sse,
    Stdio,
}
