//! Chess Engine MCP Server library: configuration, the Service Facade, the
//! HTTP transport glue, logging setup, and the CLI surface. `main.rs` wires
//! these together; `tests/` exercises the facade end-to-end against a
//! scripted engine.

pub mod cli;
pub mod config;
pub mod facade;
pub mod http;
pub mod logging;
