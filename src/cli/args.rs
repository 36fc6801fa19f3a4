//! CLI argument definitions using clap
//!
//! This module defines all command-line arguments for apisnip.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::codegen::Format;
use crate::spec::KeyValueRow;

/// Turn one HTTP request description into curl, Python, JavaScript and Postman snippets
#[derive(Parser, Debug, Clone)]
#[command(name = "apisnip", version, about, long_about = None)]
pub struct Args {
    /// Verbose logging and full error details
    #[arg(long = "debug", global = true, action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Output format for structured logging: json (JSON Lines) or text (default)
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate snippets for one request
    Generate(GenerateArgs),
    /// Serve the generator over HTTP
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    // =========================================================================
    // INPUT
    // =========================================================================

    /// Read the request spec (JSON) from FILE, or '-' for stdin
    #[arg(long = "spec", short = 's', value_name = "FILE", conflicts_with_all = ["url", "method", "headers", "query", "body"])]
    pub spec: Option<PathBuf>,

    /// Request URL (builds the spec from flags instead of JSON)
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Request method (default: GET)
    #[arg(long = "method", short = 'X', value_name = "METHOD", requires = "url")]
    pub method: Option<String>,

    /// Header as 'Name: value' (repeatable; a repeated name keeps the last value)
    #[arg(long = "header", short = 'H', value_name = "HEADER", value_parser = KeyValueRow::parse_header, requires = "url")]
    pub headers: Vec<KeyValueRow>,

    /// Query parameter as 'name=value' (repeatable)
    #[arg(long = "query", short = 'q', value_name = "PARAM", value_parser = KeyValueRow::parse_query, requires = "url")]
    pub query: Vec<KeyValueRow>,

    /// Request body; parsed as JSON when possible, otherwise sent as raw text
    #[arg(long = "body", short = 'd', value_name = "BODY", requires = "url")]
    pub body: Option<String>,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Which representation to print
    #[arg(long = "format", short = 'f', value_name = "FORMAT", value_enum, default_value_t = OutputFormat::All)]
    pub format: OutputFormat,

    /// Name of the generated Postman collection
    #[arg(long = "collection-name", value_name = "NAME")]
    pub collection_name: Option<String>,

    /// Generate the four formats on separate threads
    #[arg(long = "concurrent", action = ArgAction::SetTrue)]
    pub concurrent: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides config; 0 picks a free port)
    #[arg(long = "port", short = 'p', value_name = "PORT")]
    pub port: Option<u16>,

    /// Do not send CORS headers
    #[arg(long = "no-cors", action = ArgAction::SetTrue)]
    pub no_cors: bool,
}

/// Log format for structured output (CI/CD)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}

/// What `generate` prints
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The whole bundle as JSON
    #[default]
    All,
    Curl,
    Python,
    Javascript,
    Postman,
}

impl OutputFormat {
    /// The single format to print, or `None` for the whole bundle
    pub fn single(&self) -> Option<Format> {
        match self {
            OutputFormat::All => None,
            OutputFormat::Curl => Some(Format::Curl),
            OutputFormat::Python => Some(Format::Python),
            OutputFormat::Javascript => Some(Format::Javascript),
            OutputFormat::Postman => Some(Format::Postman),
        }
    }
}
