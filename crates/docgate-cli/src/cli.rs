//! Command-line interface definitions for `docgate`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Client for the docgate document daemon.
#[derive(Parser, Debug)]
#[command(name = "docgate", disable_help_subcommand = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Stores a document and prints its identifier and capability token.
    Create {
        /// Document name; its extension selects the parser.
        #[arg(value_name = "NAME")]
        name: String,
        /// Reads the document from this file instead of stdin.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Lists stored documents.
    List {
        /// Number of documents to return (1 to 100).
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        limit: i64,
        /// Number of documents to skip.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
    /// Executes a stored document on behalf of a user.
    Execute {
        /// Identifier returned by `create`.
        #[arg(value_name = "DOC_ID", allow_negative_numbers = true)]
        doc_id: i64,
        /// User the execution is performed for.
        #[arg(value_name = "USERNAME")]
        username: String,
    },
}
