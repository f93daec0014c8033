//! Command-line surface.

use crate::error::ConsultError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "consult")]
#[command(version, about = "Ask a question to one of the expert personas", long_about = None)]
pub struct Args {
    /// List the available personas
    #[arg(long, conflicts_with_all = ["status", "persona"])]
    pub list: bool,

    /// Show capability and credential status
    #[arg(long, conflicts_with = "persona")]
    pub status: bool,

    /// Persona to consult (see --list)
    #[arg(short, long, value_name = "ID")]
    pub persona: Option<String>,

    /// The question; remaining words are joined with spaces
    #[arg(value_name = "QUESTION", trailing_var_arg = true)]
    pub question: Vec<String>,

    /// Config file (default: <config dir>/expert-gateway/gateway.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log directory (default: <data dir>/expert-gateway/logs)
    #[arg(long, value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Status,
    Ask { persona: String, question: String },
}

impl Args {
    /// # Errors
    ///
    /// Returns [`ConsultError::Usage`] when no action was requested.
    pub fn action(&self) -> Result<Action, ConsultError> {
        if self.list {
            return Ok(Action::List);
        }

        if self.status {
            return Ok(Action::Status);
        }

        match &self.persona {
            Some(persona) => Ok(Action::Ask {
                persona: persona.clone(),
                question: self.question.join(" "),
            }),
            None => Err(ConsultError::Usage {
                message: "Choose --list, --status or --persona <ID> <QUESTION>".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
