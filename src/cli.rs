//! Command-line interface parsing for the SkillPort client
//!
//! Running without a subcommand opens the interactive terminal UI. The
//! subcommands run a single flow and exit.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::categories::CategoryForm;
use crate::data::Customer;

/// SkillPort - browse course reviews, manage categories and buy courses
#[derive(Parser, Debug)]
#[command(name = "skillport")]
#[command(about = "Terminal client for the SkillPort course marketplace")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides SKILLPORT_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Login token (overrides SKILLPORT_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Directory for cached data and logs (overrides SKILLPORT_CACHE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One-shot commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the latest course reviews
    Reviews,

    /// List or create course categories
    Categories {
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// Buy one or more courses
    Checkout {
        /// Course ids to purchase
        #[arg(required = true, value_name = "COURSE")]
        courses: Vec<String>,

        /// First name shown to the payment gateway
        #[arg(long, default_value = "")]
        first_name: String,

        /// Last name shown to the payment gateway
        #[arg(long, default_value = "")]
        last_name: String,

        /// Email for the payment receipt
        #[arg(long, default_value = "")]
        email: String,
    },

    /// Enroll in a free course
    Enroll {
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CategoryCommand {
    /// List every category
    List,

    /// Create a category (requires an admin token)
    Create {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },
}

impl CategoryCommand {
    /// The form described by `create` flags
    pub fn form(&self) -> Option<CategoryForm> {
        match self {
            CategoryCommand::Create { name, description } => {
                Some(CategoryForm::new(name.clone(), description.clone()))
            }
            CategoryCommand::List => None,
        }
    }
}

impl Command {
    /// The buyer described by `checkout` flags
    pub fn customer(&self) -> Option<Customer> {
        match self {
            Command::Checkout {
                first_name,
                last_name,
                email,
                ..
            } => Some(Customer {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
            }),
            _ => None,
        }
    }
}
