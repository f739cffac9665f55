//! Terminal front end.
//!
//! Each subcommand is a thin screen over the library: it parses input,
//! calls the store through [`SharedStore`](crate::db::shared::SharedStore)
//! and renders the result with the message macros and table views.

pub mod feed;
pub mod growth;
pub mod init;
pub mod profile;
pub mod records;
pub mod sleep;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Log a feeding")]
    Feed(feed::FeedArgs),
    #[command(about = "Track or log sleep sessions", arg_required_else_help = true)]
    Sleep(sleep::SleepArgs),
    #[command(about = "Record height and weight")]
    Growth(growth::GrowthArgs),
    #[command(about = "List, chart, edit or delete records", arg_required_else_help = true)]
    Records(records::RecordsArgs),
    #[command(about = "Show or change the baby's profile", arg_required_else_help = true)]
    Profile(profile::ProfileArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Feed(args) => feed::cmd(args).await,
            Commands::Sleep(args) => sleep::cmd(args).await,
            Commands::Growth(args) => growth::cmd(args).await,
            Commands::Records(args) => records::cmd(args).await,
            Commands::Profile(args) => profile::cmd(args),
        }
    }
}
