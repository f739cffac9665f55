//! Log a feeding.

use crate::db::shared::SharedStore;
use crate::libs::messages::Message;
use crate::libs::record::{format_timestamp, parse_timestamp, Amount, RecordFields, RecordId};
use crate::{msg_success, msg_warning};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct FeedArgs {
    /// How much was eaten: none, a little, normal, a lot
    #[arg(long, short, default_value = "normal")]
    amount: String,

    /// Free-text notes
    #[arg(long, short)]
    notes: Option<String>,

    /// When the feeding happened (YYYY-MM-DD HH:MM); defaults to now
    #[arg(long)]
    at: Option<String>,
}

pub async fn cmd(args: FeedArgs) -> Result<()> {
    let datetime = match args.at.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => Local::now().naive_local(),
    };

    let amount = Amount::parse(&args.amount);
    if !amount.is_recognized() {
        msg_warning!(Message::UnrecognizedAmount(args.amount.clone()));
    }

    let store = SharedStore::open_default().await?;
    let id = store
        .insert(RecordFields::feeding(datetime, amount, args.notes.unwrap_or_default()))
        .await?;

    if let RecordId::Row(id) = id {
        msg_success!(Message::FeedingLogged(id, format_timestamp(&datetime)));
    }
    Ok(())
}
