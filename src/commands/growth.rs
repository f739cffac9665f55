use crate::db::shared::SharedStore;
use crate::libs::messages::Message;
use crate::libs::record::{parse_timestamp, RecordFields};
use crate::msg_success;
use anyhow::Result;
use chrono::{Local, NaiveTime};
use clap::Args;

#[derive(Debug, Args)]
pub struct GrowthArgs {
    /// Height in centimetres
    height: f64,

    /// Weight in kilograms
    weight: f64,

    /// Measurement date (YYYY-MM-DD); defaults to today
    #[arg(long, short)]
    date: Option<String>,
}

pub async fn cmd(args: GrowthArgs) -> Result<()> {
    let date = match args.date.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => Local::now().date_naive().and_time(NaiveTime::MIN),
    };

    let store = SharedStore::open_default().await?;
    let id = store.insert(RecordFields::growth(args.height, args.weight, date)).await?;

    msg_success!(Message::GrowthRecorded(id.to_string()));
    Ok(())
}
