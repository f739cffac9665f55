//! Browse and maintain stored records.
//!
//! `list` and `chart` read through the range filter; `edit` and `delete`
//! address a single record by kind and id.

use crate::db::shared::SharedStore;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::metrics::{
    feeding_amount_series, height_series, sleep_minutes_series, total_sleep_minutes, weight_series, AnomalyLog,
};
use crate::libs::range::RangeView;
use crate::libs::record::{
    parse_timestamp, Amount, FeedingFields, GrowthFields, Record, RecordFields, RecordId, RecordKind, SleepFields,
};
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    command: RecordsCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GrowthSeries {
    Height,
    Weight,
}

#[derive(Debug, Subcommand)]
enum RecordsCommand {
    #[command(about = "List records of one kind")]
    List {
        /// feeding, sleep or growth
        kind: RecordKind,
        /// today or past7days; defaults to the configured view
        #[arg(long, short)]
        view: Option<RangeView>,
        /// Ignore the range and list everything
        #[arg(long, short, conflicts_with = "view")]
        all: bool,
    },
    #[command(about = "Draw a bar chart of one kind")]
    Chart {
        kind: RecordKind,
        #[arg(long, short)]
        view: Option<RangeView>,
        /// Which growth measurement to plot
        #[arg(long, value_enum, default_value = "weight")]
        series: GrowthSeries,
    },
    #[command(about = "Change fields of a record")]
    Edit {
        kind: RecordKind,
        id: String,
        /// Feeding time, sleep start or growth date
        #[arg(long)]
        at: Option<String>,
        /// Sleep end; "open" marks the session as still running
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
    },
    #[command(about = "Delete a record")]
    Delete {
        kind: RecordKind,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

/// Raw edit options as typed on the command line.
#[derive(Debug, Default)]
struct EditInput {
    at: Option<String>,
    end: Option<String>,
    amount: Option<String>,
    notes: Option<String>,
    height: Option<f64>,
    weight: Option<f64>,
}

pub async fn cmd(args: RecordsArgs) -> Result<()> {
    match args.command {
        RecordsCommand::List { kind, view, all } => list(kind, view, all).await,
        RecordsCommand::Chart { kind, view, series } => chart(kind, view, series).await,
        RecordsCommand::Edit { kind, id, at, end, amount, notes, height, weight } => {
            edit(kind, &id, EditInput { at, end, amount, notes, height, weight }).await
        }
        RecordsCommand::Delete { kind, id, yes } => delete(kind, &id, yes).await,
    }
}

async fn list(kind: RecordKind, view: Option<RangeView>, all: bool) -> Result<()> {
    let store = SharedStore::open_default().await?;

    let (records, label) = if all {
        (store.with_store(move |s| s.list_all(kind)).await?, "all time".to_string())
    } else {
        let view = resolve_view(view)?;
        (store.filter_view(kind, view).await?, view.label().to_string())
    };

    if records.is_empty() {
        msg_info!(Message::RecordsNotFound(kind.to_string()));
        return Ok(());
    }

    msg_print!(Message::RecordsHeader(kind.to_string(), label), true);
    let mut anomalies = AnomalyLog::new();
    View::records(kind, &records, &mut anomalies);

    if kind == RecordKind::Sleep {
        let sessions: Vec<_> = records.iter().filter_map(Record::as_sleep).cloned().collect();
        msg_print!(View::sleep_total(total_sleep_minutes(&sessions)));
    }
    report_anomalies(&anomalies);
    Ok(())
}

async fn chart(kind: RecordKind, view: Option<RangeView>, series: GrowthSeries) -> Result<()> {
    let config = Config::read()?;
    let view = view.unwrap_or(config.default_view);
    let store = SharedStore::open_default().await?;
    let records = store.filter_view(kind, view).await?;

    if records.is_empty() {
        msg_info!(Message::RecordsNotFound(kind.to_string()));
        return Ok(());
    }

    let mut anomalies = AnomalyLog::new();
    let (title, data) = match kind {
        RecordKind::Feeding => {
            let feedings: Vec<_> = records.iter().filter_map(Record::as_feeding).cloned().collect();
            ("Feeding amount", feeding_amount_series(&feedings, &mut anomalies))
        }
        RecordKind::Sleep => {
            let sessions: Vec<_> = records.iter().filter_map(Record::as_sleep).cloned().collect();
            ("Sleep minutes", sleep_minutes_series(&sessions, &mut anomalies))
        }
        RecordKind::Growth => {
            let growth: Vec<_> = records.iter().filter_map(Record::as_growth).cloned().collect();
            match series {
                GrowthSeries::Height => ("Height (cm)", height_series(&growth)),
                GrowthSeries::Weight => ("Weight (kg)", weight_series(&growth)),
            }
        }
    };

    msg_print!(Message::ChartHeader(title.to_string(), view.label().to_string()), true);
    print!("{}", View::bar_chart(&data, config.chart_width));
    report_anomalies(&anomalies);
    Ok(())
}

async fn edit(kind: RecordKind, raw_id: &str, input: EditInput) -> Result<()> {
    let id = RecordId::parse_for(kind, raw_id)?;
    let fields = edit_fields(kind, input)?;
    if is_empty_update(&fields) {
        msg_bail_anyhow!(Message::NoChangesProvided);
    }

    let store = SharedStore::open_default().await?;
    let updated = store.update(kind, id, fields).await?;
    msg_success!(Message::RecordUpdated(kind.to_string(), updated.id().to_string()));
    Ok(())
}

async fn delete(kind: RecordKind, raw_id: &str, yes: bool) -> Result<()> {
    let id = RecordId::parse_for(kind, raw_id)?;
    let store = SharedStore::open_default().await?;
    // Fails with NotFound before asking anything.
    store.get(kind, id.clone()).await?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteRecord(kind.to_string(), id.to_string()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    store.delete(kind, id.clone()).await?;
    msg_success!(Message::RecordDeleted(kind.to_string(), id.to_string()));
    Ok(())
}

fn resolve_view(view: Option<RangeView>) -> Result<RangeView> {
    match view {
        Some(view) => Ok(view),
        None => Ok(Config::read()?.default_view),
    }
}

fn report_anomalies(anomalies: &AnomalyLog) {
    for anomaly in anomalies.entries() {
        msg_warning!(anomaly);
    }
}

/// Maps command-line options onto a partial update for `kind`.
/// Options that do not apply to the kind are rejected.
fn edit_fields(kind: RecordKind, input: EditInput) -> Result<RecordFields> {
    let at = input.at.as_deref().map(parse_timestamp).transpose()?;

    let fields = match kind {
        RecordKind::Feeding => {
            reject_option(kind, "--end", input.end.is_some())?;
            reject_option(kind, "--height", input.height.is_some())?;
            reject_option(kind, "--weight", input.weight.is_some())?;
            RecordFields::Feeding(FeedingFields {
                datetime: at,
                amount: input.amount.as_deref().map(Amount::parse),
                notes: input.notes,
            })
        }
        RecordKind::Sleep => {
            reject_option(kind, "--amount", input.amount.is_some())?;
            reject_option(kind, "--notes", input.notes.is_some())?;
            reject_option(kind, "--height", input.height.is_some())?;
            reject_option(kind, "--weight", input.weight.is_some())?;
            let end = match input.end.as_deref() {
                None => None,
                Some(raw) if raw.eq_ignore_ascii_case("open") => Some(None),
                Some(raw) => Some(Some(parse_timestamp(raw)?)),
            };
            RecordFields::Sleep(SleepFields { start: at, end })
        }
        RecordKind::Growth => {
            reject_option(kind, "--end", input.end.is_some())?;
            reject_option(kind, "--amount", input.amount.is_some())?;
            reject_option(kind, "--notes", input.notes.is_some())?;
            RecordFields::Growth(GrowthFields { height: input.height, weight: input.weight, date: at })
        }
    };
    Ok(fields)
}

fn reject_option(kind: RecordKind, option: &str, given: bool) -> Result<()> {
    if given {
        msg_bail_anyhow!(format!("{} does not apply to {} records", option, kind));
    }
    Ok(())
}

fn is_empty_update(fields: &RecordFields) -> bool {
    match fields {
        RecordFields::Feeding(f) => *f == FeedingFields::default(),
        RecordFields::Sleep(f) => *f == SleepFields::default(),
        RecordFields::Growth(f) => *f == GrowthFields::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_end_open_clears_end() {
        let input = EditInput { end: Some("open".to_string()), ..Default::default() };
        let fields = edit_fields(RecordKind::Sleep, input).unwrap();
        assert_eq!(fields, RecordFields::Sleep(SleepFields { start: None, end: Some(None) }));
    }

    #[test]
    fn options_for_other_kinds_are_rejected() {
        let input = EditInput { height: Some(60.0), ..Default::default() };
        assert!(edit_fields(RecordKind::Feeding, input).is_err());
    }

    #[test]
    fn no_options_is_an_empty_update() {
        let fields = edit_fields(RecordKind::Growth, EditInput::default()).unwrap();
        assert!(is_empty_update(&fields));
    }
}
