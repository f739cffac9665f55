use super::formatter::format_duration;
use super::metrics::{duration_label, AnomalyLog, ChartSeries};
use super::record::{format_timestamp, Record, RecordKind};
use chrono::Duration;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Table of records of a single kind, in the order given.
    pub fn records_table(kind: RecordKind, records: &[Record], anomalies: &mut AnomalyLog) -> Table {
        let mut table = Table::new();

        match kind {
            RecordKind::Feeding => table.add_row(row!["ID", "TIME", "AMOUNT", "NOTES"]),
            RecordKind::Sleep => table.add_row(row!["ID", "START", "END", "DURATION"]),
            RecordKind::Growth => table.add_row(row!["ID", "DATE", "HEIGHT (CM)", "WEIGHT (KG)"]),
        };

        for record in records {
            match record {
                Record::Feeding(r) => {
                    table.add_row(row![r.id, format_timestamp(&r.datetime), r.amount, r.notes]);
                }
                Record::Sleep(r) => {
                    let end = r.end.as_ref().map(format_timestamp).unwrap_or_else(|| "Still sleeping".to_string());
                    table.add_row(row![r.id, format_timestamp(&r.start), end, duration_label(r, anomalies)]);
                }
                Record::Growth(r) => {
                    table.add_row(row![r.id, r.date.format("%Y-%m-%d"), format!("{:.1}", r.height), format!("{:.2}", r.weight)]);
                }
            }
        }

        table
    }

    pub fn records(kind: RecordKind, records: &[Record], anomalies: &mut AnomalyLog) {
        Self::records_table(kind, records, anomalies).printstd();
    }

    /// One-line total under the sleep table, e.g. "Total: 09:45".
    pub fn sleep_total(minutes: i64) -> String {
        format!("Total: {}", format_duration(&Duration::minutes(minutes)))
    }

    /// Horizontal bar chart. The largest value spans `width` characters.
    pub fn bar_chart(series: &ChartSeries<f64>, width: usize) -> String {
        let max = series.values.iter().cloned().fold(0.0_f64, f64::max);
        let label_width = series.dates.iter().map(|d| d.chars().count()).max().unwrap_or(0);

        let mut out = String::new();
        for (date, value) in series.dates.iter().zip(series.values.iter()) {
            let bar_len = if max > 0.0 { ((value / max) * width as f64).round() as usize } else { 0 };
            out.push_str(&format!(
                "{:>label_width$} | {} {}\n",
                date,
                "█".repeat(bar_len),
                format_value(*value),
                label_width = label_width
            ));
        }
        out
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_chart_scales_to_width() {
        let series = ChartSeries { dates: vec!["01 3".to_string(), "02 3".to_string()], values: vec![3.0, 1.5] };
        let chart = View::bar_chart(&series, 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], format!("01 3 | {} 3", "█".repeat(10)));
        assert_eq!(lines[1], format!("02 3 | {} 1.5", "█".repeat(5)));
    }

    #[test]
    fn bar_chart_of_zeroes_has_no_bars() {
        let series = ChartSeries { dates: vec!["a".to_string()], values: vec![0.0] };
        assert_eq!(View::bar_chart(&series, 10), "a |  0\n");
    }
}
