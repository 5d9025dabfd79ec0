//! The audit report (spec.md §6): aggregates identical [`AuditRow`]s into
//! counts, renders a summary table, and dumps every row to CSV. Ported from
//! the original's `Results`/`HeadResults` `output()` methods, which collapse
//! rows with the same "what changed" signature and `logger.info` the counts;
//! here a `comfy-table` table replaces the repeated log lines (spec.md §6:
//! "a table plus a CSV dump").

use hdx_sweep_core::AuditRow;
use std::collections::BTreeMap;
use std::io::Write;

/// Accumulates [`AuditRow`]s across a sweep and renders the aggregated report.
#[derive(Debug, Default)]
pub struct AuditReport {
    rows: Vec<AuditRow>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: AuditRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[AuditRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Groups rows by their full field signature and counts occurrences,
    /// in first-seen order (matches the original's insertion-ordered
    /// `dict_of_lists_add` accumulation).
    fn aggregate(&self) -> Vec<(Vec<(&'static str, String)>, usize)> {
        let mut order: Vec<Vec<(&'static str, String)>> = Vec::new();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_key: std::collections::HashMap<String, Vec<(&'static str, String)>> =
            std::collections::HashMap::new();

        for row in &self.rows {
            let fields = row.ordered_fields();
            let key = fields
                .iter()
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
                .join("\u{1f}");
            if !counts.contains_key(&key) {
                order.push(fields.clone());
                by_key.insert(key.clone(), fields);
            }
            *counts.entry(key).or_insert(0) += 1;
        }

        order
            .into_iter()
            .map(|fields| {
                let key = fields
                    .iter()
                    .map(|(_, v)| v.as_str())
                    .collect::<Vec<_>>()
                    .join("\u{1f}");
                let count = counts[&key];
                (fields, count)
            })
            .collect()
    }

    /// Renders the aggregated summary as a `comfy-table` table: one column
    /// per audit key plus a trailing `Count` column.
    pub fn render_table(&self) -> comfy_table::Table {
        let mut table = comfy_table::Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);

        let mut headers: Vec<String> = AuditRow::headers().into_iter().map(String::from).collect();
        headers.push("Count".to_string());
        table.set_header(headers);

        for (fields, count) in self.aggregate() {
            let mut cells: Vec<String> = fields.into_iter().map(|(_, v)| v).collect();
            cells.push(count.to_string());
            table.add_row(cells);
        }

        table
    }

    /// Writes every individual row (not the aggregated counts) to `path` as
    /// CSV, the "CSV dump" named in spec.md §6.
    pub fn write_csv(&self, path: &std::path::Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv_to(file)
    }

    fn write_csv_to(&self, writer: impl Write) -> std::io::Result<()> {
        let mut w = csv::Writer::from_writer(writer);
        w.write_record(AuditRow::headers())
            .map_err(csv_to_io_error)?;
        for row in &self.rows {
            let values: Vec<String> = row.ordered_fields().into_iter().map(|(_, v)| v).collect();
            w.write_record(&values).map_err(csv_to_io_error)?;
        }
        w.flush()
    }
}

fn csv_to_io_error(err: csv::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err)
}
