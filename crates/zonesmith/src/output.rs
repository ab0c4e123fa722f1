//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders the run's change report in the format selected by `--output`.
//! Table uses `tabled` with colored change states, structured formats use
//! serde, plain emits one path per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};
use zonesmith_core::{ChangeKind, RunReport};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render the change report in the chosen format.
pub fn render_report(format: OutputFormat, report: &RunReport, color: bool) -> String {
    match format {
        OutputFormat::Table => render_table(report, color),
        OutputFormat::Json => render_json_pretty(report),
        OutputFormat::Yaml => render_yaml(report),
        OutputFormat::Plain => report
            .changes
            .iter()
            .map(|change| change.path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "File")]
    file: String,
}

fn render_table(report: &RunReport, color: bool) -> String {
    let rows: Vec<ChangeRow> = report
        .changes
        .iter()
        .map(|change| ChangeRow {
            state: state_cell(change.kind, color),
            file: change.path.display().to_string(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn state_cell(kind: ChangeKind, color: bool) -> String {
    let label = kind.to_string();
    if !color {
        return label;
    }
    match kind {
        ChangeKind::Created => label.green().to_string(),
        ChangeKind::Updated => label.yellow().to_string(),
        ChangeKind::Deleted => label.red().to_string(),
    }
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use zonesmith_core::Change;

    use super::*;

    fn report() -> RunReport {
        RunReport {
            changes: vec![
                Change {
                    path: PathBuf::from("generated/zones/peg.nu.db"),
                    kind: ChangeKind::Created,
                },
                Change {
                    path: PathBuf::from("generated/zones/old.db"),
                    kind: ChangeKind::Deleted,
                },
            ],
        }
    }

    #[test]
    fn plain_lists_one_path_per_line() {
        let out = render_report(OutputFormat::Plain, &report(), false);
        assert_eq!(out, "generated/zones/peg.nu.db\ngenerated/zones/old.db");
    }

    #[test]
    fn json_carries_lowercase_change_kinds() {
        let out = render_report(OutputFormat::Json, &report(), false);
        assert!(out.contains("\"kind\": \"created\""));
        assert!(out.contains("\"kind\": \"deleted\""));
    }

    #[test]
    fn table_shows_states_and_files() {
        let out = render_report(OutputFormat::Table, &report(), false);
        assert!(out.contains("State"));
        assert!(out.contains("created"));
        assert!(out.contains("generated/zones/peg.nu.db"));
    }

    #[test]
    fn colored_states_differ_from_plain_labels() {
        assert_eq!(state_cell(ChangeKind::Created, false), "created");
        assert_ne!(state_cell(ChangeKind::Created, true), "created");
    }
}
