//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use subnetly_core::Address;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Status cell for an address row: reserved, used or free.
pub fn status_cell(address: &Address, color: bool) -> String {
    let text = if address.is_reserved() {
        "reserved".to_owned()
    } else {
        address.status.to_string()
    };
    if !color {
        return text;
    }
    if address.is_reserved() {
        text.dimmed().to_string()
    } else if address.is_used() {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

/// Utilization percentage, highlighted as the block fills up.
pub fn utilization_cell(percent: u64, color: bool) -> String {
    let text = format!("{percent}%");
    if !color {
        return text;
    }
    match percent {
        90.. => text.red().bold().to_string(),
        70..=89 => text.yellow().to_string(),
        _ => text.green().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
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

/// One-line confirmation of a mutation, on stderr.
pub fn print_summary(summary: &str, quiet: bool) {
    if !quiet {
        eprintln!("{summary}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![Item { name: "lan" }, Item { name: "dmz" }]
    }

    fn render(format: OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| Row {
                name: i.name.to_owned(),
            },
            |i| i.name.to_owned(),
        )
        .unwrap()
    }

    #[test]
    fn plain_is_one_id_per_line() {
        assert_eq!(render(OutputFormat::Plain), "lan\ndmz");
    }

    #[test]
    fn compact_json_is_single_line() {
        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"name":"lan"},{"name":"dmz"}]"#
        );
    }

    #[test]
    fn table_has_header() {
        let table = render(OutputFormat::Table);
        assert!(table.contains("Name"));
        assert!(table.contains("dmz"));
    }

    #[test]
    fn uncolored_cells_are_plain_text() {
        let address = Address::free("10.0.0.1".parse().unwrap());
        assert_eq!(status_cell(&address, false), "free");
        assert_eq!(utilization_cell(95, false), "95%");
    }
}
