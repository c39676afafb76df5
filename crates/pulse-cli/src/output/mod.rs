use pulse_views::DisplayState;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

use table::TableOptions;

const ROW_HEADERS: [&str; 5] = ["id", "name", "value", "description", "created_at"];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_key_values(value, table_options()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render the Display View. In table mode, loading and empty states print
/// their message and a populated set prints one row per record.
pub fn render_display(state: &DisplayState, format: OutputFormat) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(state, format);
    }

    Ok(match state {
        DisplayState::Loading { message } | DisplayState::Empty { message } => {
            (*message).to_string()
        }
        DisplayState::Populated { rows } => {
            let cells = rows
                .iter()
                .map(|row| {
                    vec![
                        row.id.to_string(),
                        row.name.clone(),
                        row.value.clone(),
                        row.description.clone(),
                        row.created_at.clone(),
                    ]
                })
                .collect::<Vec<_>>();
            table::render_table(&ROW_HEADERS, &cells, table_options())
        }
    })
}

pub fn output_display(state: &DisplayState, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_display(state, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> TableOptions {
    let prefs = ui::prefs();
    TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Objects render as a two-column key/value table sorted by key.
fn render_key_values<T: Serialize>(value: &T, options: TableOptions) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    let mut rows = match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| vec![key, value_to_cell(&value)])
            .collect::<Vec<_>>(),
        scalar => return Ok(value_to_cell(&scalar)),
    };
    rows.sort_by(|a, b| a[0].cmp(&b[0]));
    Ok(table::render_table(&["key", "value"], &rows, options))
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
