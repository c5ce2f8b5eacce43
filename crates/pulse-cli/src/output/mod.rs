use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Arrays of objects become one row per element; a single object becomes a
/// two-column `field`/`value` listing with nested summaries flattened into
/// dotted field names.
fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let options = table_options();
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_rows(&items, options)),
        Value::Object(map) => {
            let mut rows = Vec::new();
            for (key, value) in &map {
                flatten_into(key, value, &mut rows);
            }
            Ok(table::render(&["field", "value"], &rows, options))
        }
        scalar => Ok(table::render(&["value"], &[vec![cell(&scalar)]], options)),
    }
}

fn render_rows(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(nothing to show)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render(&["value"], &rows, options);
    }

    // Union of keys across rows; serde_json maps keep keys sorted.
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render(&header_refs, &rows, options)
}

fn flatten_into(prefix: &str, value: &Value, rows: &mut Vec<Vec<String>>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                flatten_into(&format!("{prefix}.{key}"), nested, rows);
            }
        }
        other => rows.push(vec![prefix.to_string(), cell(other)]),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.replace('\n', " "),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_else(|_| String::from("{}")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Counts {
        commits: u64,
        tags: u64,
    }

    #[derive(Serialize)]
    struct Repo {
        full_name: &'static str,
        summary: Counts,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Repo {
            full_name: "acme/widget",
            summary: Counts { commits: 3, tags: 1 },
        };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["summary"]["commits"], 3);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Repo {
            full_name: "acme/widget",
            summary: Counts { commits: 3, tags: 1 },
        };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn object_table_flattens_nested_fields() {
        let value = Repo {
            full_name: "acme/widget",
            summary: Counts { commits: 3, tags: 1 },
        };
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("field"));
        assert!(out.contains("summary.commits"));
        assert!(out.contains("summary.tags"));
        assert!(out.contains("acme/widget"));
    }

    #[test]
    fn array_table_has_one_row_per_element() {
        let value = vec![
            Counts { commits: 10, tags: 2 },
            Counts { commits: 0, tags: 0 },
        ];
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().unwrap_or_default();
        assert!(header.find("commits") < header.find("tags"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn empty_array_renders_placeholder() {
        let value: Vec<Counts> = Vec::new();
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(nothing to show)");
    }
}
