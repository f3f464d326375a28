use serde_json::Value;

use crate::types::{ActionItem, MeetingRecord, MeetingReport};

/// One history row: `#id  title  [type]`
pub fn format_record_row(record: &MeetingRecord) -> String {
    format!("#{:<5} {}  [{}]", record.id, record.title, record.meeting_type)
}

/// Render a result payload for the terminal. Payloads that do not read as a
/// report are shown as raw JSON.
pub fn format_report_readable(payload: &Value) -> String {
    match MeetingReport::from_payload(payload) {
        Some(report) => format_report(&report),
        None => format_raw(payload),
    }
}

fn format_report(report: &MeetingReport) -> String {
    let mut output = String::new();

    output.push_str("## Summary\n\n");
    output.push_str(report.summary.as_deref().unwrap_or("(no summary)"));
    output.push_str("\n\n");

    push_list(&mut output, "Key points", &report.key_points);
    push_list(&mut output, "Decisions", &report.decisions);

    if !report.action_items.is_empty() {
        output.push_str("## Action items\n\n");
        for item in &report.action_items {
            let line = match item {
                ActionItem::Task {
                    task,
                    owner,
                    due_date,
                } => {
                    let owner = owner.as_deref().unwrap_or("unassigned");
                    match due_date {
                        Some(due) => format!("{} ({}, due {})", task, owner, due),
                        None => format!("{} ({})", task, owner),
                    }
                }
                ActionItem::Other(value) => inline_value(value),
            };
            output.push_str(&format!("• {}\n", line));
        }
        output.push('\n');
    }

    if !report.agenda.is_null() {
        output.push_str("## Agenda\n\n");
        push_agenda(&mut output, &report.agenda);
        output.push('\n');
    }

    for (key, value) in &report.extra {
        if value.is_null() {
            continue;
        }
        output.push_str(&format!("## {}\n\n{}\n\n", key, inline_value(value)));
    }

    output
}

fn format_raw(payload: &Value) -> String {
    match payload {
        Value::Null => "(empty report)".to_string(),
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn push_list(output: &mut String, heading: &str, items: &[Value]) {
    if items.is_empty() {
        return;
    }
    output.push_str(&format!("## {}\n\n", heading));
    for item in items {
        output.push_str(&format!("• {}\n", inline_value(item)));
    }
    output.push('\n');
}

// The agenda shape is up to the model: a list of topics, a topic -> notes map,
// or a list of objects.
fn push_agenda(output: &mut String, agenda: &Value) {
    match agenda {
        Value::Array(items) => {
            for item in items {
                output.push_str(&format!("• {}\n", inline_value(item)));
            }
        }
        Value::Object(map) => {
            for (topic, notes) in map {
                output.push_str(&format!("### {}\n{}\n", topic, inline_value(notes)));
            }
        }
        other => {
            output.push_str(&inline_value(other));
            output.push('\n');
        }
    }
}

fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, inline_value(v)))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Array(items) => items
            .iter()
            .map(inline_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
