//! ICS feed for a student's deadlines. RFC 5545 requires CRLF line
//! endings; dates are emitted as UTC.

use compass_db::models::{College, Task};

const PRODID: &str = "-//Compass//Application Calendar//EN";

/// Build a VCALENDAR of college application deadlines (all-day events)
/// and task due dates (timed events).
pub fn build_feed(colleges: &[College], tasks: &[Task]) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for college in colleges {
        let (Some(id), Some(deadline)) = (college.id, college.deadline) else {
            continue;
        };
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:college-{}@compass", id.to_hex()));
        lines.push(format!("DTSTAMP:{}", format_datetime(college.updated_at)));
        lines.push(format!("DTSTART;VALUE=DATE:{}", format_date(deadline)));
        lines.push(format!(
            "SUMMARY:{} application deadline",
            escape_text(&college.name)
        ));
        if let Some(notes) = &college.notes {
            lines.push(format!("DESCRIPTION:{}", escape_text(notes)));
        }
        lines.push("END:VEVENT".to_string());
    }

    for task in tasks {
        let (Some(id), Some(due)) = (task.id, task.due_date) else {
            continue;
        };
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:task-{}@compass", id.to_hex()));
        lines.push(format!("DTSTAMP:{}", format_datetime(task.updated_at)));
        lines.push(format!("DTSTART:{}", format_datetime(due)));
        lines.push(format!("SUMMARY:{}", escape_text(&task.title)));
        if let Some(description) = &task.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    let mut feed = lines.join("\r\n");
    feed.push_str("\r\n");
    feed
}

fn format_date(dt: bson::DateTime) -> String {
    dt.to_chrono().format("%Y%m%d").to_string()
}

fn format_datetime(dt: bson::DateTime) -> String {
    dt.to_chrono().format("%Y%m%dT%H%M%SZ").to_string()
}

/// TEXT escaping per RFC 5545 3.3.11.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}
