use colored::{ColoredString, Colorize};

use crate::core::format_timestamp;
use crate::tracking::{format_hms, Session, SessionStatus};

/// Color a status label the way the tracker displays it
pub fn status_label(status: SessionStatus) -> ColoredString {
    let label = status.display_name();
    match status {
        SessionStatus::Ready => label.white(),
        SessionStatus::Active => label.green().bold(),
        SessionStatus::Paused => label.yellow().bold(),
        SessionStatus::Completed => label.blue().bold(),
    }
}

/// Format a single session as a detail card
pub fn format_session_pretty(session: &Session) -> String {
    let mut output = Vec::new();

    let id = session
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    output.push(format!(
        "{} {}",
        "Session".bold(),
        format!("#{id}").dimmed()
    ));
    output.push("─".repeat(40));
    output.push(format!("Name:     {}", session.name));
    output.push(format!("Owner:    {}", session.owner));
    output.push(format!("Status:   {}", status_label(session.status)));
    output.push(format!("Start:    {}", format_timestamp(session.start_time)));
    output.push(format!("Stop:     {}", format_timestamp(session.stop_time)));
    output.push(format!("Paused:   {}", format_timestamp(session.pause_time)));
    output.push(format!("Resumed:  {}", format_timestamp(session.resume_time)));
    output.push(format!(
        "Total:    {}",
        format_hms(session.total_time).cyan().bold()
    ));

    output.join("\n")
}

/// Format the history as a compact list, newest first
pub fn format_history_pretty(history: &[Session]) -> String {
    if history.is_empty() {
        return "History (0 sessions)\n  No completed sessions yet".to_string();
    }

    let mut output = format!("History ({} sessions)\n", history.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in history {
        let id = session
            .id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let line = format!(
            "{}  {}  {}  {}  {}",
            format_hms(session.total_time).cyan(),
            session.name.bold(),
            format!("({})", session.owner).dimmed(),
            format_timestamp(session.start_time).dimmed(),
            format!("#{id}").dimmed(),
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format the acknowledgment for a lifecycle operation
pub fn format_event_pretty(action: &str, applied: bool, session: &Session) -> String {
    if !applied {
        return format!("{action}: nothing to do ({})", session.status)
            .dimmed()
            .to_string();
    }

    let total = format_hms(session.total_time);
    match action {
        "start" => format!("▶ Started \"{}\" for {}", session.name, session.owner)
            .green()
            .to_string(),
        "pause" => format!("⏸ Paused at {total}").yellow().to_string(),
        "resume" => "▶ Resumed".green().to_string(),
        "stop" => format!("⏹ Stopped \"{}\" after {total}", session.name)
            .blue()
            .to_string(),
        "reset" => "Ready for the next session".dimmed().to_string(),
        other => format!("{other}: {total}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_session_pretty_na_fields() {
        colored::control::set_override(false);
        let output = format_session_pretty(&Session::default());

        assert!(output.contains("Name:     N/A"));
        assert!(output.contains("Start:    N/A"));
        assert!(output.contains("Status:   Ready"));
        assert!(output.contains("Total:    00:00:00"));
    }

    #[test]
    fn test_format_history_pretty_empty() {
        let output = format_history_pretty(&[]);
        assert!(output.contains("0 sessions"));
    }

    #[test]
    fn test_format_event_not_applied() {
        colored::control::set_override(false);
        let output = format_event_pretty("pause", false, &Session::default());
        assert_eq!(output, "pause: nothing to do (Ready)");
    }
}
