//! Script command implementation.
//!
//! Runs tracker commands read line by line, printing each result as it
//! happens. With `--simulated`, time only passes on `wait`, which makes
//! scripts reproducible.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::args::{OutputFormat, ScriptArgs};
use crate::config::{Config, Paths};
use crate::core::{parse_duration, Clock, ManualClock, SystemClock};
use crate::error::TrackerError;
use crate::output::{format_event, format_history, format_session, to_json};
use crate::tracking::export::{self, ExportScope};
use crate::tracking::{SessionEdit, SessionId, SessionTracker, TickOutcome};

/// Execute the script command.
///
/// # Errors
///
/// Returns an error if the script cannot be read or a command fails.
pub fn script(
    args: &ScriptArgs,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    let reader: Box<dyn BufRead> = match args.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).map_err(|e| {
                TrackerError::InvalidArgument(format!(
                    "Cannot open script {}: {e}",
                    path.display()
                ))
            })?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let export_dir = config.export_dir(paths);

    if args.simulated {
        let clock = ManualClock::starting_now();
        let mut runner = ScriptRunner::new(&clock, config, export_dir, format);
        runner.prefill(args.name.as_deref(), args.owner.as_deref());
        runner.run(reader, &mut out)?;
    } else {
        let mut runner = ScriptRunner::new(SystemClock, config, export_dir, format);
        runner.prefill(args.name.as_deref(), args.owner.as_deref());
        runner.run(reader, &mut out)?;
    }

    Ok(String::new())
}

/// Interprets script lines against a tracker.
pub struct ScriptRunner<C: Clock> {
    tracker: SessionTracker<C>,
    export_dir: PathBuf,
    format: OutputFormat,
}

impl<C: Clock> ScriptRunner<C> {
    /// Create a runner with a fresh tracker configured from `config`.
    pub fn new(clock: C, config: &Config, export_dir: PathBuf, format: OutputFormat) -> Self {
        let mut tracker = SessionTracker::with_options(clock, config.tracker.options());
        if let Some(name) = &config.tracker.default_name {
            tracker.set_name(name.as_str());
        }
        if let Some(owner) = &config.tracker.default_owner {
            tracker.set_owner(owner.as_str());
        }
        Self {
            tracker,
            export_dir,
            format,
        }
    }

    /// Override the labels used by the next `start`.
    pub fn prefill(&mut self, name: Option<&str>, owner: Option<&str>) {
        if let Some(name) = name {
            self.tracker.set_name(name);
        }
        if let Some(owner) = owner {
            self.tracker.set_owner(owner);
        }
    }

    /// The underlying tracker.
    pub const fn tracker(&self) -> &SessionTracker<C> {
        &self.tracker
    }

    /// Run every line of `reader`, writing results to `out`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing line and reports its line number.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, out: &mut W) -> Result<(), TrackerError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            match self.execute(&line) {
                Ok(Some(output)) => {
                    writeln!(out, "{output}")?;
                    out.flush()?;
                }
                Ok(None) => {}
                Err(TrackerError::InvalidArgument(msg)) => {
                    return Err(TrackerError::InvalidArgument(format!("line {line_no}: {msg}")));
                }
                Err(e) => return Err(e),
            }
        }
        self.tracker.cancel_pending_reset();
        Ok(())
    }

    /// Execute a single script line.
    ///
    /// Returns the text to print, if any.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidArgument` for unknown or malformed
    /// commands, and propagates export/amend failures.
    pub fn execute(&mut self, line: &str) -> Result<Option<String>, TrackerError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, r)| (c, r.trim()));
        debug!(command, "script command");

        match command.to_lowercase().as_str() {
            "name" => {
                self.tracker.set_name(rest);
                Ok(None)
            }
            "owner" => {
                self.tracker.set_owner(rest);
                Ok(None)
            }
            "start" => {
                let applied = self.tracker.start(None, None).is_applied();
                self.event("start", applied)
            }
            "pause" => {
                let applied = self.tracker.pause().is_applied();
                self.event("pause", applied)
            }
            "resume" => {
                let applied = self.tracker.resume().is_applied();
                self.event("resume", applied)
            }
            "stop" => {
                let applied = self.tracker.stop().is_applied();
                self.event("stop", applied)
            }
            "tick" => match self.tracker.tick() {
                TickOutcome::Reset => self.event("reset", true),
                TickOutcome::Refreshed => self.event("tick", true),
                TickOutcome::Idle => self.event("tick", false),
            },
            "wait" | "sleep" => {
                let duration = parse_duration(rest)
                    .filter(|d| self.tracker.clock().now().checked_add_signed(*d).is_some())
                    .ok_or_else(|| {
                        TrackerError::InvalidArgument(format!("invalid duration '{rest}'"))
                    })?;
                self.tracker.clock().sleep(duration);
                match self.tracker.tick() {
                    TickOutcome::Reset => self.event("reset", true),
                    _ => Ok(None),
                }
            }
            "status" => format_session(self.tracker.current(), self.format).map(Some),
            "history" => format_history(self.tracker.history(), self.format).map(Some),
            "export" => self.export(rest).map(Some),
            "amend" | "edit" => self.amend(rest).map(Some),
            other => Err(TrackerError::InvalidArgument(format!(
                "unknown command '{other}'"
            ))),
        }
    }

    fn event(&self, action: &str, applied: bool) -> Result<Option<String>, TrackerError> {
        format_event(action, applied, self.tracker.current(), self.format).map(Some)
    }

    fn export(&self, rest: &str) -> Result<String, TrackerError> {
        let mut parts = rest.split_whitespace();
        let scope_arg = parts.next().unwrap_or("current");
        let scope = ExportScope::parse(scope_arg).ok_or_else(|| {
            TrackerError::InvalidArgument(format!("unknown export scope '{scope_arg}'"))
        })?;

        let payload = match scope {
            ExportScope::Current => export::session_to_json(self.tracker.current())?,
            ExportScope::History => export::history_to_json(self.tracker.history())?,
        };

        let path = match parts.next() {
            Some("-") => return Ok(payload),
            Some(target) => {
                let target = Path::new(target);
                let dir = target.parent().unwrap_or_else(|| Path::new("."));
                let file_name = target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| {
                        TrackerError::InvalidArgument(format!(
                            "invalid export path '{}'",
                            target.display()
                        ))
                    })?;
                export::write_export(dir, file_name, &payload)?
            }
            None => match scope {
                ExportScope::Current => {
                    export::download_session(&self.export_dir, self.tracker.current())?
                }
                ExportScope::History => {
                    export::download_history(&self.export_dir, self.tracker.history())?
                }
            },
        };

        match self.format {
            OutputFormat::Json => to_json(&serde_json::json!({ "exported": path })),
            OutputFormat::Pretty => Ok(format!("Exported to {}", path.display())),
        }
    }

    fn amend(&mut self, rest: &str) -> Result<String, TrackerError> {
        let (id_arg, assignments) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(i, a)| (i, a.trim()));
        let id: SessionId = id_arg
            .parse()
            .map_err(|_| TrackerError::InvalidArgument(format!("invalid session id '{id_arg}'")))?;

        let grouped = group_assignments(assignments);
        let edit = SessionEdit::from_assignments(grouped.iter().map(String::as_str))?;
        if edit.is_empty() {
            return Err(TrackerError::InvalidArgument(
                "amend needs at least one field=value".to_string(),
            ));
        }

        let updated = self.tracker.amend(id, &edit)?;
        info!(session_id = id, "amended from script");
        format_session(updated, self.format)
    }
}

/// Split `name=Deep work owner=Kim` into `["name=Deep work", "owner=Kim"]`.
///
/// A new assignment starts at every whitespace-separated token containing `=`.
fn group_assignments(input: &str) -> Vec<String> {
    let mut grouped: Vec<String> = Vec::new();
    for token in input.split_whitespace() {
        match grouped.last_mut() {
            Some(last) if !token.contains('=') => {
                last.push(' ');
                last.push_str(token);
            }
            _ => grouped.push(token.to_string()),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::SessionStatus;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap())
    }

    fn run<'a>(clock: &'a ManualClock, dir: &Path, script: &str) -> (String, SessionTracker<&'a ManualClock>) {
        let mut runner = ScriptRunner::new(
            clock,
            &Config::default(),
            dir.to_path_buf(),
            OutputFormat::Json,
        );
        let mut out = Vec::new();
        runner.run(script.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), runner.tracker)
    }

    #[test]
    fn test_script_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let script = "\
# a comment
name Deep work
owner Kim
start
wait 90s
pause
wait 10m
stop
";
        let (out, tracker) = run(&clock, temp_dir.path(), script);

        assert_eq!(out.lines().count(), 3);
        let stop: serde_json::Value = serde_json::from_str(out.lines().last().unwrap()).unwrap();
        assert_eq!(stop["action"], "stop");
        assert_eq!(stop["session"]["totalTime"], "00:01:30");
        assert_eq!(stop["session"]["name"], "Deep work");
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn test_wait_fires_reset() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let (out, tracker) = run(&clock, temp_dir.path(), "start\nstop\nwait 3\n");

        let reset: serde_json::Value = serde_json::from_str(out.lines().last().unwrap()).unwrap();
        assert_eq!(reset["action"], "reset");
        assert_eq!(tracker.current().status, SessionStatus::Ready);
    }

    #[test]
    fn test_noop_operation_reported() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let (out, _) = run(&clock, temp_dir.path(), "pause\n");

        let event: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(event["applied"], false);
    }

    #[test]
    fn test_export_default_location() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let (_, _) = run(&clock, temp_dir.path(), "start\nstop\nexport history\n");

        assert!(temp_dir.path().join("tracking-history.json").exists());
    }

    #[test]
    fn test_export_to_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let (out, _) = run(&clock, temp_dir.path(), "export current -\n");

        let parsed = export::parse_session(&out).unwrap();
        assert_eq!(parsed.status, SessionStatus::Ready);
    }

    #[test]
    fn test_amend_from_script() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let mut runner = ScriptRunner::new(
            &clock,
            &Config::default(),
            temp_dir.path().to_path_buf(),
            OutputFormat::Json,
        );
        runner.execute("start").unwrap();
        clock.advance(chrono::Duration::seconds(30));
        runner.execute("stop").unwrap();
        let id = runner.tracker().history()[0].id.unwrap();

        runner
            .execute(&format!("amend {id} name=Code review owner=Team A"))
            .unwrap();

        let entry = &runner.tracker().history()[0];
        assert_eq!(entry.name, "Code review");
        assert_eq!(entry.owner, "Team A");
        assert_eq!(entry.total_time, chrono::Duration::seconds(30));
    }

    #[test]
    fn test_unknown_command_reports_line() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let mut runner = ScriptRunner::new(
            &clock,
            &Config::default(),
            temp_dir.path().to_path_buf(),
            OutputFormat::Pretty,
        );
        let mut out = Vec::new();
        let err = runner
            .run("start\ndance\n".as_bytes(), &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: line 2: unknown command 'dance'");
    }

    #[test]
    fn test_wait_out_of_range_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let before = clock.now();
        let mut runner = ScriptRunner::new(
            &clock,
            &Config::default(),
            temp_dir.path().to_path_buf(),
            OutputFormat::Json,
        );

        for line in ["wait 9999999999999999h", "wait 9999999999999999", "wait 9000000000000000"] {
            let err = runner.execute(line).unwrap_err();
            assert!(matches!(err, TrackerError::InvalidArgument(_)), "{line}");
        }
        assert_eq!(clock.now(), before);
    }

    #[test]
    fn test_amend_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock();
        let mut runner = ScriptRunner::new(
            &clock,
            &Config::default(),
            temp_dir.path().to_path_buf(),
            OutputFormat::Json,
        );
        let err = runner.execute("amend 42 name=x").unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[test]
    fn test_group_assignments() {
        assert_eq!(
            group_assignments("name=Deep work owner=Kim"),
            vec!["name=Deep work".to_string(), "owner=Kim".to_string()]
        );
        assert!(group_assignments("").is_empty());
    }
}
