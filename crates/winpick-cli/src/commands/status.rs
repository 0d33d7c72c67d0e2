use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use winpick_adapters::SocketSessionGuard;
use winpick_core::{SessionGuard, SessionInfo};

#[derive(Serialize)]
struct StatusOutput {
    active: bool,
    responding: bool,
    pid: Option<u32>,
    scope: Option<String>,
    started_at: Option<String>,
    age_seconds: Option<i64>,
    age_formatted: Option<String>,
}

impl StatusOutput {
    fn inactive() -> Self {
        Self {
            active: false,
            responding: false,
            pid: None,
            scope: None,
            started_at: None,
            age_seconds: None,
            age_formatted: None,
        }
    }

    fn unresponsive() -> Self {
        Self {
            active: true,
            ..Self::inactive()
        }
    }

    fn from_session(info: &SessionInfo) -> Self {
        let age_seconds = info.age_seconds();
        Self {
            active: true,
            responding: true,
            pid: Some(info.pid),
            scope: info.scope.clone(),
            started_at: Some(info.started_at.to_rfc3339()),
            age_seconds: Some(age_seconds),
            age_formatted: Some(format_age(age_seconds)),
        }
    }
}

pub fn execute(json: bool) -> Result<()> {
    let guard = SocketSessionGuard::new();

    let session = if guard.ping() {
        guard.active_session()
    } else {
        None
    };

    match session {
        Some(info) => {
            if json {
                print_json(&StatusOutput::from_session(&info))?;
            } else {
                print_formatted(&info);
            }
        }
        None if guard.is_active() => {
            if json {
                print_json(&StatusOutput::unresponsive())?;
            } else {
                println!("A picker holds {} but does not answer", guard.socket_path().display());
            }
        }
        None => {
            if json {
                print_json(&StatusOutput::inactive())?;
            } else {
                println!("No picker session active");
            }
        }
    }

    Ok(())
}

fn print_json(output: &StatusOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

fn print_formatted(info: &SessionInfo) {
    println!("Picker session active");
    println!("   PID: {}", info.pid);
    println!("   Scope: {}", info.scope.as_deref().unwrap_or("all windows"));
    println!(
        "   Started: {} ({} ago)",
        info.started_at.with_timezone(&Local).format("%H:%M:%S"),
        format_age(info.age_seconds())
    );
}

fn format_age(seconds: i64) -> String {
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;

    if minutes > 0 {
        format!("{} min {} sec", minutes, remaining_seconds)
    } else {
        format!("{} sec", remaining_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_age_shows_minutes_and_seconds() {
        assert_eq!(format_age(90), "1 min 30 sec");
        assert_eq!(format_age(3600), "60 min 0 sec");
    }

    #[test]
    fn format_age_shows_only_seconds_when_under_minute() {
        assert_eq!(format_age(45), "45 sec");
        assert_eq!(format_age(0), "0 sec");
    }

    #[test]
    fn session_output_carries_scope_and_pid() {
        let info = SessionInfo::new(Some("Firefox".to_string()));

        let output = StatusOutput::from_session(&info);

        assert!(output.active);
        assert!(output.responding);
        assert_eq!(output.pid, Some(std::process::id()));
        assert_eq!(output.scope.as_deref(), Some("Firefox"));
    }

    #[test]
    fn inactive_output_has_no_session_fields() {
        let json = serde_json::to_value(StatusOutput::inactive()).unwrap();

        assert_eq!(json["active"], false);
        assert!(json["pid"].is_null());
    }
}
