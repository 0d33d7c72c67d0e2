use std::sync::Arc;

use winpick_core::{StatusConfig, StatusLevel, StatusMessage, StatusReporter};

/// Writes status messages to stderr, where they do not mix with command
/// output.
pub struct StderrStatusReporter;

impl StatusReporter for StderrStatusReporter {
    fn report(&self, message: &StatusMessage) {
        eprintln!("{}", format_status(message));
    }
}

/// Forwards each message to every inner reporter.
pub struct FanOutReporter {
    reporters: Vec<Arc<dyn StatusReporter>>,
}

impl FanOutReporter {
    pub fn new(reporters: Vec<Arc<dyn StatusReporter>>) -> Self {
        Self { reporters }
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl StatusReporter for FanOutReporter {
    fn report(&self, message: &StatusMessage) {
        for reporter in &self.reporters {
            reporter.report(message);
        }
    }
}

/// Reporter for commands that print to the terminal: stderr, plus desktop
/// notifications when enabled.
pub fn from_config(config: &StatusConfig) -> Arc<dyn StatusReporter> {
    let mut reporters: Vec<Arc<dyn StatusReporter>> = vec![Arc::new(StderrStatusReporter)];
    reporters.extend(notification_reporters(config));

    Arc::new(FanOutReporter::new(reporters))
}

/// Reporter for the picker session. The terminal belongs to the picker,
/// which shows statuses in its footer, so only notifications are sent.
pub fn for_picker(config: &StatusConfig) -> FanOutReporter {
    FanOutReporter::new(notification_reporters(config))
}

fn notification_reporters(config: &StatusConfig) -> Vec<Arc<dyn StatusReporter>> {
    if !config.notifications {
        return Vec::new();
    }
    desktop_reporter(config).into_iter().collect()
}

#[cfg(target_os = "linux")]
fn desktop_reporter(config: &StatusConfig) -> Option<Arc<dyn StatusReporter>> {
    Some(Arc::new(winpick_adapters::DesktopStatusReporter::new(
        config.urgency,
    )))
}

#[cfg(not(target_os = "linux"))]
fn desktop_reporter(_config: &StatusConfig) -> Option<Arc<dyn StatusReporter>> {
    tracing::warn!("desktop notifications are not supported on this platform");
    None
}

pub fn format_status(message: &StatusMessage) -> String {
    match message.level {
        StatusLevel::Info => format!("winpick: {}", message.text),
        StatusLevel::Warning => format!("winpick: warning: {}", message.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting {
        texts: Mutex<Vec<String>>,
    }

    impl StatusReporter for Collecting {
        fn report(&self, message: &StatusMessage) {
            self.texts.lock().unwrap().push(message.text.clone());
        }
    }

    #[test]
    fn fan_out_reaches_every_reporter() {
        let first = Arc::new(Collecting::default());
        let second = Arc::new(Collecting::default());
        let reporters: Vec<Arc<dyn StatusReporter>> = vec![
            first.clone() as Arc<dyn StatusReporter>,
            second.clone() as Arc<dyn StatusReporter>,
        ];
        let fan_out = FanOutReporter::new(reporters);

        fan_out.report(&StatusMessage::info("Killed 2 windows"));

        assert_eq!(*first.texts.lock().unwrap(), vec!["Killed 2 windows"]);
        assert_eq!(*second.texts.lock().unwrap(), vec!["Killed 2 windows"]);
    }

    #[test]
    fn picker_reporter_never_writes_to_the_terminal() {
        let quiet = for_picker(&StatusConfig::default());

        assert!(quiet.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn picker_reporter_keeps_desktop_notifications() {
        let config = StatusConfig {
            notifications: true,
            ..StatusConfig::default()
        };

        assert_eq!(for_picker(&config).len(), 1);
    }

    #[test]
    fn warnings_are_labelled() {
        assert_eq!(
            format_status(&StatusMessage::warning("Window gone")),
            "winpick: warning: Window gone"
        );
        assert_eq!(format_status(&StatusMessage::info("done")), "winpick: done");
    }
}
