use notify_rust::{Notification, Urgency};
use tracing::{debug, warn};
use winpick_core::{NotificationUrgency, StatusLevel, StatusMessage, StatusReporter};

const SUMMARY: &str = "winpick";
const TIMEOUT_MILLISECONDS: i32 = 4000;

/// Shows status messages as desktop notifications.
pub struct DesktopStatusReporter {
    urgency: Urgency,
}

impl DesktopStatusReporter {
    pub fn new(urgency: NotificationUrgency) -> Self {
        Self {
            urgency: map_urgency(urgency),
        }
    }

    fn build_notification(&self, message: &StatusMessage) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(SUMMARY)
            .body(&message.text)
            .appname("winpick")
            .timeout(TIMEOUT_MILLISECONDS)
            .urgency(self.urgency);

        if message.level == StatusLevel::Warning {
            notification.icon("dialog-warning");
        }

        notification
    }
}

impl StatusReporter for DesktopStatusReporter {
    fn report(&self, message: &StatusMessage) {
        match self.build_notification(message).show() {
            Ok(_) => debug!(text = %message.text, "status notification sent"),
            Err(error) => warn!(%error, "failed to show status notification"),
        }
    }
}

fn map_urgency(urgency: NotificationUrgency) -> Urgency {
    match urgency {
        NotificationUrgency::Low => Urgency::Low,
        NotificationUrgency::Normal => Urgency::Normal,
        NotificationUrgency::Critical => Urgency::Critical,
    }
}
