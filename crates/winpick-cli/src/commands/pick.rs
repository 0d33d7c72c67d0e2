use anyhow::Result;
use tracing::info;
use winpick_core::{CandidateSource, Config, SessionError, StatusMessage};

use crate::services::Services;
use crate::tui::{self, Outcome};

pub fn execute(config: &Config, class: Option<&str>, no_detail: bool) -> Result<()> {
    let services = Services::connect(config)?;
    open_selector(&services, config, class, no_detail)
}

/// Opens the picker over all windows, or over one class when `scope` is set.
pub fn open_selector(
    services: &Services,
    config: &Config,
    scope: Option<&str>,
    no_detail: bool,
) -> Result<()> {
    let mut builder = CandidateSource::builder(services.window_source(config)).configured(config)?;
    if let Some(class_name) = scope {
        builder = builder.scope(class_name);
    }
    if no_detail {
        builder = builder.detail_mode(false);
    }

    let mut session = services.selector(builder.build()?);

    match session.open() {
        Ok(()) => {}
        Err(SessionError::Conflict { active }) => {
            let text = match active {
                Some(info) => format!("A picker is already open (pid {})", info.pid),
                None => "A picker is already open".to_string(),
            };
            services.reporter.report(&StatusMessage::warning(text));
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    }

    if session.snapshot().is_empty() {
        services
            .reporter
            .report(&StatusMessage::info("No windows to pick from"));
        session.cancel();
        return Ok(());
    }

    match tui::run(&mut session)? {
        Outcome::Completed => info!(source = session.source().name(), "window picked"),
        Outcome::Cancelled => info!(source = session.source().name(), "picker cancelled"),
    }

    Ok(())
}
