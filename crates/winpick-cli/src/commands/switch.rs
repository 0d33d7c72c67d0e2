use anyhow::Result;
use tracing::debug;
use winpick_core::{Config, SwitchOutcome, SwitchRequest};

use crate::services::Services;

use super::pick;

pub fn execute(
    config: &Config,
    class: String,
    program: Option<String>,
    other_window: bool,
) -> Result<()> {
    let mut request = SwitchRequest::new(class).other_window(other_window);
    if let Some(program) = program {
        request = request.program(program);
    }

    let services = Services::connect(config)?;
    run(&services, config, &request)
}

pub fn run(services: &Services, config: &Config, request: &SwitchRequest) -> Result<()> {
    let outcome = services.switcher(config).switch_to_class(request)?;
    debug!(?outcome, "switch finished");

    match outcome {
        SwitchOutcome::OpenScopedSelector { class_name } => {
            pick::open_selector(services, config, Some(&class_name), false)
        }
        SwitchOutcome::Skipped
        | SwitchOutcome::Focused { .. }
        | SwitchOutcome::Launched { .. }
        | SwitchOutcome::Stale { .. }
        | SwitchOutcome::LaunchFailed { .. } => Ok(()),
    }
}
