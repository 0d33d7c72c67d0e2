use anyhow::Result;
use winpick_core::{BrowserConfig, Config, SwitchRequest};

use crate::services::Services;

use super::switch;

pub fn execute(config: &Config, other_window: bool) -> Result<()> {
    let request = browser_request(&config.browser, other_window);
    let services = Services::connect(config)?;
    switch::run(&services, config, &request)
}

fn browser_request(browser: &BrowserConfig, other_window: bool) -> SwitchRequest {
    SwitchRequest::new(browser.class.clone())
        .program(browser.program.clone())
        .other_window(other_window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_request_uses_configured_class_and_program() {
        let browser = BrowserConfig {
            class: "Chromium".to_string(),
            program: "chromium --new-window".to_string(),
        };

        let request = browser_request(&browser, true);

        assert_eq!(request.class_name, "Chromium");
        assert_eq!(request.program.as_deref(), Some("chromium --new-window"));
        assert!(request.other_window);
    }
}
