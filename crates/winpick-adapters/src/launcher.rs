use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;
use winpick_core::{LaunchError, ProcessLauncher};

const SHELL_METACHARACTERS: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*', '?', '~', '#',
];

/// Spawns detached programs from a command line.
///
/// Plain command lines are split on whitespace and the program is resolved
/// through `PATH`. Anything that needs a shell is handed to `sh -c`.
#[derive(Debug, Clone, Default)]
pub struct CommandLauncher;

impl CommandLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Direct { program: String, args: Vec<String> },
    Shell { command_line: String },
}

fn plan(command_line: &str) -> Result<Invocation, LaunchError> {
    let command_line = command_line.trim();
    if command_line.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }

    if command_line.contains(SHELL_METACHARACTERS) {
        return Ok(Invocation::Shell {
            command_line: command_line.to_string(),
        });
    }

    let mut words = command_line.split_whitespace().map(str::to_string);
    let program = words.next().ok_or(LaunchError::EmptyCommand)?;

    Ok(Invocation::Direct {
        program,
        args: words.collect(),
    })
}

fn resolve(program: &str) -> Result<PathBuf, LaunchError> {
    which::which(program).map_err(|_| LaunchError::NotFound {
        program: program.to_string(),
    })
}

impl ProcessLauncher for CommandLauncher {
    fn spawn(&self, command_line: &str) -> Result<(), LaunchError> {
        let (label, mut command) = match plan(command_line)? {
            Invocation::Direct { program, args } => {
                let path = resolve(&program)?;
                let mut command = Command::new(path);
                command.args(args);
                (program, command)
            }
            Invocation::Shell { command_line } => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(&command_line);
                (command_line, command)
            }
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|source| LaunchError::Spawn {
            program: label.clone(),
            source,
        })?;

        debug!(program = %label, pid = child.id(), "spawned program");
        Ok(())
    }
}
