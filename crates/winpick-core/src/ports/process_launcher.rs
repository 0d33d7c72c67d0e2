use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("empty command line")]
    EmptyCommand,

    #[error("program not found: {program}")]
    NotFound { program: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fire-and-forget process spawning.
pub trait ProcessLauncher: Send + Sync {
    fn spawn(&self, program: &str) -> Result<(), LaunchError>;
}
