use crate::domain::StatusMessage;

pub trait StatusReporter: Send + Sync {
    fn report(&self, message: &StatusMessage);
}
