use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;

/// Tracing writer for stderr that can be held back while the picker owns
/// the terminal. Held lines are written out on [`TerminalLog::resume`].
#[derive(Clone, Default)]
pub struct TerminalLog {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    held: AtomicBool,
    buffer: Mutex<Vec<u8>>,
}

static GLOBAL: OnceLock<TerminalLog> = OnceLock::new();

/// The writer installed into the process-wide subscriber.
pub fn global() -> &'static TerminalLog {
    GLOBAL.get_or_init(TerminalLog::default)
}

impl TerminalLog {
    pub fn hold(&self) {
        self.inner.held.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.resume_into(&mut io::stderr());
    }

    fn resume_into(&self, output: &mut impl Write) {
        self.inner.held.store(false, Ordering::SeqCst);
        let held = match self.inner.buffer.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => return,
        };
        if !held.is_empty() {
            let _ = output.write_all(&held);
            let _ = output.flush();
        }
    }

    fn write_to(&self, output: &mut impl Write, bytes: &[u8]) -> io::Result<usize> {
        if self.inner.held.load(Ordering::SeqCst) {
            if let Ok(mut buffer) = self.inner.buffer.lock() {
                buffer.extend_from_slice(bytes);
            }
            return Ok(bytes.len());
        }
        output.write(bytes)
    }
}

pub struct TerminalLogWriter {
    log: TerminalLog,
}

impl Write for TerminalLogWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.log.write_to(&mut io::stderr(), bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for TerminalLog {
    type Writer = TerminalLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TerminalLogWriter { log: self.clone() }
    }
}
