use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use interprocess::local_socket::{
    prelude::*, GenericFilePath, Listener, ListenerNonblockingMode, ListenerOptions, Stream,
};
use tracing::{debug, info, warn};
use winpick_core::{GuardError, SessionGuard, SessionInfo, SessionLease};
use winpick_protocol::{read_frame, write_frame, FrameError, Request, Response};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum Reply {
    Absent,
    Answered(Response),
    Unresponsive,
}

#[derive(Debug)]
enum Holder {
    Absent,
    Session(SessionInfo),
    Unresponsive,
}

/// Cross-process session guard backed by a local socket.
///
/// The process holding the session listens on the socket and answers
/// [`Request::Ping`] and [`Request::GetSession`]. A socket file nobody
/// answers on is stale and gets replaced.
pub struct SocketSessionGuard {
    socket_path: PathBuf,
    timeout: Duration,
}

impl SocketSessionGuard {
    pub fn new() -> Self {
        Self::at(default_socket_path())
    }

    pub fn at(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Returns true when a session holder answers a ping in time.
    pub fn ping(&self) -> bool {
        match self.send(Request::Ping) {
            Reply::Answered(Response::Pong) => true,
            Reply::Answered(response) => {
                warn!(?response, "unexpected answer to ping");
                false
            }
            Reply::Absent | Reply::Unresponsive => false,
        }
    }

    fn send(&self, request: Request) -> Reply {
        let stream = match connect(&self.socket_path) {
            Ok(stream) => stream,
            Err(error) => {
                debug!(%error, path = %self.socket_path.display(), "no session holder");
                return Reply::Absent;
            }
        };

        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let _ = sender.send(exchange(stream, &request));
        });

        match receiver.recv_timeout(self.timeout) {
            Ok(Ok(response)) => Reply::Answered(response),
            Ok(Err(error)) => {
                warn!(%error, "session holder did not answer");
                Reply::Unresponsive
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "timeout waiting for session holder");
                Reply::Unresponsive
            }
        }
    }

    fn holder(&self) -> Holder {
        match self.send(Request::GetSession) {
            Reply::Answered(Response::Session(info)) => Holder::Session(info),
            Reply::Answered(response) => {
                warn!(?response, "unexpected response from session holder");
                Holder::Unresponsive
            }
            Reply::Absent => Holder::Absent,
            Reply::Unresponsive => Holder::Unresponsive,
        }
    }

    fn bind(&self) -> io::Result<Listener> {
        ListenerOptions::new()
            .name(self.socket_path.as_os_str().to_fs_name::<GenericFilePath>()?)
            .nonblocking(ListenerNonblockingMode::Accept)
            .create_sync()
    }

    fn bind_or_reclaim(&self) -> Result<Listener, GuardError> {
        match self.bind() {
            Ok(listener) => return Ok(listener),
            Err(error) if error.kind() == io::ErrorKind::AddrInUse => {
                debug!(path = %self.socket_path.display(), "socket in use, asking holder");
            }
            Err(error) => return Err(unavailable(error)),
        }

        match self.holder() {
            Holder::Session(info) => return Err(GuardError::Conflict { active: Some(info) }),
            Holder::Unresponsive => return Err(GuardError::Conflict { active: None }),
            Holder::Absent => {}
        }

        std::fs::remove_file(&self.socket_path).map_err(unavailable)?;
        debug!("removed stale socket file");

        self.bind().map_err(unavailable)
    }
}

impl Default for SocketSessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard for SocketSessionGuard {
    fn active_session(&self) -> Option<SessionInfo> {
        match self.holder() {
            Holder::Session(info) => Some(info),
            Holder::Absent | Holder::Unresponsive => None,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.holder(), Holder::Absent)
    }

    fn try_acquire(&self, info: SessionInfo) -> Result<SessionLease, GuardError> {
        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent).map_err(unavailable)?;
        }

        let listener = self.bind_or_reclaim()?;
        info!(path = %self.socket_path.display(), pid = info.pid, "session guard acquired");

        let stop = Arc::new(AtomicBool::new(false));
        let server = {
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("winpick-guard".to_string())
                .spawn(move || serve(listener, info, &stop))
                .map_err(unavailable)?
        };

        let socket_path = self.socket_path.clone();
        Ok(SessionLease::new(move || {
            release(stop, server);
            debug!(path = %socket_path.display(), "session guard released");
        }))
    }
}

fn release(stop: Arc<AtomicBool>, server: JoinHandle<()>) {
    stop.store(true, Ordering::SeqCst);
    if server.join().is_err() {
        warn!("session guard thread panicked");
    }
}

/// Answers guard requests until `stop` is set. Dropping the listener unlinks the
/// socket file.
fn serve(listener: Listener, info: SessionInfo, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok(stream) => {
                let info = info.clone();
                thread::spawn(move || {
                    if let Err(error) = handle_connection(stream, &info) {
                        debug!(%error, "guard connection failed");
                    }
                });
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(error) => {
                warn!(%error, "failed to accept guard connection");
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
}

fn handle_connection(mut stream: Stream, info: &SessionInfo) -> Result<(), FrameError> {
    let request: Request = read_frame(&mut stream)?;
    debug!(?request, "received guard request");

    let response = match request {
        Request::Ping => Response::Pong,
        Request::GetSession => Response::Session(info.clone()),
    };

    write_frame(&mut stream, &response)
}

fn connect(path: &Path) -> io::Result<Stream> {
    Stream::connect(path.as_os_str().to_fs_name::<GenericFilePath>()?)
}

fn exchange(mut stream: Stream, request: &Request) -> Result<Response, FrameError> {
    write_frame(&mut stream, request)?;
    read_frame(&mut stream)
}

fn unavailable(error: io::Error) -> GuardError {
    GuardError::Unavailable {
        message: error.to_string(),
    }
}

#[cfg(unix)]
fn default_socket_path() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    let runtime_dir = PathBuf::from(format!("/run/user/{}", uid));
    if runtime_dir.is_dir() {
        runtime_dir.join("winpick.sock")
    } else {
        std::env::temp_dir().join(format!("winpick-{}.sock", uid))
    }
}

#[cfg(not(unix))]
fn default_socket_path() -> PathBuf {
    std::env::temp_dir().join("winpick.sock")
}
