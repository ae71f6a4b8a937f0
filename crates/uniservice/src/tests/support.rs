//! Shared test doubles for lifecycle suites.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Instant;

use tempfile::TempDir;

use crate::{
    CommandError, CommandRunner, ExecutableLocator, HandlerError, InitFlavor, Service,
    ServiceCommand, ServiceDescriptor, ServiceHandler, ShutdownError, ShutdownSignal,
};

pub const SERVICE_NAME: &str = "myapp";
pub const EXECUTABLE: &str = "/usr/local/bin/myapp";

/// Temporary filesystem root laid out like a host for one flavor.
pub struct HostRoot {
    dir: TempDir,
}

impl HostRoot {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temporary root"),
        }
    }

    /// Creates the directories `flavor` writes into.
    pub fn for_flavor(flavor: InitFlavor) -> Self {
        let root = Self::new();
        match flavor {
            InitFlavor::Systemd => root.mkdir("/etc/systemd/system"),
            InitFlavor::Upstart => root.mkdir("/etc/init"),
            InitFlavor::SystemV => {
                root.mkdir("/etc/init.d");
                for runlevel in 0..=6 {
                    root.mkdir(&format!("/etc/rc{runlevel}.d"));
                }
            }
        }
        root
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn host(&self, absolute: &str) -> PathBuf {
        self.dir.path().join(absolute.trim_start_matches('/'))
    }

    pub fn mkdir(&self, absolute: &str) {
        fs::create_dir_all(self.host(absolute)).expect("create host directory");
    }

    pub fn remove_dir(&self, absolute: &str) {
        fs::remove_dir_all(self.host(absolute)).expect("remove host directory");
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub command: String,
    pub at: Instant,
}

/// Command runner that records invocations and fails on request.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RecordedCommand>>>,
    failures: Arc<Mutex<Vec<String>>>,
}

impl RecordingRunner {
    pub fn fail_on(&self, command: &str) {
        self.failures
            .lock()
            .expect("failures lock")
            .push(command.to_owned());
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.command).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ServiceCommand) -> Result<(), CommandError> {
        let rendered = command.to_string();
        self.calls.lock().expect("calls lock").push(RecordedCommand {
            command: rendered.clone(),
            at: Instant::now(),
        });
        if self
            .failures
            .lock()
            .expect("failures lock")
            .contains(&rendered)
        {
            return Err(simulated_failure(&rendered));
        }
        Ok(())
    }
}

pub fn simulated_failure(command: &str) -> CommandError {
    CommandError::Failed {
        command: command.to_owned(),
        code: Some(1),
        stderr: "simulated failure".to_owned(),
    }
}

/// Locator returning a fixed path.
#[derive(Debug, Clone)]
pub struct FixedExecutable(pub PathBuf);

impl ExecutableLocator for FixedExecutable {
    fn locate(&self) -> io::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Locator that always fails.
#[derive(Debug, Clone, Copy)]
pub struct MissingExecutable;

impl ExecutableLocator for MissingExecutable {
    fn locate(&self) -> io::Result<PathBuf> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no /proc/self/exe"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerEvent {
    Started { interactive: bool },
    Stopped,
}

/// Handler that records hook invocations.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<HandlerEvent>>>,
    fail_start: bool,
    fail_stop: bool,
}

impl RecordingHandler {
    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn failing_stop() -> Self {
        Self {
            fail_stop: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<HandlerEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

impl ServiceHandler for RecordingHandler {
    fn start(&self, service: &Service) -> Result<(), HandlerError> {
        if self.fail_start {
            return Err("port already bound".into());
        }
        self.events
            .lock()
            .expect("events lock")
            .push(HandlerEvent::Started {
                interactive: service.interactive(),
            });
        Ok(())
    }

    fn stop(&self, _service: &Service) -> Result<(), HandlerError> {
        self.events
            .lock()
            .expect("events lock")
            .push(HandlerEvent::Stopped);
        if self.fail_stop {
            return Err("flush failed".into());
        }
        Ok(())
    }
}

/// Shutdown signal released explicitly by the test.
#[derive(Clone)]
pub struct TestShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
    waits: Arc<AtomicUsize>,
}

impl TestShutdownSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
            waits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        *triggered = true;
        cvar.notify_all();
    }

    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

impl ShutdownSignal for TestShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        while !*triggered {
            triggered = cvar
                .wait(triggered)
                .expect("shutdown mutex poisoned during wait");
        }
        Ok(())
    }
}

/// Shutdown signal whose listener cannot be installed.
#[derive(Debug, Clone, Copy)]
pub struct BrokenShutdownSignal;

impl ShutdownSignal for BrokenShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        Err(ShutdownError::Install {
            source: io::Error::other("signal table full"),
        })
    }
}

pub fn descriptor() -> ServiceDescriptor {
    ServiceDescriptor::new(SERVICE_NAME)
        .with_display_name("My App")
        .with_description("Serves things")
}

/// Service bound to `root` with recording collaborators.
pub fn service(
    root: &HostRoot,
    flavor: InitFlavor,
    runner: &RecordingRunner,
    handler: &RecordingHandler,
) -> Service {
    Service::builder(descriptor(), handler.clone())
        .root(root.path())
        .flavor(flavor)
        .interactive(false)
        .command_runner(runner.clone())
        .executable_locator(FixedExecutable(PathBuf::from(EXECUTABLE)))
        .build()
}
