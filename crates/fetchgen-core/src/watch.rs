//! Watch mode: regenerate the client whenever the description changes.
//!
//! A [`WatchSession`] owns the file watcher for its whole lifetime. Watcher
//! callbacks only forward events through a channel; every generation cycle
//! runs on the task that drives [`WatchSession::run_until`], one at a time.
//! Notifications that pile up while a cycle is running are drained and
//! folded into a single follow-up cycle.
//!
//! ```no_run
//! use fetchgen_core::{watch::WatchSession, Config};
//!
//! # async fn example() -> fetchgen_core::Result<()> {
//! let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
//! let config = Config::new("openapi.yaml", "src/api-client.js");
//! let mut session = WatchSession::start(config).await?;
//! # drop(stop_tx);
//! session
//!     .run_until(async {
//!         let _ = stop_rx.await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    config::Config,
    error::{Error, Result},
    generate::run_cycle,
    templates::TemplateManager,
};

// External imports (alphabetized)
use log::{debug, error, info, warn};
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// How long to wait for related notifications (editor save sequences) to
/// arrive before starting a cycle
const SETTLE_DELAY: Duration = Duration::from_millis(50);

type WatchEvent = notify::Result<Event>;

/// Where the regeneration pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Waiting for the next change
    Idle,
    /// A cycle is in flight
    Generating,
    /// The last cycle wrote a fresh client
    Settled,
    /// The last cycle failed; the previous output is untouched
    Failed,
}

/// A running watch on one description file
pub struct WatchSession {
    config: Config,
    templates: TemplateManager,
    watch_root: PathBuf,
    watcher: Option<RecommendedWatcher>,
    events: UnboundedReceiver<WatchEvent>,
    state: CycleState,
    last_outcome: Option<CycleState>,
    cycles: usize,
}

impl WatchSession {
    /// Run the initial cycle, then start watching the input path.
    ///
    /// A failed initial cycle is reported but does not prevent the session
    /// from starting. Failing to register the watch is fatal.
    pub async fn start(config: Config) -> Result<Self> {
        config.validate()?;
        let templates = TemplateManager::new(config.template_path.clone()).await?;

        let (mut session, sender) = Self::detached(config, templates);
        session.regenerate().await;
        session.attach_watcher(sender)?;
        Ok(session)
    }

    /// A session with no watcher registered yet, fed through the returned sender
    fn detached(config: Config, templates: TemplateManager) -> (Self, UnboundedSender<WatchEvent>) {
        let (sender, events) = mpsc::unbounded_channel();
        let watch_root = watch_root(&config.input_path);
        let session = Self {
            config,
            templates,
            watch_root,
            watcher: None,
            events,
            state: CycleState::Idle,
            last_outcome: None,
            cycles: 0,
        };
        (session, sender)
    }

    fn attach_watcher(&mut self, sender: UnboundedSender<WatchEvent>) -> Result<()> {
        let mut watcher = recommended_watcher(move |event: WatchEvent| {
            // The receiver only goes away when the session is being dropped
            let _ = sender.send(event);
        })?;
        watcher.watch(&self.watch_root, RecursiveMode::NonRecursive)?;
        info!(
            "Watching {} for changes",
            self.config.input_path.display()
        );
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Current pipeline state
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Outcome of the most recent cycle, if any ran
    pub fn last_outcome(&self) -> Option<CycleState> {
        self.last_outcome
    }

    /// Whether the output file reflects the current input
    pub fn is_last_known_good(&self) -> bool {
        self.last_outcome == Some(CycleState::Settled)
    }

    /// Number of cycles run so far, the initial one included
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process change notifications until `shutdown` resolves.
    ///
    /// A stop request is only observed between cycles; a cycle in flight
    /// always completes. The watch registration is released on return.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let result = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Stop requested, ending watch session");
                    break Ok(());
                }
                event = self.events.recv() => match event {
                    Some(event) => {
                        self.on_event(event).await;
                    }
                    None => {
                        break Err(Error::Watcher(notify::Error::generic(
                            "watcher event channel closed",
                        )));
                    }
                },
            }
        };
        self.release();
        result
    }

    /// React to a single notification, running at most one cycle
    async fn on_event(&mut self, event: WatchEvent) -> Option<CycleState> {
        match event {
            Err(e) => {
                warn!("Watcher reported a fault: {}", e);
                None
            }
            Ok(event) if !self.is_relevant(&event) => None,
            Ok(event) => {
                debug!("Change detected: {:?}", event.kind);
                tokio::time::sleep(SETTLE_DELAY).await;
                let coalesced = self.drain_pending();
                if coalesced > 0 {
                    debug!("Coalesced {} further change notification(s)", coalesced);
                }
                Some(self.regenerate().await)
            }
        }
    }

    /// Consume every queued notification, returning how many were changes
    fn drain_pending(&mut self) -> usize {
        let mut changes = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                Ok(event) if self.is_relevant(&event) => changes += 1,
                Ok(_) => {}
                Err(e) => warn!("Watcher reported a fault: {}", e),
            }
        }
        changes
    }

    fn is_relevant(&self, event: &Event) -> bool {
        let changes_content = match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => true,
            EventKind::Modify(ModifyKind::Metadata(_)) => false,
            EventKind::Modify(_) => true,
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
            _ => false,
        };
        let target = self.config.input_path.file_name();
        changes_content && event.paths.iter().any(|p| p.file_name() == target)
    }

    /// Run one generation cycle and record its outcome
    async fn regenerate(&mut self) -> CycleState {
        self.state = CycleState::Generating;
        self.cycles += 1;
        let was_good = self.is_last_known_good();

        let outcome = match run_cycle(&self.config, &self.templates).await {
            Ok(client) => {
                if self.last_outcome == Some(CycleState::Failed) {
                    info!("Recovered from previous failure");
                }
                info!(
                    "Generated {} in {}",
                    client.class_name,
                    self.config.output_path.display()
                );
                CycleState::Settled
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                if was_good {
                    warn!(
                        "Keeping previous output at {}",
                        self.config.output_path.display()
                    );
                }
                CycleState::Failed
            }
        };

        self.last_outcome = Some(outcome);
        self.state = CycleState::Idle;
        outcome
    }

    /// Drop the watch registration, if one is held
    fn release(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.watch_root) {
                debug!("Failed to unwatch {}: {}", self.watch_root.display(), e);
            }
            info!("Stopped watching {}", self.config.input_path.display());
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Watch the directory holding the input so replace-on-save edits are seen
fn watch_root(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind};
    use tempfile::{tempdir, TempDir};
    use tokio::sync::oneshot;

    const V1: &str = r#"{"info": {"title": "Watch API", "version": "1"}, "paths": {"/users": {"get": {}}}}"#;
    const V2: &str = r#"{"info": {"title": "Watch API", "version": "2"}, "paths": {"/users": {"get": {}}, "/teams": {"post": {}}}}"#;

    fn content_change(path: &Path) -> WatchEvent {
        Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.to_path_buf()))
    }

    async fn session_with_input(content: &str) -> (TempDir, WatchSession, UnboundedSender<WatchEvent>) {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.json");
        let output = dir.path().join("client.js");
        tokio::fs::write(&input, content).await.unwrap();

        let templates = TemplateManager::builtin().unwrap();
        let (mut session, sender) = WatchSession::detached(Config::new(input, output), templates);
        session.regenerate().await;
        (dir, session, sender)
    }

    async fn read_output(session: &WatchSession) -> String {
        tokio::fs::read_to_string(&session.config().output_path)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_session_and_output() {
        let (_dir, mut session, _sender) = session_with_input(V1).await;
        assert!(session.is_last_known_good());
        let good = read_output(&session).await;
        assert!(good.contains("async getUsers()"));

        let input = session.config().input_path.clone();
        tokio::fs::write(&input, "{ not valid").await.unwrap();
        let outcome = session.on_event(content_change(&input)).await;
        assert_eq!(outcome, Some(CycleState::Failed));
        assert!(!session.is_last_known_good());
        assert_eq!(session.state(), CycleState::Idle);
        assert_eq!(read_output(&session).await, good);

        tokio::fs::write(&input, V2).await.unwrap();
        let outcome = session.on_event(content_change(&input)).await;
        assert_eq!(outcome, Some(CycleState::Settled));
        assert!(session.is_last_known_good());
        let fresh = read_output(&session).await;
        assert!(fresh.contains("async postTeams()"));
        assert_eq!(session.cycles(), 3);
    }

    #[tokio::test]
    async fn test_pending_notifications_are_coalesced() {
        let (_dir, mut session, sender) = session_with_input(V1).await;
        let input = session.config().input_path.clone();

        for _ in 0..3 {
            sender.send(content_change(&input)).unwrap();
        }
        let first = session.events.recv().await.unwrap();
        assert_eq!(session.on_event(first).await, Some(CycleState::Settled));
        assert!(session.events.try_recv().is_err());
        assert_eq!(session.cycles(), 2);
    }

    #[tokio::test]
    async fn test_unrelated_events_are_ignored() {
        let (_dir, mut session, _sender) = session_with_input(V1).await;
        let input = session.config().input_path.clone();
        let sibling = input.with_file_name("notes.txt");

        let other_file = content_change(&sibling);
        assert_eq!(session.on_event(other_file).await, None);

        let metadata = Ok(Event::new(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)))
            .add_path(input.clone()));
        assert_eq!(session.on_event(metadata).await, None);

        let created = Ok(Event::new(EventKind::Create(CreateKind::File)).add_path(input));
        assert_eq!(session.on_event(created).await, Some(CycleState::Settled));
        assert_eq!(session.cycles(), 2);
    }

    #[tokio::test]
    async fn test_watcher_fault_does_not_stop_session() {
        let (_dir, mut session, _sender) = session_with_input(V1).await;
        let fault = Err(notify::Error::generic("path became inaccessible"));
        assert_eq!(session.on_event(fault).await, None);
        assert_eq!(session.cycles(), 1);
        assert!(session.is_last_known_good());
    }

    #[tokio::test]
    async fn test_run_until_processes_changes_and_stops() {
        let (_dir, mut session, sender) = session_with_input(V1).await;
        let input = session.config().input_path.clone();
        let output = session.config().output_path.clone();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let result = session
                .run_until(async {
                    let _ = stop_rx.await;
                })
                .await;
            (result, session.cycles())
        });

        tokio::fs::write(&input, V2).await.unwrap();
        sender.send(content_change(&input)).unwrap();

        let mut regenerated = false;
        for _ in 0..100 {
            let text = tokio::fs::read_to_string(&output).await.unwrap();
            if text.contains("async postTeams()") {
                regenerated = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(regenerated);

        stop_tx.send(()).unwrap();
        let (result, cycles) = handle.await.unwrap();
        assert!(result.is_ok());
        assert_eq!(cycles, 2);
    }

    #[tokio::test]
    async fn test_start_with_real_watcher() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("openapi.json");
        let output = dir.path().join("client.js");
        tokio::fs::write(&input, V1).await?;

        let mut session = WatchSession::start(Config::new(&input, &output)).await?;
        assert_eq!(session.last_outcome(), Some(CycleState::Settled));
        assert!(output.exists());

        session.run_until(async {}).await?;
        assert!(session.watcher.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_start_survives_invalid_initial_input() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("openapi.json");
        tokio::fs::write(&input, "paths: [").await?;

        let session = WatchSession::start(Config::new(&input, dir.path().join("client.js"))).await?;
        assert_eq!(session.last_outcome(), Some(CycleState::Failed));
        assert!(session.watcher.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_start_fails_without_watch_root() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing-dir/openapi.json");
        let result = WatchSession::start(Config::new(&input, dir.path().join("client.js"))).await;
        assert!(matches!(result, Err(Error::Watcher(_))));
    }

    #[test]
    fn test_watch_root_for_bare_file_name() {
        assert_eq!(watch_root(Path::new("openapi.json")), PathBuf::from("."));
        assert_eq!(
            watch_root(Path::new("specs/openapi.json")),
            PathBuf::from("specs")
        );
    }
}
