use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use tracing::warn;

use super::controllers::autoplay::IntervalScheduler;
use super::controllers::reveal::{RevealEngine, TickOutcome};
use super::domain::settings::{MAX_SPEED_LEVEL, MIN_SPEED_LEVEL, speed_level_interval};
use super::domain::{Message, RevealSettings, Skin, SourceDocument};
use super::infrastructure::error::Result;
use super::services::executor::{ExecuteError, ExecutionResult, RemoteExecutor};
use super::services::file_loader::read_text_file;
use super::services::history::{FileHistory, HistoryStore};
use super::services::syntax::styled::StyledText;
use super::services::syntax::{HighlightEngine, language_name};

pub type PresentationEngine = RevealEngine<HighlightEngine, IntervalScheduler>;

/// What a finished run hands back to the presenter.
pub type ExecutionOutcome = std::result::Result<ExecutionResult, ExecuteError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Short-lived message for the host to show as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Page-level glue: the engine plus history, settings, edit mode and
/// code execution.
pub struct Presenter<H: HistoryStore> {
    engine: PresentationEngine,
    history: H,
    settings: RevealSettings,
    edit_mode: bool,
    executor: RemoteExecutor,
    executions: Receiver<ExecutionOutcome>,
    execution_sender: Sender<ExecutionOutcome>,
    last_execution: Option<ExecutionOutcome>,
    notices: Vec<Notice>,
}

impl Presenter<FileHistory> {
    /// Presenter backed by the settings and history files in the user's
    /// config and data directories.
    pub fn load_default() -> Self {
        let settings = RevealSettings::load();
        let history = FileHistory::open_default(settings.history_limit);
        Self::new(settings, history)
    }
}

impl<H: HistoryStore> Presenter<H> {
    pub fn new(settings: RevealSettings, history: H) -> Self {
        let engine = RevealEngine::new(HighlightEngine::new(), IntervalScheduler::new());
        Self::with_engine(engine, settings, history)
    }

    pub fn with_engine(mut engine: PresentationEngine, settings: RevealSettings, history: H) -> Self {
        engine.set_speed(settings.autoplay_interval());
        let executor = RemoteExecutor::new(settings.executor_endpoint.clone(), settings.execute_timeout_secs);
        let (execution_sender, executions) = mpsc::channel();
        Self {
            engine,
            history,
            settings,
            edit_mode: false,
            executor,
            executions,
            execution_sender,
            last_execution: None,
            notices: Vec::new(),
        }
    }

    // --- Accessors ---

    pub fn engine(&self) -> &PresentationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PresentationEngine {
        &mut self.engine
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn settings(&self) -> &RevealSettings {
        &self.settings
    }

    pub fn skin(&self) -> Skin {
        self.settings.skin
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn executor(&self) -> &RemoteExecutor {
        &self.executor
    }

    /// Outcome of the most recent finished execution.
    pub fn last_execution(&self) -> Option<&ExecutionOutcome> {
        self.last_execution.as_ref()
    }

    pub fn render(&mut self) -> Arc<StyledText> {
        self.engine.render()
    }

    /// Drain pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    fn remember(&mut self) {
        let document = self.engine.document();
        if document.file_name().is_empty() {
            return;
        }
        if let Err(e) = self
            .history
            .save(document.file_name(), document.text(), document.language_tag())
        {
            warn!(error = %e, "failed to save history");
            self.notify(NoticeLevel::Warning, format!("Could not save history: {}", e));
        }
    }

    fn require_document(&mut self) -> bool {
        if self.engine.document().is_empty() {
            self.notify(NoticeLevel::Warning, "Import a file first");
            return false;
        }
        true
    }

    // --- Documents ---

    pub fn import_file(&mut self, file_name: &str, text: &str) {
        self.edit_mode = false;
        self.engine.load_document(SourceDocument::from_file(file_name, text));
        self.remember();
        self.engine.render();
        let language = language_name(self.engine.document().language_tag());
        self.notify(
            NoticeLevel::Success,
            format!("File imported! Detected language: {}", language),
        );
    }

    pub fn import_path(&mut self, path: &Path) -> Result<()> {
        let (file_name, text) = read_text_file(path)?;
        self.import_file(&file_name, &text);
        Ok(())
    }

    /// Swap in another file while keeping the number of revealed characters.
    /// Refused when nothing has been imported yet.
    pub fn replace_file(&mut self, file_name: &str, text: &str) -> bool {
        if !self.require_document() {
            return false;
        }
        self.edit_mode = false;
        self.engine.replace_document(SourceDocument::from_file(file_name, text));
        self.remember();
        self.engine.render();
        let kept = self.engine.cursor().position();
        self.notify(
            NoticeLevel::Success,
            format!("File replaced, kept the first {} characters", kept),
        );
        true
    }

    pub fn load_history(&mut self, index: usize) -> bool {
        let Some(record) = self.history.get(index).cloned() else {
            self.notify(NoticeLevel::Warning, "History entry not found");
            return false;
        };
        self.edit_mode = false;
        self.engine.load_document(SourceDocument::new(
            record.text,
            record.language_tag,
            record.file_name.as_str(),
        ));
        self.engine.render();
        self.notify(NoticeLevel::Success, format!("Loaded: {}", record.file_name));
        true
    }

    pub fn delete_history(&mut self, index: usize) -> bool {
        match self.history.remove(index) {
            Ok(Some(_)) => {
                self.notify(NoticeLevel::Info, "Deleted");
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "failed to delete history entry");
                self.notify(NoticeLevel::Error, e.to_string());
                false
            }
        }
    }

    // --- View ---

    pub fn switch_skin(&mut self, skin: Skin) {
        self.settings.skin = skin;
        self.engine.render();
    }

    pub fn set_speed_level(&mut self, level: u32) {
        let level = level.clamp(MIN_SPEED_LEVEL, MAX_SPEED_LEVEL);
        self.settings.speed_level = level;
        self.engine.set_speed(speed_level_interval(level));
    }

    // --- Playback ---

    pub fn play(&mut self) -> bool {
        if self.edit_mode {
            return false;
        }
        self.engine.start_autoplay(self.settings.autoplay_interval())
    }

    pub fn pause(&mut self) {
        if self.engine.is_playing() {
            self.engine.stop_autoplay();
            self.notify(NoticeLevel::Info, "Paused");
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.notify(NoticeLevel::Info, "Reset");
    }

    pub fn show_all(&mut self) {
        self.engine.show_all();
        self.notify(NoticeLevel::Success, "Showing all content");
    }

    pub fn seek(&mut self, ratio: f64) {
        self.engine.seek(ratio);
    }

    /// Drive the autoplay timer up to `now` and collect finished executions.
    /// Returns how many characters were revealed.
    pub fn pump(&mut self, now: Instant) -> usize {
        while self.poll_execution() {}
        let mut advanced = 0;
        for timer in self.engine.scheduler_mut().due(now) {
            match self.engine.tick(timer) {
                TickOutcome::Ignored => {}
                TickOutcome::Advanced => advanced += 1,
                TickOutcome::Completed => {
                    advanced += 1;
                    self.notify(NoticeLevel::Success, "Presentation complete!");
                }
            }
        }
        advanced
    }

    // --- Edit mode ---

    /// Stop playback and reveal everything so the host can present the
    /// whole text for editing.
    pub fn enter_edit_mode(&mut self) -> bool {
        if !self.require_document() {
            return false;
        }
        self.edit_mode = true;
        self.engine.show_all();
        self.notify(NoticeLevel::Info, "Edit mode: the text can now be changed");
        true
    }

    pub fn commit_edit(&mut self, text: &str) -> bool {
        if !self.edit_mode {
            return false;
        }
        self.edit_mode = false;
        self.engine.commit_edit(text);
        self.remember();
        self.engine.render();
        self.notify(NoticeLevel::Success, "Edit mode closed, content saved");
        true
    }

    /// Enter edit mode, or leave it committing `edited` when given.
    ///
    /// Leaving with `None` keeps the text from before edit mode and posts a
    /// warning, so hosts holding an edit buffer pass it as `Some`.
    pub fn toggle_edit_mode(&mut self, edited: Option<&str>) -> bool {
        if !self.edit_mode {
            return self.enter_edit_mode();
        }
        match edited {
            Some(text) => self.commit_edit(text),
            None => {
                self.edit_mode = false;
                self.engine.render();
                self.notify(NoticeLevel::Warning, "Edit mode closed, changes discarded");
                true
            }
        }
    }

    // --- Execution ---

    /// Send the revealed prefix to the execution service on a background
    /// thread. The outcome arrives through [`Presenter::pump`] or
    /// [`Presenter::wait_for_execution`]. Returns false when the request
    /// could not start.
    pub fn run_code(&mut self) -> bool {
        let sender = self.execution_sender.clone();
        let started = self
            .executor
            .spawn(self.engine.revealed_text().to_string(), move |outcome| {
                let _ = sender.send(outcome);
            });
        match started {
            Ok(_) => {
                self.notify(NoticeLevel::Info, "Running...");
                true
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, e.to_string());
                false
            }
        }
    }

    /// Collect one finished execution without blocking.
    pub fn poll_execution(&mut self) -> bool {
        match self.executions.try_recv() {
            Ok(outcome) => {
                self.finish_execution(outcome);
                true
            }
            Err(_) => false,
        }
    }

    /// Block up to `timeout` for the running execution to finish.
    pub fn wait_for_execution(&mut self, timeout: Duration) -> bool {
        match self.executions.recv_timeout(timeout) {
            Ok(outcome) => {
                self.finish_execution(outcome);
                true
            }
            Err(_) => false,
        }
    }

    fn finish_execution(&mut self, outcome: ExecutionOutcome) {
        match &outcome {
            Ok(result) if result.success => {
                let message = describe_run("Execution finished", result);
                self.notify(NoticeLevel::Success, message);
            }
            Ok(result) => {
                let message = describe_run("Execution failed", result);
                self.notify(NoticeLevel::Warning, message);
            }
            Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
        }
        self.last_execution = Some(outcome);
    }

    // --- Messages ---

    /// Apply a routed message. Returns false for messages the host handles
    /// itself (dialogs and panels).
    pub fn dispatch(&mut self, message: Message) -> bool {
        match message {
            Message::Advance => {
                self.engine.advance();
            }
            Message::Retreat => {
                self.engine.retreat();
            }
            Message::Reset => self.reset(),
            Message::ShowAll => self.show_all(),
            Message::Seek(ratio) => self.seek(ratio),
            Message::Play => {
                self.play();
            }
            Message::Pause => self.pause(),
            Message::SetSpeedLevel(level) => self.set_speed_level(level),
            Message::SwitchSkin(skin) => self.switch_skin(skin),
            Message::ToggleEditMode => {
                self.toggle_edit_mode(None);
            }
            Message::RunCode => {
                self.run_code();
            }
            Message::OpenImport | Message::ToggleHistory => return false,
        }
        true
    }
}

/// Exit code line followed by whatever the run printed, verbatim.
fn describe_run(headline: &str, result: &ExecutionResult) -> String {
    let mut message = format!("{} (exit code {})", headline, result.returncode);
    if let Some(error) = &result.error {
        message.push_str("\nerror: ");
        message.push_str(error);
    }
    if !result.stdout.is_empty() {
        message.push_str("\nstdout:\n");
        message.push_str(&result.stdout);
    }
    if !result.stderr.is_empty() {
        message.push_str("\nstderr:\n");
        message.push_str(&result.stderr);
    }
    message
}
