use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::autoplay::{AutoplayState, Scheduler, TimerId};
use super::cache::{CacheStats, HighlightCache};
use crate::app::domain::{RevealCursor, SourceDocument};
use crate::app::services::syntax::Highlight;
use crate::app::services::syntax::styled::StyledText;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// How the current document came to be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Fresh import or history load. Cursor at 0.
    Fresh,
    /// Replacement that kept the numeric position.
    Replaced,
    /// Edit commit. Cursor at the end.
    Edited,
}

#[derive(Debug)]
pub enum RevealEvent<'a> {
    DocumentLoaded { document: &'a SourceDocument, kind: LoadKind },
    Rendered { position: usize, styled: &'a StyledText },
    AutoplayStarted { interval: Duration },
    AutoplayStopped,
    AutoplayCompleted,
}

/// Hook invoked after loads, renders and autoplay transitions.
pub trait RevealObserver {
    fn on_event(&mut self, event: &RevealEvent<'_>);
}

impl<F> RevealObserver for F
where
    F: FnMut(&RevealEvent<'_>),
{
    fn on_event(&mut self, event: &RevealEvent<'_>) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not the active timer; nothing happened.
    Ignored,
    Advanced,
    /// Advanced onto the last character and stopped.
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealStatus {
    pub position: usize,
    pub len: usize,
    pub percent: u32,
    pub line_count: usize,
    pub playing: bool,
    pub language_tag: String,
    pub file_name: String,
}

fn notify(observers: &mut [Box<dyn RevealObserver>], event: RevealEvent<'_>) {
    for observer in observers.iter_mut() {
        observer.on_event(&event);
    }
}

/// Progressive reveal of one document. Owns the cursor, the highlight
/// cache and the autoplay timer; every document change goes through here
/// so the cache can never outlive the text it was built from.
pub struct RevealEngine<H: Highlight, S: Scheduler> {
    document: SourceDocument,
    cursor: RevealCursor,
    cache: HighlightCache,
    highlighter: H,
    scheduler: S,
    autoplay: Option<AutoplayState>,
    interval: Duration,
    observers: Vec<Box<dyn RevealObserver>>,
}

impl<H: Highlight, S: Scheduler> RevealEngine<H, S> {
    pub fn new(highlighter: H, scheduler: S) -> Self {
        Self {
            document: SourceDocument::empty(),
            cursor: RevealCursor::new(0),
            cache: HighlightCache::new(),
            highlighter,
            scheduler,
            autoplay: None,
            interval: DEFAULT_INTERVAL,
            observers: Vec::new(),
        }
    }

    pub fn add_observer<O: RevealObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // --- Accessors ---

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    pub fn cursor(&self) -> &RevealCursor {
        &self.cursor
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_playing(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn autoplay_timer(&self) -> Option<TimerId> {
        self.autoplay.map(|state| state.timer)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn revealed_text(&self) -> &str {
        self.document.prefix(self.cursor.position())
    }

    pub fn status(&self) -> RevealStatus {
        RevealStatus {
            position: self.cursor.position(),
            len: self.cursor.len(),
            percent: self.cursor.progress_percent(),
            line_count: self.revealed_text().split('\n').count(),
            playing: self.is_playing(),
            language_tag: self.document.language_tag().to_string(),
            file_name: self.document.file_name().to_string(),
        }
    }

    // --- Document changes ---

    pub fn load_document(&mut self, document: SourceDocument) {
        self.install(document, RevealCursor::new, LoadKind::Fresh);
    }

    /// Swap in new text, keeping the cursor's numeric position (clamped).
    pub fn replace_document(&mut self, document: SourceDocument) {
        let mut cursor = self.cursor;
        self.install(
            document,
            move |len| {
                cursor.resize(len);
                cursor
            },
            LoadKind::Replaced,
        );
    }

    /// Replace the text with an edited version, keeping name and language,
    /// and reveal all of it.
    pub fn commit_edit(&mut self, text: &str) {
        let document = self.document.with_text(text);
        self.install(
            document,
            |len| {
                let mut cursor = RevealCursor::new(len);
                cursor.set_to_end();
                cursor
            },
            LoadKind::Edited,
        );
    }

    fn install(&mut self, document: SourceDocument, cursor: impl FnOnce(usize) -> RevealCursor, kind: LoadKind) {
        self.stop_autoplay();
        self.cursor = cursor(document.len());
        self.document = document;
        self.cache.clear();
        info!(
            file = %self.document.file_name(),
            tag = %self.document.language_tag(),
            chars = self.document.len(),
            ?kind,
            "document loaded"
        );
        notify(
            &mut self.observers,
            RevealEvent::DocumentLoaded {
                document: &self.document,
                kind,
            },
        );
    }

    // --- Rendering ---

    /// Styled form of the revealed prefix. Memoized per position until the
    /// document changes.
    pub fn render(&mut self) -> Arc<StyledText> {
        let position = self.cursor.position();
        let styled = if position == 0 {
            Arc::new(StyledText::placeholder())
        } else {
            let key = self.cache.key(self.document.language_tag(), position);
            match self.cache.get(&key) {
                Some(styled) => styled,
                None => {
                    let styled = Arc::new(
                        self.highlighter
                            .render(self.document.prefix(position), self.document.language_tag()),
                    );
                    self.cache.put(key, Arc::clone(&styled));
                    styled
                }
            }
        };
        notify(
            &mut self.observers,
            RevealEvent::Rendered {
                position,
                styled: &styled,
            },
        );
        styled
    }

    // --- Manual navigation ---

    pub fn advance(&mut self) -> Arc<StyledText> {
        self.cursor.advance();
        self.render()
    }

    pub fn retreat(&mut self) -> Arc<StyledText> {
        self.cursor.retreat();
        self.render()
    }

    pub fn reset(&mut self) -> Arc<StyledText> {
        self.stop_autoplay();
        self.cursor.set_to_start();
        self.render()
    }

    pub fn show_all(&mut self) -> Arc<StyledText> {
        self.stop_autoplay();
        self.cursor.set_to_end();
        self.render()
    }

    pub fn seek(&mut self, ratio: f64) -> Arc<StyledText> {
        self.stop_autoplay();
        self.cursor.seek_to_ratio(ratio);
        self.render()
    }

    // --- Autoplay ---

    /// Begin revealing one character per `interval`. Refused while already
    /// playing, for an empty document, or when everything is revealed.
    pub fn start_autoplay(&mut self, interval: Duration) -> bool {
        if self.autoplay.is_some() || self.document.is_empty() || self.cursor.is_complete() {
            return false;
        }
        self.interval = interval;
        let timer = self.scheduler.schedule_repeating(interval);
        self.autoplay = Some(AutoplayState { timer, interval });
        debug!(?interval, "autoplay started");
        notify(&mut self.observers, RevealEvent::AutoplayStarted { interval });
        true
    }

    pub fn stop_autoplay(&mut self) {
        if let Some(state) = self.autoplay.take() {
            self.scheduler.cancel(state.timer);
            debug!("autoplay stopped");
            notify(&mut self.observers, RevealEvent::AutoplayStopped);
        }
    }

    /// Change the cadence. A running autoplay is rescheduled in place.
    pub fn set_speed(&mut self, interval: Duration) {
        self.interval = interval;
        if let Some(state) = self.autoplay {
            if state.interval == interval {
                return;
            }
            self.scheduler.cancel(state.timer);
            let timer = self.scheduler.schedule_repeating(interval);
            self.autoplay = Some(AutoplayState { timer, interval });
        }
    }

    /// Handle one tick from the scheduler.
    pub fn tick(&mut self, timer: TimerId) -> TickOutcome {
        if self.autoplay_timer() != Some(timer) {
            return TickOutcome::Ignored;
        }
        if !self.cursor.is_complete() {
            self.cursor.advance();
            self.render();
        }
        if self.cursor.is_complete() {
            self.complete_autoplay();
            return TickOutcome::Completed;
        }
        TickOutcome::Advanced
    }

    fn complete_autoplay(&mut self) {
        if let Some(state) = self.autoplay.take() {
            self.scheduler.cancel(state.timer);
        }
        info!(file = %self.document.file_name(), "presentation complete");
        notify(&mut self.observers, RevealEvent::AutoplayCompleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controllers::autoplay::IntervalScheduler;
    use crate::app::services::syntax::HighlightEngine;
    use crate::app::services::syntax::styled::{RenderTier, TokenClass};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Instant;

    #[derive(Default)]
    struct CountingHighlighter {
        calls: Cell<usize>,
    }

    impl Highlight for CountingHighlighter {
        fn render(&self, text: &str, _language_tag: &str) -> StyledText {
            self.calls.set(self.calls.get() + 1);
            StyledText::escaped(text)
        }
    }

    type TestEngine = RevealEngine<CountingHighlighter, IntervalScheduler>;

    fn engine() -> TestEngine {
        RevealEngine::new(CountingHighlighter::default(), IntervalScheduler::new())
    }

    fn loaded(text: &str, tag: &str) -> TestEngine {
        let mut engine = engine();
        engine.load_document(SourceDocument::new(text, tag, "demo"));
        engine
    }

    fn calls(engine: &TestEngine) -> usize {
        engine.highlighter().calls.get()
    }

    fn record_events(engine: &mut TestEngine) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        engine.add_observer(move |event: &RevealEvent<'_>| {
            let entry = match event {
                RevealEvent::DocumentLoaded { kind, .. } => format!("loaded:{:?}", kind),
                RevealEvent::Rendered { position, .. } => format!("rendered:{}", position),
                RevealEvent::AutoplayStarted { .. } => "started".to_string(),
                RevealEvent::AutoplayStopped => "stopped".to_string(),
                RevealEvent::AutoplayCompleted => "completed".to_string(),
            };
            sink.borrow_mut().push(entry);
        });
        log
    }

    #[test]
    fn test_plaintext_reveal_stops_at_end() {
        let mut engine = loaded("abc", "plaintext");
        for _ in 0..3 {
            engine.advance();
        }
        assert_eq!(engine.render().plain_text(), "abc");
        engine.advance();
        assert_eq!(engine.cursor().position(), 3);
    }

    #[test]
    fn test_prefix_highlighted_as_keyword() {
        let mut engine = RevealEngine::new(HighlightEngine::new(), IntervalScheduler::new());
        engine.load_document(SourceDocument::from_file("demo.js", "let x = 1;"));
        for _ in 0..5 {
            engine.advance();
        }
        let styled = engine.render();
        assert_eq!(styled.plain_text(), "let x");
        assert!(styled.find(TokenClass::Keyword, "let").is_some());
        assert!(styled.find(TokenClass::Keyword, "x").is_none());
    }

    #[test]
    fn test_seek_half_of_ten_chars() {
        let mut engine = loaded("0123456789", "plaintext");
        engine.seek(0.5);
        assert_eq!(engine.cursor().position(), 5);
        assert_eq!(engine.revealed_text(), "01234");
    }

    #[test]
    fn test_load_never_serves_previous_document() {
        let mut engine = loaded("abcdef", "plaintext");
        engine.seek(0.5);
        assert_eq!(engine.render().plain_text(), "abc");

        engine.load_document(SourceDocument::new("xyzxyz", "plaintext", "other"));
        engine.seek(0.5);
        assert_eq!(engine.render().plain_text(), "xyz");
    }

    #[test]
    fn test_replace_keeps_position_and_invalidates() {
        let mut engine = loaded("abcdef", "plaintext");
        engine.seek(0.5);
        engine.render();
        engine.replace_document(SourceDocument::new("uvwxyz", "plaintext", "demo"));
        assert_eq!(engine.cursor().position(), 3);
        assert_eq!(engine.render().plain_text(), "uvw");

        engine.replace_document(SourceDocument::new("q", "plaintext", "demo"));
        assert_eq!(engine.cursor().position(), 1);
        assert!(engine.cursor().is_complete());
    }

    #[test]
    fn test_render_is_memoized() {
        let mut engine = loaded("hello world", "plaintext");
        engine.advance();
        engine.advance();
        let first = engine.render();
        let second = engine.render();
        assert!(Arc::ptr_eq(&first, &second));
        // advance() rendered position 1 and 2; the two explicit renders hit the cache
        assert_eq!(calls(&engine), 2);
        assert_eq!(engine.cache_stats().hits, 2);
    }

    #[test]
    fn test_seek_and_retreat_reuse_cache() {
        let mut engine = loaded("hello", "plaintext");
        engine.show_all();
        engine.retreat();
        engine.advance();
        let before = calls(&engine);
        engine.seek(0.8);
        assert_eq!(calls(&engine), before);
    }

    #[test]
    fn test_empty_prefix_is_placeholder_and_not_cached() {
        let mut empty = engine();
        assert!(empty.render().is_placeholder());

        let mut engine = loaded("abc", "plaintext");
        let styled = engine.render();
        assert_eq!(styled.tier(), RenderTier::Placeholder);
        assert_eq!(calls(&engine), 0);
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn test_autoplay_runs_exactly_len_ticks() {
        let mut engine = loaded("abcd", "plaintext");
        assert!(engine.start_autoplay(Duration::from_millis(10)));

        let mut ticks = 0;
        let mut last = TickOutcome::Ignored;
        while let Some(timer) = engine.autoplay_timer() {
            last = engine.tick(timer);
            ticks += 1;
            assert!(ticks <= 4, "autoplay did not stop");
        }
        assert_eq!(ticks, 4);
        assert_eq!(last, TickOutcome::Completed);
        assert!(!engine.is_playing());
        assert_eq!(engine.cursor().position(), 4);
        assert_eq!(engine.scheduler().active_count(), 0);
    }

    #[test]
    fn test_autoplay_driven_by_scheduler_polls() {
        use std::sync::OnceLock;
        fn epoch() -> Instant {
            static EPOCH: OnceLock<Instant> = OnceLock::new();
            *EPOCH.get_or_init(Instant::now)
        }
        let mut engine = RevealEngine::new(CountingHighlighter::default(), IntervalScheduler::with_clock(epoch));
        engine.load_document(SourceDocument::new("abc", "plaintext", "demo"));
        engine.start_autoplay(Duration::from_millis(50));

        // A stalled host gets one tick per poll, not one per missed interval.
        let poll = |engine: &mut TestEngine, at: u64| -> Vec<TickOutcome> {
            let due = engine.scheduler_mut().due(epoch() + Duration::from_millis(at));
            due.into_iter().map(|id| engine.tick(id)).collect()
        };
        assert_eq!(poll(&mut engine, 500), vec![TickOutcome::Advanced]);
        assert_eq!(engine.cursor().position(), 1);
        assert!(poll(&mut engine, 549).is_empty());
        assert_eq!(poll(&mut engine, 550), vec![TickOutcome::Advanced]);
        assert_eq!(poll(&mut engine, 600), vec![TickOutcome::Completed]);
        assert_eq!(engine.cursor().position(), 3);
        assert!(poll(&mut engine, 5000).is_empty());
    }

    #[test]
    fn test_stalled_poll_reveals_one_character() {
        use std::sync::OnceLock;
        fn epoch() -> Instant {
            static EPOCH: OnceLock<Instant> = OnceLock::new();
            *EPOCH.get_or_init(Instant::now)
        }
        let mut engine = RevealEngine::new(CountingHighlighter::default(), IntervalScheduler::with_clock(epoch));
        engine.load_document(SourceDocument::new("x".repeat(5000), "plaintext", "long"));
        engine.start_autoplay(Duration::from_millis(1));

        for id in engine.scheduler_mut().due(epoch() + Duration::from_secs(2)) {
            engine.tick(id);
        }
        assert_eq!(engine.cursor().position(), 1);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_start_autoplay_guards() {
        let mut empty = engine();
        assert!(!empty.start_autoplay(DEFAULT_INTERVAL));

        let mut engine = loaded("ab", "plaintext");
        assert!(engine.start_autoplay(DEFAULT_INTERVAL));
        assert!(!engine.start_autoplay(DEFAULT_INTERVAL));
        assert_eq!(engine.scheduler().active_count(), 1);

        engine.show_all();
        assert!(!engine.is_playing());
        assert!(!engine.start_autoplay(DEFAULT_INTERVAL));
    }

    #[test]
    fn test_stop_is_idempotent_and_old_timer_ignored() {
        let mut engine = loaded("abc", "plaintext");
        engine.start_autoplay(DEFAULT_INTERVAL);
        let timer = engine.autoplay_timer().unwrap();
        engine.stop_autoplay();
        engine.stop_autoplay();
        assert_eq!(engine.tick(timer), TickOutcome::Ignored);
        assert_eq!(engine.cursor().position(), 0);
    }

    #[test]
    fn test_set_speed_reschedules_without_moving_cursor() {
        let mut engine = loaded("abcdef", "plaintext");
        engine.start_autoplay(Duration::from_millis(50));
        let first = engine.autoplay_timer().unwrap();
        engine.tick(first);

        engine.set_speed(Duration::from_millis(5));
        let second = engine.autoplay_timer().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.cursor().position(), 1);
        assert_eq!(engine.tick(first), TickOutcome::Ignored);
        assert_eq!(engine.tick(second), TickOutcome::Advanced);
        assert_eq!(engine.scheduler().active_count(), 1);
        assert_eq!(engine.interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_set_speed_while_idle_only_stores() {
        let mut engine = loaded("abc", "plaintext");
        engine.set_speed(Duration::from_millis(7));
        assert!(!engine.is_playing());
        assert_eq!(engine.interval(), Duration::from_millis(7));
    }

    #[test]
    fn test_load_stops_autoplay() {
        let mut engine = loaded("abc", "plaintext");
        engine.start_autoplay(DEFAULT_INTERVAL);
        engine.load_document(SourceDocument::new("xyz", "plaintext", "next"));
        assert!(!engine.is_playing());
        assert_eq!(engine.scheduler().active_count(), 0);
    }

    #[test]
    fn test_commit_edit_reveals_all_and_keeps_metadata() {
        let mut engine = RevealEngine::new(CountingHighlighter::default(), IntervalScheduler::new());
        engine.load_document(SourceDocument::from_file("app.py", "print(1)"));
        engine.advance();
        engine.commit_edit("print(2)\nprint(3)");
        assert_eq!(engine.document().file_name(), "app.py");
        assert_eq!(engine.document().language_tag(), "python");
        assert!(engine.cursor().is_complete());
        assert_eq!(engine.render().plain_text(), "print(2)\nprint(3)");
        assert_eq!(engine.status().line_count, 2);
    }

    #[test]
    fn test_status() {
        let mut engine = loaded("ab\ncd", "plaintext");
        let status = engine.status();
        assert_eq!(status.line_count, 1);
        assert_eq!(status.percent, 0);

        engine.seek(1.0);
        let status = engine.status();
        assert_eq!(status.position, 5);
        assert_eq!(status.percent, 100);
        assert_eq!(status.line_count, 2);
        assert_eq!(status.file_name, "demo");
        assert!(!status.playing);
    }

    #[test]
    fn test_observer_sees_events_in_order() {
        let mut engine = engine();
        let log = record_events(&mut engine);
        engine.load_document(SourceDocument::new("ab", "plaintext", "demo"));
        engine.start_autoplay(DEFAULT_INTERVAL);
        while let Some(timer) = engine.autoplay_timer() {
            engine.tick(timer);
        }
        engine.replace_document(SourceDocument::new("abc", "plaintext", "demo"));
        assert_eq!(
            *log.borrow(),
            vec!["loaded:Fresh", "started", "rendered:1", "rendered:2", "completed", "loaded:Replaced"]
        );
    }

    #[test]
    fn test_cursor_bounds_under_mixed_operations() {
        let mut engine = loaded("hello", "plaintext");
        let ops: [fn(&mut TestEngine); 6] = [
            |e| {
                e.advance();
            },
            |e| {
                e.retreat();
            },
            |e| {
                e.seek(1.7);
            },
            |e| {
                e.seek(-0.3);
            },
            |e| {
                e.show_all();
            },
            |e| e.replace_document(SourceDocument::new("hi", "plaintext", "demo")),
        ];
        let mut state: u32 = 7;
        for _ in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            ops[(state >> 16) as usize % ops.len()](&mut engine);
            let cursor = engine.cursor();
            assert!(cursor.position() <= cursor.len());
            assert_eq!(cursor.len(), engine.document().len());
        }
    }
}
