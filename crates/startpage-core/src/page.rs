//! Start page controller
//!
//! Rust owns all page state. The frontend forwards key and lifecycle
//! events here and mirrors [`PageView`] after each one; none of the entry
//! points fail, collaborator errors are reported and shown as status.

use startpage_bookmarks::BookmarkManager;
use startpage_navigation::{BangSession, BangTable, Dispatch, SearchResolver};
use startpage_storage::Database;

use crate::collaborators::{BookmarkOps, ErrorSink, LogErrorSink, Navigator, TipOps};
use crate::config::Config;
use crate::error::CoreError;
use crate::keys::{Focus, Key, KeyOutcome};
use crate::shortcuts::{ShortcutContext, ShortcutHandler, ShortcutRouter, UnloadGuard};
use crate::tip::TipManager;
use crate::view::PageView;
use crate::Result;

const SEARCH_ENGINE_KEY: &str = "search_engine";

pub struct StartPage {
    resolver: SearchResolver,
    bangs: BangTable,
    bang: BangSession,
    router: ShortcutRouter,
    unload: UnloadGuard,
    view: PageView,
    bookmarks: Box<dyn BookmarkOps>,
    tips: Box<dyn TipOps>,
    navigator: Box<dyn Navigator>,
    errors: Box<dyn ErrorSink>,
}

impl StartPage {
    pub fn new(
        resolver: SearchResolver,
        bangs: BangTable,
        bookmarks: Box<dyn BookmarkOps>,
        tips: Box<dyn TipOps>,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        Self {
            resolver,
            bangs,
            bang: BangSession::default(),
            router: ShortcutRouter::new(),
            unload: UnloadGuard::default(),
            view: PageView::default(),
            bookmarks,
            tips,
            navigator,
            errors: Box::new(LogErrorSink),
        }
    }

    pub fn with_error_sink(mut self, errors: Box<dyn ErrorSink>) -> Self {
        self.errors = errors;
        self
    }

    /// Open the database named by the config and build the page on it
    pub fn open(config: &Config, navigator: Box<dyn Navigator>) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db, navigator)
    }

    pub fn with_database(
        config: &Config,
        db: Database,
        navigator: Box<dyn Navigator>,
    ) -> Result<Self> {
        let mut resolver = SearchResolver::with_search_engine(config.search_engine.clone())?;

        // A persisted preference wins over the config file
        if let Some(template) = db.setting(SEARCH_ENGINE_KEY)? {
            if let Err(e) = resolver.set_search_engine(template) {
                tracing::warn!(error = %e, "Ignoring stored search engine");
            }
        }

        let mut bangs = BangTable::builtin();
        if let Some(path) = &config.bangs_path {
            bangs.merge(BangTable::load(path)?);
        }

        let mut bookmarks = BookmarkManager::new(db.clone());
        bookmarks.load()?;

        let mut tips = TipManager::new(db);
        if let Err(e) = tips.load() {
            tracing::warn!(error = %e, "Ignoring stored tips, using built-in ones");
        }

        tracing::info!(
            search_engine = resolver.search_template(),
            bangs = bangs.len(),
            "Start page ready"
        );

        Ok(Self::new(
            resolver,
            bangs,
            Box::new(bookmarks),
            Box::new(tips),
            navigator,
        ))
    }

    /// Show the first tip and hand focus to the shortcuts field
    pub fn initialize(&mut self) {
        match self.tips.generate() {
            Ok(tip) => self.view.tip = tip,
            Err(e) => self.report(e),
        }
        self.view.set_focus(Focus::Shortcuts);
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn bang(&self) -> &BangSession {
        &self.bang
    }

    pub fn shortcut_handler(&self) -> ShortcutHandler {
        self.router.handler()
    }

    pub fn is_unloading(&self) -> bool {
        self.unload.is_unloading()
    }

    /// Key pressed in the search field. `value` is the field content
    /// before the key takes effect.
    pub fn search_keydown(&mut self, key: &Key, value: &str) -> KeyOutcome {
        self.view.search.value = value.to_string();

        match key {
            Key::Enter => {
                self.commit(value);
                KeyOutcome::PASS
            }
            Key::Escape => {
                self.view.set_focus(Focus::Shortcuts);
                self.view.search.value.clear();
                self.bang.clear();
                self.sync_badge();
                KeyOutcome::PASS
            }
            Key::Char('!') if value.is_empty() => {
                self.bang.arm();
                self.sync_badge();
                KeyOutcome::PASS
            }
            Key::Char(' ') if self.bang.is_composing() => {
                if self.bang.complete(value, &self.bangs).is_some() {
                    self.view.search.value.clear();
                }
                self.sync_badge();
                KeyOutcome::PREVENT
            }
            _ => KeyOutcome::PASS,
        }
    }

    /// Run a submitted search line. The field is cleared whatever happens.
    pub fn commit(&mut self, input: &str) {
        self.view.status = None;

        match Dispatch::resolve(input) {
            Dispatch::Bookmark(op) => {
                tracing::debug!(command = %op.kind, args = ?op.args, "Bookmark command");
                if let Err(e) = self.bookmarks.apply(&op) {
                    self.report(e);
                }
            }
            Dispatch::Tip { args } => match self.tips.handle(&args) {
                Ok(tip) => self.view.tip = tip,
                Err(e) => self.report(e),
            },
            Dispatch::Search { raw_query } => {
                let url = self.resolver.resolve(&raw_query, &self.bang);
                self.navigator.replace(&url);
            }
        }

        self.view.search.value.clear();
    }

    /// Content of the shortcuts field changed
    pub fn shortcuts_input(&mut self, value: &str) {
        let mut cx = ShortcutContext {
            bookmarks: &mut *self.bookmarks,
            navigator: &mut *self.navigator,
            view: &mut self.view,
        };

        if let Err(e) = self.router.route(value, &mut cx, &self.unload) {
            self.report(e);
        }
    }

    /// Key pressed anywhere on the page. Ignored while the search field
    /// has focus; its own handler sees those keys.
    pub fn document_keydown(&mut self, key: &Key, focus: Focus) -> KeyOutcome {
        self.view.set_focus(focus);
        if focus == Focus::Search {
            return KeyOutcome::PASS;
        }

        match key {
            Key::Char('/') => {
                self.router.reset(&mut self.view);
                self.view.set_focus(Focus::Search);
                KeyOutcome::PREVENT
            }
            Key::Char(':') => {
                self.router.reset(&mut self.view);
                self.view.set_focus(Focus::Search);
                self.view.search.value = ":".to_string();
                KeyOutcome::PREVENT
            }
            Key::Char('!') | Key::Char('\'') => {
                self.router.reset(&mut self.view);
                self.bang.arm();
                self.sync_badge();
                self.view.set_focus(Focus::Search);
                self.view.search.value = "!".to_string();
                KeyOutcome::PREVENT
            }
            Key::Char('.') => {
                if let Err(e) = self.bookmarks.open_all(&mut *self.navigator) {
                    self.report(e);
                }
                KeyOutcome::PREVENT
            }
            Key::Char('?') => {
                self.router.switch_to(ShortcutHandler::Help, &mut self.view);
                KeyOutcome::PREVENT
            }
            Key::Char(';') => {
                self.router.switch_to(ShortcutHandler::SetFolder, &mut self.view);
                KeyOutcome::PREVENT
            }
            Key::Char(' ') => {
                self.router.switch_to(ShortcutHandler::GroupOpen, &mut self.view);
                KeyOutcome::PREVENT
            }
            Key::Escape => {
                self.router.reset(&mut self.view);
                KeyOutcome::PASS
            }
            _ => {
                if focus != Focus::Shortcuts {
                    self.view.shortcuts.value.clear();
                    self.view.set_focus(Focus::Shortcuts);
                }
                KeyOutcome::PASS
            }
        }
    }

    /// The page is about to go away; shortcut input must not navigate again
    pub fn before_unload(&mut self) {
        self.unload.begin();
        self.router.reset(&mut self.view);
    }

    pub fn unload_cancelled(&mut self) {
        self.unload.cancel();
    }

    fn sync_badge(&mut self) {
        self.view.bang_badge = self.bang.badge();
    }

    fn report(&mut self, error: CoreError) {
        self.errors.report(&error);
        self.view.status = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::{Navigation, RecordingNavigator};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSink {
        reported: Rc<RefCell<Vec<String>>>,
    }

    impl ErrorSink for RecordingSink {
        fn report(&self, error: &CoreError) {
            self.reported.borrow_mut().push(error.to_string());
        }
    }

    struct Harness {
        page: StartPage,
        navigator: RecordingNavigator,
        sink: RecordingSink,
    }

    impl Harness {
        fn new() -> Self {
            let navigator = RecordingNavigator::new();
            let sink = RecordingSink::default();
            let page = StartPage::with_database(
                &Config::new(std::path::PathBuf::from("/unused")),
                Database::open_in_memory().unwrap(),
                Box::new(navigator.clone()),
            )
            .unwrap()
            .with_error_sink(Box::new(sink.clone()));

            Self {
                page,
                navigator,
                sink,
            }
        }

        fn submit(&mut self, line: &str) {
            self.page.search_keydown(&Key::Enter, line);
        }

        fn document(&mut self, key: &str) -> KeyOutcome {
            let focus = self.page.view().focus();
            self.page.document_keydown(&Key::parse(key), focus)
        }

        fn replaced(&self) -> Vec<String> {
            self.navigator
                .take()
                .into_iter()
                .map(|nav| match nav {
                    Navigation::Replace(url) => url,
                    Navigation::Open(url) => panic!("Unexpected new tab for {url}"),
                })
                .collect()
        }
    }

    #[test]
    fn test_search_navigates() {
        let mut h = Harness::new();

        h.submit("example.com");
        h.submit(":8080/path");
        h.submit("cats");
        h.submit("versus.");

        assert_eq!(
            h.replaced(),
            vec![
                "https://example.com",
                "http://localhost:8080/path",
                "https://encrypted.google.com/search?q=cats",
                "https://encrypted.google.com/search?q=versus.",
            ]
        );
        assert!(h.page.view().search.value.is_empty());
    }

    #[test]
    fn test_empty_submit_searches() {
        let mut h = Harness::new();
        h.submit("   ");
        assert_eq!(h.replaced(), vec!["https://encrypted.google.com/search?q="]);

        h.page.search_keydown(&Key::Char('!'), "");
        h.page.search_keydown(&Key::Char(' '), "!gh");
        h.submit("");
        assert_eq!(h.replaced(), vec!["https://github.com/search?q="]);
    }

    #[test]
    fn test_bang_lifecycle() {
        let mut h = Harness::new();

        assert_eq!(
            h.page.search_keydown(&Key::Char('!'), ""),
            KeyOutcome::PASS
        );
        assert!(h.page.bang().is_composing());

        let outcome = h.page.search_keydown(&Key::Char(' '), "!gh");
        assert_eq!(outcome, KeyOutcome::PREVENT);
        assert_eq!(h.page.view().bang_badge.as_deref(), Some("github"));
        assert!(h.page.view().search.value.is_empty());

        h.submit("tokio runtime");
        assert_eq!(
            h.replaced(),
            vec!["https://github.com/search?q=tokio%20runtime"]
        );

        // Still active after Enter; only Escape clears it
        assert_eq!(h.page.view().bang_badge.as_deref(), Some("github"));
        h.submit("serde");
        assert_eq!(h.replaced(), vec!["https://github.com/search?q=serde"]);

        h.page.search_keydown(&Key::Escape, "");
        assert_eq!(h.page.bang(), &BangSession::Idle);
        assert!(h.page.view().bang_badge.is_none());
        assert_eq!(h.page.view().focus(), Focus::Shortcuts);
    }

    #[test]
    fn test_unknown_bang_keeps_composing() {
        let mut h = Harness::new();
        h.page.search_keydown(&Key::Char('!'), "");

        let outcome = h.page.search_keydown(&Key::Char(' '), "!nope");
        assert_eq!(outcome, KeyOutcome::PREVENT);
        assert!(h.page.bang().is_composing());
        assert_eq!(h.page.view().search.value, "!nope");
        assert!(h.page.view().bang_badge.is_none());
    }

    #[test]
    fn test_bang_key_only_arms_on_empty_field() {
        let mut h = Harness::new();
        h.page.search_keydown(&Key::Char('!'), "wow");
        assert_eq!(h.page.bang(), &BangSession::Idle);

        // A plain space is typed normally
        assert_eq!(
            h.page.search_keydown(&Key::Char(' '), "wow!"),
            KeyOutcome::PASS
        );
    }

    #[test]
    fn test_document_bang_prefills_search() {
        let mut h = Harness::new();
        h.page.initialize();

        assert_eq!(h.document("'"), KeyOutcome::PREVENT);
        assert!(h.page.bang().is_composing());
        assert_eq!(h.page.view().focus(), Focus::Search);
        assert_eq!(h.page.view().search.value, "!");

        h.page.search_keydown(&Key::Char(' '), "!w");
        assert_eq!(h.page.view().bang_badge.as_deref(), Some("wikipedia"));
    }

    #[test]
    fn test_escape_abandons_composing_bang() {
        let mut h = Harness::new();
        h.page.search_keydown(&Key::Char('!'), "");
        assert!(h.page.bang().is_composing());

        let outcome = h.page.search_keydown(&Key::Escape, "!g");
        assert_eq!(outcome, KeyOutcome::PASS);
        assert_eq!(h.page.bang(), &BangSession::Idle);
        assert!(h.page.view().bang_badge.is_none());
        assert!(h.page.view().search.value.is_empty());
        assert_eq!(h.page.view().focus(), Focus::Shortcuts);
    }

    #[test]
    fn test_slash_focuses_search() {
        let mut h = Harness::new();
        h.page.initialize();
        h.document("?");

        assert_eq!(h.document("/"), KeyOutcome::PREVENT);
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::OpenBookmark);
        assert!(h.page.view().context_label.is_empty());
        assert_eq!(h.page.view().focus(), Focus::Search);
        assert!(h.page.view().search.value.is_empty());
    }

    #[test]
    fn test_document_exclamation_arms_bang() {
        let mut h = Harness::new();
        h.page.initialize();
        h.document(";");

        assert_eq!(h.document("!"), KeyOutcome::PREVENT);
        assert!(h.page.bang().is_composing());
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::OpenBookmark);
        assert_eq!(h.page.view().focus(), Focus::Search);
        assert_eq!(h.page.view().search.value, "!");
    }

    #[test]
    fn test_corrupt_tips_fall_back_to_builtin() {
        let db = Database::open_in_memory().unwrap();
        db.put_setting("tips", "not json").unwrap();

        let mut page = StartPage::with_database(
            &Config::new(std::path::PathBuf::from("/unused")),
            db,
            Box::new(RecordingNavigator::new()),
        )
        .unwrap();
        page.initialize();

        assert!(page.view().tip.is_some());
        assert!(page.view().status.is_none());
    }

    #[test]
    fn test_document_keys() {
        let mut h = Harness::new();
        h.page.initialize();

        assert_eq!(h.document("?"), KeyOutcome::PREVENT);
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::Help);
        assert_eq!(h.page.view().context_label, "?");

        assert_eq!(h.document("Escape"), KeyOutcome::PASS);
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::OpenBookmark);
        assert!(h.page.view().context_label.is_empty());

        assert_eq!(h.document(";"), KeyOutcome::PREVENT);
        assert_eq!(h.page.view().context_label, "f");
        assert_eq!(h.document(" "), KeyOutcome::PREVENT);
        assert_eq!(h.page.view().context_label, "g");

        assert_eq!(h.document(":"), KeyOutcome::PREVENT);
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::OpenBookmark);
        assert_eq!(h.page.view().search.value, ":");
        assert_eq!(h.page.view().focus(), Focus::Search);

        // Focus is in the search field now, so keys belong to it
        assert_eq!(h.document("?"), KeyOutcome::PASS);
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::OpenBookmark);
    }

    #[test]
    fn test_other_keys_focus_shortcuts() {
        let mut h = Harness::new();

        let outcome = h.page.document_keydown(&Key::Char('h'), Focus::None);
        assert_eq!(outcome, KeyOutcome::PASS);
        assert_eq!(h.page.view().focus(), Focus::Shortcuts);
    }

    #[test]
    fn test_help_via_router() {
        let mut h = Harness::new();
        h.page.initialize();

        h.document("?");
        h.page.shortcuts_input("c");

        assert!(h.page.view().panels.commands);
        assert!(!h.page.view().panels.shortcuts);
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::OpenBookmark);
        assert!(h.page.view().context_label.is_empty());
        assert!(h.page.view().shortcuts.value.is_empty());
    }

    #[test]
    fn test_bookmark_commands_and_shortcuts() {
        let mut h = Harness::new();
        h.page.initialize();

        h.submit("touch \"Hacker News\" news.ycombinator.com hn");
        assert!(h.page.view().status.is_none());
        assert!(h.navigator.take().is_empty());

        h.page.shortcuts_input("h");
        assert_eq!(h.page.view().shortcuts.value, "h");
        h.page.shortcuts_input("hn");
        assert_eq!(h.replaced(), vec!["https://news.ycombinator.com/"]);
        assert!(h.page.view().shortcuts.value.is_empty());
    }

    #[test]
    fn test_group_open_and_open_all() {
        let mut h = Harness::new();
        h.page.initialize();
        h.submit("mkdir news n");
        h.submit("touch LWN lwn.net l");
        h.submit("mv LWN news");
        h.submit("touch Top top.test t");

        h.document(" ");
        h.page.shortcuts_input("n");
        assert_eq!(
            h.navigator.take(),
            vec![Navigation::Open("https://lwn.net/".to_string())]
        );

        assert_eq!(h.document("."), KeyOutcome::PREVENT);
        assert_eq!(
            h.navigator.take(),
            vec![Navigation::Open("https://top.test/".to_string())]
        );
    }

    #[test]
    fn test_failures_are_reported() {
        let mut h = Harness::new();

        h.submit("rm ghost");
        assert_eq!(h.sink.reported.borrow().len(), 1);
        assert!(h.page.view().status.is_some());
        assert!(h.page.view().search.value.is_empty());
        assert!(h.navigator.take().is_empty());

        // A successful command clears the status again
        h.submit("tip");
        assert!(h.page.view().status.is_none());
        assert!(h.page.view().tip.is_some());

        h.submit("tip hide");
        assert!(h.page.view().tip.is_none());
    }

    #[test]
    fn test_failing_shortcut_keeps_mode() {
        let mut h = Harness::new();
        h.submit("touch Mail mail.test m");

        h.document(";");
        h.page.shortcuts_input("m");
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::SetFolder);
        assert_eq!(h.page.view().context_label, "f");
        assert_eq!(h.sink.reported.borrow().len(), 1);
    }

    #[test]
    fn test_shortcuts_ignored_while_unloading() {
        let mut h = Harness::new();
        h.submit("touch Mail mail.test m");

        h.page.before_unload();
        assert!(h.page.is_unloading());

        h.document("?");
        h.page.shortcuts_input("m");
        assert_eq!(h.page.shortcut_handler(), ShortcutHandler::Help);
        assert_eq!(h.page.view().context_label, "?");
        assert!(h.navigator.take().is_empty());

        h.page.unload_cancelled();
        h.document("Escape");
        h.page.shortcuts_input("m");
        assert_eq!(h.replaced(), vec!["https://mail.test/"]);
    }

    #[test]
    fn test_stored_search_engine_wins() {
        let db = Database::open_in_memory().unwrap();
        db.put_setting(SEARCH_ENGINE_KEY, "https://ddg.test/?q={{{s}}}")
            .unwrap();
        let navigator = RecordingNavigator::new();

        let mut page = StartPage::with_database(
            &Config::new(std::path::PathBuf::from("/unused")),
            db,
            Box::new(navigator.clone()),
        )
        .unwrap();
        page.commit("a b");

        assert_eq!(
            navigator.take(),
            vec![Navigation::Replace("https://ddg.test/?q=a%20b".to_string())]
        );
    }
}
