//! Site state container
//!
//! Owns the navigator and the peripheral controls. Raw page events come in
//! through the `on_*` handlers, pass through their rate limiters, and reach
//! the navigator as [`InputEvent`]s. Transitions it returns are applied to
//! the [`PageHost`], and each engaged scroll lock gets a cooldown timer on
//! the [`Scheduler`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_navigation::{
    GoTo, HistoryUpdate, InputEvent, LockTicket, NavKey, Navigator, Sections, Transition,
    Viewport,
};
use folio_storage::SettingsStore;
use folio_timing::{debounce, throttle, Debounced, Scheduler, TaskId, Throttled};

use crate::config::Config;
use crate::host::PageHost;
use crate::menu::MenuState;
use crate::theme::{Theme, ThemeController};
use crate::Result;

/// The running site.
///
/// Single-threaded: every handler runs to completion on the event loop
/// before the next one starts.
pub struct Site {
    core: Rc<SiteCore>,
    wheel: Throttled<f64>,
    scroll: Throttled<Viewport>,
    resize: Debounced<Viewport>,
}

struct SiteCore {
    navigator: RefCell<Navigator>,
    host: Rc<dyn PageHost>,
    scheduler: Rc<dyn Scheduler>,
    theme: RefCell<ThemeController>,
    menu: RefCell<MenuState>,
    /// Pending lock release
    cooldown: Cell<Option<TaskId>>,
    /// Last visibility pushed to the host
    back_to_top: Cell<Option<bool>>,
}

impl Site {
    pub fn new(
        config: &Config,
        sections: Sections,
        host: Rc<dyn PageHost>,
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn SettingsStore>,
    ) -> Result<Self> {
        config.validate()?;

        let navigator = Navigator::new(sections, config.navigator.clone());
        let theme = ThemeController::load(store, config.theme_key.clone(), config.default_theme);

        let core = Rc::new(SiteCore {
            navigator: RefCell::new(navigator),
            host,
            scheduler: Rc::clone(&scheduler),
            theme: RefCell::new(theme),
            menu: RefCell::new(MenuState::new(config.mobile_breakpoint)),
            cooldown: Cell::new(None),
            back_to_top: Cell::new(None),
        });

        let wheel = {
            let core = Rc::clone(&core);
            throttle(
                Rc::clone(&scheduler),
                config.navigator.wheel_throttle(),
                move |delta_y: f64| core.dispatch(InputEvent::Wheel { delta_y }),
            )
        };
        let scroll = {
            let core = Rc::clone(&core);
            throttle(
                Rc::clone(&scheduler),
                config.navigator.scroll_throttle(),
                move |viewport: Viewport| core.dispatch(InputEvent::Scroll(viewport)),
            )
        };
        let resize = {
            let core = Rc::clone(&core);
            debounce(
                scheduler,
                config.navigator.resize_debounce(),
                move |viewport: Viewport| core.dispatch(InputEvent::Resize(viewport)),
            )
        };

        Ok(Self {
            core,
            wheel,
            scroll,
            resize,
        })
    }

    /// Bring the page to its initial state for the location it loaded at.
    pub fn start(&self, location: &str) -> Result<()> {
        let core = &self.core;

        core.host.apply_theme(core.theme.borrow().current())?;
        core.host.set_menu_open(false)?;

        let transition = core.navigator.borrow_mut().initialize(location);
        if let Some(transition) = transition {
            core.apply(&transition);
        }

        core.back_to_top.set(Some(false));
        core.host.set_back_to_top_visible(false)?;
        core.host.reveal()?;

        tracing::info!(
            location = %location,
            index = ?self.current_index(),
            theme = %self.theme(),
            "Site started"
        );

        Ok(())
    }

    // === Page events ===

    pub fn on_wheel(&self, delta_y: f64) {
        self.wheel.call(delta_y);
    }

    pub fn on_scroll(&self, viewport: Viewport) {
        self.scroll.call(viewport);
    }

    pub fn on_resize(&self, viewport: Viewport) {
        self.resize.call(viewport);
    }

    /// Returns true if the key is a navigation key, in which case the
    /// browser's own handling should be suppressed.
    pub fn on_key(&self, key: &str) -> bool {
        match NavKey::from_key(key) {
            Some(key) => {
                self.core.dispatch(InputEvent::Key { key });
                true
            }
            None => false,
        }
    }

    pub fn on_pop_state(&self, location: &str) {
        self.core.dispatch(InputEvent::PopState {
            location: location.to_string(),
        });
    }

    /// A menu link was followed. The menu closes whether or not the slug
    /// names a section.
    pub fn on_link_click(&self, slug: &str) {
        self.core.dispatch(InputEvent::LinkClick {
            slug: slug.to_string(),
        });
        self.close_menu();
    }

    pub fn on_back_to_top(&self) {
        self.core.dispatch(InputEvent::BackToTop);
    }

    /// A click anywhere on the document. `inside_menu` is true when the
    /// target sits inside the menu toggle or the link list.
    pub fn on_document_click(&self, viewport_width: f64, inside_menu: bool) {
        let closes = self
            .core
            .menu
            .borrow()
            .closes_on_click(viewport_width, inside_menu);
        if closes {
            self.close_menu();
        }
    }

    // === Controls ===

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.core.theme.borrow_mut().toggle();
        if let Err(e) = self.core.host.apply_theme(theme) {
            tracing::warn!(theme = %theme, error = %e, "Failed to apply theme");
        }
        theme
    }

    pub fn toggle_menu(&self) -> bool {
        let open = self.core.menu.borrow_mut().toggle();
        if let Err(e) = self.core.host.set_menu_open(open) {
            tracing::warn!(open, error = %e, "Failed to update menu");
        }
        open
    }

    fn close_menu(&self) {
        let was_open = self.core.menu.borrow_mut().close();
        if was_open {
            if let Err(e) = self.core.host.set_menu_open(false) {
                tracing::warn!(error = %e, "Failed to close menu");
            }
        }
    }

    /// Jump to a section programmatically.
    pub fn go_to(&self, index: usize, options: GoTo) -> Result<Transition> {
        let transition = self.core.navigator.borrow_mut().go_to(index, options)?;
        self.core.apply(&transition);
        Ok(transition)
    }

    // === State ===

    pub fn current_index(&self) -> Option<usize> {
        self.core.navigator.borrow().current_index()
    }

    pub fn current_slug(&self) -> Option<String> {
        self.core
            .navigator
            .borrow()
            .current_section()
            .map(|s| s.slug.clone())
    }

    pub fn is_locked(&self) -> bool {
        self.core.navigator.borrow().is_locked()
    }

    pub fn theme(&self) -> Theme {
        self.core.theme.borrow().current()
    }

    pub fn is_menu_open(&self) -> bool {
        self.core.menu.borrow().is_open()
    }
}

impl SiteCore {
    fn dispatch(self: &Rc<Self>, event: InputEvent) {
        let is_scroll = matches!(event, InputEvent::Scroll(_));

        let transition = match self.navigator.try_borrow_mut() {
            Ok(mut navigator) => navigator.handle_input_event(event),
            Err(_) => {
                tracing::warn!(kind = event.kind(), "Navigator busy; event dropped");
                return;
            }
        };

        if is_scroll {
            self.sync_back_to_top();
        }
        if let Some(transition) = transition {
            self.apply(&transition);
        }
    }

    /// Scroll first, then the URL, then arm the lock release.
    fn apply(self: &Rc<Self>, transition: &Transition) {
        if let Some(behavior) = transition.scroll {
            if let Err(e) = self.host.scroll_to_section(transition.index, behavior) {
                tracing::warn!(index = transition.index, error = %e, "Failed to scroll");
            }
        }

        let written = match transition.history {
            HistoryUpdate::Push => self.host.push_url(&transition.path),
            HistoryUpdate::Replace => self.host.replace_url(&transition.path),
            HistoryUpdate::Skip => Ok(()),
        };
        if let Err(e) = written {
            tracing::warn!(path = %transition.path, error = %e, "Failed to update URL");
        }

        if let Some(ticket) = transition.lock {
            self.arm_cooldown(ticket);
        }
    }

    fn arm_cooldown(self: &Rc<Self>, ticket: LockTicket) {
        if let Some(previous) = self.cooldown.take() {
            self.scheduler.cancel(previous);
        }

        let weak = Rc::downgrade(self);
        let generation = ticket.generation;
        let id = self.scheduler.schedule(
            ticket.duration,
            Box::new(move || {
                if let Some(core) = weak.upgrade() {
                    core.cooldown.set(None);
                    core.dispatch(InputEvent::CooldownElapsed { generation });
                }
            }),
        );
        self.cooldown.set(Some(id));
    }

    fn sync_back_to_top(&self) {
        let (enabled, visible) = {
            let navigator = self.navigator.borrow();
            (
                navigator.config().enable_back_to_top,
                navigator.back_to_top_visible(),
            )
        };

        if !enabled || self.back_to_top.get() == Some(visible) {
            return;
        }

        self.back_to_top.set(Some(visible));
        if let Err(e) = self.host.set_back_to_top_visible(visible) {
            tracing::warn!(visible, error = %e, "Failed to update back-to-top button");
        }
    }
}

impl Drop for SiteCore {
    fn drop(&mut self) {
        if let Some(id) = self.cooldown.take() {
            self.scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_navigation::ScrollBehavior;
    use folio_storage::MemoryStore;
    use folio_timing::ManualScheduler;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Scroll(usize, ScrollBehavior),
        Push(String),
        Replace(String),
        BackToTop(bool),
        Theme(Theme),
        Menu(bool),
        Reveal,
    }

    #[derive(Default)]
    struct RecordingHost {
        calls: RefCell<Vec<Call>>,
    }

    impl RecordingHost {
        fn take(&self) -> Vec<Call> {
            self.calls.borrow_mut().drain(..).collect()
        }

        fn record(&self, call: Call) -> Result<()> {
            self.calls.borrow_mut().push(call);
            Ok(())
        }
    }

    impl PageHost for RecordingHost {
        fn scroll_to_section(&self, index: usize, behavior: ScrollBehavior) -> Result<()> {
            self.record(Call::Scroll(index, behavior))
        }

        fn push_url(&self, path: &str) -> Result<()> {
            self.record(Call::Push(path.to_string()))
        }

        fn replace_url(&self, path: &str) -> Result<()> {
            self.record(Call::Replace(path.to_string()))
        }

        fn set_back_to_top_visible(&self, visible: bool) -> Result<()> {
            self.record(Call::BackToTop(visible))
        }

        fn apply_theme(&self, theme: Theme) -> Result<()> {
            self.record(Call::Theme(theme))
        }

        fn set_menu_open(&self, open: bool) -> Result<()> {
            self.record(Call::Menu(open))
        }

        fn reveal(&self) -> Result<()> {
            self.record(Call::Reveal)
        }
    }

    struct Fixture {
        site: Site,
        host: Rc<RecordingHost>,
        scheduler: ManualScheduler,
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn fixture_with(config: Config, store: MemoryStore) -> Fixture {
        let host = Rc::new(RecordingHost::default());
        let scheduler = ManualScheduler::new();
        let sections = Sections::new(["home", "about", "work", "contact"]).unwrap();
        let site = Site::new(
            &config,
            sections,
            host.clone(),
            Rc::new(scheduler.clone()),
            Rc::new(store),
        )
        .unwrap();

        Fixture {
            site,
            host,
            scheduler,
        }
    }

    fn started(location: &str) -> Fixture {
        let fixture = fixture_with(Config::default(), MemoryStore::new());
        fixture.site.start(location).unwrap();
        fixture.host.take();
        fixture
    }

    #[test]
    fn test_start_sequence() {
        let fixture = fixture_with(Config::default(), MemoryStore::new());
        fixture.site.start("https://example.com/").unwrap();

        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Theme(Theme::Light),
                Call::Menu(false),
                Call::Scroll(0, ScrollBehavior::Instant),
                Call::Replace("/home".to_string()),
                Call::BackToTop(false),
                Call::Reveal,
            ]
        );
        assert_eq!(fixture.site.current_slug().as_deref(), Some("home"));
        assert!(!fixture.site.is_locked());
    }

    #[test]
    fn test_start_at_section_keeps_url() {
        let fixture = started("/work");
        assert_eq!(fixture.site.current_index(), Some(2));

        let fixture = fixture_with(Config::default(), MemoryStore::new());
        fixture.site.start("/work").unwrap();
        assert!(fixture
            .host
            .take()
            .iter()
            .all(|call| !matches!(call, Call::Replace(_) | Call::Push(_))));
    }

    #[test]
    fn test_start_at_unknown_location() {
        let fixture = fixture_with(Config::default(), MemoryStore::new());
        fixture.site.start("/blog/post").unwrap();
        assert_eq!(fixture.site.current_index(), Some(0));
        assert!(!fixture
            .host
            .take()
            .iter()
            .any(|call| matches!(call, Call::Scroll(..))));
    }

    #[test]
    fn test_wheel_gesture_moves_one_section() {
        let fixture = started("/home");

        fixture.site.on_wheel(120.0);
        assert_eq!(fixture.site.current_index(), Some(1));
        assert!(fixture.site.is_locked());
        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Scroll(1, ScrollBehavior::Smooth),
                Call::Replace("/about".to_string()),
            ]
        );

        // Trailing wheel call lands at 100ms, inside the cooldown.
        fixture.scheduler.advance(ms(50));
        fixture.site.on_wheel(120.0);
        fixture.scheduler.advance(ms(50));
        assert_eq!(fixture.site.current_index(), Some(1));
        assert!(fixture.host.take().is_empty());

        fixture.scheduler.advance(ms(299));
        assert!(fixture.site.is_locked());
        fixture.scheduler.advance(ms(1));
        assert!(!fixture.site.is_locked());

        fixture.site.on_wheel(120.0);
        assert_eq!(fixture.site.current_index(), Some(2));
        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Scroll(2, ScrollBehavior::Smooth),
                Call::Replace("/work".to_string()),
            ]
        );
    }

    #[test]
    fn test_wheel_past_last_section() {
        let fixture = started("/contact");
        fixture.site.on_wheel(40.0);
        assert_eq!(fixture.site.current_index(), Some(3));
        assert!(!fixture.site.is_locked());
        assert!(fixture.host.take().is_empty());
        assert_eq!(fixture.scheduler.pending(), 0);
    }

    #[test]
    fn test_keyboard() {
        let fixture = started("/about");

        assert!(fixture.site.on_key("End"));
        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Scroll(3, ScrollBehavior::Smooth),
                Call::Replace("/contact".to_string()),
            ]
        );

        assert!(fixture.site.on_key("ArrowDown"));
        assert!(fixture.host.take().is_empty());

        assert!(!fixture.site.on_key("a"));
        assert!(fixture.site.on_key("Home"));
        assert_eq!(fixture.site.current_index(), Some(0));
    }

    #[test]
    fn test_newer_lock_outlives_older_cooldown() {
        let fixture = started("/home");

        fixture.site.on_wheel(1.0);
        fixture.scheduler.advance(ms(300));
        fixture.site.on_key("ArrowDown");
        assert_eq!(fixture.site.current_index(), Some(2));

        // The first lock would have expired at 400ms.
        fixture.scheduler.advance(ms(150));
        assert!(fixture.site.is_locked());
        fixture.scheduler.advance(ms(250));
        assert!(!fixture.site.is_locked());
        assert_eq!(fixture.scheduler.pending(), 0);
    }

    #[test]
    fn test_scroll_resync_and_back_to_top() {
        let fixture = started("/home");

        fixture.site.on_scroll(Viewport::new(1650.0, 800.0));
        assert_eq!(fixture.site.current_index(), Some(2));
        assert_eq!(
            fixture.host.take(),
            vec![Call::BackToTop(true), Call::Replace("/work".to_string())]
        );

        // Throttled: the trailing call carries the latest viewport.
        fixture.site.on_scroll(Viewport::new(900.0, 800.0));
        fixture.site.on_scroll(Viewport::new(100.0, 800.0));
        assert!(fixture.host.take().is_empty());
        fixture.scheduler.advance(ms(100));
        assert_eq!(fixture.site.current_index(), Some(0));
        assert_eq!(
            fixture.host.take(),
            vec![Call::BackToTop(false), Call::Replace("/home".to_string())]
        );
    }

    #[test]
    fn test_resize_is_debounced() {
        let fixture = started("/home");

        fixture.site.on_resize(Viewport::new(600.0, 600.0));
        fixture.scheduler.advance(ms(200));
        fixture.site.on_resize(Viewport::new(1200.0, 600.0));
        fixture.scheduler.advance(ms(249));
        assert_eq!(fixture.site.current_index(), Some(0));

        fixture.scheduler.advance(ms(1));
        assert_eq!(fixture.site.current_index(), Some(2));
        assert!(fixture.host.take().is_empty());
    }

    #[test]
    fn test_resize_realigns_during_cooldown() {
        let fixture = started("/home");
        fixture.site.on_key("End");
        fixture.host.take();

        fixture.site.on_resize(Viewport::new(600.0, 600.0));
        fixture.scheduler.advance(ms(250));
        assert!(fixture.site.is_locked());
        assert_eq!(fixture.site.current_index(), Some(1));
        assert!(fixture.host.take().is_empty());
    }

    #[test]
    fn test_scroll_during_cooldown_resyncs_on_release() {
        let fixture = started("/home");
        fixture.site.on_key("End");
        fixture.host.take();

        fixture.site.on_scroll(Viewport::new(800.0, 800.0));
        assert_eq!(fixture.site.current_index(), Some(3));
        assert!(fixture.host.take().is_empty());

        fixture.scheduler.advance(ms(400));
        assert!(!fixture.site.is_locked());
        assert_eq!(fixture.site.current_index(), Some(1));
        assert_eq!(
            fixture.host.take(),
            vec![Call::Replace("/about".to_string())]
        );
    }

    #[test]
    fn test_pop_state() {
        let fixture = started("/home");
        fixture.site.on_pop_state("https://example.com/contact");
        assert_eq!(
            fixture.host.take(),
            vec![Call::Scroll(3, ScrollBehavior::Smooth)]
        );

        fixture.site.on_pop_state("/missing");
        assert_eq!(fixture.site.current_index(), Some(3));
    }

    #[test]
    fn test_link_click_closes_menu() {
        let fixture = started("/home");

        assert!(fixture.site.toggle_menu());
        fixture.site.on_link_click("work");
        assert!(!fixture.site.is_menu_open());
        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Menu(true),
                Call::Scroll(2, ScrollBehavior::Smooth),
                Call::Push("/work".to_string()),
                Call::Menu(false),
            ]
        );

        fixture.site.on_link_click("blog");
        assert_eq!(fixture.site.current_index(), Some(2));
        assert!(fixture.host.take().is_empty());
    }

    #[test]
    fn test_back_to_top() {
        let fixture = started("/work");
        fixture.site.on_back_to_top();
        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Scroll(0, ScrollBehavior::Smooth),
                Call::Replace("/home".to_string()),
            ]
        );
    }

    #[test]
    fn test_outside_click_closes_menu_on_mobile() {
        let fixture = started("/home");
        fixture.site.toggle_menu();

        fixture.site.on_document_click(1280.0, false);
        assert!(fixture.site.is_menu_open());
        fixture.site.on_document_click(375.0, true);
        assert!(fixture.site.is_menu_open());
        fixture.site.on_document_click(375.0, false);
        assert!(!fixture.site.is_menu_open());

        assert_eq!(fixture.host.take(), vec![Call::Menu(true), Call::Menu(false)]);
    }

    #[test]
    fn test_theme_survives_reload() {
        let store = MemoryStore::new();
        let config = Config::default();

        let first = fixture_with(config.clone(), store.clone());
        first.site.start("/home").unwrap();
        assert_eq!(first.site.toggle_theme(), Theme::Dark);

        let second = fixture_with(config, store);
        second.site.start("/home").unwrap();
        assert_eq!(second.site.theme(), Theme::Dark);
        assert_eq!(second.host.take()[0], Call::Theme(Theme::Dark));
    }

    #[test]
    fn test_go_to() {
        let fixture = started("/home");
        let transition = fixture.site.go_to(3, GoTo::smooth_push()).unwrap();
        assert_eq!(transition.path, "/contact");
        assert_eq!(
            fixture.host.take(),
            vec![
                Call::Scroll(3, ScrollBehavior::Smooth),
                Call::Push("/contact".to_string()),
            ]
        );
        assert!(fixture.site.go_to(4, GoTo::smooth_push()).is_err());
    }

    #[test]
    fn test_dropping_site_cancels_timers() {
        let fixture = started("/home");
        fixture.site.on_wheel(1.0);
        fixture.site.on_wheel(1.0);
        assert_eq!(fixture.scheduler.pending(), 2);

        let Fixture {
            site, scheduler, ..
        } = fixture;
        drop(site);
        assert_eq!(scheduler.pending(), 0);
    }
}
