//! Section navigator
//!
//! Owns the current index and the scroll lock. Every adapter goes through
//! [`Navigator::handle_input_event`], so bounds checks and lock discipline
//! are the same for wheel, scroll, resize, keyboard, history and link input.
//! The navigator never touches the page; it returns a [`Transition`] for the
//! host to apply.

use crate::config::NavigatorConfig;
use crate::effect::{GoTo, HistoryUpdate, LockTicket, ScrollBehavior, Transition};
use crate::error::NavigationError;
use crate::index::{index_for_offset, IndexState};
use crate::input::{InputEvent, NavKey, Viewport};
use crate::section::{location_path, Section, Sections};
use crate::state::GestureState;
use crate::Result;

pub struct Navigator {
    config: NavigatorConfig,
    sections: Sections,
    index: IndexState,
    gesture: GestureState,
    /// Bumped on every lock engagement; stale cooldown timers carry an
    /// older value
    lock_generation: u64,
    /// Latest scroll position seen while the lock was held, replayed when
    /// the lock releases
    deferred_scroll: Option<Viewport>,
    /// Path the browser currently shows, as far as the navigator knows
    current_path: Option<String>,
    back_to_top_visible: bool,
}

impl Navigator {
    pub fn new(sections: Sections, config: NavigatorConfig) -> Self {
        let sections = sections.with_default_slug(config.default_slug.clone());

        Self {
            index: IndexState::new(sections.len()),
            config,
            sections,
            gesture: GestureState::Idle,
            lock_generation: 0,
            deferred_scroll: None,
            current_path: None,
            back_to_top_visible: false,
        }
    }

    /// Resolve the location the page loaded at.
    ///
    /// A matching section is committed with an instant scroll. An unknown
    /// location leaves the index at its previous value, or the first
    /// section, without navigating.
    pub fn initialize(&mut self, location: &str) -> Option<Transition> {
        self.current_path = Some(location_path(location));

        match self.sections.resolve(location) {
            Some(index) => {
                tracing::info!(index, location = %location, "Navigator initialized");
                self.commit(index, GoTo::instant_replace(), false)
            }
            None => {
                let fallback = self.index.get().unwrap_or(0);
                if let Err(e) = self.index.set(fallback) {
                    tracing::error!("Failed to set fallback section: {}", e);
                }
                tracing::warn!(location = %location, "No section matches the initial location");
                None
            }
        }
    }

    /// The single transition function. Returns the committed transition, or
    /// `None` when the event changes nothing.
    pub fn handle_input_event(&mut self, event: InputEvent) -> Option<Transition> {
        if let InputEvent::CooldownElapsed { generation } = event {
            return self.release_lock(generation);
        }

        let Some(current) = self.index.get() else {
            tracing::debug!(kind = event.kind(), "Ignoring input before initialization");
            return None;
        };

        match event {
            InputEvent::Wheel { delta_y } => self.on_wheel(current, delta_y),
            InputEvent::Scroll(viewport) => self.on_scroll(current, viewport),
            InputEvent::Resize(viewport) => self.on_resize(current, viewport),
            InputEvent::Key { key } => self.on_key(current, key),
            InputEvent::PopState { location } => self.on_pop_state(&location),
            InputEvent::LinkClick { slug } => self.on_link(&slug),
            InputEvent::BackToTop => {
                self.commit(0, GoTo::smooth_replace(), self.config.unified_lock)
            }
            InputEvent::CooldownElapsed { .. } => None,
        }
    }

    /// Jump to a section programmatically.
    pub fn go_to(&mut self, index: usize, options: GoTo) -> Result<Transition> {
        let lock =
            self.config.unified_lock && options.scroll == Some(ScrollBehavior::Smooth);
        self.try_commit(index, options, lock)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index.get()
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.index.get().and_then(|i| self.sections.get(i))
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture
    }

    pub fn is_locked(&self) -> bool {
        self.gesture.is_locked()
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top_visible
    }

    fn on_wheel(&mut self, current: usize, delta_y: f64) -> Option<Transition> {
        if self.gesture.is_locked() {
            tracing::trace!("Wheel ignored, scroll lock held");
            return None;
        }

        let step: isize = if delta_y > 0.0 {
            1
        } else if delta_y < 0.0 {
            -1
        } else {
            return None;
        };

        let candidate = current.checked_add_signed(step)?;
        if candidate > self.sections.last_index() {
            return None;
        }

        self.commit(candidate, GoTo::smooth_replace(), true)
    }

    fn on_scroll(&mut self, current: usize, viewport: Viewport) -> Option<Transition> {
        if self.config.enable_back_to_top {
            self.back_to_top_visible = viewport.past_first_screen();
        }

        if self.config.unified_lock && self.gesture.is_locked() {
            self.deferred_scroll = Some(viewport);
            return None;
        }

        let nearest = index_for_offset(viewport.scroll_y, viewport.height, self.sections.len())?;
        if nearest == current {
            return None;
        }

        let history = if self.config.update_url_on_scroll {
            HistoryUpdate::Replace
        } else {
            HistoryUpdate::Skip
        };
        self.commit(
            nearest,
            GoTo {
                scroll: None,
                history,
            },
            false,
        )
    }

    /// Realigns even while the lock is held; the layout changed under the
    /// animation, so its target offset is already wrong.
    fn on_resize(&mut self, current: usize, viewport: Viewport) -> Option<Transition> {
        let nearest = index_for_offset(viewport.scroll_y, viewport.height, self.sections.len())?;
        if nearest == current {
            return None;
        }

        self.commit(nearest, GoTo::silent(), false)
    }

    fn on_key(&mut self, current: usize, key: NavKey) -> Option<Transition> {
        let last = self.sections.last_index();
        let target = match key {
            NavKey::Next => (current + 1).min(last),
            NavKey::Previous => current.saturating_sub(1),
            NavKey::First => 0,
            NavKey::Last => last,
        };

        if target == current && matches!(key, NavKey::Next | NavKey::Previous) {
            return None;
        }

        self.commit(target, GoTo::smooth_replace(), self.config.unified_lock)
    }

    fn on_pop_state(&mut self, location: &str) -> Option<Transition> {
        let Some(index) = self.sections.resolve(location) else {
            tracing::warn!(location = %location, "History entry matches no section");
            return None;
        };

        // The browser already shows the popped entry.
        self.current_path = Some(location_path(location));
        self.commit(index, GoTo::smooth_replace(), self.config.unified_lock)
    }

    fn on_link(&mut self, slug: &str) -> Option<Transition> {
        let Some(index) = self.sections.position(slug) else {
            tracing::warn!(slug = %slug, "Link targets an unknown section");
            return None;
        };

        self.commit(index, GoTo::smooth_push(), self.config.unified_lock)
    }

    fn commit(&mut self, index: usize, options: GoTo, engage_lock: bool) -> Option<Transition> {
        match self.try_commit(index, options, engage_lock) {
            Ok(transition) => Some(transition),
            Err(e) => {
                tracing::debug!("Commit rejected: {}", e);
                None
            }
        }
    }

    fn try_commit(&mut self, index: usize, options: GoTo, engage_lock: bool) -> Result<Transition> {
        let (slug, path) = match self.sections.get(index) {
            Some(section) => (section.slug.clone(), section.path()),
            None => {
                return Err(NavigationError::OutOfBounds {
                    index,
                    len: self.sections.len(),
                })
            }
        };

        self.index.set(index)?;

        let history = match options.history {
            HistoryUpdate::Skip => HistoryUpdate::Skip,
            _ if self.current_path.as_deref() == Some(path.as_str()) => HistoryUpdate::Skip,
            mode => {
                self.current_path = Some(path.clone());
                mode
            }
        };

        let lock = if engage_lock {
            Some(self.engage_lock())
        } else {
            None
        };

        tracing::debug!(
            index,
            slug = %slug,
            history = ?history,
            locked = lock.is_some(),
            "Section committed"
        );

        Ok(Transition {
            index,
            slug,
            path,
            scroll: options.scroll,
            history,
            lock,
        })
    }

    fn engage_lock(&mut self) -> LockTicket {
        self.gesture = GestureState::Transitioning;
        self.lock_generation += 1;
        self.deferred_scroll = None;

        LockTicket {
            generation: self.lock_generation,
            duration: self.config.cooldown(),
        }
    }

    /// Release the lock and re-sync to the last scroll position it held back.
    fn release_lock(&mut self, generation: u64) -> Option<Transition> {
        if generation != self.lock_generation
            || !self.gesture.can_transition_to(GestureState::Idle)
        {
            tracing::trace!(generation, "Stale cooldown ignored");
            return None;
        }
        self.gesture = GestureState::Idle;

        let viewport = self.deferred_scroll.take()?;
        let current = self.index.get()?;
        tracing::trace!(scroll_y = viewport.scroll_y, "Replaying scroll held by the lock");
        self.on_scroll(current, viewport)
    }
}
