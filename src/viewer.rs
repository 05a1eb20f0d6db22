use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::feed::{FeedSession, VideoEntry};
use crate::idle::IdleRedirect;
use crate::navigation::{self, Direction};
use crate::pagination::FeedController;
use crate::playback::{self, ExternalPlayer, PlaybackSurface, SilentPlayer};
use crate::playlist;
use crate::scroll::{CardRect, ScrollState};
use crate::visibility::{ViewportObserver, VisibilityObserver};

/// Opens a session for the chosen categories. No selection means the
/// static catalog feed.
pub fn open_session(catalog: &Catalog, selected: &[String]) -> FeedSession {
    if selected.is_empty() {
        tracing::info!("starting static catalog feed");
        return FeedSession::from_static(catalog.all_sources());
    }
    let playlist = playlist::build_playlist(catalog, selected, &mut rand::thread_rng());
    FeedSession::from_playlist(playlist)
}

pub fn player_from_config(cfg: &Config) -> Box<dyn PlaybackSurface> {
    if !cfg.player.autoplay {
        return Box::new(SilentPlayer::default());
    }
    match ExternalPlayer::new(cfg.player.video_command.clone()) {
        Ok(player) => Box::new(player),
        Err(err) => {
            tracing::warn!("autoplay disabled: {err:#}");
            Box::new(SilentPlayer::default())
        }
    }
}

/// Everything behind the feed screen: pagination, scroll position,
/// visibility tracking, playback and the session timer.
pub struct FeedView<O: VisibilityObserver = ViewportObserver> {
    controller: FeedController,
    scroll: ScrollState,
    observer: O,
    player: Box<dyn PlaybackSurface>,
    idle: IdleRedirect,
    idle_rx: Receiver<()>,
    snap_tolerance: i32,
    viewport_height: u16,
    observed: usize,
    visible_id: Option<u64>,
    notice: Option<String>,
}

impl FeedView<ViewportObserver> {
    pub fn from_config(cfg: &Config, session: FeedSession) -> Self {
        Self::new(
            cfg,
            session,
            ViewportObserver::new(cfg.feed.visibility_threshold),
            player_from_config(cfg),
        )
    }
}

impl<O: VisibilityObserver> FeedView<O> {
    pub fn new(
        cfg: &Config,
        session: FeedSession,
        observer: O,
        player: Box<dyn PlaybackSurface>,
    ) -> Self {
        let controller = FeedController::new(session, cfg.feed.page_size, cfg.feed.latency);
        let (idle_tx, idle_rx) = unbounded();
        let idle = IdleRedirect::start(&cfg.session, idle_tx, ());
        let mut view = Self {
            controller,
            scroll: ScrollState::new(1),
            observer,
            player,
            idle,
            idle_rx,
            snap_tolerance: cfg.feed.snap_tolerance_rows.max(0),
            viewport_height: 1,
            observed: 0,
            visible_id: None,
            notice: None,
        };
        view.observe_new_entries();
        view
    }

    pub fn entries(&self) -> &[VideoEntry] {
        self.controller.session().entries()
    }

    pub fn session(&self) -> &FeedSession {
        self.controller.session()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    pub fn is_exhausted(&self) -> bool {
        self.controller.is_exhausted()
    }

    pub fn visible_id(&self) -> Option<u64> {
        self.visible_id
    }

    pub fn now_playing(&self) -> Option<u64> {
        self.player.now_playing()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn card_rects(&self) -> Vec<CardRect> {
        self.scroll.rects(self.entries().iter().map(|entry| entry.id))
    }

    /// Returns true when the resize changed which card is visible.
    pub fn set_viewport_height(&mut self, height: u16) -> bool {
        let height = height.max(1);
        if height == self.viewport_height {
            return false;
        }
        self.viewport_height = height;
        self.scroll.set_card_height(height);
        self.process_visibility()
    }

    /// Smoothly scrolls to the next or previous card. Returns false when
    /// there was nowhere to go.
    pub fn navigate(&mut self, direction: Direction, now: Instant) -> bool {
        let cards = self.card_rects();
        let Some(target) = navigation::target_index(&cards, self.snap_tolerance, direction) else {
            return false;
        };
        self.scroll.scroll_to(target, now);
        true
    }

    pub fn scroll_by(&mut self, delta: i32, now: Instant) {
        self.scroll.scroll_by(delta, now);
        self.process_visibility();
    }

    /// Advances animations and timers. Returns true when anything visible
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.scroll.tick(now);
        if self.controller.poll() > 0 {
            self.observe_new_entries();
            changed = true;
        }
        if self.idle_rx.try_recv().is_ok() {
            self.notice = Some(self.idle.expire());
            changed = true;
        }
        if self.process_visibility() {
            changed = true;
        }
        changed
    }

    fn observe_new_entries(&mut self) {
        let ids: Vec<u64> = self.entries()[self.observed..]
            .iter()
            .map(|entry| entry.id)
            .collect();
        for id in ids {
            self.observer.observe(id);
        }
        self.observed = self.entries().len();
        self.scroll.set_card_count(self.observed);
    }

    /// Feeds the current geometry to the observer and reacts to whatever
    /// it reports.
    pub fn process_visibility(&mut self) -> bool {
        let rects = self.card_rects();
        self.observer.layout_changed(&rects, self.viewport_height);
        let events = self.observer.drain();
        let changed = !events.is_empty();
        for event in events {
            if event.visible {
                self.on_card_visible(event.id);
            } else {
                self.on_card_hidden(event.id);
            }
        }
        changed
    }

    fn on_card_visible(&mut self, id: u64) {
        self.visible_id = Some(id);
        if self.controller.on_visible(id) {
            tracing::debug!(id, "prefetching next page");
        }
        let session = self.controller.session();
        if let Some(entry) = session.position_of(id).map(|idx| &session.entries()[idx]) {
            playback::play_or_log(self.player.as_mut(), entry);
        }
    }

    fn on_card_hidden(&mut self, id: u64) {
        if self.player.now_playing() == Some(id) {
            self.player.pause();
        }
        if self.visible_id == Some(id) {
            self.visible_id = None;
        }
    }

    /// Pauses the current card, or resumes the visible one.
    pub fn toggle_playback(&mut self) {
        if self.player.now_playing().is_some() {
            self.player.pause();
            return;
        }
        let Some(id) = self.visible_id else {
            return;
        };
        let session = self.controller.session();
        if let Some(entry) = session.position_of(id).map(|idx| &session.entries()[idx]) {
            playback::play_or_log(self.player.as_mut(), entry);
        }
    }

    /// Stops loading, timers, playback and observation. Safe to call twice.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.idle.cancel();
        self.player.pause();
        let ids: Vec<u64> = self.entries().iter().map(|entry| entry.id).collect();
        for id in ids {
            self.observer.unobserve(id);
        }
        self.visible_id = None;
    }
}

impl<O: VisibilityObserver> Drop for FeedView<O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::SourceRef;
    use crate::playlist::Playlist;
    use crate::visibility::ScriptedObserver;

    fn config() -> Config {
        let mut cfg = Config::default();
        cfg.feed.latency = Duration::from_millis(5);
        cfg.session.idle_timeout = Duration::from_secs(3600);
        cfg
    }

    fn scripted(items: &[&str]) -> FeedView<ScriptedObserver> {
        let session = FeedSession::from_playlist(Playlist::from_sources(
            items.iter().map(|s| SourceRef::from(*s)).collect(),
        ));
        FeedView::new(
            &config(),
            session,
            ScriptedObserver::default(),
            Box::new(SilentPlayer::default()),
        )
    }

    fn wait_for_page(view: &mut FeedView<ScriptedObserver>) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while view.is_loading() && Instant::now() < deadline {
            view.tick(Instant::now());
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn visible_card_plays_and_prefetch_fires_once() {
        let mut view = scripted(&["a", "b", "c"]);
        assert_eq!(view.entries().len(), 3);

        view.observer_mut().push(1, true);
        view.process_visibility();
        assert_eq!(view.now_playing(), Some(1));
        assert!(!view.is_loading());

        view.observer_mut().push(1, false);
        view.observer_mut().push(2, true);
        view.process_visibility();
        assert_eq!(view.visible_id(), Some(2));
        assert_eq!(view.now_playing(), Some(2));
        assert!(view.is_loading());

        view.observer_mut().push(2, false);
        view.observer_mut().push(3, true);
        view.process_visibility();
        assert!(view.is_loading());

        wait_for_page(&mut view);
        let ids: Vec<u64> = view.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn new_entries_are_observed_after_arrival() {
        let mut view = scripted(&["a"]);
        view.observer_mut().push(3, true);
        view.process_visibility();
        wait_for_page(&mut view);
        view.observer_mut().push(5, true);
        view.process_visibility();
        assert_eq!(view.visible_id(), Some(5));
        assert!(view.is_loading());
    }

    #[test]
    fn teardown_stops_observing_cards() {
        let mut view = scripted(&["a", "b", "c"]);
        view.observer_mut().push(2, true);
        view.process_visibility();
        assert_eq!(view.now_playing(), Some(2));

        view.teardown();
        assert_eq!(view.now_playing(), None);
        assert_eq!(view.visible_id(), None);
        assert!(!view.is_loading());

        view.observer_mut().push(1, true);
        assert!(!view.process_visibility());
        assert_eq!(view.now_playing(), None);
    }

    #[test]
    fn navigation_moves_between_cards_with_geometry() {
        let session = FeedSession::from_static(vec![SourceRef::from("a"), SourceRef::from("b")]);
        let mut view = FeedView::new(
            &config(),
            session,
            ViewportObserver::new(0.9),
            Box::new(SilentPlayer::default()),
        );
        view.set_viewport_height(20);
        assert_eq!(view.visible_id(), Some(1));

        let start = Instant::now();
        assert!(!view.navigate(Direction::Up, start));
        assert!(view.navigate(Direction::Down, start));
        view.tick(start + Duration::from_millis(500));
        assert_eq!(view.scroll_state().offset(), 20);
        assert_eq!(view.visible_id(), Some(2));
        assert_eq!(view.now_playing(), Some(2));
        assert!(view.is_loading());
    }

    #[test]
    fn empty_selection_opens_static_feed() {
        let catalog = Catalog::from_yaml_str(
            "categories:\n  - name: A\n    videos: [a.mp4, b.mp4]\n",
        )
        .unwrap();
        let session = open_session(&catalog, &[]);
        assert_eq!(session.mode(), crate::feed::FeedMode::Static);
        let session = open_session(&catalog, &["A".to_string()]);
        assert_eq!(session.mode(), crate::feed::FeedMode::Playlist);
        assert_eq!(session.source().len(), 2);
    }

    #[test]
    fn unknown_categories_leave_an_exhausted_feed() {
        let catalog = Catalog::builtin();
        let session = open_session(catalog, &["Nope".to_string()]);
        let view = FeedView::new(
            &config(),
            session,
            ScriptedObserver::default(),
            Box::new(SilentPlayer::default()),
        );
        assert!(view.entries().is_empty());
        assert!(view.is_exhausted());
    }
}
