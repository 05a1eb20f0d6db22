use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::feed::FeedSession;
use crate::timer::Timer;

/// Prefetch starts when the visible card is the last one or this many
/// cards before it.
const PREFETCH_LOOKAHEAD: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub request_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Appended(usize),
    Exhausted,
    Stale,
}

/// Low-water-mark prefetch policy with a single in-flight request.
///
/// `in_flight` is read and written inside the same `&mut self` call, so a
/// re-entrant visibility event in the same tick always sees the current
/// value.
#[derive(Debug)]
pub struct Paginator {
    page_size: usize,
    in_flight: Option<u64>,
    next_request_id: u64,
    exhausted: bool,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            in_flight: None,
            next_request_id: 1,
            exhausted: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn on_visible(&mut self, session: &FeedSession, visible_id: u64) -> Option<PageRequest> {
        if self.in_flight.is_some() || self.exhausted {
            return None;
        }
        if !session.has_content() {
            self.exhausted = true;
            return None;
        }
        let last_id = session.last_id()?;
        let near_end =
            (0..=PREFETCH_LOOKAHEAD).any(|back| last_id.checked_sub(back) == Some(visible_id));
        if !near_end {
            return None;
        }
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(request_id);
        tracing::debug!(request_id, visible_id, last_id, "page requested");
        Some(PageRequest { request_id })
    }

    pub fn complete(&mut self, session: &mut FeedSession, request_id: u64) -> Completion {
        if self.in_flight != Some(request_id) {
            tracing::debug!(request_id, "ignoring stale page delivery");
            return Completion::Stale;
        }
        self.in_flight = None;
        let added = session.extend(self.page_size);
        if added == 0 {
            self.exhausted = true;
            tracing::info!("feed has no more content");
            return Completion::Exhausted;
        }
        tracing::debug!(request_id, added, "page appended");
        Completion::Appended(added)
    }

    /// Drops the in-flight request, returning its id.
    pub fn cancel(&mut self) -> Option<u64> {
        self.in_flight.take()
    }
}

#[derive(Debug)]
struct PageReady {
    request_id: u64,
}

/// Drives a [`FeedSession`] from visibility events, simulating network
/// latency for every page after the first.
#[derive(Debug)]
pub struct FeedController {
    session: FeedSession,
    paginator: Paginator,
    latency: Duration,
    timer: Option<Timer>,
    ready_tx: Sender<PageReady>,
    ready_rx: Receiver<PageReady>,
}

impl FeedController {
    pub fn new(mut session: FeedSession, page_size: usize, latency: Duration) -> Self {
        let mut paginator = Paginator::new(page_size);
        if session.extend(paginator.page_size()) == 0 {
            paginator.exhausted = true;
        }
        let (ready_tx, ready_rx) = unbounded();
        Self {
            session,
            paginator,
            latency,
            timer: None,
            ready_tx,
            ready_rx,
        }
    }

    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.paginator.is_loading()
    }

    pub fn is_exhausted(&self) -> bool {
        self.paginator.is_exhausted()
    }

    /// Returns true when a page request was started.
    pub fn on_visible(&mut self, visible_id: u64) -> bool {
        let Some(request) = self.paginator.on_visible(&self.session, visible_id) else {
            return false;
        };
        self.timer = Some(Timer::schedule(
            self.latency,
            self.ready_tx.clone(),
            PageReady {
                request_id: request.request_id,
            },
        ));
        true
    }

    /// Applies any pages whose latency has elapsed. Returns the number of
    /// entries appended.
    pub fn poll(&mut self) -> usize {
        let mut appended = 0;
        while let Ok(ready) = self.ready_rx.try_recv() {
            match self.paginator.complete(&mut self.session, ready.request_id) {
                Completion::Appended(added) => {
                    appended += added;
                    self.timer = None;
                }
                Completion::Exhausted => self.timer = None,
                Completion::Stale => {}
            }
        }
        appended
    }

    /// Cancels the in-flight page so no delivery lands after the view is
    /// gone.
    pub fn teardown(&mut self) {
        if let Some(request_id) = self.paginator.cancel() {
            tracing::debug!(request_id, "cancelled in-flight page");
        }
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceRef;
    use crate::playlist::Playlist;

    fn session(items: &[&str]) -> FeedSession {
        let mut session = FeedSession::from_playlist(Playlist::from_sources(
            items.iter().map(|s| SourceRef::from(*s)).collect(),
        ));
        session.extend(3);
        session
    }

    #[test]
    fn triggers_only_near_the_end() {
        let feed = session(&["a", "b", "c"]);
        let mut paginator = Paginator::new(3);
        assert_eq!(paginator.on_visible(&feed, 1), None);
        assert_eq!(
            paginator.on_visible(&feed, 2),
            Some(PageRequest { request_id: 1 })
        );
        assert!(paginator.is_loading());
        assert_eq!(paginator.on_visible(&feed, 3), None);
    }

    #[test]
    fn last_entry_triggers_when_idle() {
        let feed = session(&["a", "b", "c"]);
        let mut paginator = Paginator::new(3);
        assert!(paginator.on_visible(&feed, 3).is_some());
    }

    #[test]
    fn completion_appends_next_page_and_rearms() {
        let mut feed = session(&["a", "b", "c"]);
        let mut paginator = Paginator::new(3);
        let request = paginator.on_visible(&feed, 3).unwrap();
        assert_eq!(
            paginator.complete(&mut feed, request.request_id),
            Completion::Appended(3)
        );
        assert!(!paginator.is_loading());
        assert_eq!(feed.last_id(), Some(6));
        assert_eq!(paginator.on_visible(&feed, 4), None);
        assert!(paginator.on_visible(&feed, 5).is_some());
    }

    #[test]
    fn stale_and_cancelled_completions_are_ignored() {
        let mut feed = session(&["a"]);
        let mut paginator = Paginator::new(3);
        let request = paginator.on_visible(&feed, 3).unwrap();
        assert_eq!(paginator.complete(&mut feed, 99), Completion::Stale);
        assert_eq!(paginator.cancel(), Some(request.request_id));
        assert_eq!(
            paginator.complete(&mut feed, request.request_id),
            Completion::Stale
        );
        assert_eq!(feed.last_id(), Some(3));
    }

    #[test]
    fn empty_feed_never_triggers() {
        let feed = FeedSession::from_playlist(Playlist::default());
        let mut paginator = Paginator::new(3);
        assert_eq!(paginator.on_visible(&feed, 0), None);
        assert!(paginator.is_exhausted());
    }

    #[test]
    fn controller_delivers_after_latency() {
        let feed = FeedSession::from_playlist(Playlist::from_sources(vec![
            SourceRef::from("a"),
            SourceRef::from("b"),
        ]));
        let mut controller = FeedController::new(feed, 3, Duration::from_millis(10));
        assert_eq!(controller.session().entries().len(), 3);
        assert!(controller.on_visible(2));
        assert!(controller.is_loading());
        assert!(!controller.on_visible(3));

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        let mut appended = 0;
        while appended == 0 && std::time::Instant::now() < deadline {
            appended = controller.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(appended, 3);
        assert!(!controller.is_loading());
        assert_eq!(controller.session().last_id(), Some(6));
    }

    #[test]
    fn teardown_cancels_in_flight_page() {
        let feed = FeedSession::from_static(vec![SourceRef::from("a")]);
        let mut controller = FeedController::new(feed, 3, Duration::from_millis(30));
        assert!(controller.on_visible(3));
        controller.teardown();
        assert!(!controller.is_loading());
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(controller.poll(), 0);
        assert_eq!(controller.session().last_id(), Some(3));
    }

    #[test]
    fn controller_with_empty_source_is_exhausted() {
        let controller = FeedController::new(
            FeedSession::from_playlist(Playlist::default()),
            3,
            Duration::from_millis(1),
        );
        assert!(controller.is_exhausted());
        assert!(controller.session().entries().is_empty());
    }
}
