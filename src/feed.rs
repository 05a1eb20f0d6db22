use std::sync::Arc;

use crate::catalog::SourceRef;
use crate::playlist::Playlist;

/// One card in the feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoEntry {
    pub id: u64,
    pub source: SourceRef,
    pub caption: String,
    pub viewed: bool,
}

pub fn caption_for(id: u64) -> String {
    format!("Reel #{id}")
}

/// Where the ids of a page start, and therefore where in the source list the
/// page begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdOrigin {
    /// Ids follow on from `emitted` items already produced: `emitted + i + 1`,
    /// drawing `source[(emitted + i) % len]`.
    FromCount(u64),
    /// Ids start at a caller-supplied value: `start + i`, drawing
    /// `source[id % len]`.
    StartAt(u64),
}

impl IdOrigin {
    fn id_at(self, offset: u64) -> u64 {
        match self {
            IdOrigin::FromCount(emitted) => emitted + offset + 1,
            IdOrigin::StartAt(start) => start + offset,
        }
    }

    fn cursor_at(self, offset: u64) -> u64 {
        match self {
            IdOrigin::FromCount(emitted) => emitted + offset,
            IdOrigin::StartAt(start) => start + offset,
        }
    }
}

/// Builds the next `page_size` entries, cycling through `source`. An empty
/// source produces an empty page.
pub fn next_page(source: &[SourceRef], page_size: usize, origin: IdOrigin) -> Vec<VideoEntry> {
    if source.is_empty() {
        return Vec::new();
    }
    let len = source.len() as u64;
    (0..page_size as u64)
        .map(|offset| {
            let id = origin.id_at(offset);
            let index = (origin.cursor_at(offset) % len) as usize;
            VideoEntry {
                id,
                source: source[index].clone(),
                caption: caption_for(id),
                viewed: false,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedMode {
    /// Shuffled playlist from the selected categories; ids derive from the
    /// emitted count.
    Playlist,
    /// Every catalog video in declaration order; each page starts at the id
    /// after the last one shown.
    Static,
}

/// Owns the source list and the running counters of one feed session.
#[derive(Clone, Debug)]
pub struct FeedSession {
    mode: FeedMode,
    source: Arc<[SourceRef]>,
    entries: Vec<VideoEntry>,
    emitted: u64,
}

impl FeedSession {
    pub fn from_playlist(playlist: Playlist) -> Self {
        Self::new(FeedMode::Playlist, playlist.sources().to_vec())
    }

    pub fn from_static(sources: Vec<SourceRef>) -> Self {
        Self::new(FeedMode::Static, sources)
    }

    fn new(mode: FeedMode, sources: Vec<SourceRef>) -> Self {
        Self {
            mode,
            source: sources.into(),
            entries: Vec::new(),
            emitted: 0,
        }
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn source(&self) -> &[SourceRef] {
        &self.source
    }

    pub fn has_content(&self) -> bool {
        !self.source.is_empty()
    }

    pub fn entries(&self) -> &[VideoEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn emitted_count(&self) -> u64 {
        self.emitted
    }

    pub fn last_id(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.id)
    }

    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn origin(&self) -> IdOrigin {
        match self.mode {
            FeedMode::Playlist => IdOrigin::FromCount(self.emitted),
            FeedMode::Static => IdOrigin::StartAt(self.last_id().map_or(1, |id| id + 1)),
        }
    }

    /// Generates and appends the next page, returning how many entries
    /// were added.
    pub fn extend(&mut self, page_size: usize) -> usize {
        let page = next_page(&self.source, page_size, self.origin());
        let added = page.len();
        self.emitted += added as u64;
        self.entries.extend(page);
        added
    }
}
