use std::ops::Deref;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, SourceRef};

/// Shuffled source list for one session, read as a circular buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Playlist {
    sources: Arc<[SourceRef]>,
}

impl Playlist {
    pub fn from_sources(sources: Vec<SourceRef>) -> Self {
        Self {
            sources: sources.into(),
        }
    }

    pub fn sources(&self) -> &[SourceRef] {
        &self.sources
    }
}

impl Deref for Playlist {
    type Target = [SourceRef];

    fn deref(&self) -> &Self::Target {
        &self.sources
    }
}

/// Concatenates the lists of every selected category found in the catalog,
/// in selection order, then shuffles the result. Unknown names contribute
/// nothing; duplicates are kept.
pub fn build_playlist<S, R>(catalog: &Catalog, selected: &[S], rng: &mut R) -> Playlist
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut all: Vec<SourceRef> = Vec::new();
    for name in selected {
        match catalog.get(name.as_ref()) {
            Some(videos) => all.extend_from_slice(videos),
            None => tracing::debug!(category = name.as_ref(), "ignoring unknown category"),
        }
    }

    // Fisher-Yates: walks from the last index down, swapping with a uniform
    // pick from [0, i].
    all.shuffle(rng);

    tracing::info!(
        categories = selected.len(),
        videos = all.len(),
        "built session playlist"
    );
    Playlist::from_sources(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> Catalog {
        Catalog::from_yaml_str(
            "categories:\n  - name: Nature\n    videos: [a.mp4, b.mp4]\n  - name: Sport\n    videos: [c.mp4]\n",
        )
        .unwrap()
    }

    fn sorted(playlist: &Playlist) -> Vec<String> {
        let mut items: Vec<String> = playlist.iter().map(|s| s.to_string()).collect();
        items.sort();
        items
    }

    #[test]
    fn combines_selected_categories() {
        let mut rng = StdRng::seed_from_u64(7);
        let playlist = build_playlist(&catalog(), &["Nature", "Sport"], &mut rng);
        assert_eq!(playlist.len(), 3);
        assert_eq!(sorted(&playlist), vec!["a.mp4", "b.mp4", "c.mp4"]);
    }

    #[test]
    fn shuffle_preserves_membership_for_many_seeds() {
        let catalog = catalog();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let playlist = build_playlist(&catalog, &["Sport", "Nature"], &mut rng);
            assert_eq!(sorted(&playlist), vec!["a.mp4", "b.mp4", "c.mp4"]);
        }
    }

    #[test]
    fn keeps_duplicates_across_selections() {
        let mut rng = StdRng::seed_from_u64(1);
        let playlist = build_playlist(&catalog(), &["Sport", "Sport", "Nature"], &mut rng);
        assert_eq!(sorted(&playlist), vec!["a.mp4", "b.mp4", "c.mp4", "c.mp4"]);
    }

    #[test]
    fn unknown_or_empty_selection_yields_empty_playlist() {
        let mut rng = StdRng::seed_from_u64(3);
        let none: [&str; 0] = [];
        assert!(build_playlist(&catalog(), &none, &mut rng).is_empty());
        assert!(build_playlist(&catalog(), &["Music"], &mut rng).is_empty());
    }

    #[test]
    fn shuffle_eventually_reorders() {
        let catalog = catalog();
        let orders: std::collections::HashSet<Vec<String>> = (0..64)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                build_playlist(&catalog, &["Nature", "Sport"], &mut rng)
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }
}
