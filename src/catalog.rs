use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

const SAMPLE_BUCKET: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog")]
    Parse(#[from] serde_yaml::Error),
    #[error("catalog category at position {0} has an empty name")]
    EmptyName(usize),
    #[error("catalog category {0:?} is declared more than once")]
    DuplicateCategory(String),
}

/// Locator for a playable video. Either a URL or a filesystem path; the
/// feed never validates it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_remote(&self) -> bool {
        Url::parse(&self.0)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    /// Short label for status lines: the last path segment.
    pub fn file_name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub videos: Vec<SourceRef>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Read-only mapping from category name to its ordered video list.
/// Categories keep their declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let sample = |file: &str| SourceRef::new(format!("{SAMPLE_BUCKET}/{file}"));
    Catalog {
        categories: vec![
            Category {
                name: "Nature".into(),
                videos: vec![
                    sample("ForBiggerBlazes.mp4"),
                    sample("ForBiggerEscapes.mp4"),
                    sample("ForBiggerJoyrides.mp4"),
                ],
            },
            Category {
                name: "Animation".into(),
                videos: vec![
                    sample("BigBuckBunny.mp4"),
                    sample("ElephantsDream.mp4"),
                    sample("Sintel.mp4"),
                    sample("TearsOfSteel.mp4"),
                ],
            },
            Category {
                name: "Cars".into(),
                videos: vec![
                    sample("SubaruOutbackOnStreetAndDirt.mp4"),
                    sample("VolkswagenGTIReview.mp4"),
                    sample("WeAreGoingOnBullrun.mp4"),
                    sample("WhatCarCanYouGetForAGrand.mp4"),
                ],
            },
            Category {
                name: "Fun".into(),
                videos: vec![sample("ForBiggerFun.mp4"), sample("ForBiggerMeltdowns.mp4")],
            },
        ],
    }
});

impl Catalog {
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Validates names and stores them trimmed, so lookups match what the
    /// user sees in the picker.
    pub fn new(mut categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (idx, category) in categories.iter_mut().enumerate() {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(CatalogError::EmptyName(idx));
            }
            if name.len() != category.name.len() {
                category.name = name.to_string();
            }
            if !seen.insert(category.name.clone()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
        }
        Ok(Self { categories })
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(data)?;
        Self::new(file.categories)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&data)
    }

    pub fn get(&self, name: &str) -> Option<&[SourceRef]> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.videos.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every source in declaration order, used by the static feed mode.
    pub fn all_sources(&self) -> Vec<SourceRef> {
        self.categories
            .iter()
            .flat_map(|category| category.videos.iter().cloned())
            .collect()
    }
}
