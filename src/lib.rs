#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod idle;
pub mod logging;
pub mod navigation;
pub mod pagination;
pub mod picker;
pub mod playback;
pub mod playlist;
pub mod scroll;
pub mod timer;
pub mod ui;
pub mod viewer;
pub mod visibility;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
