pub mod carousel;
pub mod client;
pub mod color_utils;
pub mod config;
pub mod frame;
pub mod haptics;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod navigation;
pub mod source;
pub mod storage;
pub mod week;

#[cfg(feature = "tui")]
pub mod tui;
