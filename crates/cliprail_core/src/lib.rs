pub mod config;
pub mod editing;
pub mod error;
pub mod history;
pub mod placement;
pub mod project;
pub mod resize;
pub mod snapping;
pub mod split;
pub mod types;
pub mod units;
