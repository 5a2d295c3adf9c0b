pub mod composition;
pub mod playhead;

pub use composition::{ActiveLayer, CompositionManifest, LayerEntry, LayerSource};
pub use playhead::Playhead;
