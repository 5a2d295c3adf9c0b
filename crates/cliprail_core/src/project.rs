use crate::error::Result;
use crate::types::*;
use crate::units::{Scale, DEFAULT_PIXELS_PER_SECOND};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File extension used for saved projects.
pub const PROJECT_EXTENSION: &str = "cliprail";

impl Project {
    /// Create a new empty project with the given name and settings.
    pub fn new(name: impl Into<String>, settings: ProjectSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings,
            timeline: Timeline::new(),
        }
    }

    /// Conversion scale derived from the project's zoom and frame rate.
    pub fn scale(&self) -> Scale {
        self.settings.scale()
    }

    /// Save project to a file as pretty-printed JSON.
    /// Appends the `.cliprail` extension if not present.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), "project saved");
        Ok(path)
    }

    /// Load a project from a JSON file. The timeline is validated before it
    /// is handed back.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let project: Project = serde_json::from_str(&data)?;
        project.timeline.validate(&project.scale())?;
        tracing::info!(
            path = %path.as_ref().display(),
            clips = project.timeline.tracks().map(Track::len).sum::<usize>(),
            "project loaded"
        );
        Ok(project)
    }
}

impl ProjectSettings {
    pub fn scale(&self) -> Scale {
        Scale::new(self.pixels_per_second, self.fps)
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            video: Track::new(TrackKind::Video),
            text: Track::new(TrackKind::Text),
            sound: Track::new(TrackKind::Sound),
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

fn preset(width: u32, height: u32, fps: f64) -> ProjectSettings {
    ProjectSettings {
        width,
        height,
        fps,
        pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
    }
}

/// 1920x1080 30fps preset.
pub fn preset_1080p() -> ProjectSettings {
    preset(1920, 1080, 30.0)
}

/// 1080x1920 30fps (vertical/shorts) preset.
pub fn preset_shorts() -> ProjectSettings {
    preset(1080, 1920, 30.0)
}

/// 1280x720 30fps preset.
pub fn preset_720p() -> ProjectSettings {
    preset(1280, 720, 30.0)
}

/// 3840x2160 30fps (4K) preset.
pub fn preset_4k() -> ProjectSettings {
    preset(3840, 2160, 30.0)
}

/// Look up a preset by its command-line name.
pub fn preset_by_name(name: &str) -> Option<ProjectSettings> {
    match name {
        "1080p" => Some(preset_1080p()),
        "720p" => Some(preset_720p()),
        "shorts" => Some(preset_shorts()),
        "4k" => Some(preset_4k()),
        _ => None,
    }
}

fn ensure_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        p.set_file_name(name);
        p
    }
}
