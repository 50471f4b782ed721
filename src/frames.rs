use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info};

use crate::error::{GameError, Result};

/// Multi-line sprite text. Spaces are transparent when drawn.
pub type Frame = Rc<str>;

pub const ROCKET_FRAMES: &str = "rocket";
pub const GARBAGE_FRAMES: &str = "garbage";
pub const EXPLOSION_FRAMES: &str = "explosion";
pub const GAME_OVER_FRAMES: &str = "game_over";

enum FrameSource {
    Directory(PathBuf),
    Memory(Vec<(String, String)>),
}

/// Named sprite frames, looked up by category.
///
/// An asset belongs to a category when its name starts with the category.
pub struct FrameStore {
    source: FrameSource,
}

impl FrameStore {
    /// Frames read from `*.txt` files in a directory.
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        FrameStore { source: FrameSource::Directory(path.into()) }
    }

    /// Frames held in memory as `(name, text)` pairs.
    pub fn from_entries<N, T>(entries: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        let entries = entries.into_iter().map(|(name, text)| (name.into(), text.into())).collect();
        FrameStore { source: FrameSource::Memory(entries) }
    }

    /// Frames of a category, sorted by asset name.
    pub fn load_frames(&self, category: &str) -> Result<Vec<Frame>> {
        let mut named = match &self.source {
            FrameSource::Directory(path) => read_dir_frames(path, category)?,
            FrameSource::Memory(entries) => entries
                .iter()
                .filter(|(name, _)| name.starts_with(category))
                .map(|(name, text)| (name.clone(), text.clone()))
                .collect(),
        };

        if named.is_empty() {
            return Err(GameError::NoFrames {
                category: category.to_string(),
                source_name: self.describe(),
            });
        }

        named.sort_by(|a, b| a.0.cmp(&b.0));
        info!("Loaded {} `{}` frame(s)", named.len(), category);
        Ok(named.into_iter().map(|(_, text)| Frame::from(text)).collect())
    }

    fn describe(&self) -> String {
        match &self.source {
            FrameSource::Directory(path) => path.display().to_string(),
            FrameSource::Memory(_) => "in-memory frames".to_string(),
        }
    }
}

fn read_dir_frames(path: &Path, category: &str) -> Result<Vec<(String, String)>> {
    let dir_error = |error| GameError::FramesDir { path: path.to_path_buf(), error };
    let mut frames = Vec::new();

    for entry in fs::read_dir(path).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.starts_with(category) || !file_name.ends_with(".txt") {
            continue;
        }
        debug!("Reading frame {}", file_name);
        let text = fs::read_to_string(entry.path())?;
        frames.push((file_name, text));
    }

    Ok(frames)
}

/// All frames a game needs, loaded up front so a missing asset aborts the
/// run before the first tick.
pub struct FrameSet {
    pub rocket: Vec<Frame>,
    pub garbage: Vec<Frame>,
    pub explosion: Vec<Frame>,
    pub game_over: Frame,
}

impl FrameSet {
    pub fn load(store: &FrameStore) -> Result<Self> {
        let rocket = store.load_frames(ROCKET_FRAMES)?;
        let garbage = store.load_frames(GARBAGE_FRAMES)?;
        let explosion = store.load_frames(EXPLOSION_FRAMES)?;
        let game_over = store.load_frames(GAME_OVER_FRAMES)?.remove(0);
        Ok(FrameSet { rocket, garbage, explosion, game_over })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_sorted_by_name() {
        let store = FrameStore::from_entries([
            ("rocket_frame_2", "B"),
            ("garbage_duck", "D"),
            ("rocket_frame_1", "A"),
        ]);
        let frames = store.load_frames("rocket").unwrap();
        let texts: Vec<&str> = frames.iter().map(|f| f.as_ref()).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn empty_category_is_fatal() {
        let store = FrameStore::from_entries([("rocket_frame_1", "A")]);
        let err = store.load_frames("garbage").unwrap_err();
        assert!(matches!(err, GameError::NoFrames { ref category, .. } if category == "garbage"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let store = FrameStore::from_dir("/definitely/not/a/frames/dir");
        assert!(matches!(store.load_frames("rocket"), Err(GameError::FramesDir { .. })));
    }

    #[test]
    fn frame_set_requires_every_category() {
        let store = FrameStore::from_entries([
            ("rocket_frame_1", "A"),
            ("garbage_lamp", "L"),
            ("explosion_1", "*"),
        ]);
        assert!(matches!(FrameSet::load(&store), Err(GameError::NoFrames { .. })));
    }

    #[test]
    fn bundled_frames_load() {
        let store = FrameStore::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/frames"));
        let frames = FrameSet::load(&store).unwrap();
        assert_eq!(frames.rocket.len(), 2);
        assert!(frames.garbage.len() >= 3);
        assert!(!frames.explosion.is_empty());
    }
}
