//! Animations and the named animation set

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::frame::Frame;

/// Playback rate used when none is given
pub const DEFAULT_FPS: u32 = 8;

/// Name of the animation a fresh set starts with
pub const DEFAULT_ANIMATION_NAME: &str = "idle";

static EMPTY_ANIMATION: Animation = Animation {
    fps: DEFAULT_FPS,
    frames: Vec::new(),
};

/// An ordered list of frames played back at a fixed rate
///
/// Frames are only reachable through the accessors below, so order only
/// changes through [`Animation::append_frame`], [`Animation::remove_frame`]
/// and [`Animation::swap_frames`], and every stored frame is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnimationRecord")]
pub struct Animation {
    /// Frames per second, always at least 1
    pub fps: u32,
    frames: Vec<Frame>,
}

/// Animation as stored in documents
///
/// Older documents stored an animation as a bare frame array.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnimationRecord {
    Legacy(Vec<Frame>),
    Full {
        #[serde(default = "default_fps_value")]
        fps: f64,
        #[serde(default)]
        frames: Vec<Frame>,
    },
}

fn default_fps_value() -> f64 {
    DEFAULT_FPS as f64
}

fn sanitize_fps(fps: f64) -> u32 {
    if fps.is_finite() && fps >= 1.0 {
        fps.round().min(u32::MAX as f64) as u32
    } else if fps.is_finite() {
        1
    } else {
        DEFAULT_FPS
    }
}

impl From<AnimationRecord> for Animation {
    fn from(record: AnimationRecord) -> Self {
        match record {
            AnimationRecord::Legacy(frames) => Animation {
                fps: DEFAULT_FPS,
                frames,
            },
            AnimationRecord::Full { fps, frames } => Animation {
                fps: sanitize_fps(fps),
                frames,
            },
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Animation {
    /// Create an empty animation; `fps` is clamped to at least 1
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            frames: Vec::new(),
        }
    }

    /// Builder-style frame list
    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames.into_iter().map(Frame::normalized).collect();
        self
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Duration of one frame in milliseconds
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.fps.max(1) as f64
    }

    /// Set the playback rate, clamped to at least 1
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Append a frame and return its index
    pub fn append_frame(&mut self, frame: Frame) -> usize {
        self.frames.push(frame.normalized());
        self.frames.len() - 1
    }

    /// Remove the frame at `index`, shifting later frames down
    pub fn remove_frame(&mut self, index: usize) -> Option<Frame> {
        if index < self.frames.len() {
            Some(self.frames.remove(index))
        } else {
            None
        }
    }

    /// Swap two frames; returns false if either index is out of range
    pub fn swap_frames(&mut self, a: usize, b: usize) -> bool {
        if a < self.frames.len() && b < self.frames.len() {
            self.frames.swap(a, b);
            true
        } else {
            false
        }
    }

    /// Overwrite the frame at `index` with a normalized copy of `frame`
    pub fn replace_frame(&mut self, index: usize, frame: Frame) -> bool {
        match self.frames.get_mut(index) {
            Some(slot) => {
                *slot = frame.normalized();
                true
            }
            None => false,
        }
    }

    /// Endless sequence of playback indices: `0, 1, .., len-1, 0, ..`
    ///
    /// Empty for an animation without frames.
    pub fn frame_cycle(&self) -> impl Iterator<Item = usize> {
        (0..self.frames.len()).cycle()
    }
}

/// Named animations plus the one currently being edited
///
/// The current name always resolves to an animation: accessors that would
/// otherwise miss create an empty animation with the set's default fps.
/// Serializes as a plain `{ name: animation }` map.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    animations: BTreeMap<String, Animation>,
    current: String,
    default_fps: u32,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSet {
    /// A set holding a single empty [`DEFAULT_ANIMATION_NAME`] animation
    pub fn new() -> Self {
        Self::with_default_fps(DEFAULT_FPS)
    }

    /// Like [`AnimationSet::new`] but new animations use `fps`
    pub fn with_default_fps(fps: u32) -> Self {
        let mut set = Self {
            animations: BTreeMap::new(),
            current: DEFAULT_ANIMATION_NAME.to_string(),
            default_fps: fps.max(1),
        };
        set.get_or_create(DEFAULT_ANIMATION_NAME);
        set
    }

    /// Build a set from loaded animations
    ///
    /// The current animation becomes [`DEFAULT_ANIMATION_NAME`] if present,
    /// else the first name in order, else a freshly created default.
    pub fn from_animations(animations: BTreeMap<String, Animation>) -> Self {
        let current = if animations.contains_key(DEFAULT_ANIMATION_NAME) {
            DEFAULT_ANIMATION_NAME.to_string()
        } else {
            animations
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| DEFAULT_ANIMATION_NAME.to_string())
        };
        let mut set = Self {
            animations,
            current,
            default_fps: DEFAULT_FPS,
        };
        let current = set.current.clone();
        set.get_or_create(&current);
        set
    }

    /// Fps given to animations created by this set
    pub fn default_fps(&self) -> u32 {
        self.default_fps
    }

    pub fn set_default_fps(&mut self, fps: u32) {
        self.default_fps = fps.max(1);
    }

    /// Get the named animation, creating an empty one if it does not exist
    pub fn get_or_create(&mut self, name: &str) -> &mut Animation {
        let fps = self.default_fps;
        self.animations
            .entry(name.to_string())
            .or_insert_with(|| Animation::new(fps))
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Animation> {
        self.animations.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Animation names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Animation)> {
        self.animations.iter().map(|(name, anim)| (name.as_str(), anim))
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    /// The current animation
    pub fn current(&self) -> &Animation {
        self.animations
            .get(&self.current)
            .unwrap_or(&EMPTY_ANIMATION)
    }

    /// The current animation, mutably (created on demand)
    pub fn current_mut(&mut self) -> &mut Animation {
        let name = self.current.clone();
        self.get_or_create(&name)
    }

    /// Make `name` the current animation, creating it if needed
    ///
    /// Returns true if the current animation changed.
    pub fn set_current(&mut self, name: &str) -> bool {
        self.get_or_create(name);
        if self.current == name {
            return false;
        }
        self.current = name.to_string();
        true
    }

    /// Add an empty animation; fails on blank or taken names
    pub fn create_animation(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.animations.contains_key(name) {
            return false;
        }
        self.get_or_create(name);
        true
    }

    /// Rename an animation, keeping it current if it was
    pub fn rename_animation(&mut self, old_name: &str, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == old_name || self.animations.contains_key(new_name) {
            return false;
        }
        let Some(animation) = self.animations.remove(old_name) else {
            return false;
        };
        self.animations.insert(new_name.to_string(), animation);
        if self.current == old_name {
            self.current = new_name.to_string();
        }
        true
    }

    /// Remove an animation
    ///
    /// If it was current, the first remaining animation becomes current, or a
    /// new default animation is created when none remain.
    pub fn remove_animation(&mut self, name: &str) -> Option<Animation> {
        let removed = self.animations.remove(name)?;
        if self.current == name {
            self.current = self
                .animations
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| DEFAULT_ANIMATION_NAME.to_string());
            let current = self.current.clone();
            self.get_or_create(&current);
        }
        Some(removed)
    }

    /// Set the fps of a named animation (created if missing)
    pub fn set_fps(&mut self, name: &str, fps: u32) {
        self.get_or_create(name).set_fps(fps);
    }
}

impl Serialize for AnimationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.animations.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnimationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let animations = BTreeMap::<String, Animation>::deserialize(deserializer)?;
        Ok(AnimationSet::from_animations(animations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f64) -> Frame {
        Frame::new(x, 0.0, 8.0, 8.0)
    }

    #[test]
    fn test_new_set_has_current_animation() {
        let set = AnimationSet::new();
        assert_eq!(set.current_name(), DEFAULT_ANIMATION_NAME);
        assert!(set.contains(DEFAULT_ANIMATION_NAME));
        assert_eq!(set.current().fps, DEFAULT_FPS);
        assert!(set.current().is_empty());
    }

    #[test]
    fn test_set_current_creates_missing_animation() {
        let mut set = AnimationSet::with_default_fps(12);
        assert!(set.set_current("run"));
        assert_eq!(set.current_name(), "run");
        assert_eq!(set.current().fps, 12);
        assert!(!set.set_current("run"));
    }

    #[test]
    fn test_frame_order_operations() {
        let mut anim = Animation::default();
        assert_eq!(anim.append_frame(frame(0.0)), 0);
        assert_eq!(anim.append_frame(frame(1.0)), 1);
        assert_eq!(anim.append_frame(frame(2.0)), 2);

        assert!(anim.swap_frames(0, 2));
        assert_eq!(anim.frame(0).unwrap().x, 2.0);
        assert!(!anim.swap_frames(0, 3));

        let removed = anim.remove_frame(1).unwrap();
        assert_eq!(removed.x, 1.0);
        assert_eq!(anim.len(), 2);
        assert!(anim.remove_frame(5).is_none());
    }

    #[test]
    fn test_stored_frames_are_always_normalized() {
        let mut degenerate = frame(0.0);
        degenerate.w = -3.0;
        let mut anim = Animation::default().with_frames(vec![degenerate]);
        assert_eq!(anim.frames()[0].w, 1.0);

        degenerate.h = f64::NAN;
        assert!(anim.replace_frame(0, degenerate));
        assert_eq!((anim.frames()[0].w, anim.frames()[0].h), (1.0, 1.0));

        anim.append_frame(degenerate);
        assert!(anim.frames().iter().all(|f| f.w >= 1.0 && f.h >= 1.0));
    }

    #[test]
    fn test_fps_never_zero() {
        let mut anim = Animation::new(0);
        assert_eq!(anim.fps, 1);
        anim.set_fps(0);
        assert_eq!(anim.fps, 1);
    }

    #[test]
    fn test_frame_cycle_wraps() {
        let anim = Animation::default().with_frames(vec![frame(0.0), frame(1.0), frame(2.0)]);
        let indices: Vec<usize> = anim.frame_cycle().take(7).collect();
        assert_eq!(indices, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(Animation::default().frame_cycle().next(), None);
    }

    #[test]
    fn test_rename_keeps_current() {
        let mut set = AnimationSet::new();
        set.current_mut().append_frame(frame(0.0));
        assert!(set.rename_animation(DEFAULT_ANIMATION_NAME, "stand"));
        assert_eq!(set.current_name(), "stand");
        assert_eq!(set.current().len(), 1);
        assert!(!set.contains(DEFAULT_ANIMATION_NAME));
    }

    #[test]
    fn test_rename_rejects_collisions_and_blank_names() {
        let mut set = AnimationSet::new();
        set.create_animation("walk");
        assert!(!set.rename_animation("walk", DEFAULT_ANIMATION_NAME));
        assert!(!set.rename_animation("walk", "   "));
        assert!(!set.rename_animation("missing", "other"));
        assert!(set.contains("walk"));
    }

    #[test]
    fn test_remove_current_falls_back() {
        let mut set = AnimationSet::new();
        set.create_animation("attack");
        assert!(set.remove_animation(DEFAULT_ANIMATION_NAME).is_some());
        assert_eq!(set.current_name(), "attack");

        assert!(set.remove_animation("attack").is_some());
        assert_eq!(set.current_name(), DEFAULT_ANIMATION_NAME);
        assert!(set.contains(DEFAULT_ANIMATION_NAME));
    }

    #[test]
    fn test_legacy_frame_array_is_migrated() {
        let json = r#"{
            "walk": [{"x":0,"y":0,"w":16,"h":16,"anchor":{"x":8,"y":16}}],
            "jump": {"fps": 12, "frames": []}
        }"#;
        let set: AnimationSet = serde_json::from_str(json).unwrap();
        let walk = set.get("walk").unwrap();
        assert_eq!(walk.fps, DEFAULT_FPS);
        assert_eq!(walk.len(), 1);
        assert_eq!(walk.frames()[0].w, 16.0);
        assert_eq!(set.get("jump").unwrap().fps, 12);
        assert_eq!(set.current_name(), "jump");
    }

    #[test]
    fn test_invalid_fps_is_sanitized() {
        let set: AnimationSet =
            serde_json::from_str(r#"{"a":{"fps":0,"frames":[]},"b":{"frames":[]}}"#).unwrap();
        assert_eq!(set.get("a").unwrap().fps, 1);
        assert_eq!(set.get("b").unwrap().fps, DEFAULT_FPS);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut set = AnimationSet::new();
        set.current_mut().append_frame(Frame::new(1.0, 2.0, 10.0, 10.0));
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["idle"]["fps"], 8);
        assert_eq!(value["idle"]["frames"][0]["anchor"]["x"], 5.0);
        assert!(value.get("current").is_none());

        let back: AnimationSet = serde_json::from_value(value).unwrap();
        assert_eq!(back, set);
    }
}
