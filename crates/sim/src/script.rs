//! Scripted throttle/steer schedule standing in for a human driver.

use hydro::DriveInput;
use serde::{Deserialize, Serialize};

/// Drive command that takes effect at `at` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptKey {
    pub at: f32,
    #[serde(default)]
    pub throttle: f32,
    #[serde(default)]
    pub steer: f32,
}

impl ScriptKey {
    pub fn new(at: f32, throttle: f32, steer: f32) -> Self {
        Self { at, throttle, steer }
    }
}

/// Step-held schedule: each key's command lasts until the next key.
#[derive(Debug, Clone, Default)]
pub struct DriveScript {
    keys: Vec<ScriptKey>,
}

impl DriveScript {
    /// Keys are sorted by time; non-finite times are dropped.
    pub fn new(mut keys: Vec<ScriptKey>) -> Self {
        keys.retain(|k| k.at.is_finite());
        keys.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { keys }
    }

    /// Command in effect at `time` seconds. Idle before the first key.
    pub fn input_at(&self, time: f32) -> DriveInput {
        let idx = self.keys.partition_point(|k| k.at <= time);
        match idx.checked_sub(1).and_then(|i| self.keys.get(i)) {
            Some(key) => DriveInput::new(key.throttle, key.steer),
            None => DriveInput::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
