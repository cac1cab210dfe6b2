//! Player input handling.
//!
//! This module converts raw key and pointer events into the per-frame
//! [`InputState`] the locomotion core reads.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rift_physics::{Action, InputState};
use serde::{Deserialize, Serialize};

/// Map from key names to logical actions.
///
/// Key names are matched case-insensitively; `" "` and `"space"` name the
/// same key. Serialized as a flat key to action map, normalized on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Action>", into = "HashMap<String, Action>")]
pub struct KeyBindings {
    bindings: HashMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind("w", Action::MoveForward);
        bindings.bind("s", Action::MoveBackward);
        bindings.bind("a", Action::MoveLeft);
        bindings.bind("d", Action::MoveRight);
        bindings.bind("space", Action::Jump);
        bindings
    }
}

impl KeyBindings {
    /// Bindings with no keys mapped.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Map a key to an action, replacing any previous mapping for that key.
    pub fn bind(&mut self, key: &str, action: Action) {
        self.bindings.insert(normalize_key(key), action);
    }

    /// Remove a key's mapping.
    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.bindings.remove(&normalize_key(key))
    }

    /// Look up the action for a key.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.bindings.get(&normalize_key(key)).copied()
    }
}

impl From<HashMap<String, Action>> for KeyBindings {
    fn from(raw: HashMap<String, Action>) -> Self {
        let mut bindings = Self::empty();
        for (key, action) in &raw {
            bindings.bind(key, *action);
        }
        bindings
    }
}

impl From<KeyBindings> for HashMap<String, Action> {
    fn from(bindings: KeyBindings) -> Self {
        bindings.bindings
    }
}

fn normalize_key(key: &str) -> String {
    match key {
        " " => "space".to_string(),
        other => other.to_lowercase(),
    }
}

/// Accumulates raw events between frames.
///
/// Movement follows the held keys. Jump is a press: it fires on the frame a
/// jump key goes down and is not repeated while the key stays held. Pointer
/// motion only counts while the pointer is locked to the window.
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    bindings: KeyBindings,
    held: HashSet<Action>,
    jump_pressed: bool,
    look_delta: Vec2,
    pointer_locked: bool,
}

impl InputCollector {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Handle a key press. Unbound keys are ignored.
    pub fn key_down(&mut self, key: &str) {
        let Some(action) = self.bindings.action_for(key) else {
            return;
        };
        let newly_held = self.held.insert(action);
        if action == Action::Jump && newly_held {
            self.jump_pressed = true;
        }
    }

    /// Handle a key release. Unbound keys are ignored.
    pub fn key_up(&mut self, key: &str) {
        if let Some(action) = self.bindings.action_for(key) {
            self.held.remove(&action);
        }
    }

    /// Handle relative pointer motion (`dy` positive is down).
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        if self.pointer_locked {
            self.look_delta += Vec2::new(dx, dy);
        }
    }

    pub fn lock_pointer(&mut self) {
        self.pointer_locked = true;
    }

    pub fn release_pointer(&mut self) {
        self.pointer_locked = false;
        self.look_delta = Vec2::ZERO;
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Drop all held keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.jump_pressed = false;
        self.look_delta = Vec2::ZERO;
    }

    /// Produce this frame's input and reset the per-frame accumulators.
    pub fn take_frame(&mut self) -> InputState {
        let mut input = InputState {
            look_delta: std::mem::take(&mut self.look_delta),
            ..Default::default()
        };
        for action in [
            Action::MoveForward,
            Action::MoveBackward,
            Action::MoveLeft,
            Action::MoveRight,
        ] {
            input.set(action, self.held.contains(&action));
        }
        input.jump = std::mem::take(&mut self.jump_pressed);
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for("W"), Some(Action::MoveForward));
        assert_eq!(bindings.action_for(" "), Some(Action::Jump));
        assert_eq!(bindings.action_for("Space"), Some(Action::Jump));
        assert_eq!(bindings.action_for("q"), None);
    }

    #[test]
    fn test_rebinding() {
        let mut bindings = KeyBindings::default();
        bindings.bind("ArrowUp", Action::MoveForward);
        assert_eq!(bindings.unbind("w"), Some(Action::MoveForward));

        assert_eq!(bindings.action_for("arrowup"), Some(Action::MoveForward));
        assert_eq!(bindings.action_for("w"), None);
    }

    #[test]
    fn test_bindings_from_json_are_normalized() {
        let bindings: KeyBindings =
            serde_json::from_str(r#"{"ArrowUp":"MoveForward"," ":"Jump","A":"MoveLeft"}"#)
                .unwrap();

        assert_eq!(bindings.action_for("ArrowUp"), Some(Action::MoveForward));
        assert_eq!(bindings.action_for("arrowup"), Some(Action::MoveForward));
        assert_eq!(bindings.action_for(" "), Some(Action::Jump));
        assert_eq!(bindings.action_for("space"), Some(Action::Jump));
        assert_eq!(bindings.action_for("a"), Some(Action::MoveLeft));

        let json = serde_json::to_string(&bindings).unwrap();
        let reloaded: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, bindings);
    }

    #[test]
    fn test_held_keys_persist_across_frames() {
        let mut collector = InputCollector::new(KeyBindings::default());
        collector.key_down("w");
        collector.key_down("d");

        let frame = collector.take_frame();
        assert!(frame.forward && frame.right);

        let frame = collector.take_frame();
        assert!(frame.forward && frame.right);

        collector.key_up("w");
        let frame = collector.take_frame();
        assert!(!frame.forward && frame.right);
    }

    #[test]
    fn test_jump_fires_once_per_press() {
        let mut collector = InputCollector::new(KeyBindings::default());

        collector.key_down(" ");
        collector.key_down(" "); // key repeat
        assert!(collector.take_frame().jump);
        assert!(!collector.take_frame().jump);

        collector.key_up(" ");
        collector.key_down(" ");
        assert!(collector.take_frame().jump);
    }

    #[test]
    fn test_look_delta_accumulates_and_clears() {
        let mut collector = InputCollector::new(KeyBindings::default());

        // Ignored until the pointer is locked
        collector.pointer_moved(5.0, 5.0);
        assert_eq!(collector.take_frame().look_delta, Vec2::ZERO);

        collector.lock_pointer();
        collector.pointer_moved(3.0, -1.0);
        collector.pointer_moved(2.0, 4.0);
        assert_eq!(collector.take_frame().look_delta, Vec2::new(5.0, 3.0));
        assert_eq!(collector.take_frame().look_delta, Vec2::ZERO);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut collector = InputCollector::new(KeyBindings::default());
        collector.lock_pointer();
        collector.key_down("s");
        collector.key_down("space");
        collector.pointer_moved(1.0, 1.0);

        collector.clear();
        assert_eq!(collector.take_frame(), InputState::default());
    }
}
