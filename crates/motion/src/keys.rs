use std::cell::RefCell;
use std::rc::Rc;

use winit::keyboard::KeyCode;

use crate::bus::{EventKind, InputBus, InputEvent, ListenerId};

/// Held-state of the four movement keys.
///
/// Each flag mirrors whether its bound physical key is currently down.
/// Opposite directions are independent: holding forward and backward at the
/// same time reads as both true and a zero intent, not as an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyMoveState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyMoveState {
    /// Collapses the held keys into a 2D intent vector:
    /// x = right − left, y = forward − backward.
    pub fn intent(&self) -> (f64, f64) {
        let x = self.right as i8 - self.left as i8;
        let y = self.forward as i8 - self.backward as i8;
        (f64::from(x), f64::from(y))
    }

    fn set(&mut self, direction: MoveDirection, held: bool) {
        match direction {
            MoveDirection::Forward => self.forward = held,
            MoveDirection::Backward => self.backward = held,
            MoveDirection::Left => self.left = held,
            MoveDirection::Right => self.right = held,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Physical key assigned to each movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }
}

impl KeyBindings {
    fn direction(&self, code: KeyCode) -> Option<MoveDirection> {
        if code == self.forward {
            Some(MoveDirection::Forward)
        } else if code == self.backward {
            Some(MoveDirection::Backward)
        } else if code == self.left {
            Some(MoveDirection::Left)
        } else if code == self.right {
            Some(MoveDirection::Right)
        } else {
            None
        }
    }

    fn is_distinct(&self) -> bool {
        let codes = [self.forward, self.backward, self.left, self.right];
        codes
            .iter()
            .enumerate()
            .all(|(index, code)| !codes[..index].contains(code))
    }
}

/// Tracks the held-state of the movement keys via bus listeners.
///
/// `activate` attaches exactly one key-down and one key-up listener;
/// activating again first tears the old pair down, so repeated
/// activate/deactivate cycles can never leak or duplicate callbacks.
/// Key codes outside the bindings are ignored entirely.
pub struct KeyTracker {
    state: Rc<RefCell<KeyMoveState>>,
    bindings: KeyBindings,
    listeners: Option<(ListenerId, ListenerId)>,
}

impl KeyTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        debug_assert!(bindings.is_distinct(), "movement keys must not overlap");
        Self {
            state: Rc::new(RefCell::new(KeyMoveState::default())),
            bindings,
            listeners: None,
        }
    }

    pub fn activate(&mut self, bus: &mut InputBus) {
        self.deactivate(bus);

        let bindings = self.bindings;
        let state = Rc::clone(&self.state);
        let down = bus.attach(
            EventKind::KeyDown,
            Box::new(move |event| {
                if let InputEvent::KeyDown(code) = event {
                    if let Some(direction) = bindings.direction(*code) {
                        state.borrow_mut().set(direction, true);
                    }
                }
            }),
        );

        let state = Rc::clone(&self.state);
        let up = bus.attach(
            EventKind::KeyUp,
            Box::new(move |event| {
                if let InputEvent::KeyUp(code) = event {
                    if let Some(direction) = bindings.direction(*code) {
                        state.borrow_mut().set(direction, false);
                    }
                }
            }),
        );

        self.listeners = Some((down, up));
    }

    /// Detaches both listeners; safe to call repeatedly or before `activate`.
    pub fn deactivate(&mut self, bus: &mut InputBus) {
        if let Some((down, up)) = self.listeners.take() {
            bus.detach(down);
            bus.detach(up);
        }
    }

    /// Snapshot of the current held-state, by value.
    pub fn read(&self) -> KeyMoveState {
        *self.state.borrow()
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_on_bus() -> (KeyTracker, InputBus) {
        let mut bus = InputBus::new();
        let mut tracker = KeyTracker::default();
        tracker.activate(&mut bus);
        (tracker, bus)
    }

    #[test]
    fn bound_key_toggles_direction() {
        let (tracker, mut bus) = tracker_on_bus();

        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        assert!(tracker.read().forward);

        bus.dispatch(&InputEvent::KeyUp(KeyCode::KeyW));
        assert!(!tracker.read().forward);
    }

    #[test]
    fn unbound_keys_leave_state_unchanged() {
        let (tracker, mut bus) = tracker_on_bus();

        for code in [KeyCode::KeyQ, KeyCode::Space, KeyCode::ArrowUp] {
            bus.dispatch(&InputEvent::KeyDown(code));
            bus.dispatch(&InputEvent::KeyUp(code));
        }

        assert_eq!(tracker.read(), KeyMoveState::default());
    }

    #[test]
    fn repeated_down_events_are_idempotent() {
        let (tracker, mut bus) = tracker_on_bus();

        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyD));
        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyD));
        assert!(tracker.read().right);

        bus.dispatch(&InputEvent::KeyUp(KeyCode::KeyD));
        assert!(!tracker.read().right);
    }

    #[test]
    fn opposite_keys_can_be_held_together() {
        let (tracker, mut bus) = tracker_on_bus();

        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyS));

        let state = tracker.read();
        assert!(state.forward);
        assert!(state.backward);
        assert_eq!(state.intent(), (0.0, 0.0));
    }

    #[test]
    fn snapshot_is_detached_from_tracker_state() {
        let (tracker, mut bus) = tracker_on_bus();

        let before = tracker.read();
        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyA));

        assert!(!before.left);
        assert!(tracker.read().left);
    }

    #[test]
    fn reactivation_never_duplicates_listeners() {
        let mut bus = InputBus::new();
        let mut tracker = KeyTracker::default();

        // Deactivation before any activation must be harmless.
        tracker.deactivate(&mut bus);

        tracker.activate(&mut bus);
        tracker.deactivate(&mut bus);
        tracker.deactivate(&mut bus);
        tracker.activate(&mut bus);
        tracker.activate(&mut bus);

        assert_eq!(bus.listener_count(EventKind::KeyDown), 1);
        assert_eq!(bus.listener_count(EventKind::KeyUp), 1);

        // The surviving pair still works.
        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        assert!(tracker.read().forward);
    }

    #[test]
    fn deactivated_tracker_ignores_events() {
        let (mut tracker, mut bus) = tracker_on_bus();
        tracker.deactivate(&mut bus);

        bus.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        assert_eq!(tracker.read(), KeyMoveState::default());
    }

    #[test]
    fn intent_maps_keys_to_axes() {
        let mut state = KeyMoveState::default();
        state.right = true;
        assert_eq!(state.intent(), (1.0, 0.0));

        state.backward = true;
        assert_eq!(state.intent(), (1.0, -1.0));
    }
}
