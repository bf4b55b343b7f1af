//! Gesture-to-mode state machine

use crate::mode::selection::ViewedSet;
use crate::scene::ObjectId;
use rand::Rng;
use std::fmt;
use tinsel_capture::GestureState;
use tracing::{debug, info};

/// How the scene is arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Objects form the tree.
    #[default]
    Assembled,
    /// Objects float in a loose cloud.
    Scattered,
    /// One photo is brought to the camera, everything else pushed back.
    Focused,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Assembled => "Assembled",
            DisplayMode::Scattered => "Scattered",
            DisplayMode::Focused => "Focused",
        };
        f.write_str(name)
    }
}

/// Mode and focus read together, once per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSnapshot {
    pub mode: DisplayMode,
    pub focus: Option<ObjectId>,
}

impl ModeSnapshot {
    pub fn is_focus(&self, id: ObjectId) -> bool {
        self.mode == DisplayMode::Focused && self.focus == Some(id)
    }
}

/// Holds the current mode, the focused photo and the viewing history.
#[derive(Debug, Clone, Default)]
pub struct ModeMachine {
    mode: DisplayMode,
    focus: Option<ObjectId>,
    viewed: ViewedSet,
}

impl ModeMachine {
    pub fn new(initial: DisplayMode) -> Self {
        Self {
            mode: initial,
            ..Self::default()
        }
    }

    /// Next mode for a gesture, given the previous mode.
    ///
    /// A frame without a recognised gesture keeps the previous mode, which
    /// rides out single-frame detection gaps.
    pub fn transition(previous: DisplayMode, gesture: &GestureState) -> DisplayMode {
        if gesture.is_fist {
            DisplayMode::Assembled
        } else if gesture.is_pinching {
            match previous {
                DisplayMode::Assembled => DisplayMode::Assembled,
                _ => DisplayMode::Focused,
            }
        } else if gesture.is_open {
            DisplayMode::Scattered
        } else {
            previous
        }
    }

    /// Feed one gesture state. `photos` is the current set of photo ids.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        gesture: &GestureState,
        photos: &[ObjectId],
        rng: &mut R,
    ) -> ModeSnapshot {
        let next = Self::transition(self.mode, gesture);
        if next != self.mode {
            info!("Mode {} -> {}", self.mode, next);
        }

        if next != DisplayMode::Focused {
            if let Some(released) = self.focus.take() {
                debug!("Released focus on {}", released);
            }
        }
        self.mode = next;

        if self.mode == DisplayMode::Focused && self.focus.is_none() {
            self.select_focus(photos, rng);
        }

        self.snapshot()
    }

    /// Forget history and focus after the object set was rebuilt.
    ///
    /// Stays in the current mode; when focused, a photo from the new set is
    /// selected straight away.
    pub fn reset_objects<R: Rng + ?Sized>(&mut self, photos: &[ObjectId], rng: &mut R) {
        self.viewed.clear();
        self.focus = None;
        if self.mode == DisplayMode::Focused {
            self.select_focus(photos, rng);
        }
    }

    fn select_focus<R: Rng + ?Sized>(&mut self, photos: &[ObjectId], rng: &mut R) {
        self.focus = self.viewed.pick(photos, rng);
        match self.focus {
            Some(id) => info!(
                "Focusing photo {} ({} of {} viewed)",
                id,
                self.viewed.len(),
                photos.len()
            ),
            None => debug!("Focused with no photos available"),
        }
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        ModeSnapshot {
            mode: self.mode,
            focus: self.focus,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn focus(&self) -> Option<ObjectId> {
        self.focus
    }

    pub fn viewed(&self) -> &ViewedSet {
        &self.viewed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    const ALL_MODES: [DisplayMode; 3] = [
        DisplayMode::Assembled,
        DisplayMode::Scattered,
        DisplayMode::Focused,
    ];

    fn gesture(fist: bool, open: bool, pinch: bool) -> GestureState {
        GestureState {
            is_fist: fist,
            is_open: open,
            is_pinching: pinch,
            hand_detected: true,
            ..GestureState::NO_HAND
        }
    }

    fn fist() -> GestureState {
        gesture(true, false, false)
    }

    fn open() -> GestureState {
        gesture(false, true, false)
    }

    fn pinch() -> GestureState {
        gesture(false, false, true)
    }

    fn photos(n: u32) -> Vec<ObjectId> {
        (0..n).map(|i| ObjectId::new(1, 100 + i)).collect()
    }

    #[test]
    fn test_transition_table() {
        for previous in ALL_MODES {
            assert_eq!(ModeMachine::transition(previous, &fist()), DisplayMode::Assembled);
            assert_eq!(ModeMachine::transition(previous, &open()), DisplayMode::Scattered);
            assert_eq!(ModeMachine::transition(previous, &GestureState::NO_HAND), previous);
            assert_eq!(ModeMachine::transition(previous, &gesture(false, false, false)), previous);
        }
        assert_eq!(
            ModeMachine::transition(DisplayMode::Assembled, &pinch()),
            DisplayMode::Assembled
        );
        assert_eq!(
            ModeMachine::transition(DisplayMode::Scattered, &pinch()),
            DisplayMode::Focused
        );
        assert_eq!(
            ModeMachine::transition(DisplayMode::Focused, &pinch()),
            DisplayMode::Focused
        );
    }

    #[test]
    fn test_pinch_ignored_while_assembled() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut machine = ModeMachine::default();
        let snapshot = machine.apply(&pinch(), &photos(3), &mut rng);
        assert_eq!(snapshot.mode, DisplayMode::Assembled);
        assert_eq!(snapshot.focus, None);
        assert!(machine.viewed().is_empty());
    }

    #[test]
    fn test_focus_held_while_pinching() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let photos = photos(5);
        let mut machine = ModeMachine::new(DisplayMode::Scattered);

        let first = machine.apply(&pinch(), &photos, &mut rng);
        assert_eq!(first.mode, DisplayMode::Focused);
        let held = first.focus.unwrap();

        for _ in 0..10 {
            assert_eq!(machine.apply(&pinch(), &photos, &mut rng).focus, Some(held));
            assert_eq!(machine.apply(&GestureState::NO_HAND, &photos, &mut rng).focus, Some(held));
        }
        assert_eq!(machine.viewed().len(), 1);
    }

    #[test]
    fn test_leaving_focus_clears_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let photos = photos(2);
        let mut machine = ModeMachine::new(DisplayMode::Scattered);
        machine.apply(&pinch(), &photos, &mut rng);
        assert!(machine.focus().is_some());

        let snapshot = machine.apply(&open(), &photos, &mut rng);
        assert_eq!(snapshot.mode, DisplayMode::Scattered);
        assert_eq!(snapshot.focus, None);

        machine.apply(&pinch(), &photos, &mut rng);
        let snapshot = machine.apply(&fist(), &photos, &mut rng);
        assert_eq!(snapshot, ModeSnapshot::default());
    }

    #[test]
    fn test_focus_cycles_without_repeats() {
        let photos = photos(3);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut machine = ModeMachine::new(DisplayMode::Scattered);
            let mut shown = HashSet::new();
            for _ in 0..3 {
                let focus = machine.apply(&pinch(), &photos, &mut rng).focus.unwrap();
                assert!(shown.insert(focus), "seed {seed} repeated {focus}");
                machine.apply(&open(), &photos, &mut rng);
            }
            let fourth = machine.apply(&pinch(), &photos, &mut rng).focus.unwrap();
            assert!(photos.contains(&fourth));
        }
    }

    #[test]
    fn test_focus_with_no_photos() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut machine = ModeMachine::new(DisplayMode::Scattered);
        let snapshot = machine.apply(&pinch(), &[], &mut rng);
        assert_eq!(snapshot.mode, DisplayMode::Focused);
        assert_eq!(snapshot.focus, None);
    }

    #[test]
    fn test_reset_objects_reselects_when_focused() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut machine = ModeMachine::new(DisplayMode::Scattered);
        machine.apply(&pinch(), &photos(2), &mut rng);

        let fresh: Vec<_> = (0..2).map(|i| ObjectId::new(2, i)).collect();
        machine.reset_objects(&fresh, &mut rng);
        assert_eq!(machine.mode(), DisplayMode::Focused);
        assert!(fresh.contains(&machine.focus().unwrap()));
        assert_eq!(machine.viewed().len(), 1);

        machine.apply(&open(), &fresh, &mut rng);
        machine.reset_objects(&[], &mut rng);
        assert_eq!(machine.focus(), None);
        assert!(machine.viewed().is_empty());
    }

    #[test]
    fn test_snapshot_is_focus() {
        let id = ObjectId::new(0, 1);
        let snapshot = ModeSnapshot {
            mode: DisplayMode::Focused,
            focus: Some(id),
        };
        assert!(snapshot.is_focus(id));
        assert!(!snapshot.is_focus(ObjectId::new(0, 2)));
        assert!(!ModeSnapshot::default().is_focus(id));
    }
}
