//! Gesture categories recognised by the deadzone checker.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    #[default]
    None,
    OneFingerHorizontal,
    OneFingerVertical,
    TwoFingerHorizontal,
    TwoFingerVertical,
    Pinch,
}

impl Gesture {
    /// Order in which candidate gestures are tested. When two gestures clear
    /// the deadzone on the same sample, the earlier one wins.
    pub const EVALUATION_ORDER: [Gesture; 5] = [
        Gesture::OneFingerHorizontal,
        Gesture::OneFingerVertical,
        Gesture::TwoFingerHorizontal,
        Gesture::TwoFingerVertical,
        Gesture::Pinch,
    ];

    pub fn finger_count(self) -> usize {
        match self {
            Gesture::None => 0,
            Gesture::OneFingerHorizontal | Gesture::OneFingerVertical => 1,
            Gesture::TwoFingerHorizontal | Gesture::TwoFingerVertical | Gesture::Pinch => 2,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Gesture::None
    }

    const fn bit(self) -> u8 {
        match self {
            Gesture::None => 0,
            Gesture::OneFingerHorizontal => 1 << 0,
            Gesture::OneFingerVertical => 1 << 1,
            Gesture::TwoFingerHorizontal => 1 << 2,
            Gesture::TwoFingerVertical => 1 << 3,
            Gesture::Pinch => 1 << 4,
        }
    }
}

/// A set of gestures, e.g. the ones a checker is willing to detect.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GestureSet(u8);

impl GestureSet {
    pub const EMPTY: GestureSet = GestureSet(0);
    pub const ONE_FINGER: GestureSet = GestureSet(
        Gesture::OneFingerHorizontal.bit() | Gesture::OneFingerVertical.bit(),
    );
    pub const TWO_FINGER_SWIPE: GestureSet = GestureSet(
        Gesture::TwoFingerHorizontal.bit() | Gesture::TwoFingerVertical.bit(),
    );
    pub const PINCH: GestureSet = GestureSet(Gesture::Pinch.bit());

    pub const fn of(gesture: Gesture) -> Self {
        GestureSet(gesture.bit())
    }

    #[inline]
    pub fn contains(self, gesture: Gesture) -> bool {
        let bit = gesture.bit();
        bit != 0 && self.0 & bit == bit
    }

    #[inline]
    pub fn insert(&mut self, gesture: Gesture) {
        self.0 |= gesture.bit();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in evaluation order.
    pub fn iter(self) -> impl Iterator<Item = Gesture> {
        Gesture::EVALUATION_ORDER
            .into_iter()
            .filter(move |g| self.contains(*g))
    }
}

impl BitOr for GestureSet {
    type Output = GestureSet;
    fn bitor(self, rhs: GestureSet) -> GestureSet {
        GestureSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for GestureSet {
    fn bitor_assign(&mut self, rhs: GestureSet) {
        self.0 |= rhs.0;
    }
}

impl From<Gesture> for GestureSet {
    fn from(g: Gesture) -> Self {
        GestureSet::of(g)
    }
}

impl fmt::Debug for GestureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
