//! Physical controls: threshold buttons and the mode axis.

use embedded_hal::digital::InputPin;

use crate::constants::mode::AXIS_STEP;

/// The two threshold adjustment controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Increase,
    Decrease,
}

/// Polled user inputs.
pub trait ControlPanel {
    /// `true` while `button` is held.
    fn is_asserted(&mut self, button: Button) -> bool;

    /// Mode axis position in `[0, 1]`.
    fn axis_position(&mut self) -> f32;
}

impl<T: ControlPanel + ?Sized> ControlPanel for &mut T {
    fn is_asserted(&mut self, button: Button) -> bool {
        T::is_asserted(self, button)
    }

    fn axis_position(&mut self) -> f32 {
        T::axis_position(self)
    }
}

/// A latched axis driven by two direction buttons.
///
/// Each poll with exactly one direction held moves the position by `step`
/// towards that end. Releasing both leaves it where it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteppedAxis {
    position: f32,
    step: f32,
}

impl SteppedAxis {
    pub const fn new(position: f32, step: f32) -> Self {
        Self { position, step }
    }

    pub const fn position(&self) -> f32 {
        self.position
    }

    /// Apply one poll of the direction buttons and return the new position.
    pub fn update(&mut self, toward_low: bool, toward_high: bool) -> f32 {
        let delta = match (toward_low, toward_high) {
            (true, false) => -self.step,
            (false, true) => self.step,
            _ => 0.0,
        };
        self.position = (self.position + delta).clamp(0.0, 1.0);
        self.position
    }
}

impl Default for SteppedAxis {
    fn default() -> Self {
        Self::new(0.0, AXIS_STEP)
    }
}

/// Active-low push buttons read through `embedded-hal`.
///
/// A read error counts as "not pressed".
pub struct ButtonPanel<I> {
    increase: I,
    decrease: I,
    left: I,
    right: I,
    axis: SteppedAxis,
}

impl<I: InputPin> ButtonPanel<I> {
    pub fn new(increase: I, decrease: I, left: I, right: I) -> Self {
        Self {
            increase,
            decrease,
            left,
            right,
            axis: SteppedAxis::default(),
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: SteppedAxis) -> Self {
        self.axis = axis;
        self
    }

    fn pressed(pin: &mut I) -> bool {
        pin.is_low().unwrap_or(false)
    }
}

impl<I: InputPin> ControlPanel for ButtonPanel<I> {
    fn is_asserted(&mut self, button: Button) -> bool {
        match button {
            Button::Increase => Self::pressed(&mut self.increase),
            Button::Decrease => Self::pressed(&mut self.decrease),
        }
    }

    fn axis_position(&mut self) -> f32 {
        let low = Self::pressed(&mut self.left);
        let high = Self::pressed(&mut self.right);
        self.axis.update(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Pin whose level is shared with the test body.
    struct FakePin<'a> {
        high: &'a Cell<bool>,
    }

    impl ErrorType for FakePin<'_> {
        type Error = Infallible;
    }

    impl InputPin for FakePin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high.get())
        }
    }

    struct Levels {
        increase: Cell<bool>,
        decrease: Cell<bool>,
        left: Cell<bool>,
        right: Cell<bool>,
    }

    impl Levels {
        fn released() -> Self {
            Self {
                increase: Cell::new(true),
                decrease: Cell::new(true),
                left: Cell::new(true),
                right: Cell::new(true),
            }
        }

        fn panel(&self) -> ButtonPanel<FakePin<'_>> {
            ButtonPanel::new(
                FakePin { high: &self.increase },
                FakePin { high: &self.decrease },
                FakePin { high: &self.left },
                FakePin { high: &self.right },
            )
        }
    }

    #[test]
    fn test_buttons_are_active_low() {
        let levels = Levels::released();
        let mut panel = levels.panel();
        assert!(!panel.is_asserted(Button::Increase));
        levels.increase.set(false);
        assert!(panel.is_asserted(Button::Increase));
        assert!(!panel.is_asserted(Button::Decrease));
    }

    #[test]
    fn test_axis_walks_and_latches() {
        let levels = Levels::released();
        let mut panel = levels.panel();
        assert_eq!(panel.axis_position(), 0.0);

        levels.right.set(false);
        let mut position = 0.0;
        for _ in 0..8 {
            position = panel.axis_position();
        }
        assert!(position > 0.7);

        levels.right.set(true);
        assert_eq!(panel.axis_position(), position);
    }

    #[test]
    fn test_axis_clamps_to_unit_range() {
        let mut axis = SteppedAxis::new(0.95, 0.1);
        assert_eq!(axis.update(false, true), 1.0);
        assert_eq!(axis.update(false, true), 1.0);
        let mut axis = SteppedAxis::new(0.05, 0.1);
        assert_eq!(axis.update(true, false), 0.0);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut axis = SteppedAxis::new(0.5, 0.1);
        assert_eq!(axis.update(true, true), 0.5);
    }
}
