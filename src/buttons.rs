//! Button state tracking with edge detection.
//!
//! Four active-low inputs with pull-ups: three action buttons and the
//! mode switch. A button reads "pressed" when its pin is low.
//!
//! Debouncing is single-sample: each loop iteration shifts the current
//! state into the previous one and samples the pins once. Edges are
//! computed only from these two debounced states. A press and release
//! that both fall between two samples produce no edge at all.

/// Logical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    Button1 = 1 << 0,
    Button2 = 1 << 1,
    Button3 = 1 << 2,
    /// Mode switch: held = mouse, released = menu.
    Switch = 1 << 3,
}

impl Button {
    pub const ALL: [Button; 4] = [
        Button::Button1,
        Button::Button2,
        Button::Button3,
        Button::Switch,
    ];

    const fn mask(self) -> u8 {
        self as u8
    }
}

/// Raw pin levels as read from the GPIO port, one bit per [`Button`],
/// bit set = pin high (released).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawLevels(pub u8);

impl RawLevels {
    /// All pins pulled high, nothing pressed.
    pub const IDLE: RawLevels = RawLevels(0x0F);

    /// Levels with exactly the given buttons held low.
    pub fn pressed(buttons: &[Button]) -> Self {
        let held = buttons.iter().fold(0, |acc, b| acc | b.mask());
        RawLevels(Self::IDLE.0 & !held)
    }

    fn pressed_mask(self) -> u8 {
        !self.0 & Self::IDLE.0
    }
}

/// Source of raw button pin levels.
pub trait ButtonPins {
    fn read_levels(&mut self) -> RawLevels;
}

/// Rising edge of a pressed-state signal (key down).
pub const fn rising(prev: bool, curr: bool) -> bool {
    !prev && curr
}

/// Falling edge of a pressed-state signal (key up).
pub const fn falling(prev: bool, curr: bool) -> bool {
    prev && !curr
}

/// Debounced state of all buttons, current and previous iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSet {
    current: u8,
    previous: u8,
}

impl ButtonSet {
    /// Start from the levels present at power-up so that a button already
    /// held does not produce a press edge on the first iteration.
    pub fn new(initial: RawLevels) -> Self {
        let pressed = initial.pressed_mask();
        Self {
            current: pressed,
            previous: pressed,
        }
    }

    /// Shift current into previous and take one new sample.
    pub fn update(&mut self, raw: RawLevels) {
        self.previous = self.current;
        self.current = raw.pressed_mask();
    }

    /// Is `button` held in the current sample?
    pub fn is_down(&self, button: Button) -> bool {
        self.current & button.mask() != 0
    }

    /// Was `button` held in the previous sample?
    pub fn was_down(&self, button: Button) -> bool {
        self.previous & button.mask() != 0
    }

    /// Did `button` go down this iteration?
    pub fn on_key_down(&self, button: Button) -> bool {
        rising(self.was_down(button), self.is_down(button))
    }

    /// Did `button` go up this iteration?
    pub fn on_key_up(&self, button: Button) -> bool {
        falling(self.was_down(button), self.is_down(button))
    }

    /// Current levels of the three action buttons as a mouse button field
    /// (bit 0 = Button 1 ... bit 2 = Button 3).
    pub fn action_bits(&self) -> u8 {
        self.current & 0x07
    }
}
