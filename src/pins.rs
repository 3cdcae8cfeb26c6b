//! Control-line bundle for one X9C device.
//!
//! The chip exposes three inputs and no outputs:
//!
//! | Line | Chip pin | Meaning                                              |
//! |------|----------|------------------------------------------------------|
//! | INC  | 1        | Each low/high cycle moves the wiper one tap          |
//! | U/D  | 2        | HIGH = towards VH (up), LOW = towards VL (down)      |
//! | CS   | 7        | LOW selects the device; rising edge with INC HIGH stores |
//!
//! Every line must already be configured as a push-pull output by the HAL
//! before it is handed over here. With `embedded-hal` the output mode is a
//! property of the pin type, so no runtime configuration step is needed.

use embedded_hal::digital::OutputPin;

/// Identifies one of the three control lines.  Carried in pin errors so the
/// caller can tell which write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// INC: pulse line.
    Increment,
    /// U/D: direction line.
    Direction,
    /// CS: chip-select / store line.
    Select,
}

impl core::fmt::Display for Line {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Increment => write!(f, "INC"),
            Self::Direction => write!(f, "U/D"),
            Self::Select => write!(f, "CS"),
        }
    }
}

/// The three output lines driving one X9C.
///
/// All lines share one error type `E`, which is the case for every pin of a
/// given HAL port.
pub struct WiperPins<INC, UD, CS> {
    pub increment: INC,
    pub direction: UD,
    pub select: CS,
}

impl<INC, UD, CS, E> WiperPins<INC, UD, CS>
where
    INC: OutputPin<Error = E>,
    UD: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
{
    /// Bundle the lines in chip-header order: INC, CS, U/D.
    pub fn new(increment: INC, select: CS, direction: UD) -> Self {
        Self {
            increment,
            direction,
            select,
        }
    }

    pub(crate) fn write(&mut self, line: Line, high: bool) -> Result<(), E> {
        match (line, high) {
            (Line::Increment, true) => self.increment.set_high(),
            (Line::Increment, false) => self.increment.set_low(),
            (Line::Direction, true) => self.direction.set_high(),
            (Line::Direction, false) => self.direction.set_low(),
            (Line::Select, true) => self.select.set_high(),
            (Line::Select, false) => self.select.set_low(),
        }
    }
}
