//! Simulated X9C chip for integration tests.
//!
//! The three pins and the delay handed to the driver all share one
//! [`ChipState`].  Pin writes are replayed against a behavioural model of the
//! chip (wiper moves per INC cycle while selected, saturates at both end
//! stops, stores on the CS rising edge with INC high), and every write and
//! delay is recorded so tests can assert on the exact line history.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use x9c::{Line, WiperConfig, WiperController, WiperPins};

// ── Recorded activity ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Write(Line, bool),
    DelayMs(u32),
    DelayUs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl embedded_hal::digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// ── Chip model ────────────────────────────────────────────────

pub struct ChipState {
    max_tap: u8,
    wiper: u8,
    stored: u8,
    inc: bool,
    up: bool,
    cs: bool,
    /// U/D level sampled at each completed INC cycle.
    pulses: Vec<bool>,
    trace: Vec<Trace>,
    /// Successful writes left before every write fails.
    writes_before_fault: Option<usize>,
}

impl ChipState {
    fn write(&mut self, line: Line, high: bool) -> Result<(), SimPinError> {
        match self.writes_before_fault {
            Some(0) => return Err(SimPinError),
            Some(ref mut n) => *n -= 1,
            None => {}
        }
        self.trace.push(Trace::Write(line, high));

        match line {
            Line::Increment => {
                let rising = !self.inc && high;
                self.inc = high;
                if rising && !self.cs {
                    self.pulses.push(self.up);
                    self.wiper = if self.up {
                        (self.wiper + 1).min(self.max_tap)
                    } else {
                        self.wiper.saturating_sub(1)
                    };
                }
            }
            Line::Direction => self.up = high,
            Line::Select => {
                let rising = !self.cs && high;
                self.cs = high;
                if rising && self.inc {
                    self.stored = self.wiper;
                }
            }
        }
        Ok(())
    }
}

/// Handle to the shared chip model.
#[derive(Clone)]
pub struct SimulatedX9c(Rc<RefCell<ChipState>>);

#[allow(dead_code)]
impl SimulatedX9c {
    /// A chip whose wiper (and stored tap) is at `start`.
    pub fn new(max_tap: u8, start: u8) -> Self {
        Self(Rc::new(RefCell::new(ChipState {
            max_tap,
            wiper: start,
            stored: start,
            inc: true,
            up: false,
            cs: true,
            pulses: Vec::new(),
            trace: Vec::new(),
            writes_before_fault: None,
        })))
    }

    pub fn pins(&self) -> WiperPins<SimPin, SimPin, SimPin> {
        let pin = |line| SimPin {
            line,
            chip: self.0.clone(),
        };
        WiperPins::new(
            pin(Line::Increment),
            pin(Line::Select),
            pin(Line::Direction),
        )
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    /// Physical wiper tap.
    pub fn wiper(&self) -> u8 {
        self.0.borrow().wiper
    }

    /// Tap held in non-volatile memory.
    pub fn stored(&self) -> u8 {
        self.0.borrow().stored
    }

    /// Power the chip down and back up: the wiper recalls the stored tap.
    pub fn power_cycle(&self) {
        let mut s = self.0.borrow_mut();
        s.wiper = s.stored;
        s.inc = true;
        s.cs = true;
    }

    /// Move the wiper behind the driver's back.
    pub fn force_wiper(&self, tap: u8) {
        self.0.borrow_mut().wiper = tap;
    }

    pub fn pulses_up(&self) -> usize {
        self.0.borrow().pulses.iter().filter(|up| **up).count()
    }

    pub fn pulses_down(&self) -> usize {
        self.0.borrow().pulses.iter().filter(|up| !**up).count()
    }

    pub fn pulses(&self) -> usize {
        self.0.borrow().pulses.len()
    }

    pub fn trace(&self) -> Vec<Trace> {
        self.0.borrow().trace.clone()
    }

    pub fn writes(&self) -> usize {
        self.0
            .borrow()
            .trace
            .iter()
            .filter(|t| matches!(t, Trace::Write(..)))
            .count()
    }

    pub fn delays_ms(&self) -> Vec<u32> {
        self.0
            .borrow()
            .trace
            .iter()
            .filter_map(|t| match t {
                Trace::DelayMs(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        let mut s = self.0.borrow_mut();
        s.pulses.clear();
        s.trace.clear();
    }

    /// Let `n` more writes succeed, then fail every write.
    pub fn fail_after(&self, n: usize) {
        self.0.borrow_mut().writes_before_fault = Some(n);
    }

    pub fn heal(&self) {
        self.0.borrow_mut().writes_before_fault = None;
    }
}

// ── embedded-hal adapters ─────────────────────────────────────

pub struct SimPin {
    line: Line,
    chip: Rc<RefCell<ChipState>>,
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), SimPinError> {
        self.chip.borrow_mut().write(self.line, false)
    }

    fn set_high(&mut self) -> Result<(), SimPinError> {
        self.chip.borrow_mut().write(self.line, true)
    }
}

pub struct SimDelay(Rc<RefCell<ChipState>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().trace.push(Trace::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().trace.push(Trace::DelayMs(ms));
    }
}

// ── Constructors ──────────────────────────────────────────────

pub type SimWiper = WiperController<SimPin, SimPin, SimPin, SimDelay>;

/// Build a controller over a chip left at `start`, then clear the homing
/// activity from the record.
#[allow(dead_code)]
pub fn homed(config: WiperConfig, start: u8) -> (SimWiper, SimulatedX9c) {
    let chip = SimulatedX9c::new(config.max_tap, start);
    let wiper = WiperController::new(chip.pins(), chip.delay(), config)
        .expect("simulated pins never fail unless told to");
    chip.clear();
    (wiper, chip)
}

/// Homed controller already moved to `tap`, with a clean record.
#[allow(dead_code)]
pub fn at(config: WiperConfig, tap: u8) -> (SimWiper, SimulatedX9c) {
    let (mut wiper, chip) = homed(config, 0);
    wiper.set_position(tap).expect("move");
    chip.clear();
    (wiper, chip)
}
