//! Absolute-position controller for one X9C digital potentiometer.
//!
//! The chip only understands relative pulses and cannot report where its
//! wiper is, so the controller keeps a belief of the current tap and
//! translates absolute targets into pulse trains.  The belief is exact as
//! long as nothing else drives the three control lines.
//!
//! ## Homing
//!
//! At power-up the chip recalls whatever tap was last stored, which the
//! driver cannot know.  Construction therefore assumes the worst case
//! (`max_tap`) and drives the wiper down by `max_tap` steps.  The chip
//! ignores pulses past an end stop, so the wiper is at tap 0 afterwards no
//! matter where it started.
//!
//! ## Move sequence
//!
//! ```text
//!  CS  ‾‾‾\____________________________/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!  INC ‾‾‾‾‾‾‾‾‾\_/‾\_/‾ ... ‾\_/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!  U/D ------<  direction for the whole train  >-------------
//!                                           ^ store   |<- settle ->|
//! ```
//!
//! Raising CS while INC is high commits the tap to non-volatile memory.  The
//! next command must wait out the store cycle, so every move blocks for
//! `store_settle_ms` after the store edge.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::WiperConfig;
use crate::error::{Error, Result};
use crate::pins::{Line, WiperPins};
use crate::variant::{ohms_to_tap, tap_to_ohms};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards R_H.  U/D driven HIGH.
    Up,
    /// Towards R_L.  U/D driven LOW.
    Down,
}

/// What a move request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Already at the target.  No line was touched.
    Unchanged,
    /// The wiper moved and the new tap was stored.
    Moved { from: u8, to: u8, pulses: u8 },
    /// The target exceeded `max_tap` and `applied` was used instead.
    /// Hardware was driven only if the wiper was not already at `applied`.
    Clamped { requested: u16, applied: u8 },
    /// A downward step larger than the current tap.  Nothing was driven.
    Refused { requested_steps: u8 },
}

pub struct WiperController<INC, UD, CS, D> {
    pins: WiperPins<INC, UD, CS>,
    delay: D,
    config: WiperConfig,
    /// Believed tap, always within `0..=config.max_tap`.
    wiper_pos: u8,
    needs_homing: bool,
}

impl<INC, UD, CS, D, E> WiperController<INC, UD, CS, D>
where
    INC: OutputPin<Error = E>,
    UD: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Take ownership of the lines and home the wiper to tap 0.
    ///
    /// Blocks for up to `max_tap` pulses plus one store cycle.
    pub fn new(pins: WiperPins<INC, UD, CS>, delay: D, config: WiperConfig) -> Result<Self, E> {
        config.validate()?;

        let mut wiper = Self {
            pins,
            delay,
            wiper_pos: config.max_tap,
            config,
            needs_homing: true,
        };
        wiper.home()?;
        Ok(wiper)
    }

    /// Forget the believed tap and drive the wiper down to tap 0.
    ///
    /// Use after anything other than this controller may have moved the
    /// wiper, or after a pin error left the position unknown.
    pub fn home(&mut self) -> Result<MoveOutcome, E> {
        info!(
            "x9c: homing, assuming tap {} and stepping to 0",
            self.config.max_tap
        );
        self.wiper_pos = self.config.max_tap;
        let outcome = self.move_to(0)?;
        self.needs_homing = false;
        Ok(outcome)
    }

    /// Move the wiper to `target`, clamped to `max_tap`.
    pub fn set_position(&mut self, target: u8) -> Result<MoveOutcome, E> {
        self.move_to(u16::from(target))
    }

    /// Move the wiper `count` taps in `direction`.
    ///
    /// `count` is limited to `max_tap`.  Upward moves clamp at `max_tap` like
    /// [`set_position`](Self::set_position).  A downward move past tap 0 is
    /// refused outright rather than clamped.
    pub fn increment(&mut self, direction: Direction, count: u8) -> Result<MoveOutcome, E> {
        let count = count.min(self.config.max_tap);
        match direction {
            Direction::Up => self.move_to(u16::from(self.wiper_pos) + u16::from(count)),
            Direction::Down => {
                if count > self.wiper_pos {
                    warn!(
                        "x9c: refusing {} steps down from tap {}",
                        count, self.wiper_pos
                    );
                    return Ok(MoveOutcome::Refused {
                        requested_steps: count,
                    });
                }
                self.move_to(u16::from(self.wiper_pos - count))
            }
        }
    }

    /// Believed tap.  Not read from hardware.
    pub fn position(&self) -> u8 {
        self.wiper_pos
    }

    pub fn max_tap(&self) -> u8 {
        self.config.max_tap
    }

    pub fn config(&self) -> &WiperConfig {
        &self.config
    }

    /// `true` if a pin write failed mid-move and the wiper may be anywhere.
    pub fn needs_homing(&self) -> bool {
        self.needs_homing
    }

    /// Nominal wiper-to-R_L resistance at the believed tap (ohms).
    pub fn resistance(&self) -> u32 {
        tap_to_ohms(self.config.variant, self.wiper_pos, self.config.max_tap)
    }

    /// Move to the highest tap whose nominal resistance does not exceed `ohms`.
    pub fn set_resistance(&mut self, ohms: u32) -> Result<MoveOutcome, E> {
        let tap = ohms_to_tap(self.config.variant, ohms, self.config.max_tap);
        self.set_position(tap)
    }

    /// Give the lines and the delay back.
    pub fn release(self) -> (WiperPins<INC, UD, CS>, D) {
        (self.pins, self.delay)
    }

    fn move_to(&mut self, requested: u16) -> Result<MoveOutcome, E> {
        let max_tap = self.config.max_tap;
        let clamped = requested > u16::from(max_tap);
        let target = if clamped { max_tap } else { requested as u8 };
        if clamped {
            warn!("x9c: tap {} clamped to {}", requested, max_tap);
        }

        let from = self.wiper_pos;
        if target == from {
            return Ok(if clamped {
                MoveOutcome::Clamped {
                    requested,
                    applied: target,
                }
            } else {
                MoveOutcome::Unchanged
            });
        }

        let (direction, pulses) = if target > from {
            (Direction::Up, target - from)
        } else {
            (Direction::Down, from - target)
        };

        if let Err(e) = self.drive(direction, pulses) {
            self.needs_homing = true;
            if let Error::Pin { line, .. } = &e {
                warn!(
                    "x9c: {} write failed moving {} -> {}, position unknown",
                    line, from, target
                );
            }
            return Err(e);
        }

        self.wiper_pos = target;
        debug!(
            "x9c: tap {} -> {} ({} pulses {:?})",
            from, target, pulses, direction
        );

        Ok(if clamped {
            MoveOutcome::Clamped {
                requested,
                applied: target,
            }
        } else {
            MoveOutcome::Moved {
                from,
                to: target,
                pulses,
            }
        })
    }

    /// Issue one select / pulse train / store / settle sequence.
    fn drive(&mut self, direction: Direction, pulses: u8) -> Result<(), E> {
        self.write(Line::Select, false)?;
        self.write(Line::Increment, true)?;
        self.write(Line::Direction, direction == Direction::Up)?;

        for _ in 0..pulses {
            self.write(Line::Increment, false)?;
            self.hold();
            self.write(Line::Increment, true)?;
            self.hold();
        }

        // INC is high here, so the CS edge stores.
        self.write(Line::Select, true)?;
        self.delay.delay_ms(self.config.store_settle_ms);
        Ok(())
    }

    fn write(&mut self, line: Line, high: bool) -> Result<(), E> {
        self.pins
            .write(line, high)
            .map_err(|source| Error::Pin { line, source })
    }

    fn hold(&mut self) {
        if self.config.pulse_width_us > 0 {
            self.delay.delay_us(self.config.pulse_width_us);
        }
    }
}
