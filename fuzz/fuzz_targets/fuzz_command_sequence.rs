//! Fuzz target: arbitrary command streams into `WiperController`
//!
//! Decodes the input as a sequence of postcard-encoded `WiperCommand`s and
//! runs each against a controller wired to a minimal chip model.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - The believed tap never exceeds `max_tap`
//! - The believed tap always equals the modelled chip tap
//!
//! cargo fuzz run fuzz_command_sequence

#![no_main]

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use libfuzzer_sys::fuzz_target;
use x9c::worker::{WiperCommand, apply};
use x9c::{WiperConfig, WiperController, WiperPins};

#[derive(Default)]
struct Chip {
    tap: Cell<u8>,
    max: Cell<u8>,
    inc: Cell<bool>,
    up: Cell<bool>,
    cs: Cell<bool>,
}

#[derive(Clone, Copy)]
enum Role {
    Inc,
    Ud,
    Cs,
}

struct Pin<'a>(&'a Chip, Role);

impl ErrorType for Pin<'_> {
    type Error = Infallible;
}

impl Pin<'_> {
    fn set(&mut self, high: bool) {
        let chip = self.0;
        match self.1 {
            Role::Inc => {
                if !chip.inc.get() && high && !chip.cs.get() {
                    let t = chip.tap.get();
                    chip.tap.set(if chip.up.get() {
                        (t + 1).min(chip.max.get())
                    } else {
                        t.saturating_sub(1)
                    });
                }
                chip.inc.set(high);
            }
            Role::Ud => chip.up.set(high),
            Role::Cs => chip.cs.set(high),
        }
    }
}

impl OutputPin for Pin<'_> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set(false);
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set(true);
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&max_tap, mut rest)) = data.split_first() else {
        return;
    };
    let max_tap = max_tap.max(1);

    let chip = Chip::default();
    chip.max.set(max_tap);
    chip.tap.set(max_tap / 2);
    chip.inc.set(true);
    chip.cs.set(true);

    let pins = WiperPins::new(
        Pin(&chip, Role::Inc),
        Pin(&chip, Role::Cs),
        Pin(&chip, Role::Ud),
    );
    let Ok(mut wiper) = WiperController::new(pins, NoDelay, WiperConfig::with_max_tap(max_tap))
    else {
        return;
    };

    while let Ok((command, tail)) = postcard::take_from_bytes::<WiperCommand>(rest) {
        let _ = apply(&mut wiper, command);
        assert!(wiper.position() <= max_tap, "belief exceeded max_tap");
        assert_eq!(wiper.position(), chip.tap.get(), "belief diverged from chip");
        rest = tail;
    }
});
