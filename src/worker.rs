//! Command queue for driving a wiper from a non-time-critical context.
//!
//! Every move blocks for the pulse train plus the store cycle, which is far
//! too long for an ISR or a tight control loop.  Those contexts post a
//! [`WiperCommand`] into a [`WiperChannel`] instead, and a worker that owns
//! the [`WiperController`] drains it when it has time.
//!
//! ```text
//! ┌──────────────┐  WiperCommand  ┌──────────────┐      ┌──────────┐
//! │ ISR / loop   │──────────────▶│ WiperChannel │─────▶│  Worker  │──▶ X9C
//! │ (producers)  │                │  (bounded)   │      │ (owner)  │
//! └──────────────┘                └──────────────┘      └──────────┘
//! ```
//!
//! The channel can live in a `static`; the controller itself never leaves
//! the worker.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::controller::{Direction, MoveOutcome, WiperController};
use crate::error::Result;

/// A move request posted to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WiperCommand {
    SetPosition(u8),
    Step { direction: Direction, count: u8 },
    /// Target wiper-to-R_L resistance in ohms.
    SetResistance(u32),
    Home,
}

/// Bounded command queue shared between producers and the worker.
pub type WiperChannel<const N: usize> = Channel<CriticalSectionRawMutex, WiperCommand, N>;

/// Result of one drained command.
#[derive(Debug)]
pub struct CommandReport<E> {
    pub command: WiperCommand,
    pub result: Result<MoveOutcome, E>,
}

/// Run a single command against the controller.
pub fn apply<INC, UD, CS, D, E>(
    wiper: &mut WiperController<INC, UD, CS, D>,
    command: WiperCommand,
) -> Result<MoveOutcome, E>
where
    INC: OutputPin<Error = E>,
    UD: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    D: DelayNs,
{
    match command {
        WiperCommand::SetPosition(tap) => wiper.set_position(tap),
        WiperCommand::Step { direction, count } => wiper.increment(direction, count),
        WiperCommand::SetResistance(ohms) => wiper.set_resistance(ohms),
        WiperCommand::Home => wiper.home(),
    }
}

/// Consumer side of a [`WiperChannel`].
pub struct WiperWorker<'ch, M: RawMutex, const N: usize> {
    channel: &'ch Channel<M, WiperCommand, N>,
}

impl<'ch, M: RawMutex, const N: usize> WiperWorker<'ch, M, N> {
    pub fn new(channel: &'ch Channel<M, WiperCommand, N>) -> Self {
        Self { channel }
    }

    /// Number of commands waiting.
    pub fn pending(&self) -> usize {
        self.channel.len()
    }

    /// Process up to `N` queued commands in FIFO order.
    ///
    /// Stops after the first pin error so the remaining commands stay queued
    /// until the caller has dealt with it (usually by homing).
    pub fn drain<INC, UD, CS, D, E>(
        &self,
        wiper: &mut WiperController<INC, UD, CS, D>,
    ) -> Vec<CommandReport<E>, N>
    where
        INC: OutputPin<Error = E>,
        UD: OutputPin<Error = E>,
        CS: OutputPin<Error = E>,
        D: DelayNs,
    {
        let mut reports = Vec::new();
        while !reports.is_full() {
            let Ok(command) = self.channel.try_receive() else {
                break;
            };
            let result = apply(wiper, command);
            let failed = result.is_err();
            debug!("x9c worker: {:?} -> {:?}", command, result.as_ref().ok());
            if reports.push(CommandReport { command, result }).is_err() || failed {
                break;
            }
        }
        reports
    }
}
