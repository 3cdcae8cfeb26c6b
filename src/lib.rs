//! X9C digital potentiometer driver.
//!
//! The X9C family moves its wiper one tap per pulse and offers no way to
//! read the wiper back.  [`WiperController`] keeps a software belief of the
//! current tap and turns absolute targets into pulse trains over three
//! `embedded-hal` output pins.
//!
//! ```text
//!   set_position(n) ──▶ WiperController ──▶ INC / U/D / CS ──▶ X9C
//!                        (believed tap)        DelayNs (store settle)
//! ```
//!
//! `no_std`; all hardware access goes through `embedded-hal` 1.0 traits so
//! the driver runs unchanged against real HALs and host-side test doubles.

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod config;
pub mod controller;
pub mod pins;
pub mod variant;
pub mod worker;

mod error;

pub use config::WiperConfig;
pub use controller::{Direction, MoveOutcome, WiperController};
pub use error::{ConfigError, Error, Result};
pub use pins::{Line, WiperPins};
pub use variant::ChipVariant;
