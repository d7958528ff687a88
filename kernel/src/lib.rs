// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Core clock tree kernel.
//!
//! The kernel crate implements the pieces of the boot environment that chips
//! and boards share: the clock Hardware Interface Layer (HIL), the clock
//! registry and the name-based clock tree operations built on top of it, the
//! device-description reader, and the generic driver framework that binds a
//! device description to a driver instance.
//!
//! Chip crates provide concrete clock variants (for example the R128 PLL
//! divider) by implementing [`hil::clk::Clock`] and a [`driver::Driver`]
//! whose probe builds and registers a [`clk::ClockNode`].
//!
//! Most `unsafe` code is in this kernel crate.

#![no_std]

extern crate alloc;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
pub mod debug;

pub mod clk;
pub mod config;
pub mod driver;
pub mod dt;
pub mod hil;
pub mod memory;
pub mod utilities;

mod errorcode;

pub use crate::errorcode::ErrorCode;
