// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Peripheral implementations for the Allwinner R128 SoC.

#![no_std]

extern crate alloc;

// This is used to run the tests on a host
#[cfg(test)]
extern crate std;

pub mod ccu_aon;
pub mod clk_pll;
