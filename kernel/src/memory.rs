// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Physical to virtual address translation.
//!
//! The boot environment runs with the MMU either off or programmed with an
//! identity map of the peripheral space, so translation is the identity.
//! Drivers still go through [`phys_to_virt`] so that a board which remaps
//! MMIO only needs to change this module.

/// A physical (bus) address as found in datasheets.
pub type PhysicalAddr = usize;

/// An address usable by the CPU to reach a physical address.
pub type VirtualAddr = usize;

/// Translate a physical address into the address the CPU uses to reach it.
pub const fn phys_to_virt(phys: PhysicalAddr) -> VirtualAddr {
    phys
}

/// Translate a CPU address back into the physical address it maps.
pub const fn virt_to_phys(virt: VirtualAddr) -> PhysicalAddr {
    virt
}
