// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Driver framework.
//!
//! A [`Driver`] turns one node of the device description into a [`Device`]
//! during probe, and tears it down again on remove. The [`DriverManager`]
//! matches description nodes to registered drivers by name and tracks the
//! lifecycle of every device it created:
//!
//! ```text
//!  Unprobed --probe--> Active --remove--> Removed
//!                      |    ^
//!               suspend|    |resume
//!                      v    |
//!                    Suspended
//! ```
//!
//! A failed probe leaves nothing behind and is never fatal: the manager
//! reports the error and the board goes on probing the remaining devices.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::clk::{owned_name, ClockNode};
use crate::config;
use crate::dt::DtNode;
use crate::ErrorCode;

/// Power state of an active device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    Active,
    Suspended,
}

/// What a device provides to the rest of the system.
pub enum DeviceClass {
    /// A clock registered in a clock tree. The device owns the node.
    Clk(Rc<ClockNode>),
}

/// A device produced by a successful probe.
pub struct Device {
    name: String,
    driver: &'static str,
    class: DeviceClass,
    state: Cell<DeviceState>,
}

impl Device {
    pub fn new(name: String, driver: &'static str, class: DeviceClass) -> Device {
        Device {
            name,
            driver,
            class,
            state: Cell::new(DeviceState::Active),
        }
    }

    /// Wrap a registered clock node, naming the device after the clock.
    pub fn clk(driver: &'static str, clk: Rc<ClockNode>) -> Result<Device, ErrorCode> {
        let name = owned_name(clk.name())?;
        Ok(Device::new(name, driver, DeviceClass::Clk(clk)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the driver that produced this device.
    pub fn driver(&self) -> &'static str {
        self.driver
    }

    pub fn class(&self) -> &DeviceClass {
        &self.class
    }

    pub fn state(&self) -> DeviceState {
        self.state.get()
    }

    pub fn as_clk(&self) -> Option<&Rc<ClockNode>> {
        match &self.class {
            DeviceClass::Clk(clk) => Some(clk),
        }
    }
}

/// Operations every driver provides to the framework.
///
/// The framework calls `remove`, `suspend` and `resume` at most once per
/// transition of a device produced by this driver's `probe`.
pub trait Driver {
    /// Name matched against the description node name (`name@index`).
    fn name(&self) -> &'static str;

    /// Validate `node` and build a device from it.
    ///
    /// On error nothing the probe created may remain reachable.
    fn probe(&self, node: &dyn DtNode) -> Result<Device, ErrorCode>;

    /// Tear down a device produced by `probe`.
    fn remove(&self, dev: Device);

    fn suspend(&self, dev: &Device);

    fn resume(&self, dev: &Device);
}

struct Bound<'a> {
    driver: &'a dyn Driver,
    device: Device,
}

/// Registered drivers and the devices they produced.
pub struct DriverManager<'a> {
    drivers: RefCell<Vec<&'a dyn Driver>>,
    devices: RefCell<Vec<Bound<'a>>>,
}

impl<'a> DriverManager<'a> {
    pub const fn new() -> DriverManager<'a> {
        DriverManager {
            drivers: RefCell::new(Vec::new()),
            devices: RefCell::new(Vec::new()),
        }
    }

    /// # Errors
    ///
    /// + [Err]\([ErrorCode::ALREADY]\): a driver with the same name is
    /// registered.
    pub fn register_driver(&self, driver: &'a dyn Driver) -> Result<(), ErrorCode> {
        if self.search_driver(driver.name()).is_some() {
            return Err(ErrorCode::ALREADY);
        }
        self.drivers.borrow_mut().push(driver);
        Ok(())
    }

    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): no driver has this name.
    /// + [Err]\([ErrorCode::BUSY]\): the driver still has devices.
    pub fn unregister_driver(&self, name: &str) -> Result<(), ErrorCode> {
        if self
            .devices
            .borrow()
            .iter()
            .any(|bound| bound.driver.name() == name)
        {
            return Err(ErrorCode::BUSY);
        }
        let mut drivers = self.drivers.borrow_mut();
        let index = drivers
            .iter()
            .position(|driver| driver.name() == name)
            .ok_or(ErrorCode::NODEVICE)?;
        drivers.remove(index);
        Ok(())
    }

    pub fn search_driver(&self, name: &str) -> Option<&'a dyn Driver> {
        self.drivers
            .borrow()
            .iter()
            .find(|driver| driver.name() == name)
            .copied()
    }

    /// Probe the description node `node`, named `compatible`.
    ///
    /// `compatible` is the driver name, optionally followed by `@` and an
    /// instance suffix (`clk-r128-pll@0`).
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): no driver matches `compatible`.
    /// + [Err]\([ErrorCode::ALREADY]\): a device with the same name exists.
    /// + Any error returned by the driver's probe.
    pub fn probe(&self, compatible: &str, node: &dyn DtNode) -> Result<(), ErrorCode> {
        let driver_name = match compatible.split_once('@') {
            Some((driver_name, _)) => driver_name,
            None => compatible,
        };

        let result = self
            .search_driver(driver_name)
            .ok_or(ErrorCode::NODEVICE)
            .and_then(|driver| {
                let device = driver.probe(node)?;
                if self.device_state(device.name()).is_some() {
                    driver.remove(device);
                    return Err(ErrorCode::ALREADY);
                }
                self.devices.borrow_mut().push(Bound { driver, device });
                Ok(())
            });

        if let Err(e) = result {
            if config::CONFIG.debug_probe {
                debug!("{}: probe failed: {}", compatible, e);
            }
        }
        result
    }

    /// Probe every `(compatible, node)` pair in order, returning how many
    /// produced a device. Failures do not stop the remaining probes.
    pub fn probe_all(&self, table: &[(&str, &dyn DtNode)]) -> usize {
        table
            .iter()
            .filter(|(compatible, node)| self.probe(compatible, *node).is_ok())
            .count()
    }

    /// Remove the device named `name` through its driver.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): no such device.
    pub fn remove_device(&self, name: &str) -> Result<(), ErrorCode> {
        let bound = {
            let mut devices = self.devices.borrow_mut();
            let index = devices
                .iter()
                .position(|bound| bound.device.name() == name)
                .ok_or(ErrorCode::NODEVICE)?;
            devices.remove(index)
        };
        bound.driver.remove(bound.device);
        Ok(())
    }

    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): no such device.
    /// + [Err]\([ErrorCode::ALREADY]\): the device is already suspended.
    pub fn suspend_device(&self, name: &str) -> Result<(), ErrorCode> {
        self.transition(name, DeviceState::Suspended)
    }

    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): no such device.
    /// + [Err]\([ErrorCode::ALREADY]\): the device is not suspended.
    pub fn resume_device(&self, name: &str) -> Result<(), ErrorCode> {
        self.transition(name, DeviceState::Active)
    }

    /// Suspend every active device, most recently probed first.
    pub fn suspend_all(&self) {
        for bound in self.devices.borrow().iter().rev() {
            Self::enter(bound, DeviceState::Suspended);
        }
    }

    /// Resume every suspended device, in probe order.
    pub fn resume_all(&self) {
        for bound in self.devices.borrow().iter() {
            Self::enter(bound, DeviceState::Active);
        }
    }

    pub fn device_state(&self, name: &str) -> Option<DeviceState> {
        self.devices
            .borrow()
            .iter()
            .find(|bound| bound.device.name() == name)
            .map(|bound| bound.device.state())
    }

    pub fn device_count(&self) -> usize {
        self.devices.borrow().len()
    }

    fn transition(&self, name: &str, state: DeviceState) -> Result<(), ErrorCode> {
        let devices = self.devices.borrow();
        let bound = devices
            .iter()
            .find(|bound| bound.device.name() == name)
            .ok_or(ErrorCode::NODEVICE)?;
        if Self::enter(bound, state) {
            Ok(())
        } else {
            Err(ErrorCode::ALREADY)
        }
    }

    /// Move `bound` into `state`, returning false if it was already there.
    fn enter(bound: &Bound, state: DeviceState) -> bool {
        if bound.device.state() == state {
            return false;
        }
        match state {
            DeviceState::Suspended => bound.driver.suspend(&bound.device),
            DeviceState::Active => bound.driver.resume(&bound.device),
        }
        bound.device.state.set(state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceState, DriverManager};
    use crate::clk::fixed::ClkFixed;
    use crate::clk::ClockRegistry;
    use crate::config;
    use crate::debug::{set_debug_writer, IoWrite};
    use crate::dt::{DtNode, DtObject};
    use crate::ErrorCode;
    use core::cell::RefCell;
    use std::boxed::Box;
    use std::string::String;
    use std::thread::{self, ThreadId};
    use std::vec::Vec;

    /// Keeps the debug output of one thread; other test threads may print
    /// concurrently through the same global sink.
    struct ThreadCapture {
        thread: ThreadId,
        out: &'static RefCell<Vec<u8>>,
    }

    impl IoWrite for ThreadCapture {
        fn write(&mut self, buf: &[u8]) -> usize {
            if thread::current().id() == self.thread {
                self.out.borrow_mut().extend_from_slice(buf);
            }
            buf.len()
        }
    }

    fn osc(name: &str, rate: i64) -> DtObject {
        DtObject::new().with("name", name).with("rate", rate)
    }

    #[test]
    fn probe_matches_driver_by_name() {
        let clocks = ClockRegistry::new();
        let fixed = ClkFixed::new(&clocks);
        let manager = DriverManager::new();
        manager.register_driver(&fixed).unwrap();

        assert_eq!(manager.probe("clk-fixed@0", &osc("osc24m", 24_000_000)), Ok(()));
        assert_eq!(manager.probe("clk-fixed", &osc("osc32k", 32_768)), Ok(()));
        assert_eq!(
            manager.probe("clk-gate@0", &osc("gate", 1)),
            Err(ErrorCode::NODEVICE)
        );
        assert_eq!(manager.device_count(), 2);
        assert_eq!(manager.device_state("osc24m"), Some(DeviceState::Active));
        assert_eq!(clocks.get_rate("osc32k"), Ok(32_768));
    }

    #[test]
    fn failed_probe_is_not_fatal() {
        let clocks = ClockRegistry::new();
        let fixed = ClkFixed::new(&clocks);
        let manager = DriverManager::new();
        manager.register_driver(&fixed).unwrap();

        let good = osc("osc24m", 24_000_000);
        let duplicate = osc("osc24m", 12_000_000);
        let bad_rate = osc("osc0", 0);
        let late = osc("osc32k", 32_768);
        let table: [(&str, &dyn DtNode); 4] = [
            ("clk-fixed@0", &good),
            ("clk-fixed@1", &duplicate),
            ("clk-fixed@2", &bad_rate),
            ("clk-fixed@3", &late),
        ];
        assert_eq!(manager.probe_all(&table), 2);
        assert_eq!(clocks.get_rate("osc24m"), Ok(24_000_000));
        assert_eq!(clocks.names(), ["osc24m", "osc32k"]);
    }

    #[test]
    fn failed_probe_is_logged() {
        let out: &'static RefCell<Vec<u8>> = Box::leak(Box::new(RefCell::new(Vec::new())));
        let sink = Box::leak(Box::new(ThreadCapture {
            thread: thread::current().id(),
            out,
        }));
        // This is the only test that installs a sink.
        unsafe { set_debug_writer(sink) };

        let clocks = ClockRegistry::new();
        let fixed = ClkFixed::new(&clocks);
        let manager = DriverManager::new();
        manager.register_driver(&fixed).unwrap();

        debug!("clk {}: rate {}", "osc24m", 24_000_000);
        debug_verbose!("probing {}", "clk-gate@0");
        assert_eq!(
            manager.probe("clk-gate@0", &osc("gate", 1)),
            Err(ErrorCode::NODEVICE)
        );

        let text = String::from_utf8(out.borrow().clone()).unwrap();
        assert!(text.starts_with("clk osc24m: rate 24000000\r\n"));
        assert!(text.contains(&format!("{}:", file!())));
        assert!(text.contains(": probing clk-gate@0\r\n"));
        assert_eq!(
            text.contains("clk-gate@0: probe failed: no such device (10)\r\n"),
            config::CONFIG.debug_probe
        );
    }

    #[test]
    fn driver_registration() {
        let clocks = ClockRegistry::new();
        let fixed = ClkFixed::new(&clocks);
        let other = ClkFixed::new(&clocks);
        let manager = DriverManager::new();

        assert_eq!(manager.register_driver(&fixed), Ok(()));
        assert_eq!(manager.register_driver(&other), Err(ErrorCode::ALREADY));
        assert_eq!(manager.search_driver("clk-fixed").unwrap().name(), "clk-fixed");

        manager.probe("clk-fixed@0", &osc("osc24m", 1)).unwrap();
        assert_eq!(manager.unregister_driver("clk-fixed"), Err(ErrorCode::BUSY));
        manager.remove_device("osc24m").unwrap();
        assert_eq!(manager.unregister_driver("clk-fixed"), Ok(()));
        assert_eq!(manager.unregister_driver("clk-fixed"), Err(ErrorCode::NODEVICE));
        assert!(manager.search_driver("clk-fixed").is_none());
    }

    #[test]
    fn remove_then_reprobe() {
        let clocks = ClockRegistry::new();
        let fixed = ClkFixed::new(&clocks);
        let manager = DriverManager::new();
        manager.register_driver(&fixed).unwrap();
        let desc = osc("osc24m", 24_000_000);

        manager.probe("clk-fixed@0", &desc).unwrap();
        assert_eq!(manager.remove_device("osc24m"), Ok(()));
        assert!(clocks.find("osc24m").is_none());
        assert_eq!(manager.device_state("osc24m"), None);
        assert_eq!(manager.remove_device("osc24m"), Err(ErrorCode::NODEVICE));

        assert_eq!(manager.probe("clk-fixed@0", &desc), Ok(()));
        assert!(clocks.find("osc24m").is_some());
    }

    #[test]
    fn suspend_resume_transitions() {
        let clocks = ClockRegistry::new();
        let fixed = ClkFixed::new(&clocks);
        let manager = DriverManager::new();
        manager.register_driver(&fixed).unwrap();
        manager.probe("clk-fixed@0", &osc("osc24m", 1)).unwrap();
        manager.probe("clk-fixed@1", &osc("osc32k", 1)).unwrap();

        assert_eq!(manager.resume_device("osc24m"), Err(ErrorCode::ALREADY));
        assert_eq!(manager.suspend_device("osc24m"), Ok(()));
        assert_eq!(manager.device_state("osc24m"), Some(DeviceState::Suspended));
        assert_eq!(manager.suspend_device("osc24m"), Err(ErrorCode::ALREADY));
        assert_eq!(manager.suspend_device("nope"), Err(ErrorCode::NODEVICE));

        manager.suspend_all();
        assert_eq!(manager.device_state("osc32k"), Some(DeviceState::Suspended));
        // The clock keeps running across suspend.
        assert_eq!(clocks.get_rate("osc32k"), Ok(1));

        manager.resume_all();
        assert_eq!(manager.device_state("osc24m"), Some(DeviceState::Active));
        assert_eq!(manager.device_state("osc32k"), Some(DeviceState::Active));
    }
}
