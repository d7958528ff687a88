// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Clock tree operations by name.
//!
//! Operations that depend on upstream clocks first collect the chain from
//! the named clock up to its root, then act on it. Collecting the chain is
//! the only place that follows parent links, and it stops after
//! `max_clock_depth` links so a cyclic description cannot loop forever.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use super::{owned_name, ClockNode, ClockRegistry};
use crate::config;
use crate::ErrorCode;

impl ClockRegistry {
    fn lookup(&self, name: &str) -> Result<Rc<ClockNode>, ErrorCode> {
        self.find(name).ok_or_else(|| {
            if config::CONFIG.debug_clk {
                debug!("clk: no clock named {}", name);
            }
            ErrorCode::NODEVICE
        })
    }

    /// The clock named `name` followed by each of its ancestors, root last.
    fn chain(&self, name: &str) -> Result<Vec<Rc<ClockNode>>, ErrorCode> {
        let mut chain = Vec::new();
        let mut clk = self.lookup(name)?;
        loop {
            let parent = clk
                .clock()
                .get_parent()
                .map(|parent| self.lookup(parent))
                .transpose()?;
            chain.push(clk);
            clk = match parent {
                Some(parent) => parent,
                None => return Ok(chain),
            };
            if chain.len() >= config::CONFIG.max_clock_depth {
                if config::CONFIG.debug_clk {
                    debug!("clk: parent chain of {} too deep or cyclic", name);
                }
                return Err(ErrorCode::INVAL);
            }
        }
    }

    /// Rate of the upstream clock of `chain[0]`, or 0 for a root clock.
    fn parent_rate(chain: &[Rc<ClockNode>]) -> Result<u64, ErrorCode> {
        chain
            .iter()
            .skip(1)
            .rev()
            .try_fold(0, |rate, clk| clk.clock().get_rate(rate))
    }

    /// Select `parent` as the upstream clock of `name`.
    ///
    /// Variants with fixed parent wiring ignore the request.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): either clock is not registered.
    pub fn set_parent(&self, name: &str, parent: &str) -> Result<(), ErrorCode> {
        let clk = self.lookup(name)?;
        self.lookup(parent)?;
        clk.clock().set_parent(parent);
        Ok(())
    }

    /// Name of the current upstream clock of `name`, `None` for a root.
    pub fn get_parent(&self, name: &str) -> Result<Option<String>, ErrorCode> {
        let clk = self.lookup(name)?;
        clk.clock().get_parent().map(owned_name).transpose()
    }

    /// Request `rate` Hz on `name`. The rate of its parent is resolved first
    /// and handed to the clock along with the request.
    ///
    /// Variants whose rate is fixed by hardware ignore the request.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::NODEVICE]\): the clock or one of its ancestors is
    /// not registered.
    /// + [Err]\([ErrorCode::INVAL]\): the parent chain is cyclic.
    /// + Any error of an ancestor's rate computation.
    pub fn set_rate(&self, name: &str, rate: u64) -> Result<(), ErrorCode> {
        let chain = self.chain(name)?;
        let parent_rate = Self::parent_rate(&chain)?;
        chain[0].clock().set_rate(parent_rate, rate);
        Ok(())
    }

    /// Current rate of `name` in Hz, computed from the root down from live
    /// hardware state. Root clocks are handed a parent rate of 0.
    ///
    /// # Errors
    ///
    /// Same as [`ClockRegistry::set_rate`], plus any error of the clock's own
    /// rate computation.
    pub fn get_rate(&self, name: &str) -> Result<u64, ErrorCode> {
        let chain = self.chain(name)?;
        let parent_rate = Self::parent_rate(&chain)?;
        chain[0].clock().get_rate(parent_rate).map_err(|e| {
            if config::CONFIG.debug_clk {
                debug!("clk: rate of {} not computable: {}", name, e);
            }
            e
        })
    }

    /// Enable `name` and all of its ancestors, root first, taking one
    /// reference on each.
    ///
    /// Nothing is enabled if the chain cannot be resolved.
    pub fn enable(&self, name: &str) -> Result<(), ErrorCode> {
        for clk in self.chain(name)?.iter().rev() {
            clk.clock().set_enable(true);
            clk.acquire();
        }
        Ok(())
    }

    /// Drop one reference on `name` and each of its ancestors, leaf first.
    /// A clock left without references is gated off.
    ///
    /// Nothing is disabled if the chain cannot be resolved.
    pub fn disable(&self, name: &str) -> Result<(), ErrorCode> {
        for clk in self.chain(name)?.iter() {
            clk.release();
            if clk.count() == 0 {
                clk.clock().set_enable(false);
            }
        }
        Ok(())
    }

    /// Whether `name` and every one of its ancestors report running.
    ///
    /// A clock that cannot be resolved is reported as not running.
    pub fn status(&self, name: &str) -> bool {
        match self.chain(name) {
            Ok(chain) => chain.iter().all(|clk| clk.clock().get_enable()),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test::{node, Call};
    use super::ClockRegistry;
    use crate::config;
    use crate::ErrorCode;
    use alloc::rc::Rc;
    use alloc::vec::Vec;

    fn tree() -> (ClockRegistry, Vec<Rc<super::ClockNode>>) {
        let clocks = ClockRegistry::new();
        let (osc, _) = node("osc24m", None, 0, 24_000_000);
        let (pll, _) = node("pll", Some("osc24m"), 10, 0);
        let (div, _) = node("div", Some("pll"), 2, 0);
        for clk in [&osc, &pll, &div] {
            clocks.register(clk).unwrap();
        }
        (clocks, vec![osc, pll, div])
    }

    #[test]
    fn rate_resolves_parent_first() {
        let (clocks, _nodes) = tree();
        assert_eq!(clocks.get_rate("osc24m"), Ok(24_000_000));
        assert_eq!(clocks.get_rate("pll"), Ok(240_000_000));
        assert_eq!(clocks.get_rate("div"), Ok(480_000_000));
        assert_eq!(clocks.get_rate("nope"), Err(ErrorCode::NODEVICE));
    }

    #[test]
    fn set_rate_passes_parent_rate() {
        let clocks = ClockRegistry::new();
        let (osc, _) = node("osc24m", None, 0, 24_000_000);
        let (pll, calls) = node("pll", Some("osc24m"), 10, 0);
        clocks.register(&osc).unwrap();
        clocks.register(&pll).unwrap();

        assert_eq!(clocks.set_rate("pll", 1_000), Ok(()));
        assert_eq!(*calls.borrow(), [Call::SetRate(24_000_000, 1_000)]);
        assert_eq!(clocks.set_rate("nope", 1_000), Err(ErrorCode::NODEVICE));
    }

    #[test]
    fn missing_parent_fails_rate() {
        let clocks = ClockRegistry::new();
        let (orphan, calls) = node("orphan", Some("gone"), 2, 0);
        clocks.register(&orphan).unwrap();

        assert_eq!(clocks.get_rate("orphan"), Err(ErrorCode::NODEVICE));
        assert_eq!(clocks.set_rate("orphan", 5), Err(ErrorCode::NODEVICE));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn cyclic_chain_terminates() {
        let clocks = ClockRegistry::new();
        let (a, a_calls) = node("a", Some("b"), 2, 0);
        let (b, _) = node("b", Some("a"), 2, 0);
        clocks.register(&a).unwrap();
        clocks.register(&b).unwrap();

        assert_eq!(clocks.get_rate("a"), Err(ErrorCode::INVAL));
        assert_eq!(clocks.set_rate("a", 1), Err(ErrorCode::INVAL));
        assert_eq!(clocks.enable("a"), Err(ErrorCode::INVAL));
        assert_eq!(clocks.disable("a"), Err(ErrorCode::INVAL));
        assert!(!clocks.status("a"));
        assert!(a_calls.borrow().is_empty());
        assert_eq!(a.count(), 0);
    }

    #[test]
    fn deep_acyclic_chain_within_bound() {
        let clocks = ClockRegistry::new();
        let mut nodes = Vec::new();
        let (root, _) = node("c0", None, 0, 1);
        clocks.register(&root).unwrap();
        nodes.push(root);
        for i in 1..config::CONFIG.max_clock_depth {
            let parent = format!("c{}", i - 1);
            let (clk, _) = node(&format!("c{}", i), Some(&parent), 1, 0);
            clocks.register(&clk).unwrap();
            nodes.push(clk);
        }
        let leaf = format!("c{}", config::CONFIG.max_clock_depth - 1);
        assert_eq!(clocks.get_rate(&leaf), Ok(1));
    }

    #[test]
    fn set_parent_requires_both_clocks() {
        let clocks = ClockRegistry::new();
        let (osc, _) = node("osc24m", None, 0, 24_000_000);
        let (pll, calls) = node("pll", Some("osc24m"), 10, 0);
        clocks.register(&osc).unwrap();
        clocks.register(&pll).unwrap();

        assert_eq!(clocks.set_parent("pll", "osc32k"), Err(ErrorCode::NODEVICE));
        assert_eq!(clocks.set_parent("nope", "osc24m"), Err(ErrorCode::NODEVICE));
        assert_eq!(clocks.set_parent("pll", "osc24m"), Ok(()));
        assert_eq!(*calls.borrow(), [Call::SetParent("osc24m".into())]);
        assert_eq!(clocks.get_parent("pll"), Ok(Some("osc24m".into())));
        assert_eq!(clocks.get_parent("osc24m"), Ok(None));
    }

    #[test]
    fn enable_counts_and_propagates() {
        let (clocks, nodes) = tree();
        let (osc, pll, div) = (&nodes[0], &nodes[1], &nodes[2]);

        assert!(!clocks.status("div"));
        assert_eq!(clocks.enable("div"), Ok(()));
        assert_eq!(clocks.enable("pll"), Ok(()));
        assert!(clocks.status("div"));
        assert_eq!((osc.count(), pll.count(), div.count()), (2, 2, 1));

        // div loses its last reference, its ancestors keep one.
        assert_eq!(clocks.disable("div"), Ok(()));
        assert_eq!((osc.count(), pll.count(), div.count()), (1, 1, 0));
        assert!(!clocks.status("div"));
        assert!(clocks.status("pll"));

        assert_eq!(clocks.disable("pll"), Ok(()));
        assert!(!clocks.status("osc24m"));

        // Unbalanced disable saturates at zero.
        assert_eq!(clocks.disable("pll"), Ok(()));
        assert_eq!(pll.count(), 0);
        assert_eq!(clocks.enable("nope"), Err(ErrorCode::NODEVICE));
    }
}
