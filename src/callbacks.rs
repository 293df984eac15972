//! Callback registry and group telegram dispatcher.
//!
//! Applications register handlers once, at start-up, and bind them to group
//! addresses. A handler may carry an enable predicate that is evaluated on
//! every delivery; a handler whose predicate returns `false` is treated as
//! disabled for that telegram.
//!
//! ```text
//! callbacks (ids never reused)      bindings (insertion order)
//! ┌────┬──────────┬───────────┐     ┌────┬─────────┬──────────┐
//! │ id │ name     │ predicate │     │ id │ address │ callback │
//! ├────┼──────────┼───────────┤     ├────┼─────────┼──────────┤
//! │ 0  │ "light"  │ -         │ <── │ 0  │ 1/2/3   │ 0        │
//! │ 1  │ "blinds" │ enabled() │ <── │ 1  │ 2/0/1   │ 1        │
//! └────┴──────────┴───────────┘ <── │ 2  │ 1/2/3   │ 1        │
//!                                   └────┴─────────┴──────────┘
//! ```
//!
//! Binding ids are positions: removing a binding shifts the ones after it
//! down by one, keeping their relative order.
//!
//! Handlers run inline on the poll cycle that received the telegram, so a
//! slow handler delays the next receive.
//!
//! ## Example
//!
//! ```rust
//! use core::cell::Cell;
//! use knx_ip_node::callbacks::{CallbackRegistry, DispatchPolicy};
//! use knx_ip_node::protocol::{CommandType, GroupMessage};
//! use knx_ip_node::{ga, ia};
//!
//! let hits = Cell::new(0);
//! let mut on_light = |_msg: &GroupMessage<'_>| hits.set(hits.get() + 1);
//!
//! let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::FirstMatch);
//! let light = registry.register("light", &mut on_light, None)?;
//! registry.assign(ga!(1/2/3), light)?;
//!
//! let msg = GroupMessage::new(CommandType::Write, ga!(1/2/3), ia!(1, 1, 5), &[0x01]);
//! assert_eq!(registry.dispatch(&msg), 1);
//! assert_eq!(hits.get(), 1);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use core::fmt;

use heapless::Vec;

use crate::addressing::GroupAddress;
use crate::error::{KnxError, Result};
use crate::protocol::routing::GroupMessage;

/// Stable handle of a registered callback
pub type CallbackId = u8;

/// Position of a binding in the binding table
pub type BindingId = u8;

/// Handler invoked with each matching telegram
pub type Handler<'a> = &'a mut dyn FnMut(&GroupMessage<'_>);

/// Runtime enable predicate of a callback
pub type EnablePredicate<'a> = &'a dyn Fn() -> bool;

/// How many callbacks one telegram may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchPolicy {
    /// Stop at the first binding whose address matches. If that callback is
    /// disabled nothing is invoked.
    #[default]
    FirstMatch,
    /// Invoke every enabled callback bound to the address, in binding order.
    AllMatches,
}

/// Group address to callback association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    /// Destination the binding listens on
    pub address: GroupAddress,
    /// Callback to invoke
    pub callback: CallbackId,
}

/// Callback description for administration surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackInfo<'a> {
    /// Stable handle
    pub id: CallbackId,
    /// Name given at registration
    pub name: &'a str,
    /// Current value of the enable predicate (`true` without one)
    pub enabled: bool,
}

struct CallbackSlot<'a> {
    name: &'a str,
    handler: Handler<'a>,
    enabled: Option<EnablePredicate<'a>>,
}

impl CallbackSlot<'_> {
    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled.is_none_or(|predicate| predicate())
    }
}

/// Fixed-capacity callback registry and dispatcher
///
/// `CALLBACKS` and `BINDINGS` bound the two tables; both must fit in a `u8`
/// id.
pub struct CallbackRegistry<'a, const CALLBACKS: usize = 10, const BINDINGS: usize = 10> {
    callbacks: Vec<CallbackSlot<'a>, CALLBACKS>,
    bindings: Vec<Binding, BINDINGS>,
    policy: DispatchPolicy,
}

impl<'a, const CALLBACKS: usize, const BINDINGS: usize> CallbackRegistry<'a, CALLBACKS, BINDINGS> {
    const CAPACITY_CHECK: () = assert!(
        CALLBACKS <= 255 && BINDINGS <= 255,
        "callback and binding ids are u8"
    );

    /// Create an empty registry with a fixed dispatch policy
    pub fn new(policy: DispatchPolicy) -> Self {
        let () = Self::CAPACITY_CHECK;
        Self {
            callbacks: Vec::new(),
            bindings: Vec::new(),
            policy,
        }
    }

    /// Dispatch policy chosen at construction
    #[inline]
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Register a handler, optionally gated by `enabled`
    ///
    /// # Errors
    ///
    /// Returns a registry error if all `CALLBACKS` slots are taken.
    pub fn register(
        &mut self,
        name: &'a str,
        handler: Handler<'a>,
        enabled: Option<EnablePredicate<'a>>,
    ) -> Result<CallbackId> {
        let id = self.callbacks.len() as CallbackId;
        self.callbacks
            .push(CallbackSlot {
                name,
                handler,
                enabled,
            })
            .map_err(|_| {
                knx_log!(warn, "Callback table full, cannot register {}", name);
                KnxError::callbacks_exhausted()
            })?;
        knx_log!(debug, "Registered callback {} as {}", name, id);
        Ok(id)
    }

    /// Bind `callback` to `address`
    ///
    /// # Errors
    ///
    /// Returns a registry error if the callback id is unknown or all
    /// `BINDINGS` slots are taken.
    pub fn assign(&mut self, address: GroupAddress, callback: CallbackId) -> Result<BindingId> {
        if usize::from(callback) >= self.callbacks.len() {
            return Err(KnxError::unknown_callback());
        }
        let id = self.bindings.len() as BindingId;
        self.bindings
            .push(Binding { address, callback })
            .map_err(|_| {
                knx_log!(warn, "Binding table full, cannot bind {}", address);
                KnxError::bindings_exhausted()
            })?;
        Ok(id)
    }

    /// Remove a binding, shifting later bindings down
    ///
    /// # Errors
    ///
    /// Returns a registry error if no binding has that id.
    pub fn unassign(&mut self, binding: BindingId) -> Result<Binding> {
        let index = usize::from(binding);
        if index >= self.bindings.len() {
            return Err(KnxError::unknown_binding());
        }
        Ok(self.bindings.remove(index))
    }

    /// Remove every binding
    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Look a callback up by its registration name
    pub fn callback_id(&self, name: &str) -> Option<CallbackId> {
        self.callbacks
            .iter()
            .position(|slot| slot.name == name)
            .map(|index| index as CallbackId)
    }

    /// Whether `callback` exists and its predicate currently allows it
    pub fn is_enabled(&self, callback: CallbackId) -> bool {
        self.callbacks
            .get(usize::from(callback))
            .is_some_and(CallbackSlot::is_enabled)
    }

    /// Registered callbacks in id order
    pub fn callbacks(&self) -> impl Iterator<Item = CallbackInfo<'a>> + '_ {
        self.callbacks
            .iter()
            .enumerate()
            .map(|(index, slot)| CallbackInfo {
                id: index as CallbackId,
                name: slot.name,
                enabled: slot.is_enabled(),
            })
    }

    /// Bindings in table order
    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, Binding)> + '_ {
        self.bindings
            .iter()
            .copied()
            .enumerate()
            .map(|(index, binding)| (index as BindingId, binding))
    }

    /// Binding at `id`
    pub fn binding(&self, id: BindingId) -> Option<Binding> {
        self.bindings.get(usize::from(id)).copied()
    }

    /// Number of registered callbacks
    #[inline]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Number of bindings
    #[inline]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Deliver `msg` to the callbacks bound to its destination
    ///
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&mut self, msg: &GroupMessage<'_>) -> usize {
        let mut invoked = 0;

        for binding in self.bindings.iter().filter(|b| b.address == msg.destination) {
            let Some(slot) = self.callbacks.get_mut(usize::from(binding.callback)) else {
                continue;
            };

            if !slot.is_enabled() {
                knx_log!(trace, "Callback {} disabled for {}", slot.name, msg.destination);
                match self.policy {
                    DispatchPolicy::FirstMatch => break,
                    DispatchPolicy::AllMatches => continue,
                }
            }

            knx_log!(debug, "Dispatching {} to {}", msg.destination, slot.name);
            (slot.handler)(msg);
            invoked += 1;

            if self.policy == DispatchPolicy::FirstMatch {
                break;
            }
        }

        invoked
    }
}

impl<const CALLBACKS: usize, const BINDINGS: usize> fmt::Debug
    for CallbackRegistry<'_, CALLBACKS, BINDINGS>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.callbacks.len())
            .field("bindings", &self.bindings)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::IndividualAddress;
    use crate::protocol::cemi::CommandType;
    use core::cell::Cell;

    fn message(destination: GroupAddress) -> GroupMessage<'static> {
        GroupMessage::new(
            CommandType::Write,
            destination,
            IndividualAddress::from_parts(1, 1, 9),
            &[0x01],
        )
    }

    const A1: GroupAddress = GroupAddress::from_parts(1, 1, 1);
    const A2: GroupAddress = GroupAddress::from_parts(1, 1, 2);

    #[test]
    fn test_only_matching_callback_runs() {
        let a_hits = Cell::new(0);
        let b_hits = Cell::new(0);
        let mut a = |_m: &GroupMessage<'_>| a_hits.set(a_hits.get() + 1);
        let mut b = |_m: &GroupMessage<'_>| b_hits.set(b_hits.get() + 1);

        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::FirstMatch);
        let a_id = registry.register("a", &mut a, None).unwrap();
        let b_id = registry.register("b", &mut b, None).unwrap();
        registry.assign(A1, a_id).unwrap();
        registry.assign(A2, b_id).unwrap();

        assert_eq!(registry.dispatch(&message(A1)), 1);
        assert_eq!((a_hits.get(), b_hits.get()), (1, 0));

        assert_eq!(registry.dispatch(&message(GroupAddress::from_parts(3, 3, 3))), 0);
    }

    #[test]
    fn test_first_match_policy_with_disabled_callback() {
        let a_hits = Cell::new(0);
        let c_hits = Cell::new(0);
        let a_enabled = Cell::new(true);
        let a_pred = || a_enabled.get();
        let mut a = |_m: &GroupMessage<'_>| a_hits.set(a_hits.get() + 1);
        let mut c = |_m: &GroupMessage<'_>| c_hits.set(c_hits.get() + 1);

        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::FirstMatch);
        let a_id = registry.register("a", &mut a, Some(&a_pred)).unwrap();
        let c_id = registry.register("c", &mut c, None).unwrap();
        registry.assign(A1, a_id).unwrap();
        registry.assign(A1, c_id).unwrap();

        assert_eq!(registry.dispatch(&message(A1)), 1);
        assert_eq!((a_hits.get(), c_hits.get()), (1, 0));

        a_enabled.set(false);
        assert!(!registry.is_enabled(a_id));
        assert_eq!(registry.dispatch(&message(A1)), 0);
        assert_eq!((a_hits.get(), c_hits.get()), (1, 0));
    }

    #[test]
    fn test_all_matches_policy_skips_disabled_callback() {
        let a_hits = Cell::new(0);
        let c_hits = Cell::new(0);
        let a_enabled = Cell::new(true);
        let a_pred = || a_enabled.get();
        let mut a = |_m: &GroupMessage<'_>| a_hits.set(a_hits.get() + 1);
        let mut c = |_m: &GroupMessage<'_>| c_hits.set(c_hits.get() + 1);

        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::AllMatches);
        let a_id = registry.register("a", &mut a, Some(&a_pred)).unwrap();
        let c_id = registry.register("c", &mut c, None).unwrap();
        registry.assign(A1, a_id).unwrap();
        registry.assign(A1, c_id).unwrap();

        assert_eq!(registry.dispatch(&message(A1)), 2);
        assert_eq!((a_hits.get(), c_hits.get()), (1, 1));

        a_enabled.set(false);
        assert_eq!(registry.dispatch(&message(A1)), 1);
        assert_eq!((a_hits.get(), c_hits.get()), (1, 2));
    }

    #[test]
    fn test_handler_sees_message() {
        let seen = Cell::new(None);
        let mut handler = |m: &GroupMessage<'_>| seen.set(Some((m.command, m.data()[0])));

        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::FirstMatch);
        let id = registry.register("h", &mut handler, None).unwrap();
        registry.assign(A2, id).unwrap();
        registry.dispatch(&message(A2));

        assert_eq!(seen.get(), Some((CommandType::Write, 0x01)));
    }

    #[test]
    fn test_capacity_limits() {
        let mut h1 = |_m: &GroupMessage<'_>| {};
        let mut h2 = |_m: &GroupMessage<'_>| {};
        let mut h3 = |_m: &GroupMessage<'_>| {};

        let mut registry: CallbackRegistry<'_, 2, 2> =
            CallbackRegistry::new(DispatchPolicy::FirstMatch);
        let id = registry.register("h1", &mut h1, None).unwrap();
        registry.register("h2", &mut h2, None).unwrap();
        let err = registry.register("h3", &mut h3, None).unwrap_err();
        assert!(err.is_capacity_exhausted());

        registry.assign(A1, id).unwrap();
        registry.assign(A2, id).unwrap();
        assert!(registry.assign(A1, id).unwrap_err().is_capacity_exhausted());
        assert_eq!(registry.binding_count(), 2);
    }

    #[test]
    fn test_assign_unknown_callback() {
        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::FirstMatch);
        assert!(matches!(
            registry.assign(A1, 0),
            Err(KnxError::Registry(e)) if e.is_unknown_callback()
        ));
    }

    #[test]
    fn test_unassign_preserves_order() {
        let mut h = |_m: &GroupMessage<'_>| {};
        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::FirstMatch);
        let id = registry.register("h", &mut h, None).unwrap();

        let addresses = [
            GroupAddress::from_parts(1, 0, 1),
            GroupAddress::from_parts(1, 0, 2),
            GroupAddress::from_parts(1, 0, 3),
            GroupAddress::from_parts(1, 0, 4),
        ];
        for address in addresses {
            registry.assign(address, id).unwrap();
        }

        let removed = registry.unassign(1).unwrap();
        assert_eq!(removed.address, addresses[1]);

        let remaining: std::vec::Vec<_> = registry.bindings().map(|(i, b)| (i, b.address)).collect();
        assert_eq!(
            remaining,
            [(0, addresses[0]), (1, addresses[2]), (2, addresses[3])]
        );

        assert!(registry.unassign(3).is_err());
    }

    #[test]
    fn test_metadata() {
        let enabled = Cell::new(false);
        let pred = || enabled.get();
        let mut h1 = |_m: &GroupMessage<'_>| {};
        let mut h2 = |_m: &GroupMessage<'_>| {};

        let mut registry: CallbackRegistry<'_> = CallbackRegistry::new(DispatchPolicy::AllMatches);
        registry.register("light", &mut h1, None).unwrap();
        registry.register("blinds", &mut h2, Some(&pred)).unwrap();

        assert_eq!(registry.callback_id("blinds"), Some(1));
        assert_eq!(registry.callback_id("heating"), None);

        let infos: std::vec::Vec<_> = registry.callbacks().collect();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].name, "light");
        assert!(infos[0].enabled);
        assert!(!infos[1].enabled);
        assert!(!registry.is_enabled(7));
    }
}
