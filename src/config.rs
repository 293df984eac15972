//! Typed configuration items packed into one byte blob.
//!
//! Items are appended in registration order and never move afterwards. Each
//! slot starts with a flag byte recording whether the value was set
//! explicitly, followed by the type's payload:
//!
//! ```text
//! ┌──────┬───────────────────────┐
//! │ flag │ payload               │
//! ├──────┼───────────────────────┤
//! │ 0/1  │ string: max_len bytes, NUL terminated
//! │ 0/1  │ int:    i32 big-endian
//! │ 0/1  │ bool:   0 or 1
//! │ 0/1  │ option: option code
//! │ 0/1  │ group address: u16 big-endian
//! └──────┴───────────────────────┘
//! ```
//!
//! Getters never fail: an unknown id or a type mismatch reads as the type's
//! zero value (`""`, `0`, `false`, `0/0/0`). Setters report such misuse as a
//! [`KnxError::Config`] and leave the blob untouched.
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::config::ConfigRegistry;
//!
//! let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
//! let room = config.register_string("Room", 10, "abc", None)?;
//!
//! assert_eq!(config.get_string(room), "abc");
//! config.set_string(room, "xyz")?;
//! assert_eq!(config.get_string(room), "xyz");
//!
//! config.restore_defaults();
//! assert_eq!(config.get_string(room), "abc");
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use core::fmt;

use heapless::Vec;

use crate::addressing::GroupAddress;
use crate::error::{KnxError, Result};

/// Handle of a registered item
pub type ConfigId = u8;

/// Flag bit marking an explicitly set value
const VALUE_SET: u8 = 0x01;

/// Enable predicate of an item
pub type ConfigPredicate<'a> = &'a dyn Fn() -> bool;

/// Payload type of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigType {
    /// NUL-terminated text occupying `max_len` bytes
    String {
        /// Payload size including the terminator
        max_len: u8,
    },
    /// Signed 32-bit integer
    Int,
    /// Boolean
    Bool,
    /// One code out of a fixed option list
    Option,
    /// Group address
    GroupAddress,
}

impl ConfigType {
    /// Payload size in bytes, flag excluded
    pub const fn payload_len(self) -> usize {
        match self {
            Self::String { max_len } => max_len as usize,
            Self::Int => 4,
            Self::Bool | Self::Option => 1,
            Self::GroupAddress => 2,
        }
    }

    /// Slot size in bytes, flag included
    pub const fn slot_len(self) -> usize {
        1 + self.payload_len()
    }
}

/// One choice of an option item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigOption<'a> {
    /// Label shown to the user
    pub name: &'a str,
    /// Stored code
    pub value: u8,
}

impl<'a> ConfigOption<'a> {
    /// Create an option
    pub const fn new(name: &'a str, value: u8) -> Self {
        Self { name, value }
    }
}

/// Item descriptor for administration surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigItem<'a> {
    /// Handle
    pub id: ConfigId,
    /// Name given at registration
    pub name: &'a str,
    /// Payload type
    pub kind: ConfigType,
    /// Offset of the flag byte in the blob
    pub offset: usize,
    /// Slot size, flag included
    pub len: usize,
    /// Whether the value was set explicitly
    pub is_set: bool,
    /// Current value of the enable predicate (`true` without one)
    pub enabled: bool,
}

struct ConfigSlot<'a> {
    name: &'a str,
    kind: ConfigType,
    offset: usize,
    options: &'a [ConfigOption<'a>],
    enabled: Option<ConfigPredicate<'a>>,
}

impl ConfigSlot<'_> {
    #[inline]
    fn payload(&self) -> core::ops::Range<usize> {
        let start = self.offset + 1;
        start..start + self.kind.payload_len()
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled.is_none_or(|predicate| predicate())
    }
}

/// Configuration registry with `CONFIGS` items in `SPACE` bytes
pub struct ConfigRegistry<'a, const CONFIGS: usize = 10, const SPACE: usize = 100> {
    slots: Vec<ConfigSlot<'a>, CONFIGS>,
    data: [u8; SPACE],
    defaults: [u8; SPACE],
    used: usize,
}

impl<'a, const CONFIGS: usize, const SPACE: usize> ConfigRegistry<'a, CONFIGS, SPACE> {
    const CAPACITY_CHECK: () = assert!(CONFIGS <= 255, "config ids are u8");

    /// Create an empty registry
    pub fn new() -> Self {
        let () = Self::CAPACITY_CHECK;
        Self {
            slots: Vec::new(),
            data: [0; SPACE],
            defaults: [0; SPACE],
            used: 0,
        }
    }

    /// Register a string item holding at most `max_len - 1` bytes of text
    ///
    /// # Errors
    ///
    /// Fails if `default` does not fit, or the registry is full.
    pub fn register_string(
        &mut self,
        name: &'a str,
        max_len: u8,
        default: &str,
        enabled: Option<ConfigPredicate<'a>>,
    ) -> Result<ConfigId> {
        if default.len() >= usize::from(max_len) {
            return Err(KnxError::config_value_too_long());
        }
        let id = self.allocate(name, ConfigType::String { max_len }, &[], enabled)?;
        self.write_default(id, |payload| write_string(payload, default));
        Ok(id)
    }

    /// Register a signed integer item
    pub fn register_int(
        &mut self,
        name: &'a str,
        default: i32,
        enabled: Option<ConfigPredicate<'a>>,
    ) -> Result<ConfigId> {
        let id = self.allocate(name, ConfigType::Int, &[], enabled)?;
        self.write_default(id, |payload| payload.copy_from_slice(&default.to_be_bytes()));
        Ok(id)
    }

    /// Register a boolean item
    pub fn register_bool(
        &mut self,
        name: &'a str,
        default: bool,
        enabled: Option<ConfigPredicate<'a>>,
    ) -> Result<ConfigId> {
        let id = self.allocate(name, ConfigType::Bool, &[], enabled)?;
        self.write_default(id, |payload| payload[0] = u8::from(default));
        Ok(id)
    }

    /// Register an item selecting one of `options`
    ///
    /// # Errors
    ///
    /// Fails if `options` is empty, `default` is not one of their codes, or
    /// the registry is full.
    pub fn register_option(
        &mut self,
        name: &'a str,
        options: &'a [ConfigOption<'a>],
        default: u8,
        enabled: Option<ConfigPredicate<'a>>,
    ) -> Result<ConfigId> {
        if options.is_empty() {
            return Err(KnxError::empty_options());
        }
        if !options.iter().any(|option| option.value == default) {
            return Err(KnxError::unknown_option());
        }
        let id = self.allocate(name, ConfigType::Option, options, enabled)?;
        self.write_default(id, |payload| payload[0] = default);
        Ok(id)
    }

    /// Register a group address item
    pub fn register_group_address(
        &mut self,
        name: &'a str,
        default: GroupAddress,
        enabled: Option<ConfigPredicate<'a>>,
    ) -> Result<ConfigId> {
        let id = self.allocate(name, ConfigType::GroupAddress, &[], enabled)?;
        self.write_default(id, |payload| {
            payload.copy_from_slice(&default.raw().to_be_bytes());
        });
        Ok(id)
    }

    fn allocate(
        &mut self,
        name: &'a str,
        kind: ConfigType,
        options: &'a [ConfigOption<'a>],
        enabled: Option<ConfigPredicate<'a>>,
    ) -> Result<ConfigId> {
        if self.used + kind.slot_len() > SPACE {
            knx_log!(warn, "Config space exhausted, cannot register {}", name);
            return Err(KnxError::config_space_exhausted());
        }
        let id = self.slots.len() as ConfigId;
        self.slots
            .push(ConfigSlot {
                name,
                kind,
                offset: self.used,
                options,
                enabled,
            })
            .map_err(|_| {
                knx_log!(warn, "Config table full, cannot register {}", name);
                KnxError::config_slots_exhausted()
            })?;
        self.used += kind.slot_len();
        knx_log!(debug, "Registered config {} as {}", name, id);
        Ok(id)
    }

    /// Write a default into both the live blob and the default snapshot
    fn write_default(&mut self, id: ConfigId, fill: impl Fn(&mut [u8])) {
        if let Some(slot) = self.slots.get(usize::from(id)) {
            let range = slot.payload();
            self.data[slot.offset] = 0;
            fill(&mut self.data[range.clone()]);
            self.defaults[slot.offset] = 0;
            fill(&mut self.defaults[range]);
        }
    }

    /// Slot of `id` if it has type `kind`
    fn typed_slot(&self, id: ConfigId, kind: fn(ConfigType) -> bool) -> Result<&ConfigSlot<'a>> {
        let slot = self
            .slots
            .get(usize::from(id))
            .ok_or_else(KnxError::unknown_config_item)?;
        if kind(slot.kind) {
            Ok(slot)
        } else {
            Err(KnxError::config_type_mismatch())
        }
    }

    fn payload_of(&self, id: ConfigId, kind: fn(ConfigType) -> bool) -> Option<&[u8]> {
        self.typed_slot(id, kind)
            .ok()
            .map(|slot| &self.data[slot.payload()])
    }

    /// Overwrite the payload of `id` and mark it explicitly set
    fn store(&mut self, id: ConfigId, kind: fn(ConfigType) -> bool, fill: impl FnOnce(&mut [u8])) -> Result<()> {
        let slot = self.typed_slot(id, kind)?;
        let (offset, range) = (slot.offset, slot.payload());
        self.data[offset] |= VALUE_SET;
        fill(&mut self.data[range]);
        Ok(())
    }

    /// Text of a string item
    pub fn get_string(&self, id: ConfigId) -> &str {
        self.payload_of(id, is_string)
            .map(|payload| {
                let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
                core::str::from_utf8(&payload[..end]).unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Value of an int item
    pub fn get_int(&self, id: ConfigId) -> i32 {
        self.payload_of(id, |kind| kind == ConfigType::Int)
            .map_or(0, |p| i32::from_be_bytes([p[0], p[1], p[2], p[3]]))
    }

    /// Value of a bool item
    pub fn get_bool(&self, id: ConfigId) -> bool {
        self.payload_of(id, |kind| kind == ConfigType::Bool)
            .is_some_and(|p| p[0] != 0)
    }

    /// Code of an option item
    pub fn get_option(&self, id: ConfigId) -> u8 {
        self.payload_of(id, |kind| kind == ConfigType::Option)
            .map_or(0, |p| p[0])
    }

    /// Value of a group address item
    pub fn get_group_address(&self, id: ConfigId) -> GroupAddress {
        self.payload_of(id, |kind| kind == ConfigType::GroupAddress)
            .map_or(GroupAddress::UNASSIGNED, |p| {
                GroupAddress::from(u16::from_be_bytes([p[0], p[1]]))
            })
    }

    /// Set a string item
    ///
    /// # Errors
    ///
    /// Fails if `id` is not a string item or `value` does not fit.
    pub fn set_string(&mut self, id: ConfigId, value: &str) -> Result<()> {
        let slot = self.typed_slot(id, is_string)?;
        if value.len() >= slot.kind.payload_len() {
            return Err(KnxError::config_value_too_long());
        }
        self.store(id, is_string, |payload| write_string(payload, value))
    }

    /// Set an int item
    pub fn set_int(&mut self, id: ConfigId, value: i32) -> Result<()> {
        self.store(id, |kind| kind == ConfigType::Int, |payload| {
            payload.copy_from_slice(&value.to_be_bytes());
        })
    }

    /// Set a bool item
    pub fn set_bool(&mut self, id: ConfigId, value: bool) -> Result<()> {
        self.store(id, |kind| kind == ConfigType::Bool, |payload| {
            payload[0] = u8::from(value);
        })
    }

    /// Select an option by code
    ///
    /// # Errors
    ///
    /// Fails if `id` is not an option item or `value` is not one of its codes.
    pub fn set_option(&mut self, id: ConfigId, value: u8) -> Result<()> {
        let slot = self.typed_slot(id, |kind| kind == ConfigType::Option)?;
        if !slot.options.iter().any(|option| option.value == value) {
            return Err(KnxError::unknown_option());
        }
        self.store(id, |kind| kind == ConfigType::Option, |payload| payload[0] = value)
    }

    /// Set a group address item
    pub fn set_group_address(&mut self, id: ConfigId, value: GroupAddress) -> Result<()> {
        self.store(id, |kind| kind == ConfigType::GroupAddress, |payload| {
            payload.copy_from_slice(&value.raw().to_be_bytes());
        })
    }

    /// Whether `id` holds an explicitly set value
    pub fn is_set(&self, id: ConfigId) -> bool {
        self.slots
            .get(usize::from(id))
            .is_some_and(|slot| self.data[slot.offset] & VALUE_SET != 0)
    }

    /// Whether `id` exists and its predicate currently allows it
    pub fn is_enabled(&self, id: ConfigId) -> bool {
        self.slots
            .get(usize::from(id))
            .is_some_and(ConfigSlot::is_enabled)
    }

    /// Option list of an option item, empty for any other id
    pub fn options(&self, id: ConfigId) -> &'a [ConfigOption<'a>] {
        self.slots.get(usize::from(id)).map_or(&[], |slot| slot.options)
    }

    /// Look an item up by its registration name
    pub fn item_id(&self, name: &str) -> Option<ConfigId> {
        self.slots
            .iter()
            .position(|slot| slot.name == name)
            .map(|index| index as ConfigId)
    }

    /// Descriptor of `id`
    pub fn item(&self, id: ConfigId) -> Option<ConfigItem<'a>> {
        self.slots.get(usize::from(id)).map(|slot| ConfigItem {
            id,
            name: slot.name,
            kind: slot.kind,
            offset: slot.offset,
            len: slot.kind.slot_len(),
            is_set: self.data[slot.offset] & VALUE_SET != 0,
            enabled: slot.is_enabled(),
        })
    }

    /// Descriptors of all items in registration order
    pub fn items(&self) -> impl Iterator<Item = ConfigItem<'a>> + '_ {
        (0..self.slots.len()).filter_map(move |index| self.item(index as ConfigId))
    }

    /// Number of registered items
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bytes of the blob taken by registered slots
    #[inline]
    pub fn used_space(&self) -> usize {
        self.used
    }

    /// Make the current values the defaults that
    /// [`restore_defaults`](Self::restore_defaults) returns to
    pub fn snapshot_defaults(&mut self) {
        self.defaults = self.data;
    }

    /// Undo every explicit set
    pub fn restore_defaults(&mut self) {
        self.data = self.defaults;
    }

    /// The live blob, as persisted
    pub fn blob(&self) -> &[u8; SPACE] {
        &self.data
    }

    /// Load a persisted blob
    ///
    /// Every slot takes the persisted flag byte. Explicitly set slots also take
    /// the persisted payload, the others fall back to their default. Returns
    /// the number of explicitly set slots loaded.
    pub fn load_blob(&mut self, persisted: &[u8; SPACE]) -> usize {
        let mut loaded = 0;
        for slot in &self.slots {
            let flag = persisted[slot.offset];
            let payload = slot.payload();
            self.data[slot.offset] = flag;
            if flag & VALUE_SET != 0 {
                self.data[payload.clone()].copy_from_slice(&persisted[payload]);
                loaded += 1;
            } else {
                self.data[payload.clone()].copy_from_slice(&self.defaults[payload]);
            }
        }
        loaded
    }
}

impl<const CONFIGS: usize, const SPACE: usize> Default for ConfigRegistry<'_, CONFIGS, SPACE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CONFIGS: usize, const SPACE: usize> fmt::Debug for ConfigRegistry<'_, CONFIGS, SPACE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigRegistry")
            .field("items", &self.slots.len())
            .field("used", &self.used)
            .field("space", &SPACE)
            .finish()
    }
}

#[inline]
fn is_string(kind: ConfigType) -> bool {
    matches!(kind, ConfigType::String { .. })
}

/// Copy `value` and zero-fill the rest, terminator included
fn write_string(payload: &mut [u8], value: &str) {
    payload.fill(0);
    payload[..value.len()].copy_from_slice(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_string_defaults_and_restore() {
        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        let id = config.register_string("Room", 10, "abc", None).unwrap();

        assert_eq!(config.get_string(id), "abc");
        assert!(!config.is_set(id));

        config.set_string(id, "xyz").unwrap();
        assert_eq!(config.get_string(id), "xyz");
        assert!(config.is_set(id));

        config.restore_defaults();
        assert_eq!(config.get_string(id), "abc");
        assert!(!config.is_set(id));
    }

    #[test]
    fn test_shorter_string_clears_tail() {
        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        let id = config.register_string("Name", 10, "kitchen", None).unwrap();
        config.set_string(id, "hall").unwrap();
        assert_eq!(config.get_string(id), "hall");
    }

    #[test]
    fn test_string_length_limits() {
        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        assert!(matches!(
            config.register_string("Room", 3, "abc", None),
            Err(KnxError::Config(e)) if e.is_value_too_long()
        ));
        assert!(config.is_empty());

        let id = config.register_string("Room", 4, "abc", None).unwrap();
        assert!(config.set_string(id, "abcd").is_err());
        assert_eq!(config.get_string(id), "abc");
        assert!(!config.is_set(id));
    }

    #[test]
    fn test_typed_values() {
        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        let int = config.register_int("Offset", -5, None).unwrap();
        let flag = config.register_bool("Invert", true, None).unwrap();
        let ga = config
            .register_group_address("Status", GroupAddress::from_parts(1, 2, 3), None)
            .unwrap();

        assert_eq!(config.get_int(int), -5);
        assert!(config.get_bool(flag));
        assert_eq!(config.get_group_address(ga), GroupAddress::from_parts(1, 2, 3));

        config.set_int(int, 100_000).unwrap();
        config.set_bool(flag, false).unwrap();
        config
            .set_group_address(ga, GroupAddress::from_parts(4, 5, 6))
            .unwrap();

        assert_eq!(config.get_int(int), 100_000);
        assert!(!config.get_bool(flag));
        assert_eq!(config.get_group_address(ga), GroupAddress::from_parts(4, 5, 6));
    }

    #[test]
    fn test_blob_layout() {
        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        let s = config.register_string("S", 4, "ab", None).unwrap();
        let i = config.register_int("I", 0x0102_0304, None).unwrap();
        let g = config
            .register_group_address("G", GroupAddress::from(0x0A0B), None)
            .unwrap();

        assert_eq!(config.item(s).unwrap().offset, 0);
        assert_eq!(config.item(i).unwrap().offset, 5);
        assert_eq!(config.item(g).unwrap().offset, 10);
        assert_eq!(config.used_space(), 13);

        config.set_int(i, 0x0102_0304).unwrap();
        assert_eq!(
            &config.blob()[..13],
            &[0, b'a', b'b', 0, 0, 1, 1, 2, 3, 4, 0, 0x0A, 0x0B]
        );
    }

    #[test]
    fn test_options() {
        const MODES: [ConfigOption<'static>; 3] = [
            ConfigOption::new("Off", 0),
            ConfigOption::new("Auto", 1),
            ConfigOption::new("On", 2),
        ];

        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        assert!(matches!(
            config.register_option("Mode", &[], 0, None),
            Err(KnxError::Config(e)) if e.is_empty_options()
        ));
        assert!(config.register_option("Mode", &MODES, 7, None).is_err());

        let id = config.register_option("Mode", &MODES, 1, None).unwrap();
        assert_eq!(config.get_option(id), 1);
        assert_eq!(config.options(id).len(), 3);

        config.set_option(id, 2).unwrap();
        assert_eq!(config.get_option(id), 2);
        assert!(matches!(
            config.set_option(id, 9),
            Err(KnxError::Config(e)) if e.is_unknown_option()
        ));
        assert_eq!(config.get_option(id), 2);
    }

    #[test]
    fn test_capacity() {
        let mut config: ConfigRegistry<'_, 2, 100> = ConfigRegistry::new();
        config.register_bool("A", false, None).unwrap();
        config.register_bool("B", false, None).unwrap();
        let err = config.register_bool("C", false, None).unwrap_err();
        assert!(err.is_capacity_exhausted());

        let mut small: ConfigRegistry<'_, 10, 6> = ConfigRegistry::new();
        small.register_int("A", 1, None).unwrap();
        let err = small.register_int("B", 2, None).unwrap_err();
        assert!(matches!(&err, KnxError::Config(e) if e.is_capacity_exhausted()));
        assert_eq!(small.len(), 1);
        assert_eq!(small.used_space(), 5);
    }

    #[test]
    fn test_bad_ids_read_as_zero() {
        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        let int = config.register_int("I", 7, None).unwrap();

        assert_eq!(config.get_string(int), "");
        assert!(!config.get_bool(int));
        assert_eq!(config.get_int(42), 0);
        assert_eq!(config.get_group_address(42), GroupAddress::UNASSIGNED);
        assert!(!config.is_set(42));

        assert!(matches!(
            config.set_bool(int, true),
            Err(KnxError::Config(e)) if e.is_type_mismatch()
        ));
        assert!(matches!(
            config.set_int(42, 1),
            Err(KnxError::Config(e)) if e.is_unknown_item()
        ));
        assert_eq!(config.get_int(int), 7);
    }

    #[test]
    fn test_metadata() {
        let visible = Cell::new(false);
        let pred = || visible.get();

        let mut config: ConfigRegistry<'_> = ConfigRegistry::new();
        config.register_int("Delay", 10, None).unwrap();
        let advanced = config.register_bool("Advanced", false, Some(&pred)).unwrap();

        assert_eq!(config.item_id("Advanced"), Some(advanced));
        assert!(!config.is_enabled(advanced));
        visible.set(true);
        assert!(config.is_enabled(advanced));

        let names: std::vec::Vec<_> = config.items().map(|item| (item.name, item.len)).collect();
        assert_eq!(names, [("Delay", 5), ("Advanced", 2)]);
    }

    #[test]
    fn test_load_blob_only_takes_set_values() {
        let mut source: ConfigRegistry<'_> = ConfigRegistry::new();
        let a = source.register_int("A", 1, None).unwrap();
        let b = source.register_int("B", 2, None).unwrap();
        source.set_int(b, 20).unwrap();
        let persisted = *source.blob();

        let mut target: ConfigRegistry<'_> = ConfigRegistry::new();
        target.register_int("A", 100, None).unwrap();
        target.register_int("B", 200, None).unwrap();
        assert_eq!(target.load_blob(&persisted), 1);

        assert_eq!(target.get_int(a), 100);
        assert_eq!(target.get_int(b), 20);
        assert!(target.is_set(b));

        target.restore_defaults();
        assert_eq!(target.get_int(b), 200);
    }

    #[test]
    fn test_load_blob_clears_values_set_after_boot() {
        let mut source: ConfigRegistry<'_> = ConfigRegistry::new();
        source.register_int("A", 1, None).unwrap();
        source.register_string("Room", 10, "abc", None).unwrap();
        let persisted = *source.blob();

        let mut target: ConfigRegistry<'_> = ConfigRegistry::new();
        let a = target.register_int("A", 100, None).unwrap();
        let room = target.register_string("Room", 10, "abc", None).unwrap();
        target.snapshot_defaults();
        target.set_int(a, 7).unwrap();
        target.set_string(room, "xyz").unwrap();

        assert_eq!(target.load_blob(&persisted), 0);
        assert!(!target.is_set(a));
        assert!(!target.is_set(room));
        assert_eq!(target.get_int(a), 100);
        assert_eq!(target.get_string(room), "abc");
    }
}
