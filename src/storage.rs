//! Persistence of bindings, physical address and configuration.
//!
//! The node writes one fixed layout at the start of a byte-addressable
//! store. Every size in it derives from the registry capacities, and so does
//! the magic number guarding it: a store written by a build with different
//! capacities is never restored.
//!
//! ```text
//! Offset               Size        Field
//! 0                    8           magic, big-endian
//! 8                    1           binding count
//! 9                    2*BINDINGS  binding addresses, big-endian
//! 9+2*BINDINGS         BINDINGS    binding callback ids
//! 9+3*BINDINGS         2           physical address
//! 11+3*BINDINGS        SPACE       configuration blob
//! ```
//!
//! Bytes behind the layout belong to the application, see
//! [`Layout::end`].

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::callbacks::CallbackRegistry;
use crate::config::ConfigRegistry;
use crate::error::{KnxError, Result};

/// Byte-addressable non-volatile memory (flash page, EEPROM, file)
///
/// Writes may be buffered until [`commit`](Self::commit).
pub trait NonVolatileStore {
    /// Size of the store in bytes
    fn capacity(&self) -> usize;

    /// Byte at `offset`
    fn read(&self, offset: usize) -> u8;

    /// Overwrite the byte at `offset`
    fn write(&mut self, offset: usize, value: u8);

    /// Make buffered writes durable
    ///
    /// # Errors
    ///
    /// Returns a storage error if the medium rejected the write.
    fn commit(&mut self) -> Result<()>;

    /// Copy `buf.len()` bytes starting at `offset` into `buf`
    fn read_into(&self, offset: usize, buf: &mut [u8]) {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.read(offset + i);
        }
    }

    /// Write `bytes` starting at `offset`
    fn write_all(&mut self, offset: usize, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.write(offset + i, byte);
        }
    }
}

impl<T: NonVolatileStore + ?Sized> NonVolatileStore for &mut T {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&self, offset: usize) -> u8 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u8) {
        (**self).write(offset, value);
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }
}

/// Offsets of the persisted layout for one set of capacities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// Compatibility magic
    pub magic: u64,
    /// Binding table capacity
    pub bindings: usize,
    /// Configuration blob size
    pub config_space: usize,
}

impl Layout {
    const MAGIC_OFFSET: usize = 0;
    const COUNT_OFFSET: usize = 8;
    const ADDRESSES_OFFSET: usize = 9;

    /// Layout for the given capacities
    pub const fn new(callbacks: usize, bindings: usize, configs: usize, config_space: usize) -> Self {
        let magic = 0xDEAD_BEEF_0000_0000_u64
            .wrapping_add((config_space as u64) << 24)
            .wrapping_add((bindings as u64) << 16)
            .wrapping_add((callbacks as u64) << 8)
            .wrapping_add(configs as u64);
        Self {
            magic,
            bindings,
            config_space,
        }
    }

    #[inline]
    const fn callback_ids(&self) -> usize {
        Self::ADDRESSES_OFFSET + 2 * self.bindings
    }

    #[inline]
    const fn physical_address(&self) -> usize {
        self.callback_ids() + self.bindings
    }

    #[inline]
    const fn config(&self) -> usize {
        self.physical_address() + 2
    }

    /// First byte after the layout
    #[inline]
    pub const fn end(&self) -> usize {
        self.config() + self.config_space
    }
}

/// Write the node state and commit
pub(crate) fn save<S, const CALLBACKS: usize, const BINDINGS: usize, const CONFIGS: usize, const SPACE: usize>(
    store: &mut S,
    callbacks: &CallbackRegistry<'_, CALLBACKS, BINDINGS>,
    config: &ConfigRegistry<'_, CONFIGS, SPACE>,
    physical_address: IndividualAddress,
) -> Result<()>
where
    S: NonVolatileStore + ?Sized,
{
    let layout = Layout::new(CALLBACKS, BINDINGS, CONFIGS, SPACE);
    if store.capacity() < layout.end() {
        knx_log!(warn, "Store holds {} bytes, layout needs {}", store.capacity(), layout.end());
        return Err(KnxError::store_too_small());
    }

    store.write_all(Layout::MAGIC_OFFSET, &layout.magic.to_be_bytes());
    store.write(Layout::COUNT_OFFSET, callbacks.binding_count() as u8);

    for index in 0..BINDINGS {
        let binding = callbacks.binding(index as u8);
        let address = binding.map_or(0, |b| b.address.raw());
        let callback = binding.map_or(0, |b| b.callback);
        store.write_all(Layout::ADDRESSES_OFFSET + 2 * index, &address.to_be_bytes());
        store.write(layout.callback_ids() + index, callback);
    }

    store.write_all(layout.physical_address(), &physical_address.raw().to_be_bytes());
    store.write_all(layout.config(), config.blob());
    store.commit()?;

    knx_log!(info, "Saved {} bindings and {} config items", callbacks.binding_count(), config.len());
    Ok(())
}

/// Restore the node state if the store carries a matching magic
///
/// Returns the restored physical address, or `None` when the magic does not
/// match and nothing was touched.
pub(crate) fn restore<S, const CALLBACKS: usize, const BINDINGS: usize, const CONFIGS: usize, const SPACE: usize>(
    store: &S,
    callbacks: &mut CallbackRegistry<'_, CALLBACKS, BINDINGS>,
    config: &mut ConfigRegistry<'_, CONFIGS, SPACE>,
) -> Result<Option<IndividualAddress>>
where
    S: NonVolatileStore + ?Sized,
{
    let layout = Layout::new(CALLBACKS, BINDINGS, CONFIGS, SPACE);
    if store.capacity() < layout.end() {
        return Err(KnxError::store_too_small());
    }

    let mut magic = [0u8; 8];
    store.read_into(Layout::MAGIC_OFFSET, &mut magic);
    let magic = u64::from_be_bytes(magic);
    if magic != layout.magic {
        knx_log!(warn, "Stored magic {:?} does not match {:?}, keeping defaults", magic, layout.magic);
        return Ok(None);
    }

    let count = usize::from(store.read(Layout::COUNT_OFFSET)).min(BINDINGS);
    callbacks.clear_bindings();
    for index in 0..count {
        let mut raw = [0u8; 2];
        store.read_into(Layout::ADDRESSES_OFFSET + 2 * index, &mut raw);
        let address = GroupAddress::from(u16::from_be_bytes(raw));
        let callback = store.read(layout.callback_ids() + index);
        if callbacks.assign(address, callback).is_err() {
            knx_log!(warn, "Dropping stored binding {} to unknown callback {}", address, callback);
        }
    }

    let mut raw = [0u8; 2];
    store.read_into(layout.physical_address(), &mut raw);
    let physical_address = IndividualAddress::from(u16::from_be_bytes(raw));

    let mut blob = [0u8; SPACE];
    store.read_into(layout.config(), &mut blob);
    let loaded = config.load_blob(&blob);

    knx_log!(
        info,
        "Restored {} bindings, {} config values, address {}",
        callbacks.binding_count(),
        loaded,
        physical_address
    );
    Ok(Some(physical_address))
}

/// RAM-backed store, erased to `0xFF` like flash
///
/// ```rust
/// use knx_ip_node::storage::{MemoryStore, NonVolatileStore};
///
/// let mut store = MemoryStore::<16>::new();
/// store.write(3, 0x42);
/// store.commit()?;
/// assert_eq!(store.read(3), 0x42);
/// assert_eq!(store.commits(), 1);
/// # Ok::<(), knx_ip_node::KnxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<const N: usize> {
    data: [u8; N],
    commits: usize,
    fail_commit: bool,
}

impl<const N: usize> MemoryStore<N> {
    /// Erased store
    pub const fn new() -> Self {
        Self {
            data: [0xFF; N],
            commits: 0,
            fail_commit: false,
        }
    }

    /// Raw contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of successful commits
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Make subsequent commits fail
    pub fn set_fail_commit(&mut self, fail: bool) {
        self.fail_commit = fail;
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NonVolatileStore for MemoryStore<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, offset: usize, value: u8) {
        if let Some(byte) = self.data.get_mut(offset) {
            *byte = value;
        }
    }

    fn commit(&mut self) -> Result<()> {
        if self.fail_commit {
            return Err(KnxError::commit_failed());
        }
        self.commits += 1;
        Ok(())
    }
}
