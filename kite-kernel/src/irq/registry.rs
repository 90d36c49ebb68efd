//! Active interrupt registry
//!
//! Records which interrupt identities already have an IRQHandler capability.
//! Private interrupts (SGI/PPI) are banked per core and get one entry per
//! core; a shared interrupt is one line whichever core it is routed to and
//! gets one entry total.
//!
//! # Index Layout
//!
//! ```text
//! 0 .. MAX_NODES*32            core * 32 + irq       (private)
//! MAX_NODES*32 .. ENTRIES      MAX_NODES*32 + irq-32 (shared)
//! ```
//!
//! Handler issuance must hold a [`RegistryGuard`] from the active check until
//! the identity is marked active, so two issuers racing for one identity
//! cannot both see it inactive.

use kite_cap::objects::irq::{IrqIdentity, IrqState, MAX_IRQ, MAX_NODES, NUM_PRIVATE_IRQS, SPI_BASE};
use spin::{Mutex, MutexGuard};

const PRIVATE_ENTRIES: usize = MAX_NODES * NUM_PRIVATE_IRQS as usize;

const SHARED_ENTRIES: usize = (MAX_IRQ + 1 - SPI_BASE) as usize;

/// Number of registry entries.
pub const REGISTRY_ENTRIES: usize = PRIVATE_ENTRIES + SHARED_ENTRIES;

const WORDS: usize = REGISTRY_ENTRIES.div_ceil(64);

/// Registry slot for `id`, or `None` if the identity cannot exist.
pub const fn registry_index(id: IrqIdentity) -> Option<usize> {
    if id.irq > MAX_IRQ {
        return None;
    }
    if id.is_private() {
        if id.core as usize >= MAX_NODES {
            return None;
        }
        Some(id.core as usize * NUM_PRIVATE_IRQS as usize + id.irq as usize)
    } else {
        Some(PRIVATE_ENTRIES + (id.irq - SPI_BASE) as usize)
    }
}

struct Bitmap {
    words: [u64; WORDS],
    count: usize,
}

impl Bitmap {
    const fn new() -> Self {
        Self {
            words: [0; WORDS],
            count: 0,
        }
    }

    fn get(&self, index: usize) -> bool {
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    fn set(&mut self, index: usize) -> bool {
        if self.get(index) {
            return false;
        }
        self.words[index / 64] |= 1u64 << (index % 64);
        self.count += 1;
        true
    }

    fn clear(&mut self, index: usize) -> bool {
        if !self.get(index) {
            return false;
        }
        self.words[index / 64] &= !(1u64 << (index % 64));
        self.count -= 1;
        true
    }
}

/// Interrupt identities that have a live IRQHandler capability.
pub struct ActiveIrqRegistry {
    bitmap: Mutex<Bitmap>,
}

impl ActiveIrqRegistry {
    pub const fn new() -> Self {
        Self {
            bitmap: Mutex::new(Bitmap::new()),
        }
    }

    /// Take the registry lock.
    pub fn lock(&self) -> RegistryGuard<'_> {
        RegistryGuard {
            bitmap: self.bitmap.lock(),
        }
    }

    pub fn is_active(&self, id: IrqIdentity) -> bool {
        self.lock().is_active(id)
    }

    pub fn state(&self, id: IrqIdentity) -> IrqState {
        self.lock().state(id)
    }

    pub fn active_count(&self) -> usize {
        self.lock().active_count()
    }
}

impl Default for ActiveIrqRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to the registry.
pub struct RegistryGuard<'a> {
    bitmap: MutexGuard<'a, Bitmap>,
}

impl RegistryGuard<'_> {
    pub fn is_active(&self, id: IrqIdentity) -> bool {
        registry_index(id).is_some_and(|index| self.bitmap.get(index))
    }

    pub fn state(&self, id: IrqIdentity) -> IrqState {
        if self.is_active(id) {
            IrqState::Active
        } else {
            IrqState::Inactive
        }
    }

    /// Mark `id` active. Returns `false` if it already was or cannot exist.
    pub fn activate(&mut self, id: IrqIdentity) -> bool {
        match registry_index(id) {
            Some(index) => self.bitmap.set(index),
            None => false,
        }
    }

    /// Mark `id` inactive. Returns `false` if it was not active.
    pub fn deactivate(&mut self, id: IrqIdentity) -> bool {
        match registry_index(id) {
            Some(index) => self.bitmap.clear(index),
            None => false,
        }
    }

    pub fn active_count(&self) -> usize {
        self.bitmap.count
    }
}
