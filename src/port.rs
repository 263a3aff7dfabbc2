//! Table of initialized UART_DM ports.

use crate::InitError;

/// Default number of ports a driver can register.
pub const DEFAULT_PORTS: usize = 4;

/// Handle of a registered port, assigned in initialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortId(pub u8);

impl PortId {
    /// Table index of this port.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only map from [`PortId`] to the base address of its register block.
#[derive(Debug, Clone)]
pub struct PortRegistry<const N: usize = DEFAULT_PORTS> {
    bases: [usize; N],
    len: usize,
}

impl<const N: usize> Default for PortRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PortRegistry<N> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        PortRegistry { bases: [0; N], len: 0 }
    }

    /// Appends `base`, returning the id of the new port.
    pub fn register(&mut self, base: usize) -> Result<PortId, InitError> {
        if self.is_full() {
            return Err(InitError::RegistryFull);
        }
        let id = u8::try_from(self.len).map_err(|_| InitError::RegistryFull)?;
        self.bases[self.len] = base;
        self.len += 1;
        Ok(PortId(id))
    }

    /// Base address of port `id`, if it has been registered.
    #[inline]
    pub fn resolve(&self, id: PortId) -> Option<usize> {
        self.bases[..self.len].get(id.index()).copied()
    }

    /// Number of registered ports.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no port has been registered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if no further port can be registered.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Maximum number of ports.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Registered ports in initialization order.
    pub fn iter(&self) -> impl Iterator<Item = (PortId, usize)> + '_ {
        self.bases[..self.len]
            .iter()
            .enumerate()
            .map(|(i, &base)| (PortId(i as u8), base))
    }
}
