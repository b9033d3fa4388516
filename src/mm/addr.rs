//! Tipos de endereço do simulador.
//!
//! `Vpn` identifica uma página virtual, `Pfn` um frame físico. Ambos são
//! índices; o simulador não modela offsets dentro da página.

use std::fmt;

/// Número de página virtual
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vpn(usize);

impl Vpn {
    #[inline]
    pub const fn new(vpn: usize) -> Self {
        Self(vpn)
    }

    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<usize> for Vpn {
    fn from(vpn: usize) -> Self {
        Self(vpn)
    }
}

impl fmt::Debug for Vpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vpn({})", self.0)
    }
}

impl fmt::Display for Vpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vpn {}", self.0)
    }
}

/// Número de frame físico
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pfn(usize);

impl Pfn {
    #[inline]
    pub const fn new(pfn: usize) -> Self {
        Self(pfn)
    }

    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<usize> for Pfn {
    fn from(pfn: usize) -> Self {
        Self(pfn)
    }
}

impl fmt::Debug for Pfn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pfn({})", self.0)
    }
}

impl fmt::Display for Pfn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pfn {}", self.0)
    }
}

/// Decompõe uma VPN em `(índice externo, índice interno)`.
///
/// `outer = vpn / inner_count`, `inner = vpn % inner_count`.
#[inline]
pub const fn decompose(vpn: Vpn, inner_count: usize) -> (usize, usize) {
    (vpn.0 / inner_count, vpn.0 % inner_count)
}

/// Operação inversa de `decompose`.
#[inline]
pub const fn compose(outer: usize, inner: usize, inner_count: usize) -> Vpn {
    Vpn(outer * inner_count + inner)
}
