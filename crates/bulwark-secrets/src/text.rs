//! Fixed-capacity secret text for passwords and mnemonic passphrases.
//!
//! [`SecretText`] never allocates: the bytes live inline in the owning
//! frame and are zeroed when the value is dropped. Input longer than the
//! capacity is truncated on a UTF-8 character boundary.

use std::fmt;
use std::ops::{Deref, DerefMut};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum password length in bytes.
pub const MAX_PASSWORD_LENGTH: usize = 150;

/// Device password buffer.
pub type Password = SecretText<MAX_PASSWORD_LENGTH>;

/// Mnemonic passphrase buffer. Empty means "no passphrase".
pub type Passphrase = SecretText<MAX_PASSWORD_LENGTH>;

// ---------------------------------------------------------------------------
// Constant-time comparison
// ---------------------------------------------------------------------------

/// Constant-time byte comparison.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// The length check short-circuits; only the contents are compared in
/// constant time.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ---------------------------------------------------------------------------
// SecretText<N>
// ---------------------------------------------------------------------------

/// Inline, fixed-capacity UTF-8 secret.
///
/// Derives `Zeroize` + `ZeroizeOnDrop`: both the bytes and the length are
/// overwritten when the value goes out of scope.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretText<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> SecretText<N> {
    /// An empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Build a buffer holding `text`, truncated to capacity.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut s = Self::new();
        s.set(text);
        s
    }

    /// Replace the contents with `text`, truncated to capacity.
    ///
    /// The previous contents are wiped first so no stale tail survives a
    /// shorter write.
    pub fn set(&mut self, text: &str) {
        self.zeroize();
        let mut end = text.len().min(N);
        while !text.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        self.bytes[..end].copy_from_slice(&text.as_bytes()[..end]);
        self.len = end;
    }

    /// Copy another secret into this one, truncating at this capacity.
    pub fn copy_from<const M: usize>(&mut self, other: &SecretText<M>) {
        self.set(other.as_str());
    }

    /// The stored text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // `set` only ever stores a prefix ending on a char boundary.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// The stored bytes (without the unused tail).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of stored bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no text is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Wipe the buffer.
    pub fn clear(&mut self) {
        self.zeroize();
    }

    /// Returns `true` if every byte of the backing storage is zero.
    #[must_use]
    pub fn is_zeroed(&self) -> bool {
        self.len == 0 && self.bytes.iter().all(|&b| b == 0)
    }

    /// Constant-time equality on the stored bytes.
    #[must_use]
    pub fn ct_eq<const M: usize>(&self, other: &SecretText<M>) -> bool {
        constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl<const N: usize> Default for SecretText<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for SecretText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretText<{N}>(***)")
    }
}

impl<const N: usize> fmt::Display for SecretText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretText<{N}>(***)")
    }
}

// ---------------------------------------------------------------------------
// WipeGuard
// ---------------------------------------------------------------------------

/// Scoped borrow of a caller-owned secret that wipes it on drop.
///
/// Used where a buffer must be cleared before the current scope ends even
/// though the caller still owns it: every return path, including `?`,
/// drops the guard.
pub struct WipeGuard<'a, T: Zeroize + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: Zeroize + ?Sized> WipeGuard<'a, T> {
    /// Guard `target` until the end of the current scope.
    pub fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<T: Zeroize + ?Sized> Deref for WipeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Zeroize + ?Sized> DerefMut for WipeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Zeroize + ?Sized> Drop for WipeGuard<'_, T> {
    fn drop(&mut self) {
        self.target.zeroize();
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
