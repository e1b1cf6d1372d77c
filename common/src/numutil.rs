// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

/// Trait for the integer widths a bus access can have.
pub trait NumExt: Copy + PartialEq + Default {
    /// Width of the type in bytes.
    const WIDTH: u32;

    /// Get the state of the given bit. Returns 0/1.
    fn bit(self, bit: u16) -> Self;

    /// Convert to u32, zero-extending
    fn u32(self) -> u32;
    /// Convert to usize
    fn us(self) -> usize;
    /// Convert from u32, truncating
    fn from_u32(from: u32) -> Self;
}

macro_rules! num_ext_impl {
    ($ty:ident, $w:expr) => {
        impl NumExt for $ty {
            const WIDTH: u32 = $w;

            #[inline(always)]
            fn bit(self, bit: u16) -> $ty {
                ((self >> bit) & 1)
            }

            #[inline(always)]
            fn u32(self) -> u32 {
                self as u32
            }

            #[inline(always)]
            fn us(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn from_u32(from: u32) -> Self {
                from as $ty
            }
        }
    };
}

num_ext_impl!(u8, 1);
num_ext_impl!(u16, 2);
num_ext_impl!(u32, 4);

/// Shift of the big-endian lane at `offset` inside its containing word.
#[inline]
pub fn lane_shift<T: NumExt>(offset: u32) -> u32 {
    (4 - T::WIDTH - (offset & 3)) * 8
}

/// Place `value` into its lane of an otherwise zero word.
#[inline]
pub fn lane<T: NumExt>(offset: u32, value: T) -> u32 {
    value.u32() << lane_shift::<T>(offset)
}

/// Extract every other bit of `value`, starting at `first`, into a
/// packed vector of `count` bits.
/// Used for registers that encode a clear/set pair per field.
#[inline]
pub fn gather_pairs(value: u32, first: u16, count: u16) -> u32 {
    (0..count).fold(0, |acc, idx| {
        acc | (value.bit(first + idx * 2) << idx)
    })
}
