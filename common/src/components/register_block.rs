// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Backing store of a memory-mapped controller's registers.
//! Values are stored big-endian, like the guest sees them.
//! The block has no side effects; those live in the controller owning it.

use thiserror::Error;

use crate::{
    numutil::{lane_shift, NumExt},
    Pointer,
};

/// Failure of a single bus access. The access did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("{width}-byte access at 0x{addr:08X} is outside of registers 0x{base:08X}..0x{end:08X}")]
    OutOfBounds {
        addr: Pointer,
        width: u32,
        base: Pointer,
        end: Pointer,
    },
    #[error("{width}-byte access at 0x{addr:08X} is misaligned")]
    Misaligned { addr: Pointer, width: u32 },
    #[error("no controller is mapped at 0x{addr:08X}")]
    Unmapped { addr: Pointer },
}

/// A fixed-size block of registers, mapped at a base address on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBlock<const SIZE: usize> {
    base: Pointer,
    data: [u8; SIZE],
}

impl<const SIZE: usize> RegisterBlock<SIZE> {
    /// Length of the block in bytes.
    pub const LEN: u32 = SIZE as u32;

    /// Create a zeroed block mapped at the given address.
    pub fn new(base: Pointer) -> Self {
        Self {
            base,
            data: [0; SIZE],
        }
    }

    pub fn base(&self) -> Pointer {
        self.base
    }

    /// Does the given bus address fall into this block?
    pub fn contains(&self, addr: Pointer) -> bool {
        addr.checked_sub(self.base)
            .map_or(false, |offset| offset < Self::LEN)
    }

    /// Translate a bus address into an offset into the block, checking
    /// that an access of type `T` fits.
    pub fn offset_of<T: NumExt>(&self, addr: Pointer) -> Result<u32, BusError> {
        let offset = addr
            .checked_sub(self.base)
            .ok_or_else(|| self.out_of_bounds(addr, T::WIDTH))?;
        self.check::<T>(offset)?;
        Ok(offset)
    }

    /// Read a value at the given offset.
    pub fn read<T: NumExt>(&self, offset: u32) -> Result<T, BusError> {
        self.check::<T>(offset)?;
        let start = offset.us();
        let value = self.data[start..start + T::WIDTH.us()]
            .iter()
            .fold(0u32, |acc, byte| (acc << 8) | byte.u32());
        Ok(T::from_u32(value))
    }

    /// Write a value at the given offset.
    pub fn write<T: NumExt>(&mut self, offset: u32, value: T) -> Result<(), BusError> {
        self.check::<T>(offset)?;
        let start = offset.us();
        let width = T::WIDTH.us();
        let value = value.u32();
        for (idx, byte) in self.data[start..start + width].iter_mut().enumerate() {
            *byte = (value >> ((width - 1 - idx) * 8)) as u8;
        }
        Ok(())
    }

    #[inline]
    pub fn read_word(&self, offset: u32) -> Result<u32, BusError> {
        self.read::<u32>(offset)
    }

    #[inline]
    pub fn write_word(&mut self, offset: u32, value: u32) -> Result<(), BusError> {
        self.write::<u32>(offset, value)
    }

    /// The word containing `offset`, with `value` written into its lane.
    /// Nothing is stored.
    pub fn merged<T: NumExt>(&self, offset: u32, value: T) -> Result<u32, BusError> {
        self.check::<T>(offset)?;
        let word = self.read_word(offset & !3)?;
        let shift = lane_shift::<T>(offset);
        let mask = (u32::MAX >> (32 - T::WIDTH * 8)) << shift;
        Ok((word & !mask) | (value.u32() << shift))
    }

    /// Get a register the controller knows to exist.
    /// Panics on an offset outside the block; use [Self::read_word] for
    /// offsets coming from the bus.
    pub fn get(&self, offset: u32) -> u32 {
        assert!(offset % 4 == 0 && offset < Self::LEN, "invalid register 0x{offset:X}");
        let start = offset.us();
        self.data[start..start + 4]
            .iter()
            .fold(0u32, |acc, byte| (acc << 8) | byte.u32())
    }

    /// Set a register the controller knows to exist.
    /// Panics on an offset outside the block, like [Self::get].
    pub fn set(&mut self, offset: u32, value: u32) {
        assert!(offset % 4 == 0 && offset < Self::LEN, "invalid register 0x{offset:X}");
        let start = offset.us();
        self.data[start..start + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// OR the given mask into the word at the offset.
    pub fn set_bits(&mut self, offset: u32, mask: u32) -> Result<(), BusError> {
        let value = self.read_word(offset)?;
        self.write_word(offset, value | mask)
    }

    /// Clear the bits of the given mask in the word at the offset.
    pub fn clear_bits(&mut self, offset: u32, mask: u32) -> Result<(), BusError> {
        let value = self.read_word(offset)?;
        self.write_word(offset, value & !mask)
    }

    /// Raw register memory, for diagnostics.
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Zero all registers.
    pub fn clear(&mut self) {
        self.data = [0; SIZE];
    }

    /// Iterate all words of the block as (offset, value).
    pub fn words(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.data.chunks_exact(4).enumerate().map(|(idx, chunk)| {
            let value = chunk.iter().fold(0u32, |acc, byte| (acc << 8) | byte.u32());
            ((idx * 4) as u32, value)
        })
    }

    fn check<T: NumExt>(&self, offset: u32) -> Result<(), BusError> {
        let addr = self.base.wrapping_add(offset);
        if offset.checked_add(T::WIDTH).map_or(true, |end| end > Self::LEN) {
            Err(self.out_of_bounds(addr, T::WIDTH))
        } else if offset % T::WIDTH != 0 {
            Err(BusError::Misaligned {
                addr,
                width: T::WIDTH,
            })
        } else {
            Ok(())
        }
    }

    fn out_of_bounds(&self, addr: Pointer, width: u32) -> BusError {
        BusError::OutOfBounds {
            addr,
            width,
            base: self.base,
            end: self.base.wrapping_add(Self::LEN),
        }
    }
}
