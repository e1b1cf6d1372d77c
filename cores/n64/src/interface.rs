// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::{numutil::NumExt, BusError};

use crate::{scheduling::RcpEvent, vi::PixelType};

/// Interface to the rest of the machine the RCP controllers are wired to:
/// the CPU with its event scheduler, and the frontend displaying frames.
pub trait RcpHost {
    /// Request a one-shot callback of the given kind after the given
    /// amount of CPU cycles.
    fn schedule(&mut self, evt: RcpEvent, after: u32);
    /// Is a callback of the given kind still waiting to fire?
    fn is_scheduled(&self, evt: RcpEvent) -> bool;
    /// Cycles left until the callback of the given kind fires.
    /// 0 if none is scheduled.
    fn cycles_until(&self, evt: RcpEvent) -> u32;

    /// The MI interrupt line was re-evaluated. `asserted` is true if
    /// any pending interrupt is also enabled in the mask.
    fn update_interrupt_line(&mut self, asserted: bool);

    /// Display the frame the VI just finished scanning out.
    fn present(&mut self, frame: FrameInfo);
    /// Give the host loop a chance to run other systems before the CPU
    /// continues. Must not block.
    fn yield_to_host(&mut self);
}

/// Frame handed to the host on every vertical blank.
/// The frame buffer itself lives in RDRAM, which the host owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// RDRAM address of the frame buffer.
    pub origin: u32,
    /// Width of a line, in pixels.
    pub width: u32,
    pub pixel_type: PixelType,
    /// Field that was shown; always 0 for progressive output.
    pub field: u32,
}

/// Register interface of a memory-mapped controller.
/// `C` is whatever the controller needs to reach for its side effects.
pub trait Controller<C> {
    /// Read the word at the given offset into the controller's registers.
    fn read_word(&mut self, offset: u32, ctx: &mut C) -> Result<u32, BusError>;
    /// Write the word at the given offset, applying any side effects.
    fn write_word(&mut self, offset: u32, value: u32, ctx: &mut C) -> Result<(), BusError>;
    /// Write a byte or half-word at the given offset. Side effects apply
    /// as for a write of the containing word.
    fn write_narrow<T: NumExt>(&mut self, offset: u32, value: T, ctx: &mut C)
        -> Result<(), BusError>;
}
