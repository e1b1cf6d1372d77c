// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Register semantics and display timing of the Nintendo 64's RCP:
//! the VI, which times frames and raises the vertical blank interrupt,
//! and the MI, which aggregates interrupts for the CPU.
//!
//! The CPU, its scheduler and the frontend are collaborators reached
//! through [RcpHost]; [system::SchedulerHost] is a host backed by the
//! scheduler in `common`.

use common::{
    numutil::{lane_shift, NumExt},
    BusError,
};

pub use crate::{
    interface::{Controller, FrameInfo, RcpHost},
    mi::{Interrupts, Mi, ModeFlags},
    options::RcpConfig,
    scheduling::RcpEvent,
    vi::{PixelType, TvStandard, Vi, ViBus},
};

pub mod addr;
pub mod interface;
pub mod mi;
pub mod options;
pub mod scheduling;
pub mod system;
#[cfg(test)]
mod tests;
pub mod vi;

/// The memory-mapped side of the RCP, as far as it is emulated here.
/// Routes bus accesses to the controller owning the address.
pub struct Rcp<H: RcpHost> {
    pub mi: Mi,
    pub vi: Vi,
    pub host: H,
}

impl<H: RcpHost> Rcp<H> {
    pub fn new(standard: TvStandard, config: &RcpConfig, host: H) -> Self {
        Self {
            mi: Mi::new(config),
            vi: Vi::new(standard, config),
            host,
        }
    }

    /// Restore power-on state. Events already handed to the host stay
    /// scheduled.
    pub fn reset(&mut self, standard: TvStandard) {
        self.mi.reset();
        self.vi.reset(standard);
    }

    /// Read a value of the given width from the bus.
    /// Narrow reads return their part of the containing word, which is
    /// read with side effects.
    pub fn read<T: NumExt>(&mut self, addr: u32) -> Result<T, BusError> {
        if self.mi.contains(addr) {
            let offset = self.mi.regs().offset_of::<T>(addr)?;
            let word = self.mi.read_word(offset & !3, &mut self.host)?;
            Ok(narrow(word, offset))
        } else if self.vi.contains(addr) {
            let offset = self.vi.regs().offset_of::<T>(addr)?;
            let mut bus = ViBus {
                mi: &mut self.mi,
                host: &mut self.host,
            };
            let word = self.vi.read_word(offset & !3, &mut bus)?;
            Ok(narrow(word, offset))
        } else {
            Err(BusError::Unmapped { addr })
        }
    }

    /// Write a value of the given width to the bus.
    /// Narrow writes have the side effects of a write to the containing word.
    pub fn write<T: NumExt>(&mut self, addr: u32, value: T) -> Result<(), BusError> {
        if self.mi.contains(addr) {
            let offset = self.mi.regs().offset_of::<T>(addr)?;
            if T::WIDTH == 4 {
                self.mi.write_word(offset, value.u32(), &mut self.host)
            } else {
                self.mi.write_narrow(offset, value, &mut self.host)
            }
        } else if self.vi.contains(addr) {
            let offset = self.vi.regs().offset_of::<T>(addr)?;
            let mut bus = ViBus {
                mi: &mut self.mi,
                host: &mut self.host,
            };
            if T::WIDTH == 4 {
                self.vi.write_word(offset, value.u32(), &mut bus)
            } else {
                self.vi.write_narrow(offset, value, &mut bus)
            }
        } else {
            Err(BusError::Unmapped { addr })
        }
    }

    /// Vertical blank callback, for schedulers that do not track lateness.
    pub fn on_vertical_blank(&mut self) {
        self.vertical_blank(0);
    }

    /// Vertical blank callback, `late_by` cycles after it was due.
    pub fn vertical_blank(&mut self, late_by: u32) {
        let bus = ViBus {
            mi: &mut self.mi,
            host: &mut self.host,
        };
        self.vi.vertical_blank(bus, late_by);
    }

    /// Is the interrupt line to the CPU asserted?
    pub fn interrupt_line(&self) -> bool {
        self.mi.line_asserted()
    }

    /// All registers and derived state as text.
    pub fn dump(&self) -> String {
        format!("{}\n{}", self.mi, self.vi)
    }
}

/// Extract the big-endian part at `offset` out of its containing word.
fn narrow<T: NumExt>(word: u32, offset: u32) -> T {
    T::from_u32(word >> lane_shift::<T>(offset))
}
