// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! The MI ("MIPS interface"), which collects the interrupts of all RCP
//! components into the single interrupt line going to the CPU.

use core::fmt;

use bitflags::{bitflags, Flags};
use common::{
    numutil::{gather_pairs, lane, NumExt},
    BusError, RegisterBlock,
};

use crate::{
    addr::*,
    interface::{Controller, RcpHost},
    options::RcpConfig,
};

/// Value of the version register on retail units.
pub const MI_VERSION_VALUE: u32 = 0x0202_0102;

// MODE write bits
pub const MODE_INIT_LENGTH: u32 = 0x7F;
pub const MODE_CLR_INIT: u32 = 1 << 7;
pub const MODE_SET_INIT: u32 = 1 << 8;
pub const MODE_CLR_EBUS: u32 = 1 << 9;
pub const MODE_SET_EBUS: u32 = 1 << 10;
pub const MODE_CLR_DP: u32 = 1 << 11;
pub const MODE_CLR_RDRAM: u32 = 1 << 12;
pub const MODE_SET_RDRAM: u32 = 1 << 13;

// MASK write bits, a clear/set pair per source
pub const MASK_CLR_SP: u32 = 1 << 0;
pub const MASK_SET_SP: u32 = 1 << 1;
pub const MASK_CLR_SI: u32 = 1 << 2;
pub const MASK_SET_SI: u32 = 1 << 3;
pub const MASK_CLR_AI: u32 = 1 << 4;
pub const MASK_SET_AI: u32 = 1 << 5;
pub const MASK_CLR_VI: u32 = 1 << 6;
pub const MASK_SET_VI: u32 = 1 << 7;
pub const MASK_CLR_PI: u32 = 1 << 8;
pub const MASK_SET_PI: u32 = 1 << 9;
pub const MASK_CLR_DP: u32 = 1 << 10;
pub const MASK_SET_DP: u32 = 1 << 11;

/// Amount of interrupt sources.
const SOURCES: u16 = 6;

bitflags! {
    /// Interrupt sources, as laid out in the pending and mask registers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Interrupts: u32 {
        const SP = 1 << 0;
        const SI = 1 << 1;
        const AI = 1 << 2;
        const VI = 1 << 3;
        const PI = 1 << 4;
        const DP = 1 << 5;
    }
}

bitflags! {
    /// Mode flags, as laid out when reading the mode register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModeFlags: u32 {
        const INIT = 1 << 7;
        const EBUS = 1 << 8;
        const RDRAM = 1 << 9;
    }
}

/// Each mode flag with its set and clear bit in a MODE write.
const MODE_OPS: [(ModeFlags, u32, u32); 3] = [
    (ModeFlags::RDRAM, MODE_SET_RDRAM, MODE_CLR_RDRAM),
    (ModeFlags::INIT, MODE_SET_INIT, MODE_CLR_INIT),
    (ModeFlags::EBUS, MODE_SET_EBUS, MODE_CLR_EBUS),
];

/// The MI. Pending interrupts and the mask live in its registers;
/// they are only ever changed through the methods here.
#[derive(Debug, Clone)]
pub struct Mi {
    regs: RegisterBlock<MI_LEN>,
    quiet: bool,
}

impl Mi {
    pub fn new(config: &RcpConfig) -> Self {
        let mut mi = Self {
            regs: RegisterBlock::new(MI_BASE),
            quiet: config.quiet,
        };
        mi.reset();
        mi
    }

    /// Restore power-on state.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.regs.set(MI_VERSION, MI_VERSION_VALUE);
    }

    /// Raise an interrupt. The CPU is always notified, whether the
    /// source is masked or not.
    pub fn raise<H: RcpHost>(&mut self, source: Interrupts, host: &mut H) {
        let pending = self.pending() | source;
        self.regs.set(MI_INTERRUPT, pending.bits());
        host.update_interrupt_line(self.line_asserted());
    }

    /// Acknowledge an interrupt. The CPU is always notified.
    pub fn lower<H: RcpHost>(&mut self, source: Interrupts, host: &mut H) {
        let pending = self.pending() - source;
        self.regs.set(MI_INTERRUPT, pending.bits());
        host.update_interrupt_line(self.line_asserted());
    }

    pub fn pending(&self) -> Interrupts {
        Interrupts::from_bits_truncate(self.regs.get(MI_INTERRUPT))
    }

    pub fn mask(&self) -> Interrupts {
        Interrupts::from_bits_truncate(self.regs.get(MI_MASK))
    }

    pub fn mode(&self) -> ModeFlags {
        ModeFlags::from_bits_truncate(self.regs.get(MI_MODE))
    }

    pub fn init_length(&self) -> u32 {
        self.regs.get(MI_MODE) & MODE_INIT_LENGTH
    }

    /// Interrupts that are both pending and enabled.
    pub fn line(&self) -> Interrupts {
        self.pending() & self.mask()
    }

    /// Is the interrupt line to the CPU asserted?
    pub fn line_asserted(&self) -> bool {
        !self.line().is_empty()
    }

    pub fn contains(&self, addr: u32) -> bool {
        self.regs.contains(addr)
    }

    pub fn regs(&self) -> &RegisterBlock<MI_LEN> {
        &self.regs
    }

    /// Each mode flag is set first, then cleared; a write requesting
    /// both leaves the flag cleared.
    fn write_mode<H: RcpHost>(&mut self, value: u32, host: &mut H) -> Result<(), BusError> {
        self.regs.clear_bits(MI_MODE, MODE_INIT_LENGTH)?;
        self.regs.set_bits(MI_MODE, value & MODE_INIT_LENGTH)?;

        for (flag, set, clear) in MODE_OPS {
            if value & set != 0 {
                self.regs.set_bits(MI_MODE, flag.bits())?;
            }
            if value & clear != 0 {
                self.regs.clear_bits(MI_MODE, flag.bits())?;
            }
        }

        if value & MODE_CLR_DP != 0 {
            self.lower(Interrupts::DP, host);
        }
        Ok(())
    }

    /// Clears are applied first, then sets; a write requesting both
    /// leaves the source enabled.
    fn write_mask<H: RcpHost>(&mut self, value: u32, host: &mut H) -> Result<(), BusError> {
        let clear = gather_pairs(value, 0, SOURCES);
        let set = gather_pairs(value, 1, SOURCES);
        let was_asserted = self.line_asserted();

        self.regs.clear_bits(MI_MASK, clear)?;
        self.regs.set_bits(MI_MASK, set)?;

        let asserted = self.line_asserted();
        if asserted || was_asserted {
            host.update_interrupt_line(asserted);
        }
        Ok(())
    }
}

impl<H: RcpHost> Controller<H> for Mi {
    fn read_word(&mut self, offset: u32, _host: &mut H) -> Result<u32, BusError> {
        self.regs.read_word(offset)
    }

    fn write_word(&mut self, offset: u32, value: u32, host: &mut H) -> Result<(), BusError> {
        match offset {
            MI_MODE => self.write_mode(value, host)?,
            MI_MASK => self.write_mask(value, host)?,
            MI_VERSION | MI_INTERRUPT => {
                if !self.quiet {
                    log::debug!(
                        "MI: Ignoring write to read-only register {} (0x{value:08X})",
                        MI_NAMES[offset.us() / 4]
                    );
                }
                return Ok(());
            }
            // Every aligned offset is decoded above, so this only rejects
            _ => return self.regs.write_word(offset, value),
        }

        if !self.quiet {
            log::debug!(
                "MI: {} <- 0x{value:08X} (mode {:?}, pending {:?}, mask {:?})",
                MI_NAMES[offset.us() / 4],
                self.mode(),
                self.pending(),
                self.mask()
            );
        }
        Ok(())
    }

    fn write_narrow<T: NumExt>(
        &mut self,
        offset: u32,
        value: T,
        host: &mut H,
    ) -> Result<(), BusError> {
        let merged = self.regs.merged(offset, value)?;
        let word = match offset & !3 {
            MI_MODE => {
                // Init length is the only stored field, keep it unless written
                let written = lane(offset, T::from_u32(u32::MAX));
                lane(offset, value) | (self.regs.get(MI_MODE) & MODE_INIT_LENGTH & !written)
            }
            // Instructions: bits outside the written lane are no-ops
            MI_MASK => lane(offset, value),
            // Read-only, dropped by write_word
            _ => merged,
        };
        self.write_word(offset & !3, word, host)
    }
}

impl fmt::Display for Mi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MI @ 0x{:08X}", self.regs.base())?;
        for (offset, value) in self.regs.words() {
            writeln!(f, "  {:<12} = 0x{value:08X}", MI_NAMES[offset.us() / 4])?;
        }
        writeln!(
            f,
            "  mode: {} (init length {})",
            flag_names(self.mode()),
            self.init_length()
        )?;
        writeln!(f, "  pending: {}", flag_names(self.pending()))?;
        write!(f, "  mask: {}", flag_names(self.mask()))
    }
}

fn flag_names<F: Flags>(flags: F) -> String {
    if flags.is_empty() {
        return "-".to_string();
    }
    flags
        .iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" | ")
}
