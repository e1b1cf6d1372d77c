// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! The VI ("video interface"), responsible for display timing.
//! It derives scanline and frame lengths from the TV standard and the
//! V_SYNC register, keeps the vertical blank event scheduled, and
//! synthesizes V_CURRENT from the cycles left until the next one.

use core::fmt;

use common::{numutil::NumExt, BusError, RegisterBlock};
use modular_bitfield::{
    bitfield,
    specifiers::{B15, B2, B4},
    BitfieldSpecifier,
};

use crate::{
    addr::*,
    interface::{Controller, FrameInfo, RcpHost},
    mi::{Interrupts, Mi},
    options::RcpConfig,
    scheduling::RcpEvent,
};

pub const NTSC_CLOCK: u32 = 48_681_812;
pub const PAL_CLOCK: u32 = 49_656_530;
pub const MPAL_CLOCK: u32 = 48_628_316;

/// Television standard of the console, taken from the cartridge header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
pub enum TvStandard {
    Pal,
    #[default]
    Ntsc,
    Mpal,
}

impl TvStandard {
    /// Decode the raw value found in ROM metadata.
    /// Unknown values fall back to NTSC.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Pal,
            1 => Self::Ntsc,
            2 => Self::Mpal,
            _ => {
                log::warn!("Unknown TV standard {raw}, assuming NTSC");
                Self::Ntsc
            }
        }
    }

    pub fn clock_hz(self) -> u32 {
        match self {
            Self::Pal => PAL_CLOCK,
            Self::Ntsc => NTSC_CLOCK,
            Self::Mpal => MPAL_CLOCK,
        }
    }

    pub fn refresh_rate(self) -> u32 {
        match self {
            Self::Pal => 50,
            Self::Ntsc | Self::Mpal => 60,
        }
    }
}

#[bitfield]
#[repr(u32)]
#[derive(Debug, Clone, Copy)]
pub struct ViControl {
    pixel_type: PixelType,
    gamma_dither: bool,
    gamma: bool,
    divot: bool,
    vbus_clock: bool,
    serrate: bool,
    test_mode: bool,
    aa_mode: B2,
    #[skip]
    __: bool,
    kill_we: bool,
    pixel_advance: B4,
    dither_filter: bool,
    #[skip]
    __: B15,
}

#[derive(BitfieldSpecifier)]
#[bits = 2]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    Blank = 0,
    Reserved = 1,
    Rgba5553 = 2,
    Rgba8888 = 3,
}

/// What the VI reaches for when handling register side effects
/// or a vertical blank.
pub struct ViBus<'a, H> {
    pub mi: &'a mut Mi,
    pub host: &'a mut H,
}

#[derive(Debug, Clone)]
pub struct Vi {
    regs: RegisterBlock<VI_LEN>,
    standard: TvStandard,
    clock_hz: u32,
    refresh_rate: u32,
    /// Both 0 until V_SYNC is first written.
    cycles_per_scanline: u32,
    cycles_per_vblank: u32,
    /// Interlace field currently shown. Only ever 0 or 1.
    field: u32,
    quiet: bool,
    compensate_drift: bool,
}

impl Vi {
    pub fn new(standard: TvStandard, config: &RcpConfig) -> Self {
        let mut vi = Self {
            regs: RegisterBlock::new(VI_BASE),
            standard,
            clock_hz: 0,
            refresh_rate: 0,
            cycles_per_scanline: 0,
            cycles_per_vblank: 0,
            field: 0,
            quiet: config.quiet,
            compensate_drift: config.compensate_vblank_drift,
        };
        vi.reset(standard);
        vi
    }

    /// Restore power-on state for the given TV standard.
    pub fn reset(&mut self, standard: TvStandard) {
        self.regs.clear();
        self.standard = standard;
        self.clock_hz = standard.clock_hz();
        self.refresh_rate = standard.refresh_rate();
        self.cycles_per_scanline = 0;
        self.cycles_per_vblank = 0;
        self.field = 0;
    }

    /// Recalculate frame timing for a new V_SYNC value.
    fn retime(&mut self, sync: u32) {
        let lines = u64::from(sync) + 1;
        let per_frame = u64::from(self.clock_hz / self.refresh_rate);
        let per_line = per_frame / lines;
        // Both are at most `per_frame`, which fits a u32
        self.cycles_per_scanline = per_line as u32;
        self.cycles_per_vblank = (per_line * lines) as u32;
    }

    /// Schedule the next vertical blank, unless one is already waiting or
    /// the interrupt line is not inside the frame.
    fn arm_vertical_blank<H: RcpHost>(&self, host: &mut H) {
        if host.is_scheduled(RcpEvent::VerticalBlank) {
            return;
        }

        let line = self.regs.get(VI_V_INTR);
        let sync = self.regs.get(VI_V_SYNC);
        if line >= sync {
            log::debug!("VI: Not scheduling vertical blank, V_INTR {line} >= V_SYNC {sync}");
        } else if self.cycles_per_vblank == 0 {
            log::debug!("VI: Not scheduling vertical blank, V_SYNC {sync} gives empty frames");
        } else {
            host.schedule(RcpEvent::VerticalBlank, self.cycles_per_vblank);
        }
    }

    /// The scanline currently being scanned out, with the interlace
    /// field in bit 0.
    pub fn current_line<H: RcpHost>(&self, host: &H) -> u32 {
        if self.cycles_per_scanline == 0 {
            return self.field;
        }

        let remaining = host.cycles_until(RcpEvent::VerticalBlank);
        let executed = self.cycles_per_vblank.saturating_sub(remaining);
        let mut line = executed / self.cycles_per_scanline;
        let sync = self.regs.get(VI_V_SYNC);
        if line >= sync {
            line -= sync;
        }
        (line & !1) | self.field
    }

    /// Handle the end of a frame. `late_by` is how many cycles after its
    /// due time the event is being handled.
    pub fn vertical_blank<H: RcpHost>(&mut self, bus: ViBus<'_, H>, late_by: u32) {
        self.field = if self.is_interlaced() { self.field ^ 1 } else { 0 };

        if self.cycles_per_vblank != 0 {
            let next = if self.compensate_drift {
                self.cycles_per_vblank.saturating_sub(late_by).max(1)
            } else {
                self.cycles_per_vblank
            };
            bus.host.schedule(RcpEvent::VerticalBlank, next);
        }

        bus.mi.raise(Interrupts::VI, bus.host);
        bus.host.present(self.frame_info());
        bus.host.yield_to_host();
    }

    /// Describe the frame buffer as currently configured.
    pub fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            origin: self.regs.get(VI_ORIGIN) & 0x00FF_FFFF,
            width: self.regs.get(VI_WIDTH) & 0xFFF,
            pixel_type: self.pixel_type(),
            field: self.field,
        }
    }

    pub fn control(&self) -> ViControl {
        ViControl::from(self.regs.get(VI_CONTROL))
    }

    pub fn is_interlaced(&self) -> bool {
        self.control().serrate()
    }

    pub fn pixel_type(&self) -> PixelType {
        self.control().pixel_type()
    }

    /// Is the frame buffer 32 bits per pixel?
    pub fn is_rgba8888(&self) -> bool {
        self.pixel_type() == PixelType::Rgba8888
    }

    pub fn x_scale(&self) -> f32 {
        scale(self.regs.get(VI_X_SCALE))
    }

    pub fn y_scale(&self) -> f32 {
        scale(self.regs.get(VI_Y_SCALE))
    }

    pub fn standard(&self) -> TvStandard {
        self.standard
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn refresh_rate(&self) -> u32 {
        self.refresh_rate
    }

    pub fn cycles_per_scanline(&self) -> u32 {
        self.cycles_per_scanline
    }

    pub fn cycles_per_vblank(&self) -> u32 {
        self.cycles_per_vblank
    }

    pub fn field(&self) -> u32 {
        self.field
    }

    pub fn contains(&self, addr: u32) -> bool {
        self.regs.contains(addr)
    }

    pub fn regs(&self) -> &RegisterBlock<VI_LEN> {
        &self.regs
    }
}

impl<'a, H: RcpHost> Controller<ViBus<'a, H>> for Vi {
    fn read_word(&mut self, offset: u32, bus: &mut ViBus<'a, H>) -> Result<u32, BusError> {
        if offset == VI_V_CURRENT {
            let line = self.current_line(&*bus.host);
            self.regs.write_word(offset, line)?;
        }
        self.regs.read_word(offset)
    }

    fn write_word(&mut self, offset: u32, value: u32, bus: &mut ViBus<'a, H>) -> Result<(), BusError> {
        match offset {
            VI_V_SYNC => {
                let previous = self.regs.read_word(offset)?;
                self.regs.write_word(offset, value)?;
                if previous != value {
                    self.retime(value);
                    if !self.quiet {
                        log::debug!(
                            "VI: V_SYNC = {value}, {} cycles per scanline, {} per frame",
                            self.cycles_per_scanline,
                            self.cycles_per_vblank
                        );
                    }
                    self.arm_vertical_blank(bus.host);
                }
                return Ok(());
            }

            VI_V_INTR => {
                self.regs.write_word(offset, value)?;
                self.arm_vertical_blank(bus.host);
            }

            // Acknowledge, the value is dropped
            VI_V_CURRENT => {
                bus.mi.lower(Interrupts::VI, bus.host);
                if !self.quiet {
                    log::debug!("VI: Interrupt acknowledged");
                }
                return Ok(());
            }

            _ => self.regs.write_word(offset, value)?,
        }

        if !self.quiet {
            log::debug!("VI: {} <- 0x{value:08X}", VI_NAMES[offset.us() / 4]);
        }
        Ok(())
    }

    fn write_narrow<T: NumExt>(
        &mut self,
        offset: u32,
        value: T,
        bus: &mut ViBus<'a, H>,
    ) -> Result<(), BusError> {
        let word = self.regs.merged(offset, value)?;
        self.write_word(offset & !3, word, bus)
    }
}

impl fmt::Display for Vi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VI @ 0x{:08X} ({:?})", self.regs.base(), self.standard)?;
        for (offset, value) in self.regs.words() {
            writeln!(f, "  {:<12} = 0x{value:08X}", VI_NAMES[offset.us() / 4])?;
        }
        writeln!(
            f,
            "  interlaced: {}, pixel type: {:?}, field: {}",
            self.is_interlaced(),
            self.pixel_type(),
            self.field
        )?;
        writeln!(f, "  X scale: {:.4}, Y scale: {:.4}", self.x_scale(), self.y_scale())?;
        write!(
            f,
            "  {} cycles per scanline, {} cycles per frame",
            self.cycles_per_scanline, self.cycles_per_vblank
        )
    }
}

/// Scale factors are 2.10 fixed point in the low 12 bits.
fn scale(reg: u32) -> f32 {
    (reg & 0xFFF) as f32 / 1024.0
}
