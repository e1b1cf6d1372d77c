// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

// MI
pub const MI_BASE: u32 = 0x0430_0000;
pub const MI_LEN: usize = 0x10;
pub const MI_MODE: u32 = 0x00;
pub const MI_VERSION: u32 = 0x04;
pub const MI_INTERRUPT: u32 = 0x08;
pub const MI_MASK: u32 = 0x0C;

// VI
pub const VI_BASE: u32 = 0x0440_0000;
pub const VI_LEN: usize = 0x38;
pub const VI_CONTROL: u32 = 0x00;
pub const VI_ORIGIN: u32 = 0x04;
pub const VI_WIDTH: u32 = 0x08;
pub const VI_V_INTR: u32 = 0x0C;
pub const VI_V_CURRENT: u32 = 0x10;
pub const VI_BURST: u32 = 0x14;
pub const VI_V_SYNC: u32 = 0x18;
pub const VI_H_SYNC: u32 = 0x1C;
pub const VI_H_SYNC_LEAP: u32 = 0x20;
pub const VI_H_VIDEO: u32 = 0x24;
pub const VI_V_VIDEO: u32 = 0x28;
pub const VI_V_BURST: u32 = 0x2C;
pub const VI_X_SCALE: u32 = 0x30;
pub const VI_Y_SCALE: u32 = 0x34;

/// Names of the VI registers, indexed by offset / 4.
pub const VI_NAMES: [&str; VI_LEN / 4] = [
    "CONTROL",
    "ORIGIN",
    "WIDTH",
    "V_INTR",
    "V_CURRENT",
    "BURST",
    "V_SYNC",
    "H_SYNC",
    "H_SYNC_LEAP",
    "H_VIDEO",
    "V_VIDEO",
    "V_BURST",
    "X_SCALE",
    "Y_SCALE",
];

/// Names of the MI registers, indexed by offset / 4.
pub const MI_NAMES: [&str; MI_LEN / 4] = ["MODE", "VERSION", "INTERRUPT", "MASK"];
