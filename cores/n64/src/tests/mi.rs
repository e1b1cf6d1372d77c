// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::BusError;

use super::*;
use crate::{interface::Controller, mi::*};

#[test]
fn test_version_after_reset() {
    let mut rcp = rcp(TvStandard::Ntsc);
    assert_eq!(read_mi(&mut rcp, MI_VERSION), MI_VERSION_VALUE);
    assert_eq!(read_mi(&mut rcp, MI_MODE), 0);
    assert_eq!(read_mi(&mut rcp, MI_INTERRUPT), 0);
    assert_eq!(read_mi(&mut rcp, MI_MASK), 0);
}

#[test]
fn test_mode_clear_wins() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MODE, MODE_SET_INIT | MODE_SET_EBUS);
    assert_eq!(rcp.mi.mode(), ModeFlags::INIT | ModeFlags::EBUS);

    write_mi(&mut rcp, MI_MODE, MODE_SET_INIT | MODE_CLR_INIT);
    assert!(!rcp.mi.mode().contains(ModeFlags::INIT));
    assert!(rcp.mi.mode().contains(ModeFlags::EBUS));
}

#[test]
fn test_mode_read_layout() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MODE, 0x45 | MODE_SET_RDRAM);
    assert_eq!(read_mi(&mut rcp, MI_MODE), 0x45 | (1 << 9));
    assert_eq!(rcp.mi.init_length(), 0x45);

    // Init length is replaced, flags are kept
    write_mi(&mut rcp, MI_MODE, 0x0F | MODE_SET_EBUS);
    assert_eq!(read_mi(&mut rcp, MI_MODE), 0x0F | (1 << 9) | (1 << 8));

    write_mi(&mut rcp, MI_MODE, MODE_CLR_RDRAM | MODE_CLR_EBUS);
    assert_eq!(rcp.mi.mode(), ModeFlags::empty());
}

#[test]
fn test_mask_set_wins() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MASK, MASK_CLR_VI | MASK_SET_VI);
    assert_eq!(rcp.mi.mask(), Interrupts::VI);
    assert_eq!(read_mi(&mut rcp, MI_MASK), 1 << 3);
}

#[test]
fn test_mask_pairs_map_to_sources() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(
        &mut rcp,
        MI_MASK,
        MASK_SET_SP | MASK_SET_SI | MASK_SET_AI | MASK_SET_VI | MASK_SET_PI | MASK_SET_DP,
    );
    assert_eq!(rcp.mi.mask(), Interrupts::all());

    write_mi(&mut rcp, MI_MASK, MASK_CLR_SI | MASK_CLR_PI);
    assert_eq!(
        rcp.mi.mask(),
        Interrupts::SP | Interrupts::AI | Interrupts::VI | Interrupts::DP
    );
}

#[test]
fn test_raise_notifies_once_when_enabled() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MASK, MASK_SET_VI);
    // Nothing pending, nothing to tell the CPU yet
    assert!(rcp.host.line_updates.is_empty());

    rcp.mi.raise(Interrupts::VI, &mut rcp.host);
    assert_eq!(rcp.host.line_updates, vec![true]);
    assert!(rcp.interrupt_line());
    assert_eq!(rcp.mi.line(), Interrupts::VI);

    write_mi(&mut rcp, MI_MASK, MASK_CLR_VI);
    assert!(!rcp.interrupt_line());
    assert_eq!(rcp.host.line_updates, vec![true, false]);
    assert_eq!(rcp.mi.pending(), Interrupts::VI);
}

#[test]
fn test_raise_notifies_while_masked() {
    let mut rcp = rcp(TvStandard::Ntsc);
    rcp.mi.raise(Interrupts::SP, &mut rcp.host);
    assert_eq!(rcp.host.line_updates, vec![false]);
    assert_eq!(read_mi(&mut rcp, MI_INTERRUPT), 1);
    assert!(!rcp.interrupt_line());

    // Unmasking a pending source asserts the line
    write_mi(&mut rcp, MI_MASK, MASK_SET_SP);
    assert_eq!(rcp.host.line_updates, vec![false, true]);
    assert!(rcp.interrupt_line());
}

#[test]
fn test_mode_clears_dp_interrupt() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MASK, MASK_SET_DP);
    rcp.mi.raise(Interrupts::DP | Interrupts::SI, &mut rcp.host);
    assert!(rcp.interrupt_line());

    write_mi(&mut rcp, MI_MODE, MODE_CLR_DP);
    assert_eq!(rcp.mi.pending(), Interrupts::SI);
    assert!(!rcp.interrupt_line());
    assert_eq!(rcp.host.line_updates.last(), Some(&false));
    assert_eq!(rcp.mi.mode(), ModeFlags::empty());
}

#[test]
fn test_read_only_registers_ignore_writes() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_VERSION, 0);
    write_mi(&mut rcp, MI_INTERRUPT, 0x3F);
    assert_eq!(read_mi(&mut rcp, MI_VERSION), MI_VERSION_VALUE);
    assert_eq!(rcp.mi.pending(), Interrupts::empty());
    assert!(rcp.host.line_updates.is_empty());
}

#[test]
fn test_bad_access_leaves_registers_alone() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MASK, MASK_SET_AI);
    let before = rcp.mi.regs().clone();

    let err = Controller::<TestHost>::write_word(&mut rcp.mi, 0x10, 0xFFFF_FFFF, &mut rcp.host);
    assert!(matches!(err, Err(BusError::OutOfBounds { .. })));
    let err = Controller::<TestHost>::write_word(&mut rcp.mi, 2, 0xFFFF_FFFF, &mut rcp.host);
    assert!(matches!(err, Err(BusError::Misaligned { .. })));
    let err = Controller::<TestHost>::write_narrow(&mut rcp.mi, 0x10, 0xFFu8, &mut rcp.host);
    assert!(matches!(err, Err(BusError::OutOfBounds { .. })));
    assert!(matches!(
        rcp.write::<u32>(MI_BASE + 6, 0xFFFF_FFFF),
        Err(BusError::Misaligned { .. })
    ));
    assert!(matches!(
        rcp.read::<u16>(MI_BASE + 0xF),
        Err(BusError::OutOfBounds { .. })
    ));
    assert_eq!(
        rcp.write::<u32>(MI_BASE + 0x10, 1),
        Err(BusError::Unmapped { addr: MI_BASE + 0x10 })
    );
    assert_eq!(rcp.mi.regs(), &before);
}

#[test]
fn test_narrow_access() {
    let mut rcp = rcp(TvStandard::Ntsc);
    assert_eq!(rcp.read::<u8>(MI_BASE + MI_VERSION), Ok(0x02));
    assert_eq!(rcp.read::<u16>(MI_BASE + MI_VERSION + 2), Ok(0x0102));

    // Narrow writes are instructions like word writes
    rcp.write::<u8>(MI_BASE + MI_MASK + 3, MASK_SET_VI as u8).unwrap();
    assert_eq!(rcp.mi.mask(), Interrupts::VI);
    rcp.write::<u8>(MI_BASE + MI_MODE + 2, (MODE_SET_EBUS >> 8) as u8).unwrap();
    assert_eq!(rcp.mi.mode(), ModeFlags::EBUS);
    assert!(rcp.host.line_updates.is_empty());
}

#[test]
fn test_narrow_writes_to_read_only_registers() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MASK, MASK_SET_VI);

    rcp.write::<u8>(MI_BASE + MI_INTERRUPT + 3, Interrupts::VI.bits() as u8).unwrap();
    rcp.write::<u16>(MI_BASE + MI_VERSION + 2, 0).unwrap();
    rcp.write::<u8>(MI_BASE + MI_VERSION, 0xFF).unwrap();

    assert_eq!(rcp.mi.pending(), Interrupts::empty());
    assert!(!rcp.interrupt_line());
    assert_eq!(read_mi(&mut rcp, MI_VERSION), MI_VERSION_VALUE);
    assert_eq!(read_mi(&mut rcp, MI_INTERRUPT), 0);
    assert!(rcp.host.line_updates.is_empty());
}

#[test]
fn test_narrow_mode_write_keeps_init_length() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MODE, 0x45);

    rcp.write::<u8>(MI_BASE + MI_MODE + 2, (MODE_SET_EBUS >> 8) as u8).unwrap();
    assert_eq!(rcp.mi.init_length(), 0x45);
    assert_eq!(rcp.mi.mode(), ModeFlags::EBUS);

    rcp.write::<u8>(MI_BASE + MI_MODE + 3, 0x12).unwrap();
    assert_eq!(rcp.mi.init_length(), 0x12);
    assert_eq!(rcp.mi.mode(), ModeFlags::EBUS);
}

#[test]
fn test_dump() {
    let mut rcp = rcp(TvStandard::Ntsc);
    write_mi(&mut rcp, MI_MASK, MASK_SET_VI | MASK_SET_SP);
    let dump = rcp.mi.to_string();
    assert!(dump.contains("VERSION"));
    assert!(dump.contains("0x02020102"));
    assert!(dump.contains("mask: SP | VI"));
    assert!(dump.contains("pending: -"));
}
