// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use crate::{
    addr::*,
    interface::{FrameInfo, RcpHost},
    options::RcpConfig,
    scheduling::RcpEvent,
    vi::TvStandard,
    Rcp,
};

mod mi;

/// Host recording everything the RCP asks of it.
/// Scheduling state is scripted: `schedule` marks the event pending
/// with `after` cycles remaining, tests adjust both as needed.
#[derive(Debug, Default)]
pub struct TestHost {
    pub scheduled: Vec<(RcpEvent, u32)>,
    pub pending: bool,
    pub remaining: u32,
    pub line_updates: Vec<bool>,
    pub frames: Vec<FrameInfo>,
    pub yields: usize,
}

impl RcpHost for TestHost {
    fn schedule(&mut self, evt: RcpEvent, after: u32) {
        self.scheduled.push((evt, after));
        self.pending = true;
        self.remaining = after;
    }

    fn is_scheduled(&self, _evt: RcpEvent) -> bool {
        self.pending
    }

    fn cycles_until(&self, _evt: RcpEvent) -> u32 {
        if self.pending {
            self.remaining
        } else {
            0
        }
    }

    fn update_interrupt_line(&mut self, asserted: bool) {
        self.line_updates.push(asserted);
    }

    fn present(&mut self, frame: FrameInfo) {
        self.frames.push(frame);
    }

    fn yield_to_host(&mut self) {
        self.yields += 1;
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rcp(standard: TvStandard) -> Rcp<TestHost> {
    rcp_with(standard, RcpConfig::default())
}

pub fn rcp_with(standard: TvStandard, config: RcpConfig) -> Rcp<TestHost> {
    init_logging();
    Rcp::new(standard, &config, TestHost::default())
}

pub fn write_mi<H: RcpHost>(rcp: &mut Rcp<H>, offset: u32, value: u32) {
    rcp.write::<u32>(MI_BASE + offset, value).unwrap();
}

pub fn read_mi<H: RcpHost>(rcp: &mut Rcp<H>, offset: u32) -> u32 {
    rcp.read::<u32>(MI_BASE + offset).unwrap()
}

pub fn write_vi<H: RcpHost>(rcp: &mut Rcp<H>, offset: u32, value: u32) {
    rcp.write::<u32>(VI_BASE + offset, value).unwrap();
}

pub fn read_vi<H: RcpHost>(rcp: &mut Rcp<H>, offset: u32) -> u32 {
    rcp.read::<u32>(VI_BASE + offset).unwrap()
}
