// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! A host that drives the RCP from the scheduler in `common`, standing
//! in for the CPU side of the machine.

use std::collections::VecDeque;

use common::Scheduler;

use crate::{
    interface::{FrameInfo, RcpHost},
    options::RcpConfig,
    scheduling::RcpEvent,
    vi::TvStandard,
    Rcp,
};

/// Amount of presented frames kept around for the frontend.
const FRAME_QUEUE: usize = 4;

#[derive(Default)]
pub struct SchedulerHost {
    pub scheduler: Scheduler<RcpEvent>,
    /// Interrupt pending bit of the CPU's cause register the MI is wired to.
    pub cpu_interrupt: bool,
    /// Most recently presented frames, oldest first.
    pub frames: VecDeque<FrameInfo>,
    yielded: bool,
}

impl SchedulerHost {
    /// Did a vertical blank yield since the last call?
    pub fn take_yield(&mut self) -> bool {
        std::mem::take(&mut self.yielded)
    }
}

impl RcpHost for SchedulerHost {
    fn schedule(&mut self, evt: RcpEvent, after: u32) {
        self.scheduler.schedule(evt, after);
    }

    fn is_scheduled(&self, evt: RcpEvent) -> bool {
        self.scheduler.is_scheduled(evt)
    }

    fn cycles_until(&self, evt: RcpEvent) -> u32 {
        self.scheduler.remaining(evt).unwrap_or(0)
    }

    fn update_interrupt_line(&mut self, asserted: bool) {
        self.cpu_interrupt = asserted;
    }

    fn present(&mut self, frame: FrameInfo) {
        if self.frames.len() == FRAME_QUEUE {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    fn yield_to_host(&mut self) {
        self.yielded = true;
    }
}

impl Rcp<SchedulerHost> {
    /// Create an RCP driven by its own scheduler.
    pub fn with_scheduler(standard: TvStandard, config: &RcpConfig) -> Self {
        Self::new(standard, config, SchedulerHost::default())
    }

    /// Advance the scheduler by the cycles the CPU just executed, handling
    /// all events that became due. Returns whether the host was yielded to.
    pub fn advance_clock(&mut self, cycles: u32) -> bool {
        self.host.scheduler.advance(cycles);
        while let Some(event) = self.host.scheduler.get_next_pending() {
            event.kind.dispatch(self, event.late_by);
        }
        self.host.take_yield()
    }

    /// Skip ahead from event to event until the host is yielded to.
    /// Returns false if nothing is scheduled.
    pub fn run_to_yield(&mut self) -> bool {
        self.host.take_yield();
        while let Some(event) = self.host.scheduler.pop() {
            event.kind.dispatch(self, event.late_by);
            if self.host.take_yield() {
                return true;
            }
        }
        false
    }
}
