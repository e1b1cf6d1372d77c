// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::components::scheduler::Kind;

use crate::{interface::RcpHost, Rcp};

/// Callbacks the RCP requests from the CPU's scheduler.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[repr(u16)]
pub enum RcpEvent {
    /// End of a frame, handled by the VI.
    #[default]
    VerticalBlank,
}

impl RcpEvent {
    /// Handle the event by delegating to the appropriate handler.
    pub fn dispatch<H: RcpHost>(self, rcp: &mut Rcp<H>, late_by: u32) {
        match self {
            RcpEvent::VerticalBlank => rcp.vertical_blank(late_by),
        }
    }
}

impl Kind for RcpEvent {}
