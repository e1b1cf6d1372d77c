// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

/// Configuration used when initializing the RCP.
/// These options don't change at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde_config", serde(default))]
pub struct RcpConfig {
    /// Do not log every register write.
    pub quiet: bool,
    /// Schedule the next vertical blank relative to when the current one
    /// was due instead of when it actually ran, so that scheduler lateness
    /// does not accumulate across frames.
    pub compensate_vblank_drift: bool,
}
