// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use dusklight::{ColorChoice, GradualSpeed, LightRequest, Percent, SwitchAction};

#[derive(Parser, Debug)]
#[command(
    name = "dusklight",
    version,
    about = "Turn a smart bulb on at dusk and fade its brightness gradually"
)]
pub struct Cli {
    /// Turn the light on or off
    #[arg(short, long, value_name = "on|off")]
    pub switch: Option<SwitchAction>,

    /// Skip the already-on/off, time of day and daylight checks
    #[arg(short, long)]
    pub force: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Change brightness gradually
    #[arg(short, long, value_name = "fast|medium|slow|veryslow")]
    pub gradual: Option<GradualSpeed>,

    /// Target brightness percentage (0-100)
    #[arg(short, long)]
    pub brightness: Option<Percent>,

    /// White temperature percentage (0-100)
    #[arg(short, long)]
    pub temperature: Option<Percent>,

    /// Color name, `#rrggbb` or `white`
    #[arg(short, long)]
    pub color: Option<ColorChoice>,

    /// Configuration file (overrides DUSKLIGHT_CONF)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Options given on the command line, before configured defaults apply.
    pub fn request(&self) -> LightRequest {
        LightRequest {
            switch: self.switch,
            force: self.force,
            gradual: self.gradual,
            brightness: self.brightness,
            temperature: self.temperature,
            color: self.color,
        }
    }
}
