// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dusklight - turn a smart bulb on at dusk and fade it gradually.
//!
//! Each invocation is one run against one bulb: read its status, apply the
//! requested color, then turn it on, turn it off or change its brightness,
//! optionally through a timed ramp.
//!
//! Automatic turn-on requests are filtered: nothing happens before 17:00
//! local time, and when a sunset provider is configured nothing happens
//! while more than fifteen minutes of daylight remain.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::Local;
//! use dusklight::daylight::{DaylightGate, OwmClient, OwmConfig};
//! use dusklight::driver::HttpConfig;
//! use dusklight::types::{GradualSpeed, SwitchAction};
//! use dusklight::{CommandOrchestrator, LightRequest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let light = HttpConfig::new("192.168.1.40", "bf0123456789abcdef")
//!         .with_local_key("0123456789abcdef")
//!         .connect()?;
//!     let sunset = OwmConfig::new("owm-api-key").into_client()?;
//!     let daylight = DaylightGate::<OwmClient>::new(Some(sunset), Some("Oslo,NO".into()));
//!
//!     let request = LightRequest {
//!         switch: Some(SwitchAction::On),
//!         gradual: Some(GradualSpeed::Slow),
//!         ..LightRequest::default()
//!     };
//!     let outcome = CommandOrchestrator::new(light, daylight)
//!         .run(&request, &Local::now())
//!         .await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Speed profiles
//!
//! | Profile    | Step | Interval |
//! |------------|------|----------|
//! | `fast`     | 10   | 0.2 s    |
//! | `medium`   | 10   | 1 s      |
//! | `slow`     | 7    | 1.5 s    |
//! | `veryslow` | 3    | 3 s      |

pub mod config;
pub mod daylight;
pub mod driver;
pub mod error;
mod orchestrator;
pub mod policy;
pub mod status;
pub mod transition;
pub mod types;

pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use orchestrator::{
    CommandOrchestrator, DEFAULT_ON_BRIGHTNESS, DEFAULT_TEMPERATURE, LightRequest, OFF_FLOOR,
    Outcome, SkipReason,
};
pub use status::DeviceStatus;
pub use types::{ColorChoice, GradualSpeed, Percent, RgbColor, SwitchAction};
