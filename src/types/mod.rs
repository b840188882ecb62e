// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light control.
//!
//! Each type is validated at construction, so the engine never handles an
//! out-of-range level or an unknown profile name.
//!
//! # Types
//!
//! - [`Percent`] - Brightness or temperature level (0-100%)
//! - [`GradualSpeed`] - Transition speed profile
//! - [`RgbColor`] / [`ColorChoice`] - Requested color or white mode
//! - [`SwitchAction`] - Requested power change

mod brightness;
mod color;
mod power;
mod rgb_color;
mod speed;

pub use brightness::Percent;
pub use color::ColorChoice;
pub use power::SwitchAction;
pub use rgb_color::RgbColor;
pub use speed::GradualSpeed;
