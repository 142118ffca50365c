/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod base_fragment;
mod break_token;
mod builder;
mod collapsed_margins;
mod fragment;

pub use base_fragment::*;
pub use break_token::*;
pub use builder::*;
pub use collapsed_margins::*;
pub use fragment::*;
