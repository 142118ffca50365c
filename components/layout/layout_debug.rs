/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Debug output for fragment trees.

use log::{debug, warn};

use crate::fragment_tree::PhysicalFragment;

pub fn fragment_tree_to_json(fragment: &PhysicalFragment) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(fragment)
}

/// Logs `fragment` and its descendants as JSON at debug level.
pub fn dump_fragment_tree(fragment: &PhysicalFragment) {
    match fragment_tree_to_json(fragment) {
        Ok(json) => debug!("Fragment tree:\n{}", json),
        Err(error) => warn!("Could not serialize fragment tree: {}", error),
    }
}
