/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Configuration for a layout run.

use serde::{Deserialize, Serialize};

/// Global flags for layout, usually loaded from JSON.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Whether multi-column style properties create columns. When disabled,
    /// multi-column containers lay out as ordinary blocks.
    pub columns_enabled: bool,

    /// Whether flex, grid and table boxes are handed to the legacy layout
    /// collaborator, if one is registered.
    pub legacy_fallback_enabled: bool,

    /// The maximum number of columns one multi-column container produces, and
    /// of pages produced by [`crate::fragmentation::layout_paginated`].
    pub max_fragmentainer_count: usize,

    pub debug: DebugOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            columns_enabled: true,
            legacy_fallback_enabled: true,
            max_fragmentainer_count: 1000,
            debug: DebugOptions::default(),
        }
    }
}

impl LayoutOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Debug options for layout.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DebugOptions {
    /// List all the debug options.
    pub help: bool,

    /// Print the fragment tree after each layout.
    pub dump_fragment_tree: bool,

    /// Log every placement decision the block algorithm makes.
    pub trace_layout: bool,
}

impl DebugOptions {
    /// Enables the options named in a comma-separated list. Returns the first
    /// unknown option as the error.
    pub fn extend(&mut self, debug_string: String) -> Result<(), String> {
        for option in debug_string.split(',') {
            match option {
                "help" => self.help = true,
                "dump-fragment-tree" => self.dump_fragment_tree = true,
                "trace-layout" => self.trace_layout = true,
                "" => {},
                _ => return Err(String::from(option)),
            };
        }
        Ok(())
    }
}

pub fn debug_usage() -> String {
    let options = [
        ("dump-fragment-tree", "Print the fragment tree after each layout."),
        ("trace-layout", "Log every placement decision of the block algorithm."),
        ("help", "Show this help message."),
    ];
    let mut usage = String::from("Layout debug options, comma separated:\n");
    for (name, description) in options {
        usage.push_str(&format!("\t{:<35} {}\n", name, description));
    }
    usage
}
