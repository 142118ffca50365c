/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Data shared by every box laid out in one layout run.

use std::sync::Arc;

use crate::formatting_contexts::LegacyLayout;
use crate::opts::LayoutOptions;

#[derive(Default)]
pub struct LayoutContext {
    pub options: LayoutOptions,

    /// Lays out flex, grid and table boxes built as ordinary block nodes.
    legacy_fallback: Option<Arc<dyn LegacyLayout>>,

    /// Set for layouts whose fragments are only measured and then dropped.
    /// Their boxes do not report geometry.
    is_measuring: bool,
}

impl LayoutContext {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            legacy_fallback: None,
            is_measuring: false,
        }
    }

    pub fn with_legacy_fallback(mut self, legacy: Arc<dyn LegacyLayout>) -> Self {
        self.legacy_fallback = Some(legacy);
        self
    }

    pub fn legacy_fallback(&self) -> Option<&Arc<dyn LegacyLayout>> {
        self.legacy_fallback.as_ref()
    }

    /// A context for a layout whose result is discarded after reading its size.
    pub(crate) fn for_measurement(&self) -> Self {
        Self {
            options: self.options.clone(),
            legacy_fallback: self.legacy_fallback.clone(),
            is_measuring: true,
        }
    }

    /// Whether positioning a fragment reports its geometry to its box.
    pub fn syncs_geometry(&self) -> bool {
        !self.is_measuring
    }
}
