/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The seams to formatting contexts this crate does not implement itself.
//!
//! Inline content and the legacy layout modes (flex, grid and tables) are laid
//! out by collaborators. Both hand back fragments built with
//! [`crate::fragment_tree::FragmentBuilder`], immutable and with their offset
//! still unset, and the block algorithm positions them like any other child.

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::constraint_space::ConstraintSpace;
use crate::context::LayoutContext;
use crate::fragment_tree::PhysicalFragment;
use crate::layout_coordinator::LayoutStep;
use crate::node::{BlockNode, BoxKind};
use crate::sizing::ContentSizes;
use crate::style::Display;

/// Lays out an anonymous run of inline-level content as a single opaque box.
pub trait InlineLayout: Send + Sync {
    fn layout(&self, node: &BlockNode, space: &ConstraintSpace) -> Arc<PhysicalFragment>;

    fn compute_min_and_max_content_sizes(&self, node: &BlockNode) -> ContentSizes;
}

/// Lays out a box with a layout mode this crate does not support, one step at
/// a time.
pub trait LegacyLayout: Send + Sync {
    fn begin_layout(&self, node: &BlockNode, space: &ConstraintSpace) -> Box<dyn LegacyLayoutTask>;

    fn compute_min_and_max_content_sizes(&self, node: &BlockNode) -> ContentSizes;
}

/// An in-progress legacy layout. See [`crate::layout_coordinator::LayoutCoordinator`].
pub trait LegacyLayoutTask {
    fn step(&mut self) -> LayoutStep;
}

/// How a box gets laid out.
#[derive(Clone)]
pub(crate) enum FormattingContext {
    Block,
    Inline(Arc<dyn InlineLayout>),
    Legacy(Arc<dyn LegacyLayout>),
}

impl fmt::Debug for FormattingContext {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(match self {
            Self::Block => "Block",
            Self::Inline(_) => "Inline",
            Self::Legacy(_) => "Legacy",
        })
    }
}

impl FormattingContext {
    /// Flex, grid and table boxes built as ordinary block nodes go to the
    /// context's legacy fallback. Without one they are laid out as blocks.
    pub(crate) fn for_node(node: &BlockNode, context: &LayoutContext) -> Self {
        match node.kind() {
            BoxKind::Inline(inline) => Self::Inline(inline),
            BoxKind::Legacy(legacy) => Self::Legacy(legacy),
            BoxKind::Block => {
                if !matches!(node.style().display, Display::Flex | Display::Grid | Display::Table) {
                    return Self::Block;
                }
                match context.legacy_fallback() {
                    Some(legacy) if context.options.legacy_fallback_enabled => {
                        Self::Legacy(legacy.clone())
                    },
                    _ => {
                        warn!(
                            "No legacy layout for {:?} box, laying it out as a block",
                            node.style().display
                        );
                        Self::Block
                    },
                }
            },
        }
    }
}
