/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Block fragmentation.
//!
//! <https://drafts.csswg.org/css-break/>

use std::sync::Arc;

use app_units::Au;
use log::{debug, trace, warn};

use crate::constraint_space::{ConstraintSpaceBuilder, FragmentationType};
use crate::context::LayoutContext;
use crate::fragment_tree::{BlockBreakToken, PhysicalFragment};
use crate::geom::LogicalSize;
use crate::node::BlockNode;

/// A break token under construction. Once a box decides to break, it may
/// still lay out siblings in parallel flows before the fragmentainer is done;
/// those either break too or finish.
#[derive(Debug)]
pub(crate) struct PendingBreak {
    break_offset: Au,
    resume_child: Option<BlockNode>,
    child_break_tokens: Vec<Arc<BlockBreakToken>>,
    finished_children: Vec<BlockNode>,
}

impl PendingBreak {
    pub(crate) fn new(break_offset: Au, resume_child: Option<BlockNode>) -> Self {
        Self {
            break_offset,
            resume_child,
            child_break_tokens: Vec::new(),
            finished_children: Vec::new(),
        }
    }

    pub(crate) fn add_child_break_token(&mut self, token: Arc<BlockBreakToken>) {
        self.child_break_tokens.push(token);
    }

    pub(crate) fn add_finished_child(&mut self, child: BlockNode) {
        self.finished_children.push(child);
    }

    pub(crate) fn into_break_token(self, node: BlockNode) -> Arc<BlockBreakToken> {
        trace!(
            "Breaking {:?} at {:?}, {} broken children",
            node,
            self.break_offset,
            self.child_break_tokens.len()
        );
        Arc::new(BlockBreakToken::new(
            node,
            self.break_offset,
            self.resume_child,
            self.child_break_tokens,
            self.finished_children,
        ))
    }
}

/// Lays `root` out into pages `page_block_size` tall and returns one fragment
/// per page, in order. Stops after `max_fragmentainer_count` pages, or when a
/// page makes no progress.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "layout_paginated",
        skip_all,
        fields(servo_profiling = true),
        level = "trace",
    )
)]
pub fn layout_paginated(
    context: &LayoutContext,
    root: &BlockNode,
    page_inline_size: Au,
    page_block_size: Au,
) -> Vec<Arc<PhysicalFragment>> {
    let style = root.style();
    let page_size = LogicalSize::new(Some(page_inline_size), Some(page_block_size));
    let space = ConstraintSpaceBuilder::new(style.writing_mode)
        .set_text_direction(style.direction)
        .set_available_size(page_size)
        .set_percentage_resolution_size(page_size)
        .set_is_new_formatting_context(true)
        .set_is_root(true)
        .set_fragmentainer_space_available(Some(page_block_size))
        .set_fragmentation_type(FragmentationType::Page)
        .to_constraint_space();

    let mut pages: Vec<Arc<PhysicalFragment>> = Vec::new();
    let mut break_token: Option<Arc<BlockBreakToken>> = None;
    loop {
        let previous_break_offset = break_token.as_ref().map(|token| token.break_offset());
        let page = root.layout(context, &space, break_token.as_deref());
        break_token = page.break_token().cloned();
        pages.push(page);

        let Some(token) = break_token.as_ref() else {
            break;
        };
        if previous_break_offset.is_some_and(|offset| offset >= token.break_offset()) {
            warn!("Page {} made no progress, stopping pagination", pages.len());
            break;
        }
        if pages.len() >= context.options.max_fragmentainer_count {
            warn!(
                "Reached {} pages, dropping the remaining content",
                context.options.max_fragmentainer_count
            );
            break;
        }
    }

    debug!("Laid out {:?} in {} pages", root, pages.len());
    pages
}
