/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;

use app_units::Au;
use serde::Serialize;

use crate::node::BlockNode;

/// Where layout of a block box resumes after a fragmentainer break.
///
/// Tokens form a tree mirroring the boxes that broke: a box's token holds the
/// tokens of every child that broke inside the same fragmentainer, so that
/// parallel flows (floats next to in-flow content, overflowing children) each
/// resume where they stopped.
#[derive(Debug, Serialize)]
pub struct BlockBreakToken {
    #[serde(skip)]
    node: BlockNode,
    break_offset: Au,
    #[serde(skip)]
    resume_child: Option<BlockNode>,
    child_break_tokens: Vec<Arc<BlockBreakToken>>,
    #[serde(skip)]
    finished_children: Vec<BlockNode>,
}

impl BlockBreakToken {
    pub(crate) fn new(
        node: BlockNode,
        break_offset: Au,
        resume_child: Option<BlockNode>,
        child_break_tokens: Vec<Arc<BlockBreakToken>>,
        finished_children: Vec<BlockNode>,
    ) -> Self {
        Self {
            node,
            break_offset,
            resume_child,
            child_break_tokens,
            finished_children,
        }
    }

    /// The box this token resumes.
    pub fn node(&self) -> &BlockNode {
        &self.node
    }

    /// The block-axis offset into the box's unfragmented content consumed by
    /// this and all previous fragments.
    pub fn break_offset(&self) -> Au {
        self.break_offset
    }

    /// The first child to lay out when resuming. `None` when the box broke
    /// inside its own block-end border, padding or fixed block size.
    pub fn resume_child(&self) -> Option<&BlockNode> {
        self.resume_child.as_ref()
    }

    pub fn child_break_tokens(&self) -> &[Arc<BlockBreakToken>] {
        &self.child_break_tokens
    }

    pub fn child_break_token(&self, child: &BlockNode) -> Option<&Arc<BlockBreakToken>> {
        self.child_break_tokens
            .iter()
            .find(|token| token.node.ptr_eq(child))
    }

    pub(crate) fn finished_children(&self) -> &[BlockNode] {
        &self.finished_children
    }

    /// Whether `child` comes after the resume child but was already laid out
    /// completely, as part of a parallel flow.
    pub fn is_finished(&self, child: &BlockNode) -> bool {
        self.finished_children
            .iter()
            .any(|finished| finished.ptr_eq(child))
    }
}
