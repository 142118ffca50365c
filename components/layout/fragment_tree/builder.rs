/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::{Arc, OnceLock};

use app_units::Au;

use super::{
    BaseFragment, BlockBreakToken, CollapsedMargin, FragmentFlags, FragmentKind, MarginStrut,
    OutOfFlowDescendant, PhysicalFragment,
};
use crate::geom::{Direction, LogicalOffset, LogicalSize, PhysicalSize, WritingMode};
use crate::node::{BlockNode, WeakBlockNode};
use crate::positioned::OutOfFlowCandidate;

/// Accumulates the result of a layout algorithm, in the writing mode of the box
/// being laid out, and turns it into an immutable [`PhysicalFragment`].
///
/// Layout algorithms and the inline and legacy collaborators all produce their
/// fragments through this type.
pub struct FragmentBuilder {
    kind: FragmentKind,
    writing_mode: WritingMode,
    direction: Direction,
    base: BaseFragment,
    node: WeakBlockNode,
    size: LogicalSize<Au>,
    overflow: LogicalSize<Au>,
    children: Vec<(Arc<PhysicalFragment>, LogicalOffset)>,
    out_of_flow_candidates: Vec<OutOfFlowCandidate>,
    out_of_flow_descendants: Vec<OutOfFlowCandidate>,
    margin_strut: MarginStrut,
    break_token: Option<Arc<BlockBreakToken>>,
    sync_geometry: bool,
}

impl FragmentBuilder {
    pub fn new(kind: FragmentKind, writing_mode: WritingMode, direction: Direction) -> Self {
        Self {
            kind,
            writing_mode,
            direction,
            base: BaseFragment::anonymous(),
            node: WeakBlockNode::default(),
            size: LogicalSize::zero(),
            overflow: LogicalSize::zero(),
            children: Vec::new(),
            out_of_flow_candidates: Vec::new(),
            out_of_flow_descendants: Vec::new(),
            margin_strut: MarginStrut::default(),
            break_token: None,
            sync_geometry: true,
        }
    }

    /// Associates the fragment with the box it is generated for.
    pub fn set_node(&mut self, node: &BlockNode) -> &mut Self {
        let flags = self.base.flags;
        self.base = node.into();
        self.base.flags.insert(flags);
        self.node = node.downgrade();
        self
    }

    pub fn add_flags(&mut self, flags: FragmentFlags) -> &mut Self {
        self.base.flags.insert(flags);
        self
    }

    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn size(&self) -> LogicalSize<Au> {
        self.size
    }

    pub fn set_inline_size(&mut self, inline_size: Au) -> &mut Self {
        self.size.inline = inline_size;
        self
    }

    pub fn set_block_size(&mut self, block_size: Au) -> &mut Self {
        self.size.block = block_size;
        self
    }

    pub fn set_inline_overflow(&mut self, inline_overflow: Au) -> &mut Self {
        self.overflow.inline = inline_overflow;
        self
    }

    pub fn set_block_overflow(&mut self, block_overflow: Au) -> &mut Self {
        self.overflow.block = block_overflow;
        self
    }

    /// Adds a child fragment at `offset`, the logical offset of its border box
    /// from this fragment's border box.
    ///
    /// Out-of-flow descendants the child could not place are re-expressed
    /// relative to this fragment and become candidates here.
    pub fn add_child(&mut self, child: Arc<PhysicalFragment>, offset: LogicalOffset) -> &mut Self {
        for descendant in child.out_of_flow_descendants() {
            let static_position = LogicalOffset::from_physical_point(
                descendant.static_position,
                self.writing_mode,
                self.direction,
                child.size(),
            ) + offset;
            self.out_of_flow_candidates.push(OutOfFlowCandidate {
                node: descendant.node.clone(),
                static_position,
            });
        }
        self.children.push((child, offset));
        self
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    pub fn add_out_of_flow_child_candidate(
        &mut self,
        node: BlockNode,
        static_position: LogicalOffset,
    ) -> &mut Self {
        self.out_of_flow_candidates.push(OutOfFlowCandidate {
            node,
            static_position,
        });
        self
    }

    /// Records a descendant for which this fragment is not the containing block,
    /// to be placed by an ancestor.
    pub fn add_out_of_flow_descendant(&mut self, descendant: OutOfFlowCandidate) -> &mut Self {
        self.out_of_flow_descendants.push(descendant);
        self
    }

    pub fn take_out_of_flow_candidates(&mut self) -> Vec<OutOfFlowCandidate> {
        std::mem::take(&mut self.out_of_flow_candidates)
    }

    pub fn margin_strut(&self) -> MarginStrut {
        self.margin_strut
    }

    pub fn set_margin_strut_block_start(&mut self, margin: CollapsedMargin) -> &mut Self {
        self.margin_strut.block_start = margin;
        self
    }

    pub fn set_margin_strut_block_end(&mut self, margin: CollapsedMargin) -> &mut Self {
        self.margin_strut.block_end = margin;
        self
    }

    pub fn set_break_token(&mut self, token: Arc<BlockBreakToken>) -> &mut Self {
        self.break_token = Some(token);
        self
    }

    pub fn has_break_token(&self) -> bool {
        self.break_token.is_some()
    }

    /// Whether positioning the children in [`Self::to_fragment`] reports their
    /// geometry to their boxes. On by default.
    pub fn set_sync_geometry(&mut self, sync_geometry: bool) -> &mut Self {
        self.sync_geometry = sync_geometry;
        self
    }

    /// Converts everything to physical coordinates and positions the children.
    pub fn to_fragment(self) -> Arc<PhysicalFragment> {
        let size = self.size.to_physical(self.writing_mode);
        let overflow = self.overflow.to_physical(self.writing_mode);

        let children = self
            .children
            .into_iter()
            .map(|(child, offset)| {
                let offset =
                    offset.to_physical(self.writing_mode, self.direction, size, child.size());
                if self.sync_geometry {
                    child.set_offset(offset);
                } else {
                    child.set_offset_without_sync(offset);
                }
                child
            })
            .collect();

        let out_of_flow_descendants = self
            .out_of_flow_descendants
            .into_iter()
            .map(|candidate| OutOfFlowDescendant {
                node: candidate.node,
                static_position: candidate.static_position.to_physical(
                    self.writing_mode,
                    self.direction,
                    size,
                    PhysicalSize::zero(),
                ),
            })
            .collect();

        Arc::new(PhysicalFragment {
            base: self.base,
            kind: self.kind,
            node: self.node,
            size,
            overflow,
            offset: OnceLock::new(),
            children,
            margin_strut: self.margin_strut,
            break_token: self.break_token,
            out_of_flow_descendants,
            writing_mode: self.writing_mode,
            direction: self.direction,
        })
    }
}
