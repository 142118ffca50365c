/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Layout of absolutely and fixed positioned boxes.
//!
//! <https://drafts.csswg.org/css2/#abs-non-replaced-width>

use std::sync::Arc;

use app_units::Au;
use euclid::num::Zero;
use log::trace;

use crate::constraint_space::{ConstraintSpace, ConstraintSpaceBuilder};
use crate::context::LayoutContext;
use crate::fragment_tree::{BoxFragment, FragmentBuilder, PhysicalFragment};
use crate::geom::{BoxStrut, Direction, LogicalOffset, LogicalSize, WritingMode};
use crate::node::BlockNode;
use crate::sizing::{
    compute_block_size_for_fragment, compute_borders, compute_inline_size_for_fragment,
    need_min_and_max_content_sizes,
};
use crate::style::{ComputedStyle, Length, Position};

/// A positioned box waiting for its containing block, with the position it
/// would have had in normal flow.
#[derive(Clone, Debug)]
pub struct OutOfFlowCandidate {
    pub node: BlockNode,
    /// Relative to the border box of the fragment currently holding the
    /// candidate, in that fragment's writing mode.
    pub static_position: LogicalOffset,
}

/// Whether a box with `container_style`, laid out in `container_space`, is the
/// containing block of a positioned child with `child_style`.
pub fn is_containing_block_for_out_of_flow(
    container_style: &ComputedStyle,
    child_style: &ComputedStyle,
    container_space: &ConstraintSpace,
) -> bool {
    if container_space.is_root() || container_style.has_transform {
        return true;
    }
    match child_style.position {
        Position::Absolute => container_style.position != Position::Static,
        Position::Fixed => container_style.contains_layout_or_paint(),
        Position::Static | Position::Relative => false,
    }
}

#[derive(Clone, Copy, Debug)]
enum AbsoluteBoxOffsets {
    StaticStart { start: Au },
    Start { start: Au },
    End { end: Au },
    Both { start: Au, end: Au },
}

impl AbsoluteBoxOffsets {
    fn new(static_start: Au, start: Length, end: Length, containing_size: Au) -> Self {
        let basis = Some(containing_size);
        match (start.resolve(basis), end.resolve(basis)) {
            (None, None) => Self::StaticStart {
                start: static_start,
            },
            (Some(start), Some(end)) => Self::Both { start, end },
            (None, Some(end)) => Self::End { end },
            (Some(start), None) => Self::Start { start },
        }
    }

    /// The room left for the margin box once the offsets are taken out.
    fn available_size(&self, containing_size: Au) -> Au {
        let available = match *self {
            Self::StaticStart { start } | Self::Start { start } => containing_size - start,
            Self::End { end } => containing_size - end,
            Self::Both { start, end } => containing_size - start - end,
        };
        available.max(Au::zero())
    }
}

/// Resolves the margins and the offset of one axis of a positioned box whose
/// border-box `size` is known. Returns the offset of the border box inside
/// the containing block, and the used margins.
fn solve_axis(
    containing_size: Au,
    box_offsets: AbsoluteBoxOffsets,
    size: Au,
    computed_margin_start: Option<Au>,
    computed_margin_end: Option<Au>,
    solve_margins: impl FnOnce(Au) -> (Au, Au),
) -> (Au, Au, Au) {
    let mut margin_start = computed_margin_start.unwrap_or_else(Au::zero);
    let mut margin_end = computed_margin_end.unwrap_or_else(Au::zero);

    match box_offsets {
        AbsoluteBoxOffsets::StaticStart { start } | AbsoluteBoxOffsets::Start { start } => {
            (start + margin_start, margin_start, margin_end)
        },
        AbsoluteBoxOffsets::End { end } => (
            containing_size - end - margin_end - size,
            margin_start,
            margin_end,
        ),
        AbsoluteBoxOffsets::Both { start, end } => {
            let free_space = containing_size - start - end - size;
            match (computed_margin_start, computed_margin_end) {
                (None, None) => (margin_start, margin_end) = solve_margins(free_space),
                (None, Some(end)) => margin_start = free_space - end,
                (Some(start), None) => margin_end = free_space - start,
                (Some(_), Some(_)) => {},
            }
            (start + margin_start, margin_start, margin_end)
        },
    }
}

/// Places the positioned boxes a block has collected, once its own size is
/// known. The containing block is the block's padding box.
pub(crate) struct OutOfFlowLayoutPart<'a> {
    context: &'a LayoutContext,
    container_style: &'a ComputedStyle,
    container_space: &'a ConstraintSpace,
    writing_mode: WritingMode,
    direction: Direction,
    borders: BoxStrut,
    containing_block_size: LogicalSize<Au>,
}

impl<'a> OutOfFlowLayoutPart<'a> {
    pub(crate) fn new(
        context: &'a LayoutContext,
        container_style: &'a ComputedStyle,
        container_space: &'a ConstraintSpace,
        container_size: LogicalSize<Au>,
    ) -> Self {
        let writing_mode = container_space.writing_mode();
        let direction = container_space.direction();
        let borders = compute_borders(container_style, writing_mode, direction);
        let containing_block_size = LogicalSize::new(
            (container_size.inline - borders.inline_sum()).max(Au::zero()),
            (container_size.block - borders.block_sum()).max(Au::zero()),
        );
        Self {
            context,
            container_style,
            container_space,
            writing_mode,
            direction,
            borders,
            containing_block_size,
        }
    }

    /// Lays out every candidate this block contains and hands the others on
    /// to the builder's out-of-flow descendants.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "OutOfFlowLayoutPart::run",
            skip_all,
            fields(servo_profiling = true),
            level = "trace",
        )
    )]
    pub(crate) fn run(&self, builder: &mut FragmentBuilder) {
        // Laying out a candidate may surface more candidates: fixed positioned
        // descendants of an absolutely positioned child.
        loop {
            let candidates = builder.take_out_of_flow_candidates();
            if candidates.is_empty() {
                return;
            }
            for candidate in candidates {
                let child_style = candidate.node.style();
                if is_containing_block_for_out_of_flow(
                    self.container_style,
                    &child_style,
                    self.container_space,
                ) {
                    let (fragment, offset) = self.layout_candidate(&candidate, &child_style);
                    builder.add_child(fragment, offset);
                } else {
                    builder.add_out_of_flow_descendant(candidate);
                }
            }
        }
    }

    fn layout_candidate(
        &self,
        candidate: &OutOfFlowCandidate,
        style: &ComputedStyle,
    ) -> (Arc<PhysicalFragment>, LogicalOffset) {
        let writing_mode = self.writing_mode;
        let containing_block = self.containing_block_size;
        let static_position = candidate.static_position - self.borders.start_offset();

        let inset = style.logical_inset(writing_mode, self.direction);
        let inline_offsets = AbsoluteBoxOffsets::new(
            static_position.inline,
            inset.inline_start,
            inset.inline_end,
            containing_block.inline,
        );
        let block_offsets = AbsoluteBoxOffsets::new(
            static_position.block,
            inset.block_start,
            inset.block_end,
            containing_block.block,
        );

        let margin = style
            .logical_margin(writing_mode, self.direction)
            .map(|margin| margin.resolve(Some(containing_block.inline)));

        // Sizes are resolved in the containing block's writing mode, against
        // the room the offsets leave. Without both offsets, `auto` shrinks to
        // fit.
        let containing_block_sizes = containing_block.map(Some);
        let sizing_space = ConstraintSpaceBuilder::new(writing_mode)
            .set_text_direction(self.direction)
            .set_available_size(LogicalSize::new(
                Some(inline_offsets.available_size(containing_block.inline)),
                Some(block_offsets.available_size(containing_block.block)),
            ))
            .set_percentage_resolution_size(containing_block_sizes)
            .set_is_shrink_to_fit(!matches!(inline_offsets, AbsoluteBoxOffsets::Both { .. }))
            .to_constraint_space();

        let min_and_max = need_min_and_max_content_sizes(&sizing_space, style)
            .then(|| candidate.node.compute_min_and_max_content_sizes(self.context));
        let inline_size = compute_inline_size_for_fragment(&sizing_space, style, min_and_max);

        let block_size = match block_offsets {
            AbsoluteBoxOffsets::Both { start, end }
                if style
                    .logical_height(writing_mode)
                    .resolve(Some(containing_block.block))
                    .is_none() =>
            {
                let margins = margin.block_start.unwrap_or_else(Au::zero) +
                    margin.block_end.unwrap_or_else(Au::zero);
                compute_block_size_for_fragment(
                    &sizing_space,
                    style,
                    Some(containing_block.block - start - end - margins),
                )
            },
            _ => compute_block_size_for_fragment(&sizing_space, style, None),
        };

        let space = ConstraintSpaceBuilder::new(writing_mode)
            .set_writing_mode(style.writing_mode)
            .set_text_direction(style.direction)
            .set_available_size(LogicalSize::new(Some(inline_size), block_size))
            .set_percentage_resolution_size(containing_block_sizes)
            .set_is_fixed_size_inline(true)
            .set_is_fixed_size_block(block_size.is_some())
            .set_is_new_formatting_context(true)
            .to_constraint_space();
        let fragment = candidate.node.layout(self.context, &space, None);
        let size = BoxFragment::new(writing_mode, &fragment).size();

        let (inline_start, _, _) = solve_axis(
            containing_block.inline,
            inline_offsets,
            size.inline,
            margin.inline_start,
            margin.inline_end,
            |free_space| {
                if free_space >= Au::zero() {
                    (free_space / 2, free_space - free_space / 2)
                } else {
                    (Au::zero(), free_space)
                }
            },
        );
        let (block_start, _, _) = solve_axis(
            containing_block.block,
            block_offsets,
            size.block,
            margin.block_start,
            margin.block_end,
            |free_space| (free_space / 2, free_space - free_space / 2),
        );

        let offset = LogicalOffset::new(inline_start, block_start) + self.borders.start_offset();
        trace!("Positioned {:?} at {:?}", candidate.node, offset);
        (fragment, offset)
    }
}
