/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Flow layout, also known as block-and-inline layout.

use std::sync::Arc;

use app_units::Au;
use euclid::num::Zero;
use log::{debug, trace};
use servo_arc::Arc as ServoArc;

use crate::constraint_space::{ConstraintSpace, ConstraintSpaceBuilder, FragmentationType};
use crate::context::LayoutContext;
use crate::fragment_tree::{
    BlockBreakToken, BoxFragment, CollapsedMargin, FragmentBuilder, FragmentFlags, FragmentKind,
    MarginStrut, PhysicalFragment,
};
use crate::fragmentation::PendingBreak;
use crate::geom::{BoxStrut, Direction, LogicalOffset, LogicalSize, WritingMode};
use crate::node::{BlockNode, BoxKind};
use crate::positioned::OutOfFlowLayoutPart;
use crate::sizing::{
    ContentSizes, apply_auto_margins, compute_block_size_for_fragment,
    compute_border_and_padding, compute_borders, compute_inline_size_for_fragment,
    compute_margins, compute_min_and_max_content_contribution, need_min_and_max_content_sizes,
    need_min_and_max_content_sizes_for_contribution, resolve_padding,
    resolve_used_column_count_and_width, resolve_used_column_gap,
};
use crate::style::{ColumnFill, ComputedStyle, Display, Overflow};

pub mod float;
pub(crate) mod multicol;

use float::{Clear, ExclusionSpace, FloatSide, position_float};
use multicol::ColumnMapper;

/// Whether an in-flow or floating block-level child with `style`, laid out
/// by a block in `space`, establishes a new block formatting context.
///
/// <https://drafts.csswg.org/css-display/#establish-an-independent-formatting-context>
pub fn is_new_formatting_context_for_block_level_child(
    space: &ConstraintSpace,
    style: &ComputedStyle,
) -> bool {
    establishes_new_formatting_context(style) || space.writing_mode() != style.writing_mode
}

fn establishes_new_formatting_context(style: &ComputedStyle) -> bool {
    if style.specifies_columns() || style.contains_layout_or_paint() {
        return true;
    }
    if style.overflow != Overflow::Visible {
        return true;
    }
    if matches!(
        style.display,
        Display::FlowRoot | Display::InlineBlock | Display::Flex | Display::Grid | Display::Table
    ) {
        return true;
    }
    style.is_floating()
}

/// The block-start margins of the first in-flow descendants of `node` that
/// collapse through it, for a `node` whose own block-start margin adjoins its
/// first child's.
fn first_descendants_block_start_margin(
    node: &BlockNode,
    writing_mode: WritingMode,
    direction: Direction,
) -> CollapsedMargin {
    let mut collapsed = CollapsedMargin::zero();
    let mut parent = node.clone();
    while matches!(parent.kind(), BoxKind::Block) {
        let Some(child) = parent.children().find(|child| {
            let style = child.style();
            !style.is_floating() && !style.is_out_of_flow_positioned()
        }) else {
            break;
        };
        let style = child.style();
        if style.writing_mode != writing_mode || !matches!(child.kind(), BoxKind::Block) {
            break;
        }

        let margin = style
            .logical_margin(writing_mode, direction)
            .map(|margin| margin.resolve(None).unwrap_or_else(Au::zero));
        collapsed.adjoin_assign(&CollapsedMargin::new(margin.block_start));

        let border_and_padding = compute_borders(&style, writing_mode, direction) +
            resolve_padding(&style, writing_mode, direction, None);
        if establishes_new_formatting_context(&style) ||
            border_and_padding.block_start != Au::zero()
        {
            break;
        }
        parent = child;
    }
    collapsed
}

/// Lays out the children of a block container, stacking them in the block
/// direction, collapsing their margins and placing floats around them.
pub struct BlockLayoutAlgorithm<'a> {
    context: &'a LayoutContext,
    node: BlockNode,
    style: ServoArc<ComputedStyle>,
    space: &'a ConstraintSpace,
    /// Where this fragment resumes, if the box broke in a previous
    /// fragmentainer.
    break_token: Option<&'a BlockBreakToken>,
    /// Where the current column resumes, after a column break.
    column_break_token: Option<Arc<BlockBreakToken>>,
    allow_columns: bool,

    builder: FragmentBuilder,
    exclusion_space: ExclusionSpace,
    border_and_padding: BoxStrut,
    child_available_size: LogicalSize<Option<Au>>,
    current_child: Option<BlockNode>,

    /// The block offset of the end of the content laid out so far, in the
    /// unfragmented flow.
    content_size: Au,
    max_inline_size: Au,
    prev_child_margin_strut: MarginStrut,
    is_fragment_margin_strut_block_start_updated: bool,

    column_mapper: Option<ColumnMapper>,
    pending_break: Option<PendingBreak>,
}

impl<'a> BlockLayoutAlgorithm<'a> {
    pub fn new(
        context: &'a LayoutContext,
        node: BlockNode,
        space: &'a ConstraintSpace,
        break_token: Option<&'a BlockBreakToken>,
    ) -> Self {
        let style = node.style();
        let mut builder =
            FragmentBuilder::new(FragmentKind::Box, space.writing_mode(), space.direction());
        builder.set_sync_geometry(context.syncs_geometry());
        Self {
            context,
            node,
            style,
            space,
            break_token,
            column_break_token: None,
            allow_columns: true,
            builder,
            exclusion_space: ExclusionSpace::new(),
            border_and_padding: BoxStrut::zero(),
            child_available_size: LogicalSize::new(None, None),
            current_child: None,
            content_size: Au::zero(),
            max_inline_size: Au::zero(),
            prev_child_margin_strut: MarginStrut::default(),
            is_fragment_margin_strut_block_start_updated: false,
            column_mapper: None,
            pending_break: None,
        }
    }

    /// Lays out multi-column containers as a single column.
    fn without_columns(mut self) -> Self {
        self.allow_columns = false;
        self
    }

    /// The min- and max-content inline sizes of the content of `node`, in its
    /// own writing mode.
    pub fn compute_min_and_max_content_sizes(
        context: &LayoutContext,
        node: &BlockNode,
    ) -> ContentSizes {
        let style = node.style();
        // Size-contained elements don't consider their contents for intrinsic sizing.
        if style.contains_size() {
            return ContentSizes::zero();
        }

        let writing_mode = style.writing_mode;
        let mut sizes = ContentSizes::zero();
        for child in node.children() {
            let child_style = child.style();
            if child_style.is_out_of_flow_positioned() {
                continue;
            }

            if child_style.writing_mode.is_orthogonal_to(writing_mode) {
                // The inline size of an orthogonal child is its block size,
                // known only once it has been laid out.
                let space = ConstraintSpaceBuilder::new(writing_mode)
                    .set_writing_mode(child_style.writing_mode)
                    .set_text_direction(child_style.direction)
                    .set_is_new_formatting_context(true)
                    .to_constraint_space();
                let fragment = child.layout(context, &space, None);
                let margins = child_style
                    .logical_margin(writing_mode, style.direction)
                    .map(|margin| margin.resolve(None).unwrap_or_else(Au::zero))
                    .inline_sum();
                let size = BoxFragment::new(writing_mode, &fragment).inline_size() + margins;
                sizes.max_assign(ContentSizes {
                    min_content: size,
                    max_content: size,
                });
                continue;
            }

            let child_min_and_max =
                need_min_and_max_content_sizes_for_contribution(&child_style, writing_mode)
                    .then(|| child.compute_min_and_max_content_sizes(context));
            sizes.max_assign(compute_min_and_max_content_contribution(
                &child_style,
                writing_mode,
                child_min_and_max,
            ));
        }

        sizes.max_content = sizes.max_content.max(sizes.min_content);
        sizes
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "BlockLayoutAlgorithm::layout",
            skip_all,
            fields(servo_profiling = true),
            level = "trace",
        )
    )]
    pub fn layout(mut self) -> Arc<PhysicalFragment> {
        let style = self.style.clone();
        let space = self.space;

        let min_and_max = need_min_and_max_content_sizes(space, &style)
            .then(|| Self::compute_min_and_max_content_sizes(self.context, &self.node));

        self.border_and_padding = compute_border_and_padding(space, &style);
        let border_and_padding = self.border_and_padding;

        let inline_size = compute_inline_size_for_fragment(space, &style, min_and_max);
        let content_inline_size = (inline_size - border_and_padding.inline_sum()).max(Au::zero());
        // The block size may still be indefinite at this point.
        let block_size = compute_block_size_for_fragment(space, &style, None);
        let content_block_size = block_size
            .map(|block_size| (block_size - border_and_padding.block_sum()).max(Au::zero()));

        self.builder
            .set_node(&self.node)
            .set_inline_size(inline_size)
            .set_block_size(block_size.unwrap_or_else(Au::zero));
        if space.is_new_formatting_context() {
            self.builder
                .add_flags(FragmentFlags::ESTABLISHES_NEW_FORMATTING_CONTEXT);
        }
        if space.is_root() {
            self.builder.add_flags(FragmentFlags::IS_ROOT);
        }

        match self.break_token {
            Some(token) => {
                // Resume after a previous break.
                self.content_size = token.break_offset();
                self.current_child = token.resume_child().cloned();
            },
            None => {
                self.content_size = border_and_padding.block_start;
                self.current_child = self.node.first_child();
            },
        }

        self.child_available_size = LogicalSize::new(Some(content_inline_size), content_block_size);
        let mut balanced_column_block_size = None;
        if self.allow_columns && self.context.options.columns_enabled && style.specifies_columns() {
            self.builder.add_flags(FragmentFlags::IS_MULTICOL_CONTAINER);
            let (column_count, column_inline_size) =
                resolve_used_column_count_and_width(content_inline_size, &style);
            self.child_available_size.inline = Some(column_inline_size);

            let column_block_size = match content_block_size {
                Some(content_block_size) => Some(content_block_size),
                None if style.column_fill == ColumnFill::Balance => {
                    let balanced = self.balanced_column_block_size(column_inline_size, column_count);
                    balanced_column_block_size = Some(balanced);
                    Some(balanced)
                },
                // Without a block size to fill, the content stays in one column.
                None => None,
            };

            if let Some(column_block_size) = column_block_size.filter(|size| *size > Au::zero()) {
                debug!(
                    "{} columns of {:?} x {:?}",
                    column_count, column_inline_size, column_block_size
                );
                self.column_mapper = Some(ColumnMapper::new(
                    column_inline_size + resolve_used_column_gap(&style),
                    column_block_size,
                    self.content_size,
                    border_and_padding.block_start,
                    self.context.options.max_fragmentainer_count,
                ));
            }
        }

        while let Some(child) = self.current_child.clone() {
            let child_style = child.style();
            if child_style.is_out_of_flow_positioned() {
                let static_position = self.to_visual_offset(LogicalOffset::new(
                    border_and_padding.inline_start,
                    self.content_size,
                ));
                self.builder
                    .add_out_of_flow_child_candidate(child.clone(), static_position);
                self.current_child = child.next_sibling();
                continue;
            }

            let child_break_token = self
                .current_break_token()
                .and_then(|token| token.child_break_token(&child))
                .cloned();
            let child_space = self.create_constraint_space_for_child(
                &child,
                &child_style,
                child_break_token.is_some(),
            );
            let fragment = child.layout(self.context, &child_space, child_break_token.as_deref());

            self.finish_child_layout(
                &child,
                &child_style,
                &child_space,
                fragment.clone(),
                child_break_token.is_some(),
            );

            if !self.proceed_to_next_unfinished_sibling(&child, &fragment) {
                break;
            }
        }

        // The trailing margin stays inside this box if something separates it
        // from the box's own block-end margin.
        if border_and_padding.block_end != Au::zero() ||
            !style.has_auto_block_size(space.writing_mode()) ||
            space.is_new_formatting_context()
        {
            self.content_size += self.prev_child_margin_strut.block_end.solve();
            if space.is_new_formatting_context() {
                self.builder
                    .set_margin_strut_block_end(self.prev_child_margin_strut.block_end);
            }
        } else {
            self.builder
                .set_margin_strut_block_end(self.prev_child_margin_strut.block_end);
        }
        self.content_size += border_and_padding.block_end;

        // Recompute the block-axis size now that we know our content size.
        let intrinsic_block_size = if let Some(column_block_size) = balanced_column_block_size {
            column_block_size + border_and_padding.block_sum()
        } else if style.contains_size() {
            border_and_padding.block_sum()
        } else {
            self.content_size
        };
        let block_size = compute_block_size_for_fragment(space, &style, Some(intrinsic_block_size))
            .unwrap_or(intrinsic_block_size);
        self.builder.set_block_size(block_size);

        OutOfFlowLayoutPart::new(
            self.context,
            &style,
            space,
            LogicalSize::new(inline_size, block_size),
        )
        .run(&mut self.builder);

        let block_overflow = if self.column_mapper.is_some() {
            block_size
        } else {
            self.content_size
        };
        self.builder
            .set_inline_overflow(self.max_inline_size)
            .set_block_overflow(block_overflow);

        if space.has_block_fragmentation() {
            self.finalize_for_fragmentation(block_size);
        }

        debug!(
            "Laid out {:?}: {:?} x {:?}",
            self.node,
            self.builder.size().inline,
            self.builder.size().block
        );
        self.builder.to_fragment()
    }

    /// The token layout is resuming from: the one for the current column, or
    /// the one this fragment started from.
    fn current_break_token(&self) -> Option<&BlockBreakToken> {
        self.column_break_token.as_deref().or(self.break_token)
    }

    fn previous_break_offset(&self) -> Au {
        self.break_token
            .map_or(Au::zero(), |token| token.break_offset())
    }

    fn has_fragmentation(&self) -> bool {
        self.column_mapper.is_some() || self.space.has_block_fragmentation()
    }

    /// The flow offset at which the current fragmentainer ends.
    fn next_break_offset(&self) -> Au {
        match &self.column_mapper {
            Some(mapper) => mapper.next_break_offset(),
            None => {
                self.previous_break_offset() +
                    self.space
                        .fragmentainer_space_available()
                        .unwrap_or_else(Au::zero)
            },
        }
    }

    /// The fragmentainer space left below `child_block_offset`, the block
    /// offset of the border box of the child about to be laid out.
    fn space_available_for_current_child(&self, child_block_offset: Au) -> Option<Au> {
        self.has_fragmentation()
            .then(|| (self.next_break_offset() - child_block_offset).max(Au::zero()))
    }

    /// Where the border box of an in-flow `child` will start, before it is laid
    /// out: after clearance and the margins its block-start margin collapses
    /// with, including those of its first in-flow descendants.
    fn estimate_child_block_offset(
        &self,
        child: &BlockNode,
        child_style: &ComputedStyle,
        child_space: &ConstraintSpace,
        is_resumed: bool,
    ) -> Au {
        if child_style.is_floating() {
            return self.content_size;
        }

        let mut block_offset = self.content_size;
        let clear = Clear::from_style_and_container_direction(child_style, self.space.direction());
        if let Some(clearance_offset) = self.exclusion_space.clearance_offset(clear) {
            block_offset = block_offset.max(clearance_offset);
        }
        if is_resumed {
            return block_offset;
        }

        let writing_mode = self.space.writing_mode();
        let direction = self.space.direction();
        let margins = compute_margins(child_space, child_style, writing_mode, direction);
        let mut block_start = CollapsedMargin::new(margins.block_start);
        if !child_space.is_new_formatting_context() &&
            self.child_border_and_padding(child_style).block_start == Au::zero()
        {
            block_start.adjoin_assign(&first_descendants_block_start_margin(
                child,
                writing_mode,
                direction,
            ));
        }

        let collapses_through_parent = !self.is_fragment_margin_strut_block_start_updated &&
            !self.space.is_new_formatting_context() &&
            self.border_and_padding.block_start == Au::zero() &&
            self.current_break_token().is_none();
        if collapses_through_parent {
            return block_offset;
        }
        block_offset + self.prev_child_margin_strut.block_end.adjoin(&block_start).solve()
    }

    fn to_visual_offset(&self, offset: LogicalOffset) -> LogicalOffset {
        match &self.column_mapper {
            Some(mapper) => mapper.to_visual_offset(offset),
            None => LogicalOffset::new(offset.inline, offset.block - self.previous_break_offset()),
        }
    }

    fn create_constraint_space_for_child(
        &self,
        child: &BlockNode,
        child_style: &ComputedStyle,
        is_resumed: bool,
    ) -> ConstraintSpace {
        let shrink_to_fit = child_style.display == Display::InlineBlock || child_style.is_floating();
        let mut builder = ConstraintSpaceBuilder::new_for_children_of(self.space);
        builder
            .set_available_size(self.child_available_size)
            .set_percentage_resolution_size(self.child_available_size)
            .set_is_new_formatting_context(is_new_formatting_context_for_block_level_child(
                self.space,
                child_style,
            ))
            .set_is_shrink_to_fit(shrink_to_fit)
            .set_writing_mode(child_style.writing_mode)
            .set_text_direction(child_style.direction);
        if !self.has_fragmentation() {
            return builder.to_constraint_space();
        }

        // Margins take up fragmentainer space too, so the child can only be
        // told how much is left once its block offset is known.
        let child_block_offset = self.estimate_child_block_offset(
            child,
            child_style,
            &builder.to_constraint_space(),
            is_resumed,
        );
        builder.set_fragmentainer_space_available(
            self.space_available_for_current_child(child_block_offset),
        );
        if self.column_mapper.is_some() {
            builder.set_fragmentation_type(FragmentationType::Column);
        }
        builder.to_constraint_space()
    }

    /// The border and padding of a child, in this block's writing mode.
    fn child_border_and_padding(&self, child_style: &ComputedStyle) -> BoxStrut {
        let writing_mode = self.space.writing_mode();
        let direction = self.space.direction();
        compute_borders(child_style, writing_mode, direction) +
            resolve_padding(
                child_style,
                writing_mode,
                direction,
                self.child_available_size.inline,
            )
    }

    fn finish_child_layout(
        &mut self,
        child: &BlockNode,
        child_style: &ComputedStyle,
        child_space: &ConstraintSpace,
        fragment: Arc<PhysicalFragment>,
        is_resumed: bool,
    ) {
        let writing_mode = self.space.writing_mode();
        let direction = self.space.direction();
        let child_fragment = BoxFragment::new(writing_mode, &fragment);
        let mut margins = compute_margins(child_space, child_style, writing_mode, direction);
        if is_resumed {
            // Margins are truncated at fragmentainer breaks.
            margins.block_start = Au::zero();
        }

        let offset = if child_style.is_floating() {
            self.position_float_fragment(child_style, &child_fragment, &margins)
        } else {
            apply_auto_margins(
                self.child_available_size.inline,
                child_style,
                writing_mode,
                direction,
                child_fragment.inline_size(),
                &mut margins,
            );
            self.position_fragment(child_style, child_space, &child_fragment, &margins)
        };

        let visual_offset = self.to_visual_offset(offset);
        if self.context.options.debug.trace_layout {
            debug!("Placing {:?} at {:?}", child, visual_offset);
        } else {
            trace!("Placing {:?} at {:?}", child, visual_offset);
        }
        self.builder.add_child(fragment, visual_offset);
    }

    fn position_fragment(
        &mut self,
        child_style: &ComputedStyle,
        child_space: &ConstraintSpace,
        fragment: &BoxFragment,
        margins: &BoxStrut,
    ) -> LogicalOffset {
        let collapsed_block_start = self.collapse_margins(child_style, child_space, fragment, margins);

        let clear = Clear::from_style_and_container_direction(child_style, self.space.direction());
        if let Some(clearance_offset) = self.exclusion_space.clearance_offset(clear) {
            self.content_size = self.content_size.max(clearance_offset);
        }

        let offset = LogicalOffset::new(
            self.border_and_padding.inline_start + margins.inline_start,
            self.content_size + collapsed_block_start,
        );
        self.content_size += fragment.block_size() + collapsed_block_start;
        self.max_inline_size = self.max_inline_size.max(
            fragment.inline_size() + margins.inline_sum() + self.border_and_padding.inline_sum(),
        );
        offset
    }

    fn position_float_fragment(
        &mut self,
        child_style: &ComputedStyle,
        fragment: &BoxFragment,
        margins: &BoxStrut,
    ) -> LogicalOffset {
        let direction = self.space.direction();
        let side = FloatSide::from_style_and_container_direction(child_style, direction)
            .unwrap_or(FloatSide::InlineStart);

        let mut origin = LogicalOffset::new(
            self.border_and_padding.inline_start,
            self.content_size.max(self.exclusion_space.float_ceiling()),
        );
        let clear = Clear::from_style_and_container_direction(child_style, direction);
        if let Some(clearance_offset) = self.exclusion_space.clearance_offset(clear) {
            origin.block = origin.block.max(clearance_offset);
        }

        self.max_inline_size = self.max_inline_size.max(
            fragment.inline_size() + margins.inline_sum() + self.border_and_padding.inline_sum(),
        );
        position_float(
            &mut self.exclusion_space,
            origin,
            self.child_available_size.inline.unwrap_or_else(Au::zero),
            fragment.size(),
            margins,
            side,
        )
    }

    /// Collapses the margins of an in-flow child with those of its previous
    /// sibling, or with this block's own block-start margin. Returns the
    /// distance from the content cursor to the child's border box.
    ///
    /// <https://drafts.csswg.org/css2/#collapsing-margins>
    fn collapse_margins(
        &mut self,
        child_style: &ComputedStyle,
        child_space: &ConstraintSpace,
        fragment: &BoxFragment,
        margins: &BoxStrut,
    ) -> Au {
        // Empty boxes without margins do not take part in margin collapsing.
        if fragment.block_size() == Au::zero() &&
            margins.is_empty() &&
            fragment.margin_strut().is_empty()
        {
            return Au::zero();
        }

        // Margins of a new formatting context never collapse with its children's.
        let mut margin_strut = if child_space.is_new_formatting_context() {
            MarginStrut::default()
        } else {
            fragment.margin_strut()
        };

        let child_border_and_padding = self.child_border_and_padding(child_style);
        if child_border_and_padding.block_start != Au::zero() {
            margin_strut.set_block_start(margins.block_start);
        } else {
            margin_strut.append_block_start(margins.block_start);
        }
        if child_style.has_auto_block_size(self.space.writing_mode()) &&
            child_border_and_padding.block_end == Au::zero()
        {
            margin_strut.append_block_end(margins.block_end);
        } else {
            margin_strut.set_block_end(margins.block_end);
        }

        let collapses_through_parent = !self.is_fragment_margin_strut_block_start_updated &&
            !self.space.is_new_formatting_context() &&
            self.border_and_padding.block_start == Au::zero() &&
            self.current_break_token().is_none();
        let collapsed_block_start = if collapses_through_parent {
            self.builder
                .set_margin_strut_block_start(margin_strut.block_start);
            Au::zero()
        } else {
            self.prev_child_margin_strut
                .block_end
                .adjoin(&margin_strut.block_start)
                .solve()
        };

        self.is_fragment_margin_strut_block_start_updated = true;
        self.prev_child_margin_strut = margin_strut;
        collapsed_block_start
    }

    /// Moves on to the next sibling that still needs layout, and decides
    /// whether this block breaks. Returns false when this fragment is done.
    fn proceed_to_next_unfinished_sibling(
        &mut self,
        finished_child: &BlockNode,
        child_fragment: &PhysicalFragment,
    ) -> bool {
        self.current_child = finished_child.next_sibling();
        if !self.has_fragmentation() {
            return true;
        }

        // Siblings laid out completely beside a child that broke, in a parallel
        // flow, are not laid out again.
        while let Some(child) = self.current_child.clone() {
            if !self
                .current_break_token()
                .is_some_and(|token| token.is_finished(&child))
            {
                break;
            }
            self.current_child = child.next_sibling();
        }

        let next_break_offset = self.next_break_offset();
        let is_out_of_space = self.content_size >= next_break_offset;
        let child_break_token = child_fragment.break_token().cloned();

        match self.pending_break_mut() {
            Some(pending_break) => match child_break_token {
                Some(token) => pending_break.add_child_break_token(token),
                None => pending_break.add_finished_child(finished_child.clone()),
            },
            None => {
                // Break if the child broke, or if there's no room left for
                // the remaining content.
                if child_break_token.is_none() && (!is_out_of_space || self.current_child.is_none())
                {
                    return true;
                }
                // Content that ran past the fragmentainer end without breaking
                // is not repeated in the next one.
                let break_offset = self.content_size.max(next_break_offset);
                let mut pending_break = match child_break_token {
                    Some(token) => {
                        let mut pending_break =
                            PendingBreak::new(break_offset, Some(finished_child.clone()));
                        pending_break.add_child_break_token(token);
                        pending_break
                    },
                    None => PendingBreak::new(break_offset, self.current_child.clone()),
                };
                if let Some(token) = self.current_break_token() {
                    for finished in token.finished_children() {
                        pending_break.add_finished_child(finished.clone());
                    }
                }
                self.set_pending_break(pending_break);
            },
        }

        let Some(mapper) = self.column_mapper.as_mut() else {
            return !is_out_of_space;
        };
        if is_out_of_space || self.current_child.is_none() {
            match mapper.advance(&self.node) {
                Some(token) => {
                    self.content_size = token.break_offset();
                    self.current_child = token.resume_child().cloned();
                    self.prev_child_margin_strut = MarginStrut::default();
                    self.column_break_token = Some(token);
                },
                None => return !is_out_of_space,
            }
        }
        true
    }

    fn pending_break_mut(&mut self) -> Option<&mut PendingBreak> {
        match self.column_mapper.as_mut() {
            Some(mapper) => mapper.pending_break_mut(),
            None => self.pending_break.as_mut(),
        }
    }

    fn set_pending_break(&mut self, pending_break: PendingBreak) {
        match self.column_mapper.as_mut() {
            Some(mapper) => mapper.set_break_token(pending_break),
            None => self.pending_break = Some(pending_break),
        }
    }

    /// Clips this fragment to the space left in the fragmentainer, breaking
    /// inside it if its end does not fit.
    fn finalize_for_fragmentation(&mut self, block_size: Au) {
        let previous_break_offset = self.previous_break_offset();
        let space_left = self
            .space
            .fragmentainer_space_available()
            .unwrap_or_else(Au::zero)
            .max(Au::zero());
        let block_size = (block_size - previous_break_offset).max(Au::zero());

        if let Some(pending_break) = self.pending_break.take() {
            // We're breaking before or inside a block-level child.
            self.builder
                .set_break_token(pending_break.into_break_token(self.node.clone()))
                .set_block_size(space_left.min(block_size))
                .set_block_overflow(space_left);
            return;
        }

        if block_size > space_left {
            // Need a break inside this block.
            let pending_break = PendingBreak::new(previous_break_offset + space_left, None);
            self.builder
                .set_break_token(pending_break.into_break_token(self.node.clone()))
                .set_block_size(space_left)
                .set_block_overflow(space_left);
            return;
        }

        // The end of the block fits in the current fragmentainer.
        self.builder
            .set_block_size(block_size)
            .set_block_overflow(self.content_size - previous_break_offset);
    }

    /// The block size of each column of a balanced multi-column container
    /// with an indefinite block size: its content laid out in one column,
    /// divided evenly.
    fn balanced_column_block_size(&self, column_inline_size: Au, column_count: u32) -> Au {
        let border_and_padding = self.border_and_padding;
        let single_column_space = ConstraintSpaceBuilder::new(self.space.writing_mode())
            .set_text_direction(self.space.direction())
            .set_available_size(LogicalSize::new(
                Some(column_inline_size + border_and_padding.inline_sum()),
                None,
            ))
            .set_percentage_resolution_size(self.space.percentage_resolution_size())
            .set_is_fixed_size_inline(true)
            .set_is_new_formatting_context(true)
            .to_constraint_space();
        let context = self.context.for_measurement();
        let single_column =
            BlockLayoutAlgorithm::new(&context, self.node.clone(), &single_column_space, None)
                .without_columns()
                .layout();

        let content_extent = (BoxFragment::new(self.space.writing_mode(), &single_column)
            .block_size() -
            border_and_padding.block_sum())
        .max(Au::zero());
        let column_count = column_count.max(1) as i32;
        Au((content_extent.0 + column_count - 1) / column_count)
    }
}
