/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Resolution of box sizes, margins, borders and padding.
//!
//! <https://drafts.csswg.org/css2/#visudet>

use app_units::Au;
use euclid::num::Zero;
use serde::Serialize;

use crate::constraint_space::ConstraintSpace;
use crate::geom::{BoxStrut, Direction, WritingMode};
use crate::style::{BoxSizing, ColumnGap, ComputedStyle, Length};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ContentSizes {
    pub min_content: Au,
    pub max_content: Au,
}

impl ContentSizes {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn map(&self, f: impl Fn(Au) -> Au) -> Self {
        Self {
            min_content: f(self.min_content),
            max_content: f(self.max_content),
        }
    }

    pub fn max(&self, other: Self) -> Self {
        Self {
            min_content: self.min_content.max(other.min_content),
            max_content: self.max_content.max(other.max_content),
        }
    }

    pub fn max_assign(&mut self, other: Self) {
        *self = self.max(other);
    }

    /// <https://drafts.csswg.org/css2/visudet.html#shrink-to-fit-float>
    pub fn shrink_to_fit(&self, available_size: Au) -> Au {
        // The max-content size wins over the min-content one when they disagree.
        available_size
            .max(self.min_content)
            .min(self.max_content)
    }
}

fn resolve_or_zero(length: Length, basis: Option<Au>) -> Au {
    length.resolve(basis).unwrap_or_else(Au::zero)
}

pub fn compute_borders(style: &ComputedStyle, writing_mode: WritingMode, direction: Direction) -> BoxStrut {
    style.border_width.to_logical(writing_mode, direction)
}

pub(crate) fn resolve_padding(
    style: &ComputedStyle,
    writing_mode: WritingMode,
    direction: Direction,
    percentage_basis: Option<Au>,
) -> BoxStrut {
    style
        .padding
        .to_logical(writing_mode, direction)
        .map(|padding| resolve_or_zero(*padding, percentage_basis))
}

/// The padding of a box laid out in `space`. Percentages resolve against the
/// inline size of the containing block.
pub fn compute_padding(space: &ConstraintSpace, style: &ComputedStyle) -> BoxStrut {
    resolve_padding(
        style,
        space.writing_mode(),
        space.direction(),
        space.percentage_resolution_size().inline,
    )
}

pub fn compute_border_and_padding(space: &ConstraintSpace, style: &ComputedStyle) -> BoxStrut {
    compute_borders(style, space.writing_mode(), space.direction()) + compute_padding(space, style)
}

/// The margins of a box laid out in `space`, expressed in the writing mode and
/// direction of its container. `auto` margins resolve to zero; see
/// [`apply_auto_margins`].
pub fn compute_margins(
    space: &ConstraintSpace,
    style: &ComputedStyle,
    container_writing_mode: WritingMode,
    container_direction: Direction,
) -> BoxStrut {
    // Percentages resolve against the containing block's inline size, which is
    // the block size of an orthogonal child's space.
    let percentage_basis = if space.writing_mode().is_orthogonal_to(container_writing_mode) {
        space.percentage_resolution_size().block
    } else {
        space.percentage_resolution_size().inline
    };
    style
        .logical_margin(container_writing_mode, container_direction)
        .map(|margin| resolve_or_zero(*margin, percentage_basis))
}

/// Converts a `width`-like value into a border-box size.
fn to_border_box(size: Au, box_sizing: BoxSizing, border_and_padding: Au) -> Au {
    match box_sizing {
        BoxSizing::ContentBox => size + border_and_padding,
        BoxSizing::BorderBox => size.max(border_and_padding),
    }
}

/// Whether the inline size of a box laid out in `space` depends on its min- and
/// max-content sizes.
pub fn need_min_and_max_content_sizes(space: &ConstraintSpace, style: &ComputedStyle) -> bool {
    if space.is_fixed_size_inline() {
        return false;
    }
    let basis = space.percentage_resolution_size().inline;
    let has_definite_width = style
        .logical_width(space.writing_mode())
        .resolve(basis)
        .is_some();
    !has_definite_width && (space.is_shrink_to_fit() || space.available_size().inline.is_none())
}

/// The border-box inline size of a box laid out in `space`.
pub fn compute_inline_size_for_fragment(
    space: &ConstraintSpace,
    style: &ComputedStyle,
    min_and_max: Option<ContentSizes>,
) -> Au {
    if space.is_fixed_size_inline() {
        return space.available_size().inline.unwrap_or_else(Au::zero);
    }

    let writing_mode = space.writing_mode();
    let border_and_padding = compute_border_and_padding(space, style).inline_sum();
    let percentage_basis = space.percentage_resolution_size().inline;

    let extent = match style.logical_width(writing_mode).resolve(percentage_basis) {
        Some(width) => to_border_box(width, style.box_sizing, border_and_padding),
        None => {
            let margins = compute_margins(space, style, writing_mode, space.direction());
            let fill_available = space
                .available_size()
                .inline
                .map(|available| available - margins.inline_sum());
            match fill_available {
                Some(fill_available) if !space.is_shrink_to_fit() => fill_available,
                _ => {
                    let sizes = min_and_max
                        .unwrap_or_default()
                        .map(|size| size + border_and_padding);
                    match fill_available {
                        Some(fill_available) => sizes.shrink_to_fit(fill_available),
                        None => sizes.max_content,
                    }
                },
            }
        },
    };

    let max = style
        .logical_max_width(writing_mode)
        .resolve(percentage_basis)
        .map(|max| to_border_box(max, style.box_sizing, border_and_padding));
    let min = style
        .logical_min_width(writing_mode)
        .resolve(percentage_basis)
        .map_or(Au::zero(), |min| to_border_box(min, style.box_sizing, border_and_padding));

    let extent = max.map_or(extent, |max| extent.min(max));
    extent.max(min).max(border_and_padding)
}

/// The border-box block size of a box laid out in `space`, given the block size
/// of its content including border and padding. Returns `None` when both the
/// style and the content leave the size indefinite.
///
/// A percentage `height` against an indefinite percentage resolution size
/// behaves as `auto`; it does not resolve to zero.
pub fn compute_block_size_for_fragment(
    space: &ConstraintSpace,
    style: &ComputedStyle,
    content_size: Option<Au>,
) -> Option<Au> {
    if space.is_fixed_size_block() {
        return space.available_size().block.or(content_size);
    }

    let writing_mode = space.writing_mode();
    let border_and_padding = compute_border_and_padding(space, style).block_sum();
    let percentage_basis = space.percentage_resolution_size().block;

    let extent = match style.logical_height(writing_mode).resolve(percentage_basis) {
        Some(height) => to_border_box(height, style.box_sizing, border_and_padding),
        None => content_size?,
    };

    let max = style
        .logical_max_height(writing_mode)
        .resolve(percentage_basis)
        .map(|max| to_border_box(max, style.box_sizing, border_and_padding));
    let min = style
        .logical_min_height(writing_mode)
        .resolve(percentage_basis)
        .map_or(Au::zero(), |min| to_border_box(min, style.box_sizing, border_and_padding));

    let extent = max.map_or(extent, |max| extent.min(max));
    Some(extent.max(min).max(border_and_padding))
}

/// Resolves `auto` inline margins so that a box of border-box `inline_size`
/// is aligned inside `available_inline_size`. Margins and style are read in
/// the container's writing mode.
///
/// <https://drafts.csswg.org/css2/#blockwidth>
pub fn apply_auto_margins(
    available_inline_size: Option<Au>,
    style: &ComputedStyle,
    container_writing_mode: WritingMode,
    container_direction: Direction,
    inline_size: Au,
    margins: &mut BoxStrut,
) {
    let Some(available_inline_size) = available_inline_size else {
        return;
    };
    let free_space = available_inline_size - inline_size - margins.inline_sum();
    if free_space < Au::zero() {
        return;
    }
    let specified = style.logical_margin(container_writing_mode, container_direction);
    match (specified.inline_start.is_auto(), specified.inline_end.is_auto()) {
        (true, true) => {
            margins.inline_start = free_space / 2;
            margins.inline_end = free_space - margins.inline_start;
        },
        (true, false) => margins.inline_start = free_space,
        (false, true) => margins.inline_end += free_space,
        (false, false) => {},
    }
}

/// The min- and max-content contribution of a child box to its container's
/// intrinsic inline size, including the child's border, padding and fixed
/// margins. `child_min_and_max` is the child's own content sizes.
pub fn compute_min_and_max_content_contribution(
    style: &ComputedStyle,
    container_writing_mode: WritingMode,
    child_min_and_max: Option<ContentSizes>,
) -> ContentSizes {
    let writing_mode = container_writing_mode;
    let direction = style.direction;
    let border_and_padding = (compute_borders(style, writing_mode, direction) +
        resolve_padding(style, writing_mode, direction, None))
    .inline_sum();

    let mut sizes = match style.logical_width(writing_mode) {
        Length::Fixed(width) => {
            let width = to_border_box(width, style.box_sizing, border_and_padding);
            ContentSizes {
                min_content: width,
                max_content: width,
            }
        },
        _ => child_min_and_max
            .unwrap_or_default()
            .map(|size| size + border_and_padding),
    };

    if let Length::Fixed(max) = style.logical_max_width(writing_mode) {
        let max = to_border_box(max, style.box_sizing, border_and_padding);
        sizes = sizes.map(|size| size.min(max));
    }
    if let Length::Fixed(min) = style.logical_min_width(writing_mode) {
        let min = to_border_box(min, style.box_sizing, border_and_padding);
        sizes = sizes.map(|size| size.max(min));
    }

    let margins = style
        .logical_margin(writing_mode, direction)
        .map(|margin| resolve_or_zero(*margin, None))
        .inline_sum();
    sizes.map(|size| size + margins)
}

/// Whether computing the min- and max-content contribution of a child with this
/// style requires its own content sizes.
pub fn need_min_and_max_content_sizes_for_contribution(
    style: &ComputedStyle,
    container_writing_mode: WritingMode,
) -> bool {
    !matches!(style.logical_width(container_writing_mode), Length::Fixed(_))
}

/// The used `column-gap`. `normal` is `1em` in multi-column containers.
pub fn resolve_used_column_gap(style: &ComputedStyle) -> Au {
    match style.column_gap {
        ColumnGap::Normal => style.font_size,
        ColumnGap::Length(gap) => gap.max(Au::zero()),
    }
}

/// The used column count and column width for a multi-column container whose
/// content box is `available_inline_size` wide.
///
/// <https://drafts.csswg.org/css-multicol/#pseudo-algorithm>
pub fn resolve_used_column_count_and_width(
    available_inline_size: Au,
    style: &ComputedStyle,
) -> (u32, Au) {
    let gap = resolve_used_column_gap(style);
    let available = available_inline_size.max(Au::zero());

    let count_fitting_width = |width: Au| -> u32 {
        let width = width.max(Au(1));
        ((available + gap).0 / (width + gap).0).max(1) as u32
    };

    let count = match (style.column_count, style.column_width) {
        (Some(count), None) => count.max(1),
        (None, Some(width)) => count_fitting_width(width),
        (Some(count), Some(width)) => count.max(1).min(count_fitting_width(width)),
        (None, None) => 1,
    };

    let width = match style.column_width {
        None => (available - gap * (count as i32 - 1)) / count as i32,
        Some(_) => (available + gap) / count as i32 - gap,
    };
    (count, width.max(Au::zero()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint_space::ConstraintSpaceBuilder;
    use crate::geom::{LogicalSize, PhysicalSides};

    fn px(value: i32) -> Au {
        Au::from_px(value)
    }

    fn space(inline: Option<Au>, block: Option<Au>) -> ConstraintSpace {
        ConstraintSpaceBuilder::new(WritingMode::HorizontalTb)
            .set_available_size(LogicalSize::new(inline, block))
            .set_percentage_resolution_size(LogicalSize::new(inline, block))
            .to_constraint_space()
    }

    #[test]
    fn auto_width_fills_available_space_minus_margins() {
        let style = ComputedStyle {
            margin: PhysicalSides::new(Length::px(0), Length::px(10), Length::px(0), Length::px(20)),
            ..Default::default()
        };
        assert_eq!(
            compute_inline_size_for_fragment(&space(Some(px(100)), None), &style, None),
            px(70)
        );
    }

    #[test]
    fn box_sizing_and_min_max_clamp_inline_size() {
        let style = ComputedStyle {
            width: Length::px(50),
            padding: PhysicalSides::all(Length::px(5)),
            max_width: Length::px(40),
            box_sizing: BoxSizing::BorderBox,
            ..Default::default()
        };
        assert_eq!(
            compute_inline_size_for_fragment(&space(Some(px(100)), None), &style, None),
            px(40)
        );

        let style = ComputedStyle {
            width: Length::px(50),
            padding: PhysicalSides::all(Length::px(5)),
            min_width: Length::percent(80.),
            ..Default::default()
        };
        assert_eq!(
            compute_inline_size_for_fragment(&space(Some(px(100)), None), &style, None),
            px(90)
        );
    }

    #[test]
    fn shrink_to_fit_uses_content_sizes() {
        let space = ConstraintSpaceBuilder::new(WritingMode::HorizontalTb)
            .set_available_size(LogicalSize::new(Some(px(100)), None))
            .set_is_shrink_to_fit(true)
            .to_constraint_space();
        let sizes = ContentSizes {
            min_content: px(20),
            max_content: px(60),
        };
        let style = ComputedStyle::default();
        assert_eq!(compute_inline_size_for_fragment(&space, &style, Some(sizes)), px(60));

        let narrow = ConstraintSpaceBuilder::new(WritingMode::HorizontalTb)
            .set_available_size(LogicalSize::new(Some(px(10)), None))
            .set_is_shrink_to_fit(true)
            .to_constraint_space();
        assert_eq!(compute_inline_size_for_fragment(&narrow, &style, Some(sizes)), px(20));
    }

    #[test]
    fn percentage_height_against_indefinite_size_behaves_as_auto() {
        let style = ComputedStyle {
            height: Length::percent(50.),
            ..Default::default()
        };
        let indefinite = space(Some(px(100)), None);
        assert_eq!(compute_block_size_for_fragment(&indefinite, &style, None), None);
        assert_eq!(
            compute_block_size_for_fragment(&indefinite, &style, Some(px(30))),
            Some(px(30))
        );

        let definite = space(Some(px(100)), Some(px(200)));
        assert_eq!(
            compute_block_size_for_fragment(&definite, &style, Some(px(30))),
            Some(px(100))
        );
    }

    #[test]
    fn min_and_max_percentage_heights_against_indefinite_size() {
        let style = ComputedStyle {
            min_height: Length::percent(50.),
            max_height: Length::percent(10.),
            ..Default::default()
        };
        assert_eq!(
            compute_block_size_for_fragment(&space(Some(px(100)), None), &style, Some(px(30))),
            Some(px(30))
        );
    }

    #[test]
    fn auto_margins_centre_the_box() {
        let style = ComputedStyle {
            margin: PhysicalSides::new(Length::px(0), Length::Auto, Length::px(0), Length::Auto),
            ..Default::default()
        };
        let mut margins = BoxStrut::zero();
        apply_auto_margins(
            Some(px(30)),
            &style,
            WritingMode::HorizontalTb,
            Direction::Ltr,
            px(10),
            &mut margins,
        );
        assert_eq!(margins.inline_start, px(10));
        assert_eq!(margins.inline_end, px(10));
    }

    #[test]
    fn used_column_count_and_width() {
        let style = ComputedStyle {
            column_count: Some(3),
            column_gap: ColumnGap::Length(px(10)),
            ..Default::default()
        };
        assert_eq!(resolve_used_column_count_and_width(px(320), &style), (3, px(100)));

        let style = ComputedStyle {
            column_width: Some(px(100)),
            column_gap: ColumnGap::Length(px(10)),
            ..Default::default()
        };
        assert_eq!(resolve_used_column_count_and_width(px(350), &style), (3, px(110)));
        // Three columns and two gaps share 340px.
        assert_eq!(resolve_used_column_count_and_width(px(340), &style), (3, Au(6400)));

        let style = ComputedStyle {
            column_count: Some(2),
            column_width: Some(px(100)),
            column_gap: ColumnGap::Length(px(10)),
            ..Default::default()
        };
        assert_eq!(resolve_used_column_count_and_width(px(340), &style), (2, px(165)));
    }

    #[test]
    fn normal_column_gap_is_one_em() {
        let style = ComputedStyle {
            font_size: px(20),
            ..Default::default()
        };
        assert_eq!(resolve_used_column_gap(&style), px(20));
    }
}
