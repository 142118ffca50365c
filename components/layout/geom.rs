/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Logical (flow-relative) and physical geometry.
//!
//! Layout happens in logical coordinates: the inline axis is the direction text
//! runs in, the block axis is the direction blocks stack in. Fragments are stored
//! in physical coordinates so that consumers never need to know about writing
//! modes. See <https://drafts.csswg.org/css-writing-modes/#abstract-box>.

use std::ops::{Add, AddAssign, Neg, Sub};

use app_units::Au;
use euclid::num::Zero;
use serde::{Deserialize, Serialize};

pub type PhysicalPoint = euclid::default::Point2D<Au>;
pub type PhysicalSize = euclid::default::Size2D<Au>;
pub type PhysicalRect = euclid::default::Rect<Au>;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum WritingMode {
    #[default]
    HorizontalTb,
    VerticalRl,
    VerticalLr,
    SidewaysRl,
    SidewaysLr,
}

impl WritingMode {
    pub fn is_horizontal(self) -> bool {
        self == WritingMode::HorizontalTb
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Whether the inline and block axes of `self` are swapped relative to `other`.
    pub fn is_orthogonal_to(self, other: WritingMode) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn is_ltr(self) -> bool {
        self == Direction::Ltr
    }
}

/// Whether inline offsets grow along the physical axis (`true`) or against it.
fn inline_is_forward(writing_mode: WritingMode, direction: Direction) -> bool {
    match writing_mode {
        WritingMode::SidewaysLr => !direction.is_ltr(),
        _ => direction.is_ltr(),
    }
}

/// Whether block offsets grow along the physical axis (`true`) or against it.
fn block_is_forward(writing_mode: WritingMode) -> bool {
    !matches!(writing_mode, WritingMode::VerticalRl | WritingMode::SidewaysRl)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LogicalSize<T> {
    pub inline: T,
    pub block: T,
}

impl<T> LogicalSize<T> {
    pub fn new(inline: T, block: T) -> Self {
        Self { inline, block }
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> LogicalSize<U> {
        LogicalSize {
            inline: f(self.inline),
            block: f(self.block),
        }
    }

    pub fn transposed(self) -> Self {
        Self {
            inline: self.block,
            block: self.inline,
        }
    }
}

impl LogicalSize<Au> {
    pub fn zero() -> Self {
        Self::new(Au::zero(), Au::zero())
    }

    pub fn to_physical(self, writing_mode: WritingMode) -> PhysicalSize {
        if writing_mode.is_horizontal() {
            PhysicalSize::new(self.inline, self.block)
        } else {
            PhysicalSize::new(self.block, self.inline)
        }
    }

    pub fn from_physical(size: PhysicalSize, writing_mode: WritingMode) -> Self {
        if writing_mode.is_horizontal() {
            Self::new(size.width, size.height)
        } else {
            Self::new(size.height, size.width)
        }
    }
}

/// The start corner of a box, relative to the start corner of its container.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LogicalOffset {
    pub inline: Au,
    pub block: Au,
}

impl LogicalOffset {
    pub fn new(inline: Au, block: Au) -> Self {
        Self { inline, block }
    }

    pub fn zero() -> Self {
        Self::new(Au::zero(), Au::zero())
    }

    /// Converts the offset of an inner box of physical size `inner` placed inside an
    /// outer box of physical size `outer` into the inner box's physical top-left
    /// corner.
    pub fn to_physical(
        self,
        writing_mode: WritingMode,
        direction: Direction,
        outer: PhysicalSize,
        inner: PhysicalSize,
    ) -> PhysicalPoint {
        let (inline_outer, inline_inner, block_outer, block_inner) =
            if writing_mode.is_horizontal() {
                (outer.width, inner.width, outer.height, inner.height)
            } else {
                (outer.height, inner.height, outer.width, inner.width)
            };
        let inline = if inline_is_forward(writing_mode, direction) {
            self.inline
        } else {
            inline_outer - self.inline - inline_inner
        };
        let block = if block_is_forward(writing_mode) {
            self.block
        } else {
            block_outer - self.block - block_inner
        };
        if writing_mode.is_horizontal() {
            PhysicalPoint::new(inline, block)
        } else {
            PhysicalPoint::new(block, inline)
        }
    }

    /// The inverse of [`LogicalOffset::to_physical`] for a point (a box of zero size)
    /// inside a container of physical size `outer`.
    pub fn from_physical_point(
        point: PhysicalPoint,
        writing_mode: WritingMode,
        direction: Direction,
        outer: PhysicalSize,
    ) -> Self {
        let (inline, inline_outer, block, block_outer) = if writing_mode.is_horizontal() {
            (point.x, outer.width, point.y, outer.height)
        } else {
            (point.y, outer.height, point.x, outer.width)
        };
        Self {
            inline: if inline_is_forward(writing_mode, direction) {
                inline
            } else {
                inline_outer - inline
            },
            block: if block_is_forward(writing_mode) {
                block
            } else {
                block_outer - block
            },
        }
    }
}

impl Add for LogicalOffset {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.inline + other.inline, self.block + other.block)
    }
}

impl AddAssign for LogicalOffset {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for LogicalOffset {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.inline - other.inline, self.block - other.block)
    }
}

impl Neg for LogicalOffset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.inline, -self.block)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LogicalRect {
    pub offset: LogicalOffset,
    pub size: LogicalSize<Au>,
}

impl LogicalRect {
    pub fn new(offset: LogicalOffset, size: LogicalSize<Au>) -> Self {
        Self { offset, size }
    }

    pub fn inline_start(&self) -> Au {
        self.offset.inline
    }

    pub fn inline_end(&self) -> Au {
        self.offset.inline + self.size.inline
    }

    pub fn block_start(&self) -> Au {
        self.offset.block
    }

    pub fn block_end(&self) -> Au {
        self.offset.block + self.size.block
    }

    /// Whether the interiors of the two rectangles overlap. Rectangles that only
    /// touch along an edge do not intersect.
    pub fn intersects(&self, other: &LogicalRect) -> bool {
        self.inline_start() < other.inline_end() &&
            other.inline_start() < self.inline_end() &&
            self.block_start() < other.block_end() &&
            other.block_start() < self.block_end()
    }
}

/// Four values, one per flow-relative edge of a box.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LogicalSides<T> {
    pub inline_start: T,
    pub inline_end: T,
    pub block_start: T,
    pub block_end: T,
}

/// Borders, padding or margins in a particular writing mode.
pub type BoxStrut = LogicalSides<Au>;

impl<T> LogicalSides<T> {
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> LogicalSides<U> {
        LogicalSides {
            inline_start: f(&self.inline_start),
            inline_end: f(&self.inline_end),
            block_start: f(&self.block_start),
            block_end: f(&self.block_end),
        }
    }
}

impl LogicalSides<Au> {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn inline_sum(&self) -> Au {
        self.inline_start + self.inline_end
    }

    pub fn block_sum(&self) -> Au {
        self.block_start + self.block_end
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::zero()
    }

    /// The offset from the outer edge of this strut to its inner edge.
    pub fn start_offset(&self) -> LogicalOffset {
        LogicalOffset::new(self.inline_start, self.block_start)
    }
}

impl Add for LogicalSides<Au> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            inline_start: self.inline_start + other.inline_start,
            inline_end: self.inline_end + other.inline_end,
            block_start: self.block_start + other.block_start,
            block_end: self.block_end + other.block_end,
        }
    }
}

/// Four values, one per physical edge of a box, the way style specifies them.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PhysicalSides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> PhysicalSides<T> {
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn to_logical(&self, writing_mode: WritingMode, direction: Direction) -> LogicalSides<T> {
        let (block_start, block_end, inline_start, inline_end) = match writing_mode {
            WritingMode::HorizontalTb => (self.top, self.bottom, self.left, self.right),
            WritingMode::VerticalRl | WritingMode::SidewaysRl => {
                (self.right, self.left, self.top, self.bottom)
            },
            WritingMode::VerticalLr => (self.left, self.right, self.top, self.bottom),
            WritingMode::SidewaysLr => (self.left, self.right, self.bottom, self.top),
        };
        let (inline_start, inline_end) = if direction.is_ltr() {
            (inline_start, inline_end)
        } else {
            (inline_end, inline_start)
        };
        LogicalSides {
            inline_start,
            inline_end,
            block_start,
            block_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(value: i32) -> Au {
        Au::from_px(value)
    }

    #[test]
    fn horizontal_rtl_offsets_mirror_inline_axis() {
        let offset = LogicalOffset::new(px(10), px(5));
        let outer = PhysicalSize::new(px(100), px(50));
        let inner = PhysicalSize::new(px(20), px(10));
        assert_eq!(
            offset.to_physical(WritingMode::HorizontalTb, Direction::Ltr, outer, inner),
            PhysicalPoint::new(px(10), px(5))
        );
        assert_eq!(
            offset.to_physical(WritingMode::HorizontalTb, Direction::Rtl, outer, inner),
            PhysicalPoint::new(px(70), px(5))
        );
    }

    #[test]
    fn vertical_offsets_swap_axes() {
        let offset = LogicalOffset::new(px(10), px(5));
        let outer = PhysicalSize::new(px(100), px(50));
        let inner = PhysicalSize::new(px(20), px(10));
        assert_eq!(
            offset.to_physical(WritingMode::VerticalLr, Direction::Ltr, outer, inner),
            PhysicalPoint::new(px(5), px(10))
        );
        // vertical-rl stacks blocks from the right edge.
        assert_eq!(
            offset.to_physical(WritingMode::VerticalRl, Direction::Ltr, outer, inner),
            PhysicalPoint::new(px(75), px(10))
        );
    }

    #[test]
    fn point_conversion_round_trips() {
        let outer = PhysicalSize::new(px(100), px(50));
        for writing_mode in [
            WritingMode::HorizontalTb,
            WritingMode::VerticalRl,
            WritingMode::VerticalLr,
            WritingMode::SidewaysRl,
            WritingMode::SidewaysLr,
        ] {
            for direction in [Direction::Ltr, Direction::Rtl] {
                let logical = LogicalOffset::new(px(7), px(3));
                let physical =
                    logical.to_physical(writing_mode, direction, outer, PhysicalSize::zero());
                assert_eq!(
                    LogicalOffset::from_physical_point(physical, writing_mode, direction, outer),
                    logical,
                    "{writing_mode:?} {direction:?}"
                );
            }
        }
    }

    #[test]
    fn physical_sides_to_logical() {
        let sides = PhysicalSides::new(px(1), px(2), px(3), px(4));
        let horizontal = sides.to_logical(WritingMode::HorizontalTb, Direction::Ltr);
        assert_eq!(horizontal.block_start, px(1));
        assert_eq!(horizontal.inline_end, px(2));
        assert_eq!(horizontal.block_end, px(3));
        assert_eq!(horizontal.inline_start, px(4));

        let rtl = sides.to_logical(WritingMode::HorizontalTb, Direction::Rtl);
        assert_eq!(rtl.inline_start, px(2));
        assert_eq!(rtl.inline_end, px(4));

        let vertical_rl = sides.to_logical(WritingMode::VerticalRl, Direction::Ltr);
        assert_eq!(vertical_rl.block_start, px(2));
        assert_eq!(vertical_rl.block_end, px(4));
        assert_eq!(vertical_rl.inline_start, px(1));
    }
}
