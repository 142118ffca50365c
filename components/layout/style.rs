/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The resolved style consumed by layout.
//!
//! Cascade and computed-value resolution happen elsewhere. Layout only reads the
//! handful of properties below, already reduced to absolute lengths, percentages
//! and keywords.

use app_units::Au;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geom::{Direction, LogicalSides, PhysicalSides, WritingMode};

/// A `<length-percentage> | auto` value.
///
/// On `max-width`/`max-height`, `Auto` stands for `none`. On
/// `min-width`/`min-height`, `Auto` behaves as zero.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Length {
    #[default]
    Auto,
    Fixed(Au),
    /// A percentage, where `50.` means 50%.
    Percentage(f32),
}

impl Length {
    pub fn px(value: i32) -> Self {
        Length::Fixed(Au::from_px(value))
    }

    pub fn percent(value: f32) -> Self {
        Length::Percentage(value)
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Resolves this length against `basis`. Returns `None` for `auto` and for a
    /// percentage against an indefinite basis.
    pub fn resolve(&self, basis: Option<Au>) -> Option<Au> {
        match *self {
            Length::Auto => None,
            Length::Fixed(length) => Some(length),
            Length::Percentage(percentage) => {
                basis.map(|basis| basis.scale_by(percentage / 100.))
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Display {
    None,
    #[default]
    Block,
    Inline,
    InlineBlock,
    FlowRoot,
    ListItem,
    Flex,
    Grid,
    Table,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn is_absolutely_positioned(self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
    Clip,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum BoxSizing {
    #[default]
    ContentBox,
    BorderBox,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum ColumnGap {
    /// `normal`, which is `1em` for multi-column containers.
    #[default]
    Normal,
    Length(Au),
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum ColumnFill {
    #[default]
    Balance,
    Auto,
}

bitflags! {
    /// The `contain` property.
    #[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
    pub struct Contain: u8 {
        const SIZE = 1 << 0;
        const LAYOUT = 1 << 1;
        const PAINT = 1 << 2;
    }
}

/// The computed values layout reads for one box.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub display: Display,
    pub position: Position,
    pub float: Float,
    pub clear: Clear,
    pub overflow: Overflow,
    pub writing_mode: WritingMode,
    pub direction: Direction,
    pub box_sizing: BoxSizing,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
    pub margin: PhysicalSides<Length>,
    pub padding: PhysicalSides<Length>,
    pub border_width: PhysicalSides<Au>,
    /// `top`, `right`, `bottom` and `left`.
    pub inset: PhysicalSides<Length>,
    pub column_count: Option<u32>,
    pub column_width: Option<Au>,
    pub column_gap: ColumnGap,
    pub column_fill: ColumnFill,
    pub font_size: Au,
    pub contain: Contain,
    pub has_transform: bool,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            overflow: Overflow::Visible,
            writing_mode: WritingMode::HorizontalTb,
            direction: Direction::Ltr,
            box_sizing: BoxSizing::ContentBox,
            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Auto,
            min_height: Length::Auto,
            max_width: Length::Auto,
            max_height: Length::Auto,
            margin: PhysicalSides::all(Length::px(0)),
            padding: PhysicalSides::all(Length::px(0)),
            border_width: PhysicalSides::default(),
            inset: PhysicalSides::all(Length::Auto),
            column_count: None,
            column_width: None,
            column_gap: ColumnGap::Normal,
            column_fill: ColumnFill::Balance,
            font_size: Au::from_px(16),
            contain: Contain::empty(),
            has_transform: false,
        }
    }
}

impl ComputedStyle {
    pub fn is_floating(&self) -> bool {
        self.float != Float::None && !self.is_out_of_flow_positioned()
    }

    pub fn is_out_of_flow_positioned(&self) -> bool {
        self.position.is_absolutely_positioned()
    }

    pub fn specifies_columns(&self) -> bool {
        self.column_count.is_some() || self.column_width.is_some()
    }

    pub fn contains_size(&self) -> bool {
        self.contain.contains(Contain::SIZE)
    }

    pub fn contains_layout_or_paint(&self) -> bool {
        self.contain.intersects(Contain::LAYOUT | Contain::PAINT)
    }

    /// `width` or `height`, whichever lies in the inline axis of `writing_mode`.
    pub fn logical_width(&self, writing_mode: WritingMode) -> Length {
        if writing_mode.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    pub fn logical_height(&self, writing_mode: WritingMode) -> Length {
        if writing_mode.is_horizontal() {
            self.height
        } else {
            self.width
        }
    }

    pub fn logical_min_width(&self, writing_mode: WritingMode) -> Length {
        if writing_mode.is_horizontal() {
            self.min_width
        } else {
            self.min_height
        }
    }

    pub fn logical_min_height(&self, writing_mode: WritingMode) -> Length {
        if writing_mode.is_horizontal() {
            self.min_height
        } else {
            self.min_width
        }
    }

    pub fn logical_max_width(&self, writing_mode: WritingMode) -> Length {
        if writing_mode.is_horizontal() {
            self.max_width
        } else {
            self.max_height
        }
    }

    pub fn logical_max_height(&self, writing_mode: WritingMode) -> Length {
        if writing_mode.is_horizontal() {
            self.max_height
        } else {
            self.max_width
        }
    }

    /// `auto` block size in `writing_mode`, the condition under which the box's
    /// block-end margin may collapse with that of its last child.
    pub fn has_auto_block_size(&self, writing_mode: WritingMode) -> bool {
        self.logical_height(writing_mode).is_auto()
    }

    pub fn logical_margin(&self, writing_mode: WritingMode, direction: Direction) -> LogicalSides<Length> {
        self.margin.to_logical(writing_mode, direction)
    }

    pub fn logical_inset(&self, writing_mode: WritingMode, direction: Direction) -> LogicalSides<Length> {
        self.inset.to_logical(writing_mode, direction)
    }
}
