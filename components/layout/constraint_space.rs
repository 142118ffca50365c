/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The input envelope a box is laid out into.

use app_units::Au;
use bitflags::bitflags;
use serde::Serialize;

use crate::geom::{Direction, LogicalSize, WritingMode};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct ConstraintSpaceFlags: u8 {
        /// The inline size is imposed by the parent; the box must not compute its own.
        const FIXED_SIZE_INLINE = 1 << 0;
        /// The block size is imposed by the parent; the box must not compute its own.
        const FIXED_SIZE_BLOCK = 1 << 1;
        /// An `auto` inline size shrinks to fit the content instead of stretching.
        const SHRINK_TO_FIT = 1 << 2;
        /// The box establishes a new block formatting context.
        const NEW_FORMATTING_CONTEXT = 1 << 3;
        /// The box is the root of the tree and the initial containing block.
        const ROOT = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum FragmentationType {
    #[default]
    None,
    Page,
    Column,
}

/// An immutable description of the space one box lays out into. Sizes are in
/// the box's own writing mode; `None` means indefinite.
///
/// Floats placed while laying out the box are tracked separately, in an
/// [`ExclusionSpace`](crate::flow::float::ExclusionSpace) owned by the layout
/// algorithm, so a built space never changes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConstraintSpace {
    writing_mode: WritingMode,
    direction: Direction,
    available_size: LogicalSize<Option<Au>>,
    percentage_resolution_size: LogicalSize<Option<Au>>,
    flags: ConstraintSpaceFlags,
    fragmentainer_space_available: Option<Au>,
    fragmentation_type: FragmentationType,
}

impl ConstraintSpace {
    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn available_size(&self) -> LogicalSize<Option<Au>> {
        self.available_size
    }

    pub fn percentage_resolution_size(&self) -> LogicalSize<Option<Au>> {
        self.percentage_resolution_size
    }

    pub fn flags(&self) -> ConstraintSpaceFlags {
        self.flags
    }

    pub fn is_fixed_size_inline(&self) -> bool {
        self.flags.contains(ConstraintSpaceFlags::FIXED_SIZE_INLINE)
    }

    pub fn is_fixed_size_block(&self) -> bool {
        self.flags.contains(ConstraintSpaceFlags::FIXED_SIZE_BLOCK)
    }

    pub fn is_shrink_to_fit(&self) -> bool {
        self.flags.contains(ConstraintSpaceFlags::SHRINK_TO_FIT)
    }

    pub fn is_new_formatting_context(&self) -> bool {
        self.flags.contains(ConstraintSpaceFlags::NEW_FORMATTING_CONTEXT)
    }

    pub fn is_root(&self) -> bool {
        self.flags.contains(ConstraintSpaceFlags::ROOT)
    }

    /// Block-axis space left in the current fragmentainer, measured from the
    /// block-start border edge of the box. `None` when nothing fragments the box.
    pub fn fragmentainer_space_available(&self) -> Option<Au> {
        self.fragmentainer_space_available
    }

    pub fn has_block_fragmentation(&self) -> bool {
        self.fragmentainer_space_available.is_some()
    }

    pub fn fragmentation_type(&self) -> FragmentationType {
        self.fragmentation_type
    }
}

/// Builds [`ConstraintSpace`]s.
///
/// Sizes and fixed-size flags are given in the builder's writing mode, normally
/// the parent's. When the space being built uses an orthogonal writing mode, they
/// are transposed, and the space loses block fragmentation: orthogonal flows are
/// laid out monolithically.
#[derive(Clone, Debug)]
pub struct ConstraintSpaceBuilder {
    parent_writing_mode: WritingMode,
    writing_mode: WritingMode,
    direction: Direction,
    available_size: LogicalSize<Option<Au>>,
    percentage_resolution_size: LogicalSize<Option<Au>>,
    flags: ConstraintSpaceFlags,
    fragmentainer_space_available: Option<Au>,
    fragmentation_type: FragmentationType,
}

impl ConstraintSpaceBuilder {
    pub fn new(writing_mode: WritingMode) -> Self {
        Self {
            parent_writing_mode: writing_mode,
            writing_mode,
            direction: Direction::Ltr,
            available_size: LogicalSize::new(None, None),
            percentage_resolution_size: LogicalSize::new(None, None),
            flags: ConstraintSpaceFlags::empty(),
            fragmentainer_space_available: None,
            fragmentation_type: FragmentationType::None,
        }
    }

    /// A builder for child spaces of `space`, inheriting its writing mode,
    /// direction and fragmentation type.
    pub fn new_for_children_of(space: &ConstraintSpace) -> Self {
        let mut builder = Self::new(space.writing_mode());
        builder.direction = space.direction();
        builder.fragmentation_type = space.fragmentation_type();
        builder
    }

    pub fn set_available_size(&mut self, size: LogicalSize<Option<Au>>) -> &mut Self {
        self.available_size = size;
        self
    }

    pub fn set_percentage_resolution_size(&mut self, size: LogicalSize<Option<Au>>) -> &mut Self {
        self.percentage_resolution_size = size;
        self
    }

    pub fn set_text_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    /// The writing mode of the space being built.
    pub fn set_writing_mode(&mut self, writing_mode: WritingMode) -> &mut Self {
        self.writing_mode = writing_mode;
        self
    }

    pub fn set_is_fixed_size_inline(&mut self, value: bool) -> &mut Self {
        self.flags.set(ConstraintSpaceFlags::FIXED_SIZE_INLINE, value);
        self
    }

    pub fn set_is_fixed_size_block(&mut self, value: bool) -> &mut Self {
        self.flags.set(ConstraintSpaceFlags::FIXED_SIZE_BLOCK, value);
        self
    }

    pub fn set_is_shrink_to_fit(&mut self, value: bool) -> &mut Self {
        self.flags.set(ConstraintSpaceFlags::SHRINK_TO_FIT, value);
        self
    }

    pub fn set_is_new_formatting_context(&mut self, value: bool) -> &mut Self {
        self.flags.set(ConstraintSpaceFlags::NEW_FORMATTING_CONTEXT, value);
        self
    }

    pub fn set_is_root(&mut self, value: bool) -> &mut Self {
        self.flags.set(ConstraintSpaceFlags::ROOT, value);
        self
    }

    pub fn set_fragmentainer_space_available(&mut self, space: Option<Au>) -> &mut Self {
        self.fragmentainer_space_available = space;
        self
    }

    pub fn set_fragmentation_type(&mut self, fragmentation_type: FragmentationType) -> &mut Self {
        self.fragmentation_type = fragmentation_type;
        self
    }

    pub fn to_constraint_space(&self) -> ConstraintSpace {
        let mut flags = self.flags;
        let mut available_size = self.available_size;
        let mut percentage_resolution_size = self.percentage_resolution_size;
        let mut fragmentainer_space_available = self.fragmentainer_space_available;
        let mut fragmentation_type = self.fragmentation_type;

        if self.writing_mode.is_orthogonal_to(self.parent_writing_mode) {
            available_size = available_size.transposed();
            percentage_resolution_size = percentage_resolution_size.transposed();
            flags.set(
                ConstraintSpaceFlags::FIXED_SIZE_INLINE,
                self.flags.contains(ConstraintSpaceFlags::FIXED_SIZE_BLOCK),
            );
            flags.set(
                ConstraintSpaceFlags::FIXED_SIZE_BLOCK,
                self.flags.contains(ConstraintSpaceFlags::FIXED_SIZE_INLINE),
            );
            fragmentainer_space_available = None;
            fragmentation_type = FragmentationType::None;
        }

        ConstraintSpace {
            writing_mode: self.writing_mode,
            direction: self.direction,
            available_size,
            percentage_resolution_size,
            flags,
            fragmentainer_space_available,
            fragmentation_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_child_space_transposes_sizes() {
        let space = ConstraintSpaceBuilder::new(WritingMode::HorizontalTb)
            .set_available_size(LogicalSize::new(Some(Au::from_px(200)), None))
            .set_percentage_resolution_size(LogicalSize::new(Some(Au::from_px(200)), None))
            .set_is_fixed_size_inline(true)
            .set_writing_mode(WritingMode::VerticalRl)
            .set_fragmentainer_space_available(Some(Au::from_px(50)))
            .to_constraint_space();

        assert_eq!(space.writing_mode(), WritingMode::VerticalRl);
        assert_eq!(space.available_size().inline, None);
        assert_eq!(space.available_size().block, Some(Au::from_px(200)));
        assert!(space.is_fixed_size_block());
        assert!(!space.is_fixed_size_inline());
        assert!(!space.has_block_fragmentation());
    }

    #[test]
    fn parallel_child_space_keeps_sizes() {
        let space = ConstraintSpaceBuilder::new(WritingMode::VerticalLr)
            .set_available_size(LogicalSize::new(Some(Au::from_px(10)), Some(Au::from_px(20))))
            .set_writing_mode(WritingMode::VerticalRl)
            .set_is_new_formatting_context(true)
            .to_constraint_space();

        assert_eq!(space.available_size().inline, Some(Au::from_px(10)));
        assert_eq!(space.available_size().block, Some(Au::from_px(20)));
        assert!(space.is_new_formatting_context());
    }
}
