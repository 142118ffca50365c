/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::{Arc, OnceLock};

use app_units::Au;
use euclid::num::Zero;
use serde::{Serialize, Serializer};

use super::{BaseFragment, BlockBreakToken, FragmentFlags, MarginStrut, Tag};
use crate::geom::{Direction, LogicalSize, PhysicalPoint, PhysicalSize, WritingMode};
use crate::node::{BlockNode, BoxGeometry, WeakBlockNode};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FragmentKind {
    Box,
    Text,
}

/// An absolutely or fixed positioned box whose containing block is an ancestor
/// of the fragment carrying it, and which therefore still awaits layout.
#[derive(Clone, Debug, Serialize)]
pub struct OutOfFlowDescendant {
    #[serde(skip)]
    pub node: BlockNode,
    /// The position the box would have had in normal flow, relative to the
    /// border box of the fragment carrying it.
    pub static_position: PhysicalPoint,
}

/// The immutable result of laying out a box, or the part of a box that fit in
/// one fragmentainer.
///
/// Geometry is physical. The offset is relative to the parent fragment's
/// border box and is assigned exactly once, by whoever positions the fragment.
#[derive(Debug, Serialize)]
pub struct PhysicalFragment {
    pub(crate) base: BaseFragment,
    pub(crate) kind: FragmentKind,
    #[serde(skip)]
    pub(crate) node: WeakBlockNode,
    pub(crate) size: PhysicalSize,
    pub(crate) overflow: PhysicalSize,
    #[serde(serialize_with = "serialize_offset")]
    pub(crate) offset: OnceLock<PhysicalPoint>,
    pub(crate) children: Vec<Arc<PhysicalFragment>>,
    pub(crate) margin_strut: MarginStrut,
    pub(crate) break_token: Option<Arc<BlockBreakToken>>,
    pub(crate) out_of_flow_descendants: Vec<OutOfFlowDescendant>,
    #[serde(skip)]
    pub(crate) writing_mode: WritingMode,
    #[serde(skip)]
    pub(crate) direction: Direction,
}

fn serialize_offset<S: Serializer>(
    offset: &OnceLock<PhysicalPoint>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    offset.get().serialize(serializer)
}

impl PhysicalFragment {
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn tag(&self) -> Option<Tag> {
        self.base.tag
    }

    pub fn flags(&self) -> FragmentFlags {
        self.base.flags
    }

    /// The box this fragment was generated for, if it is still alive.
    pub fn node(&self) -> Option<BlockNode> {
        self.node.upgrade()
    }

    /// The size of the border box.
    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    pub fn width(&self) -> Au {
        self.size.width
    }

    pub fn height(&self) -> Au {
        self.size.height
    }

    /// The size of the area covered by this fragment and its content.
    pub fn overflow(&self) -> PhysicalSize {
        self.overflow
    }

    /// The offset of this fragment's border box from its parent's, or `None` if
    /// nothing has positioned it yet.
    pub fn offset(&self) -> Option<PhysicalPoint> {
        self.offset.get().copied()
    }

    /// The horizontal component of [`Self::offset`], zero while unpositioned.
    pub fn left_offset(&self) -> Au {
        self.offset.get().map_or(Au::zero(), |offset| offset.x)
    }

    /// The vertical component of [`Self::offset`], zero while unpositioned.
    pub fn top_offset(&self) -> Au {
        self.offset.get().map_or(Au::zero(), |offset| offset.y)
    }

    /// Positions this fragment inside its parent and reports the final geometry
    /// to the originating box.
    ///
    /// Panics if the fragment was already positioned.
    pub fn set_offset(&self, offset: PhysicalPoint) {
        self.set_offset_without_sync(offset);
        self.sync_geometry(offset);
    }

    /// Like [`Self::set_offset`], leaving the originating box untouched.
    pub(crate) fn set_offset_without_sync(&self, offset: PhysicalPoint) {
        assert!(
            self.offset.set(offset).is_ok(),
            "The offset of a fragment can only be set once"
        );
    }

    /// Reports this fragment's size, at `offset`, to the originating box.
    pub(crate) fn sync_geometry(&self, offset: PhysicalPoint) {
        if let Some(node) = self.node.upgrade() {
            node.sync_geometry(BoxGeometry {
                size: self.size,
                offset,
            });
        }
    }

    pub fn children(&self) -> &[Arc<PhysicalFragment>] {
        &self.children
    }

    pub fn margin_strut(&self) -> MarginStrut {
        self.margin_strut
    }

    pub fn break_token(&self) -> Option<&Arc<BlockBreakToken>> {
        self.break_token.as_ref()
    }

    pub fn out_of_flow_descendants(&self) -> &[OutOfFlowDescendant] {
        &self.out_of_flow_descendants
    }

    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// A [`PhysicalFragment`] seen from a parent laying it out in `writing_mode`.
#[derive(Clone, Copy)]
pub struct BoxFragment<'a> {
    writing_mode: WritingMode,
    fragment: &'a PhysicalFragment,
}

impl<'a> BoxFragment<'a> {
    pub fn new(writing_mode: WritingMode, fragment: &'a PhysicalFragment) -> Self {
        Self {
            writing_mode,
            fragment,
        }
    }

    pub fn size(&self) -> LogicalSize<Au> {
        LogicalSize::from_physical(self.fragment.size, self.writing_mode)
    }

    pub fn inline_size(&self) -> Au {
        self.size().inline
    }

    pub fn block_size(&self) -> Au {
        self.size().block
    }

    pub fn margin_strut(&self) -> MarginStrut {
        self.fragment.margin_strut
    }

    pub fn physical_fragment(&self) -> &'a PhysicalFragment {
        self.fragment
    }
}
