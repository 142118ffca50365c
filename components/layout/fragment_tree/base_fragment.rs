/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bitflags::bitflags;
use serde::Serialize;

use crate::node::BlockNode;

/// This data structure stores fields that are common to all fragment kinds.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct BaseFragment {
    /// A tag which identifies the box this fragment was generated for. `None` for
    /// fragments that do not belong to a box of the tree, such as text runs
    /// produced by the inline collaborator.
    pub tag: Option<Tag>,

    /// Flags which various information about this fragment used during
    /// layout.
    pub flags: FragmentFlags,
}

impl BaseFragment {
    pub fn anonymous() -> Self {
        BaseFragment {
            tag: None,
            flags: FragmentFlags::empty(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.tag.is_none()
    }
}

impl From<&BlockNode> for BaseFragment {
    fn from(node: &BlockNode) -> Self {
        let style = node.style();
        let mut flags = FragmentFlags::empty();
        if style.is_floating() {
            flags.insert(FragmentFlags::IS_FLOAT);
        }
        if style.is_out_of_flow_positioned() {
            flags.insert(FragmentFlags::IS_OUT_OF_FLOW_POSITIONED);
        }
        Self {
            tag: Some(Tag(node.address())),
            flags,
        }
    }
}

bitflags! {
    /// Flags used to track various information about a box during layout.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct FragmentFlags: u16 {
        /// Whether or not the box that created this fragment is the root of the layout.
        const IS_ROOT = 1 << 0;
        /// Whether or not this fragment establishes a new block formatting context.
        const ESTABLISHES_NEW_FORMATTING_CONTEXT = 1 << 1;
        /// Whether or not this fragment was placed as a float.
        const IS_FLOAT = 1 << 2;
        /// Whether or not this fragment was placed by the out-of-flow pass.
        const IS_OUT_OF_FLOW_POSITIONED = 1 << 3;
        /// Whether or not this fragment lays its children out in columns.
        const IS_MULTICOL_CONTAINER = 1 << 4;
        /// Whether or not a legacy layout collaborator produced this fragment.
        const PRODUCED_BY_LEGACY_LAYOUT = 1 << 5;
    }
}

/// Identifies the box a fragment belongs to, for debugging and for consumers
/// that map fragments back to boxes without holding the box alive.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tag(usize);

impl Tag {
    pub fn id(self) -> usize {
        self.0
    }
}
