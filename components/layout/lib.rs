/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![deny(unsafe_code)]

//! Block-level box layout.
//!
//! Lays out a tree of [`BlockNode`]s in a [`ConstraintSpace`] and produces an
//! immutable tree of [`PhysicalFragment`]s: block formatting contexts with
//! margin collapsing, floats, multi-column containers, block fragmentation
//! and out-of-flow positioned boxes. Inline content and layout modes other than
//! flow layout are delegated to collaborators through the traits in
//! [`formatting_contexts`].

mod cell;
pub mod constraint_space;
pub mod context;
pub mod flow;
pub mod formatting_contexts;
pub mod fragment_tree;
pub mod fragmentation;
pub mod geom;
pub mod layout_coordinator;
pub mod layout_debug;
pub mod node;
pub mod opts;
pub mod positioned;
pub mod sizing;
pub mod style;

pub use constraint_space::{ConstraintSpace, ConstraintSpaceBuilder, FragmentationType};
pub use context::LayoutContext;
pub use flow::BlockLayoutAlgorithm;
pub use formatting_contexts::{InlineLayout, LegacyLayout, LegacyLayoutTask};
pub use fragment_tree::{BlockBreakToken, FragmentBuilder, FragmentFlags, PhysicalFragment};
pub use fragmentation::layout_paginated;
pub use layout_coordinator::{LayoutCoordinator, LayoutStep};
pub use node::{BlockNode, BoxGeometry, BoxKind};
pub use opts::{DebugOptions, LayoutOptions};
pub use sizing::ContentSizes;
pub use style::ComputedStyle;
