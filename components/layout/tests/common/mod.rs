/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![allow(dead_code)]

use std::sync::Arc;

use app_units::Au;
use euclid::default::{Point2D, Size2D};
use layout::geom::{LogicalSize, PhysicalSides, WritingMode};
use layout::style::{ComputedStyle, Length};
use layout::{
    BlockNode, ConstraintSpace, ConstraintSpaceBuilder, LayoutContext, LayoutOptions,
    PhysicalFragment,
};
use servo_arc::Arc as ServoArc;

pub fn px(value: i32) -> Au {
    Au::from_px(value)
}

pub fn point(x: i32, y: i32) -> Point2D<Au> {
    Point2D::new(px(x), px(y))
}

pub fn size(width: i32, height: i32) -> Size2D<Au> {
    Size2D::new(px(width), px(height))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn context() -> LayoutContext {
    init_logging();
    LayoutContext::new(LayoutOptions::default())
}

pub fn node(style: ComputedStyle) -> BlockNode {
    BlockNode::new(ServoArc::new(style))
}

pub fn with_children(parent: BlockNode, children: &[&BlockNode]) -> BlockNode {
    for child in children {
        parent.append_child((*child).clone());
    }
    parent
}

/// A block with a fixed pixel size. `None` leaves that dimension `auto`.
pub fn sized(width: Option<i32>, height: Option<i32>) -> ComputedStyle {
    ComputedStyle {
        width: width.map_or(Length::Auto, Length::px),
        height: height.map_or(Length::Auto, Length::px),
        ..Default::default()
    }
}

pub fn margins(top: i32, right: i32, bottom: i32, left: i32) -> PhysicalSides<Length> {
    PhysicalSides::new(
        Length::px(top),
        Length::px(right),
        Length::px(bottom),
        Length::px(left),
    )
}

/// A horizontal-tb space of the given inline size with an indefinite block size.
pub fn space(inline_size: i32) -> ConstraintSpace {
    let size = LogicalSize::new(Some(px(inline_size)), None);
    ConstraintSpaceBuilder::new(WritingMode::HorizontalTb)
        .set_available_size(size)
        .set_percentage_resolution_size(size)
        .to_constraint_space()
}

/// Like [`space`], for the root of a layout: a new formatting context and the
/// containing block of every positioned box.
pub fn root_space(inline_size: i32) -> ConstraintSpace {
    let size = LogicalSize::new(Some(px(inline_size)), None);
    ConstraintSpaceBuilder::new(WritingMode::HorizontalTb)
        .set_available_size(size)
        .set_percentage_resolution_size(size)
        .set_is_new_formatting_context(true)
        .set_is_root(true)
        .to_constraint_space()
}

pub fn layout(root: &BlockNode, space: &ConstraintSpace) -> Arc<PhysicalFragment> {
    root.layout(&context(), space, None)
}

pub fn offsets(fragment: &PhysicalFragment) -> Vec<Point2D<Au>> {
    fragment
        .children()
        .iter()
        .map(|child| child.offset().expect("children are positioned"))
        .collect()
}

pub fn sizes(fragment: &PhysicalFragment) -> Vec<Size2D<Au>> {
    fragment.children().iter().map(|child| child.size()).collect()
}
