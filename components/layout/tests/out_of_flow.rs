/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use common::*;
use layout::geom::PhysicalSides;
use layout::FragmentFlags;
use layout::style::{ComputedStyle, Contain, Length, Position};

fn positioned(position: Position, inset: PhysicalSides<Length>) -> ComputedStyle {
    ComputedStyle {
        position,
        inset,
        ..Default::default()
    }
}

fn inset(top: Length, right: Length, bottom: Length, left: Length) -> PhysicalSides<Length> {
    PhysicalSides::new(top, right, bottom, left)
}

#[test]
fn root_positions_absolute_children() {
    let child = node(ComputedStyle {
        width: Length::px(30),
        height: Length::px(40),
        ..positioned(
            Position::Absolute,
            inset(Length::px(20), Length::Auto, Length::Auto, Length::px(10)),
        )
    });
    let in_flow = node(sized(None, Some(100)));
    let root = with_children(node(ComputedStyle::default()), &[&child, &in_flow]);

    let fragment = layout(&root, &root_space(200));
    // Positioned children are added after the in-flow pass.
    assert_eq!(offsets(&fragment), vec![point(0, 0), point(10, 20)]);
    assert_eq!(sizes(&fragment), vec![size(200, 100), size(30, 40)]);
    assert!(
        fragment.children()[1]
            .flags()
            .contains(FragmentFlags::IS_OUT_OF_FLOW_POSITIONED)
    );
    assert!(fragment.out_of_flow_descendants().is_empty());
}

#[test]
fn end_insets_anchor_to_the_padding_box() {
    let child = node(ComputedStyle {
        width: Length::px(30),
        height: Length::px(40),
        ..positioned(
            Position::Absolute,
            inset(Length::Auto, Length::px(10), Length::px(5), Length::Auto),
        )
    });
    let root = with_children(
        node(ComputedStyle {
            border_width: PhysicalSides::all(px(2)),
            ..sized(None, Some(100))
        }),
        &[&child],
    );

    let fragment = layout(&root, &root_space(200));
    // The containing block is 196x100, inside a 2px border.
    assert_eq!(offsets(&fragment), vec![point(158, 57)]);
}

#[test]
fn both_insets_stretch_an_auto_size() {
    let child = node(positioned(
        Position::Absolute,
        inset(Length::px(10), Length::px(20), Length::px(30), Length::px(40)),
    ));
    let root = with_children(node(sized(None, Some(100))), &[&child]);

    let fragment = layout(&root, &root_space(200));
    assert_eq!(offsets(&fragment), vec![point(40, 10)]);
    assert_eq!(sizes(&fragment), vec![size(140, 60)]);
}

#[test]
fn auto_insets_use_the_static_position() {
    let before = node(sized(None, Some(25)));
    let content = node(sized(Some(50), Some(10)));
    let child = with_children(
        node(positioned(
            Position::Absolute,
            inset(Length::Auto, Length::Auto, Length::Auto, Length::Auto),
        )),
        &[&content],
    );
    let root = with_children(node(ComputedStyle::default()), &[&before, &child]);

    let fragment = layout(&root, &root_space(200));
    // Shrink-to-fit around its 50px content.
    assert_eq!(offsets(&fragment), vec![point(0, 0), point(0, 25)]);
    assert_eq!(sizes(&fragment), vec![size(200, 25), size(50, 10)]);
}

#[test]
fn candidates_bubble_up_to_their_containing_block() {
    let before = node(sized(None, Some(50)));
    let spacer = node(sized(None, Some(10)));
    let absolute = node(ComputedStyle {
        width: Length::px(30),
        height: Length::px(30),
        ..positioned(
            Position::Absolute,
            inset(Length::Auto, Length::Auto, Length::Auto, Length::Auto),
        )
    });
    let static_parent = with_children(node(ComputedStyle::default()), &[&spacer, &absolute]);
    let root = with_children(node(ComputedStyle::default()), &[&before, &static_parent]);

    let fragment = layout(&root, &root_space(200));
    let static_parent_fragment = &fragment.children()[1];
    assert_eq!(static_parent_fragment.children().len(), 1);
    assert_eq!(static_parent_fragment.out_of_flow_descendants().len(), 1);
    // The static position, (0, 10) in the parent, becomes (0, 60) in the root.
    assert_eq!(
        offsets(&fragment),
        vec![point(0, 0), point(0, 50), point(0, 60)]
    );
    assert!(fragment.out_of_flow_descendants().is_empty());
}

#[test]
fn relative_parent_contains_absolute_but_not_fixed() {
    let absolute = node(ComputedStyle {
        width: Length::px(10),
        height: Length::px(10),
        ..positioned(
            Position::Absolute,
            inset(Length::px(5), Length::Auto, Length::Auto, Length::px(5)),
        )
    });
    let fixed = node(ComputedStyle {
        width: Length::px(10),
        height: Length::px(10),
        ..positioned(
            Position::Fixed,
            inset(Length::px(1), Length::Auto, Length::Auto, Length::px(1)),
        )
    });
    let before = node(sized(None, Some(50)));
    let relative = with_children(
        node(ComputedStyle {
            position: Position::Relative,
            ..sized(None, Some(40))
        }),
        &[&absolute, &fixed],
    );
    let root = with_children(node(ComputedStyle::default()), &[&before, &relative]);

    let fragment = layout(&root, &root_space(200));
    let relative_fragment = &fragment.children()[1];
    assert_eq!(offsets(relative_fragment), vec![point(5, 5)]);
    assert_eq!(relative_fragment.out_of_flow_descendants().len(), 1);
    assert_eq!(
        offsets(&fragment),
        vec![point(0, 0), point(0, 50), point(1, 1)]
    );
}

#[test]
fn layout_containment_contains_fixed_descendants() {
    let fixed = node(ComputedStyle {
        width: Length::px(10),
        height: Length::px(10),
        ..positioned(
            Position::Fixed,
            inset(Length::px(3), Length::Auto, Length::Auto, Length::px(4)),
        )
    });
    let contained = with_children(
        node(ComputedStyle {
            contain: Contain::LAYOUT,
            ..sized(None, Some(40))
        }),
        &[&fixed],
    );
    let root = with_children(node(ComputedStyle::default()), &[&contained]);

    let fragment = layout(&root, &root_space(200));
    assert_eq!(offsets(&fragment.children()[0]), vec![point(4, 3)]);
    assert_eq!(offsets(&fragment), vec![point(0, 0)]);
}
