/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use std::sync::{Arc, Mutex};

use common::*;
use layout::style::{ColumnFill, ColumnGap, ComputedStyle, Float};
use layout::{BlockNode, BoxGeometry, FragmentFlags, LayoutContext, LayoutOptions};

/// Two 100px columns with a 10px gap.
fn multicol(height: Option<i32>) -> ComputedStyle {
    ComputedStyle {
        column_count: Some(2),
        column_gap: ColumnGap::Length(px(10)),
        ..sized(Some(210), height)
    }
}

#[test]
fn empty_multicol() {
    let root = node(multicol(Some(100)));
    let fragment = layout(&root, &root_space(300));
    assert_eq!(fragment.size(), size(210, 100));
    assert!(fragment.children().is_empty());
    assert!(fragment.flags().contains(FragmentFlags::IS_MULTICOL_CONTAINER));
}

#[test]
fn block_in_one_column() {
    let child = node(sized(None, Some(60)));
    let root = with_children(node(multicol(Some(100))), &[&child]);

    let fragment = layout(&root, &root_space(300));
    assert_eq!(offsets(&fragment), vec![point(0, 0)]);
    assert_eq!(sizes(&fragment), vec![size(100, 60)]);
}

#[test]
fn two_blocks_in_two_columns() {
    let first = node(sized(None, Some(60)));
    let second = node(sized(None, Some(60)));
    let root = with_children(node(multicol(Some(100))), &[&first, &second]);

    let fragment = layout(&root, &root_space(300));
    assert_eq!(fragment.size(), size(210, 100));
    // The second block breaks after 40px and continues at the top of the
    // second column.
    assert_eq!(
        offsets(&fragment),
        vec![point(0, 0), point(0, 60), point(110, 0)]
    );
    assert_eq!(
        sizes(&fragment),
        vec![size(100, 60), size(100, 40), size(100, 20)]
    );
    assert!(fragment.children()[1].break_token().is_some());
    assert!(fragment.children()[2].break_token().is_none());
    assert!(fragment.break_token().is_none());
}

#[test]
fn block_in_three_columns() {
    let child = node(sized(None, Some(250)));
    let root = with_children(
        node(ComputedStyle {
            column_count: Some(3),
            column_gap: ColumnGap::Length(px(10)),
            ..sized(Some(320), Some(100))
        }),
        &[&child],
    );

    let fragment = layout(&root, &root_space(400));
    assert_eq!(
        offsets(&fragment),
        vec![point(0, 0), point(110, 0), point(220, 0)]
    );
    assert_eq!(
        sizes(&fragment),
        vec![size(100, 100), size(100, 100), size(100, 50)]
    );
}

#[test]
fn overflowed_block_is_dropped_at_the_column_limit() {
    let child = node(sized(None, Some(500)));
    let root = with_children(node(multicol(Some(100))), &[&child]);
    let options = LayoutOptions {
        max_fragmentainer_count: 2,
        ..Default::default()
    };
    init_logging();
    let context = LayoutContext::new(options);

    let fragment = root.layout(&context, &root_space(300), None);
    assert_eq!(offsets(&fragment), vec![point(0, 0), point(110, 0)]);
    assert_eq!(fragment.size(), size(210, 100));
}

#[test]
fn floats_in_columns() {
    let first = node(ComputedStyle {
        float: Float::Left,
        ..sized(Some(50), Some(50))
    });
    let in_flow = node(sized(None, Some(120)));
    let root = with_children(node(multicol(Some(100))), &[&first, &in_flow]);

    let fragment = layout(&root, &root_space(300));
    assert_eq!(
        offsets(&fragment),
        vec![point(0, 0), point(0, 0), point(110, 0)]
    );
    assert_eq!(
        sizes(&fragment),
        vec![size(50, 50), size(100, 100), size(100, 20)]
    );
}

#[test]
fn auto_height_balances_columns() {
    let first = node(sized(None, Some(60)));
    let second = node(sized(None, Some(60)));
    let root = with_children(node(multicol(None)), &[&first, &second]);

    let fragment = layout(&root, &root_space(300));
    assert_eq!(fragment.size(), size(210, 60));
    assert_eq!(offsets(&fragment), vec![point(0, 0), point(110, 0)]);
}

fn record_geometry(node: &BlockNode) -> Arc<Mutex<Vec<BoxGeometry>>> {
    let recorded: Arc<Mutex<Vec<BoxGeometry>>> = Arc::default();
    let sink = recorded.clone();
    node.set_geometry_sync(move |geometry| sink.lock().unwrap().push(*geometry));
    recorded
}

#[test]
fn balanced_columns_sync_geometry_once() {
    let inner = node(sized(None, Some(60)));
    let first = with_children(node(ComputedStyle::default()), &[&inner]);
    let second = node(sized(None, Some(60)));
    let root = with_children(node(multicol(None)), &[&first, &second]);
    let root_geometry = record_geometry(&root);
    let first_geometry = record_geometry(&first);
    let inner_geometry = record_geometry(&inner);
    let second_geometry = record_geometry(&second);

    layout(&root, &root_space(300));
    assert_eq!(
        *root_geometry.lock().unwrap(),
        vec![BoxGeometry {
            size: size(210, 60),
            offset: point(0, 0),
        }]
    );
    assert_eq!(
        *first_geometry.lock().unwrap(),
        vec![BoxGeometry {
            size: size(100, 60),
            offset: point(0, 0),
        }]
    );
    assert_eq!(
        *inner_geometry.lock().unwrap(),
        vec![BoxGeometry {
            size: size(100, 60),
            offset: point(0, 0),
        }]
    );
    assert_eq!(
        *second_geometry.lock().unwrap(),
        vec![BoxGeometry {
            size: size(100, 60),
            offset: point(110, 0),
        }]
    );
}

#[test]
fn auto_fill_without_a_height_uses_one_column() {
    let first = node(sized(None, Some(60)));
    let second = node(sized(None, Some(60)));
    let root = with_children(
        node(ComputedStyle {
            column_fill: ColumnFill::Auto,
            ..multicol(None)
        }),
        &[&first, &second],
    );

    let fragment = layout(&root, &root_space(300));
    assert_eq!(fragment.size(), size(210, 120));
    assert_eq!(offsets(&fragment), vec![point(0, 0), point(0, 60)]);
    assert_eq!(sizes(&fragment), vec![size(100, 60), size(100, 60)]);
}

#[test]
fn columns_can_be_disabled() {
    let first = node(sized(None, Some(60)));
    let second = node(sized(None, Some(60)));
    let root = with_children(node(multicol(Some(100))), &[&first, &second]);
    let options = LayoutOptions {
        columns_enabled: false,
        ..Default::default()
    };

    let fragment = root.layout(&LayoutContext::new(options), &root_space(300), None);
    assert!(!fragment.flags().contains(FragmentFlags::IS_MULTICOL_CONTAINER));
    assert_eq!(offsets(&fragment), vec![point(0, 0), point(0, 60)]);
    assert_eq!(sizes(&fragment), vec![size(210, 60), size(210, 60)]);
}
