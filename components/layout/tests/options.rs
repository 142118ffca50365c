/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use common::*;
use layout::layout_debug::fragment_tree_to_json;
use layout::style::ComputedStyle;
use layout::{DebugOptions, LayoutContext, LayoutOptions};
use serde_json::Value;

#[test]
fn options_load_from_partial_json() {
    let options = LayoutOptions::from_json(
        r#"{ "max_fragmentainer_count": 4, "debug": { "trace_layout": true } }"#,
    )
    .unwrap();
    assert_eq!(options.max_fragmentainer_count, 4);
    assert!(options.columns_enabled);
    assert!(options.debug.trace_layout);
    assert!(!options.debug.dump_fragment_tree);

    assert_eq!(LayoutOptions::from_json("{}").unwrap(), LayoutOptions::default());
    assert!(LayoutOptions::from_json(r#"{ "columns_enabled": 3 }"#).is_err());
}

#[test]
fn debug_options_from_a_command_line_string() {
    let mut debug = DebugOptions::default();
    debug.extend("help,dump-fragment-tree".to_owned()).unwrap();
    assert!(debug.help);
    assert!(debug.dump_fragment_tree);
    assert!(!debug.trace_layout);
    assert_eq!(debug.extend("dump-display-list".to_owned()), Err("dump-display-list".to_owned()));
}

#[test]
fn fragment_tree_serializes_to_json() {
    let child = node(sized(Some(40), Some(10)));
    let root = with_children(node(ComputedStyle::default()), &[&child]);
    let fragment = layout(&root, &root_space(100));

    let json: Value = serde_json::from_str(&fragment_tree_to_json(&fragment).unwrap()).unwrap();
    assert_eq!(json["kind"], "Box");
    assert!(json["offset"].is_null());
    let children = json["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert!(!children[0]["offset"].is_null());
    assert!(children[0]["children"].as_array().unwrap().is_empty());
}

#[test]
fn debug_output_does_not_change_layout() {
    let build = || {
        let first = node(ComputedStyle {
            margin: margins(10, 0, 10, 0),
            ..sized(None, Some(20))
        });
        let second = node(sized(Some(50), Some(30)));
        with_children(node(ComputedStyle::default()), &[&first, &second])
    };

    let mut options = LayoutOptions::default();
    options
        .debug
        .extend("dump-fragment-tree,trace-layout".to_owned())
        .unwrap();
    init_logging();
    let traced = build().layout(&LayoutContext::new(options), &root_space(100), None);
    let plain = layout(&build(), &root_space(100));

    assert_eq!(traced.size(), plain.size());
    assert_eq!(offsets(&traced), offsets(&plain));
    assert_eq!(sizes(&traced), sizes(&plain));
}
