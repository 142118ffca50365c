/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The box tree consumed by layout.

use std::fmt;
use std::sync::Arc;

use log::debug;
use servo_arc::Arc as ServoArc;

use crate::cell::{ArcRefCell, WeakRefCell};
use crate::constraint_space::ConstraintSpace;
use crate::context::LayoutContext;
use crate::flow::BlockLayoutAlgorithm;
use crate::formatting_contexts::{FormattingContext, InlineLayout, LegacyLayout};
use crate::fragment_tree::{BlockBreakToken, PhysicalFragment};
use crate::geom::{PhysicalPoint, PhysicalSize};
use crate::layout_coordinator::LayoutCoordinator;
use crate::layout_debug;
use crate::sizing::ContentSizes;
use crate::style::ComputedStyle;

/// The final geometry of a box, reported to its [`GeometrySync`] callback once
/// the box's fragment has been positioned in its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BoxGeometry {
    /// The border-box size.
    pub size: PhysicalSize,
    /// The offset of the border box from the parent fragment's border box.
    pub offset: PhysicalPoint,
}

pub type GeometrySync = Arc<dyn Fn(&BoxGeometry) + Send + Sync>;

/// What lays a box out.
#[derive(Clone)]
pub enum BoxKind {
    Block,
    Legacy(Arc<dyn LegacyLayout>),
    Inline(Arc<dyn InlineLayout>),
}

impl fmt::Debug for BoxKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(match self {
            Self::Block => "Block",
            Self::Legacy(_) => "Legacy",
            Self::Inline(_) => "Inline",
        })
    }
}

pub(crate) struct BoxData {
    style: ServoArc<ComputedStyle>,
    kind: BoxKind,
    first_child: Option<BlockNode>,
    next_sibling: Option<BlockNode>,
    cached_fragment: Option<Arc<PhysicalFragment>>,
    geometry_sync: Option<GeometrySync>,
}

/// A handle to a box. Clones refer to the same box.
#[derive(Clone)]
pub struct BlockNode(ArcRefCell<BoxData>);

#[derive(Clone, Debug, Default)]
pub(crate) struct WeakBlockNode(WeakRefCell<BoxData>);

impl WeakBlockNode {
    pub(crate) fn upgrade(&self) -> Option<BlockNode> {
        self.0.upgrade().map(BlockNode)
    }
}

impl fmt::Debug for BlockNode {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let data = self.0.borrow();
        formatter
            .debug_struct("BlockNode")
            .field("address", &format_args!("{:#x}", self.0.address()))
            .field("kind", &data.kind)
            .field("display", &data.style.display)
            .finish()
    }
}

impl BlockNode {
    fn with_kind(style: ServoArc<ComputedStyle>, kind: BoxKind) -> Self {
        BlockNode(ArcRefCell::new(BoxData {
            style,
            kind,
            first_child: None,
            next_sibling: None,
            cached_fragment: None,
            geometry_sync: None,
        }))
    }

    pub fn new(style: ServoArc<ComputedStyle>) -> Self {
        Self::with_kind(style, BoxKind::Block)
    }

    pub fn new_legacy(style: ServoArc<ComputedStyle>, layout: Arc<dyn LegacyLayout>) -> Self {
        Self::with_kind(style, BoxKind::Legacy(layout))
    }

    pub fn new_inline(style: ServoArc<ComputedStyle>, layout: Arc<dyn InlineLayout>) -> Self {
        Self::with_kind(style, BoxKind::Inline(layout))
    }

    pub fn style(&self) -> ServoArc<ComputedStyle> {
        self.0.borrow().style.clone()
    }

    /// Replaces the style of the box. The next layout sees the new values.
    pub fn set_style(&self, style: ServoArc<ComputedStyle>) {
        self.0.borrow_mut().style = style;
    }

    pub fn kind(&self) -> BoxKind {
        self.0.borrow().kind.clone()
    }

    pub fn first_child(&self) -> Option<BlockNode> {
        self.0.borrow().first_child.clone()
    }

    pub fn next_sibling(&self) -> Option<BlockNode> {
        self.0.borrow().next_sibling.clone()
    }

    pub fn set_first_child(&self, child: Option<BlockNode>) {
        self.0.borrow_mut().first_child = child;
    }

    pub fn set_next_sibling(&self, sibling: Option<BlockNode>) {
        self.0.borrow_mut().next_sibling = sibling;
    }

    /// Makes `child` the last child of this box.
    pub fn append_child(&self, child: BlockNode) {
        match self.children().last() {
            Some(last) => last.set_next_sibling(Some(child)),
            None => self.set_first_child(Some(child)),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = BlockNode> {
        std::iter::successors(self.first_child(), BlockNode::next_sibling)
    }

    /// Whether both handles refer to the same box.
    pub fn ptr_eq(&self, other: &BlockNode) -> bool {
        self.0.ptr_eq(&other.0)
    }

    pub(crate) fn address(&self) -> usize {
        self.0.address()
    }

    pub(crate) fn downgrade(&self) -> WeakBlockNode {
        WeakBlockNode(self.0.downgrade())
    }

    /// The fragment produced by the most recent layout of this box.
    pub fn cached_fragment(&self) -> Option<Arc<PhysicalFragment>> {
        self.0.borrow().cached_fragment.clone()
    }

    pub fn set_geometry_sync(&self, callback: impl Fn(&BoxGeometry) + Send + Sync + 'static) {
        self.0.borrow_mut().geometry_sync = Some(Arc::new(callback));
    }

    pub(crate) fn sync_geometry(&self, geometry: BoxGeometry) {
        // The callback may inspect the node, so it runs outside the borrow.
        let callback = self.0.borrow().geometry_sync.clone();
        if let Some(callback) = callback {
            callback(&geometry);
        }
    }

    /// Lays the box out in `space`, resuming after `break_token` if given.
    /// The returned fragment is also cached on the node.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "BlockNode::layout",
            skip_all,
            fields(servo_profiling = true),
            level = "trace",
        )
    )]
    pub fn layout(
        &self,
        context: &LayoutContext,
        space: &ConstraintSpace,
        break_token: Option<&BlockBreakToken>,
    ) -> Arc<PhysicalFragment> {
        let formatting_context = FormattingContext::for_node(self, context);
        debug!("Laying out {:?} as {:?}", self, formatting_context);

        let fragment = match formatting_context {
            FormattingContext::Block => {
                BlockLayoutAlgorithm::new(context, self.clone(), space, break_token).layout()
            },
            FormattingContext::Inline(inline) => inline.layout(self, space),
            FormattingContext::Legacy(legacy) => {
                LayoutCoordinator::new(legacy.begin_layout(self, space)).run_to_completion()
            },
        };

        if space.is_root() {
            // Nothing positions the root fragment, so it reports itself at the origin.
            if context.syncs_geometry() {
                fragment.sync_geometry(PhysicalPoint::zero());
            }
            if context.options.debug.dump_fragment_tree {
                layout_debug::dump_fragment_tree(&fragment);
            }
        }
        self.0.borrow_mut().cached_fragment = Some(fragment.clone());
        fragment
    }

    /// The min- and max-content inline sizes of the box's content, excluding
    /// its own border and padding.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "BlockNode::compute_min_and_max_content_sizes",
            skip_all,
            fields(servo_profiling = true),
            level = "trace",
        )
    )]
    pub fn compute_min_and_max_content_sizes(&self, context: &LayoutContext) -> ContentSizes {
        match FormattingContext::for_node(self, context) {
            FormattingContext::Block => {
                BlockLayoutAlgorithm::compute_min_and_max_content_sizes(context, self)
            },
            FormattingContext::Inline(inline) => inline.compute_min_and_max_content_sizes(self),
            FormattingContext::Legacy(legacy) => legacy.compute_min_and_max_content_sizes(self),
        }
    }
}
