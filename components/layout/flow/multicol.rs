/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Mapping of a multi-column container's flow into columns.
//!
//! <https://drafts.csswg.org/css-multicol/>

use std::sync::Arc;

use app_units::Au;
use log::{trace, warn};

use crate::fragment_tree::BlockBreakToken;
use crate::fragmentation::PendingBreak;
use crate::geom::LogicalOffset;
use crate::node::BlockNode;

/// Tracks the column currently being filled while a multi-column container
/// lays out its children as one flow, and converts offsets in that flow into
/// offsets inside the container.
#[derive(Debug)]
pub(crate) struct ColumnMapper {
    /// The distance between the inline-start edges of two adjacent columns.
    inline_progression: Au,
    column_block_size: Au,
    column_index: usize,
    /// The flow offset at which the current column starts.
    column_start: Au,
    /// The block offset of the columns inside the container.
    content_block_start: Au,
    max_column_count: usize,
    pending_break: Option<PendingBreak>,
}

impl ColumnMapper {
    pub(crate) fn new(
        inline_progression: Au,
        column_block_size: Au,
        flow_start: Au,
        content_block_start: Au,
        max_column_count: usize,
    ) -> Self {
        Self {
            inline_progression,
            column_block_size,
            column_index: 0,
            column_start: flow_start,
            content_block_start,
            max_column_count,
            pending_break: None,
        }
    }

    /// The flow offset at which the current column ends.
    pub(crate) fn next_break_offset(&self) -> Au {
        self.column_start + self.column_block_size
    }

    pub(crate) fn to_visual_offset(&self, offset: LogicalOffset) -> LogicalOffset {
        LogicalOffset::new(
            offset.inline + self.inline_progression * self.column_index as i32,
            offset.block - self.column_start + self.content_block_start,
        )
    }

    pub(crate) fn set_break_token(&mut self, pending_break: PendingBreak) {
        debug_assert!(self.pending_break.is_none());
        self.pending_break = Some(pending_break);
    }

    pub(crate) fn pending_break_mut(&mut self) -> Option<&mut PendingBreak> {
        self.pending_break.as_mut()
    }

    /// Moves to the next column, returning the token layout resumes from in
    /// it. Returns `None` when there is nothing left to lay out, or when the
    /// container already produced as many columns as it is allowed to.
    pub(crate) fn advance(&mut self, container: &BlockNode) -> Option<Arc<BlockBreakToken>> {
        let token = self.pending_break.take()?.into_break_token(container.clone());
        if self.column_index + 1 >= self.max_column_count {
            warn!(
                "Multi-column container reached {} columns, dropping the remaining content",
                self.max_column_count
            );
            return None;
        }
        self.column_index += 1;
        self.column_start = token.break_offset();
        trace!(
            "Advancing to column {} at flow offset {:?}",
            self.column_index, self.column_start
        );
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use servo_arc::Arc as ServoArc;

    use super::*;
    use crate::style::ComputedStyle;

    fn px(value: i32) -> Au {
        Au::from_px(value)
    }

    #[test]
    fn advance_moves_the_visual_offset_to_the_next_column() {
        let container = BlockNode::new(ServoArc::new(ComputedStyle::default()));
        let mut mapper = ColumnMapper::new(px(110), px(100), px(5), px(5), 10);
        assert_eq!(mapper.next_break_offset(), px(105));
        assert_eq!(
            mapper.to_visual_offset(LogicalOffset::new(px(5), px(50))),
            LogicalOffset::new(px(5), px(50))
        );

        assert!(mapper.advance(&container).is_none());
        mapper.set_break_token(PendingBreak::new(px(105), None));
        assert!(mapper.pending_break.is_some());
        let token = mapper.advance(&container).unwrap();
        assert_eq!(token.break_offset(), px(105));
        assert!(mapper.pending_break.is_none());
        assert_eq!(mapper.column_index, 1);
        assert_eq!(mapper.next_break_offset(), px(205));
        assert_eq!(
            mapper.to_visual_offset(LogicalOffset::new(px(5), px(125))),
            LogicalOffset::new(px(115), px(25))
        );
    }

    #[test]
    fn advance_stops_at_the_column_limit() {
        let container = BlockNode::new(ServoArc::new(ComputedStyle::default()));
        let mut mapper = ColumnMapper::new(px(110), px(100), px(0), px(0), 1);
        mapper.set_break_token(PendingBreak::new(px(100), None));
        assert!(mapper.advance(&container).is_none());
        assert_eq!(mapper.column_index, 0);
    }
}
