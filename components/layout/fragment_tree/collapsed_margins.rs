/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;
use euclid::num::Zero;
use serde::Serialize;

/// A set of adjoining margins, reduced to the two values that matter when they
/// collapse: <https://drafts.csswg.org/css2/#collapsing-margins>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CollapsedMargin {
    max_positive: Au,
    min_negative: Au,
}

impl CollapsedMargin {
    pub fn zero() -> Self {
        Self {
            max_positive: Au::zero(),
            min_negative: Au::zero(),
        }
    }

    pub fn new(margin: Au) -> Self {
        Self {
            max_positive: margin.max(Au::zero()),
            min_negative: margin.min(Au::zero()),
        }
    }

    pub fn adjoin(&self, other: &Self) -> Self {
        Self {
            max_positive: self.max_positive.max(other.max_positive),
            min_negative: self.min_negative.min(other.min_negative),
        }
    }

    pub fn adjoin_assign(&mut self, other: &Self) {
        *self = self.adjoin(other);
    }

    /// The width of the collapsed margin: the largest positive margin minus the
    /// absolute value of the most negative one. May be negative.
    pub fn solve(&self) -> Au {
        self.max_positive + self.min_negative
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// The not yet resolved margins adjoining the block-start and block-end edges of
/// a fragment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MarginStrut {
    pub block_start: CollapsedMargin,
    pub block_end: CollapsedMargin,
}

impl MarginStrut {
    pub fn is_empty(&self) -> bool {
        self.block_start.is_zero() && self.block_end.is_zero()
    }

    pub fn block_end_sum(&self) -> Au {
        self.block_end.solve()
    }

    pub fn append_block_start(&mut self, margin: Au) {
        self.block_start.adjoin_assign(&CollapsedMargin::new(margin));
    }

    /// Replaces the block-start margins, for when border or padding stops them
    /// from adjoining anything inside the box.
    pub fn set_block_start(&mut self, margin: Au) {
        self.block_start = CollapsedMargin::new(margin);
    }

    pub fn append_block_end(&mut self, margin: Au) {
        self.block_end.adjoin_assign(&CollapsedMargin::new(margin));
    }

    pub fn set_block_end(&mut self, margin: Au) {
        self.block_end = CollapsedMargin::new(margin);
    }
}
