/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Float placement.
//!
//! See CSS 2.1 § 9.5.1: <https://www.w3.org/TR/CSS2/visuren.html#float-position>

use app_units::Au;
use euclid::num::Zero;
use log::trace;
use smallvec::SmallVec;

use crate::geom::{BoxStrut, Direction, LogicalOffset, LogicalRect, LogicalSize};
use crate::style::{Clear as StyleClear, ComputedStyle, Float as StyleFloat};

/// Whether the float is aligned to the inline-start or inline-end side of its containing block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FloatSide {
    InlineStart,
    InlineEnd,
}

impl FloatSide {
    pub(crate) fn from_style_and_container_direction(
        style: &ComputedStyle,
        container_direction: Direction,
    ) -> Option<FloatSide> {
        Some(match style.float {
            StyleFloat::None => return None,
            StyleFloat::Left if container_direction.is_ltr() => Self::InlineStart,
            StyleFloat::Left => Self::InlineEnd,
            StyleFloat::Right if container_direction.is_ltr() => Self::InlineEnd,
            StyleFloat::Right => Self::InlineStart,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Clear {
    None,
    InlineStart,
    InlineEnd,
    Both,
}

impl Clear {
    pub(crate) fn from_style_and_container_direction(
        style: &ComputedStyle,
        container_direction: Direction,
    ) -> Self {
        match style.clear {
            StyleClear::None => Self::None,
            StyleClear::Both => Self::Both,
            StyleClear::Left if container_direction.is_ltr() => Self::InlineStart,
            StyleClear::Left => Self::InlineEnd,
            StyleClear::Right if container_direction.is_ltr() => Self::InlineEnd,
            StyleClear::Right => Self::InlineStart,
        }
    }

    fn clears(self, side: FloatSide) -> bool {
        match self {
            Self::None => false,
            Self::Both => true,
            Self::InlineStart => side == FloatSide::InlineStart,
            Self::InlineEnd => side == FloatSide::InlineEnd,
        }
    }
}

/// The margin box of a placed float, in the coordinates of the block that
/// placed it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Exclusion {
    pub rect: LogicalRect,
    pub side: FloatSide,
}

/// The floats placed so far by one block formatting context. Exclusions are
/// only ever appended.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSpace {
    exclusions: SmallVec<[Exclusion; 4]>,
}

impl ExclusionSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, exclusion: Exclusion) {
        trace!("Adding exclusion {:?}", exclusion);
        self.exclusions.push(exclusion);
    }

    pub fn len(&self) -> usize {
        self.exclusions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exclusion> {
        self.exclusions.iter()
    }

    pub fn last_float(&self, side: FloatSide) -> Option<&Exclusion> {
        self.exclusions
            .iter()
            .rev()
            .find(|exclusion| exclusion.side == side)
    }

    /// The block offset below every float `clear` applies to, or `None` if
    /// there is no such float.
    pub fn clearance_offset(&self, clear: Clear) -> Option<Au> {
        self.exclusions
            .iter()
            .filter(|exclusion| clear.clears(exclusion.side))
            .map(|exclusion| exclusion.rect.block_end())
            .max()
    }

    /// The highest block offset a new float may be placed at: "The outer top of
    /// a floating box may not be higher than the outer top of any block or
    /// floated box generated by an element earlier in the source document."
    pub fn float_ceiling(&self) -> Au {
        self.exclusions
            .iter()
            .map(|exclusion| exclusion.rect.block_start())
            .max()
            .unwrap_or_else(Au::zero)
    }

    /// Iterates over the layout opportunities below `origin`, inside a content
    /// box `available_inline_size` wide starting at `origin.inline`.
    pub fn layout_opportunities(
        &self,
        origin: LogicalOffset,
        available_inline_size: Au,
    ) -> LayoutOpportunityIterator<'_> {
        LayoutOpportunityIterator::new(self, origin, available_inline_size)
    }
}

/// A float-free area of the content box. The area spans one band of the
/// exclusion list: no exclusion starts or ends inside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LayoutOpportunity {
    pub offset: LogicalOffset,
    pub inline_size: Au,
    /// `None` for the last opportunity, which extends below every exclusion.
    pub block_size: Option<Au>,
}

impl LayoutOpportunity {
    pub fn inline_end(&self) -> Au {
        self.offset.inline + self.inline_size
    }
}

/// Walks the bands of an [`ExclusionSpace`] from top to bottom, yielding the
/// widest interval of each band not covered by an exclusion.
#[derive(Clone)]
pub struct LayoutOpportunityIterator<'a> {
    exclusions: &'a ExclusionSpace,
    origin: LogicalOffset,
    available_inline_size: Au,
    band_starts: SmallVec<[Au; 8]>,
    next_band: usize,
}

impl<'a> LayoutOpportunityIterator<'a> {
    pub fn new(
        exclusions: &'a ExclusionSpace,
        origin: LogicalOffset,
        available_inline_size: Au,
    ) -> Self {
        let mut band_starts: SmallVec<[Au; 8]> = SmallVec::new();
        band_starts.push(origin.block);
        for exclusion in exclusions.iter() {
            for edge in [exclusion.rect.block_start(), exclusion.rect.block_end()] {
                if edge > origin.block {
                    band_starts.push(edge);
                }
            }
        }
        band_starts.sort_unstable();
        band_starts.dedup();

        Self {
            exclusions,
            origin,
            available_inline_size: available_inline_size.max(Au::zero()),
            band_starts,
            next_band: 0,
        }
    }
}

impl Iterator for LayoutOpportunityIterator<'_> {
    type Item = LayoutOpportunity;

    fn next(&mut self) -> Option<LayoutOpportunity> {
        loop {
            let band_start = *self.band_starts.get(self.next_band)?;
            let band_end = self.band_starts.get(self.next_band + 1).copied();
            self.next_band += 1;

            let mut inline_start = self.origin.inline;
            let mut inline_end = self.origin.inline + self.available_inline_size;
            // Band edges include every exclusion edge, so an exclusion either
            // covers the whole band or none of it.
            for exclusion in self.exclusions.iter().filter(|exclusion| {
                exclusion.rect.block_start() <= band_start && exclusion.rect.block_end() > band_start
            }) {
                match exclusion.side {
                    FloatSide::InlineStart => {
                        inline_start = inline_start.max(exclusion.rect.inline_end())
                    },
                    FloatSide::InlineEnd => inline_end = inline_end.min(exclusion.rect.inline_start()),
                }
            }

            // Bands filled by floats have no opportunity. The last band is below
            // every exclusion and is never skipped.
            if inline_end <= inline_start && band_end.is_some() {
                continue;
            }

            return Some(LayoutOpportunity {
                offset: LogicalOffset::new(inline_start, band_start),
                inline_size: (inline_end - inline_start).max(Au::zero()),
                block_size: band_end.map(|band_end| band_end - band_start),
            });
        }
    }
}

/// Finds the first opportunity that fits a float with the given margin-box
/// size. A float taller than one band needs the interval shared by every band
/// it spans. Falls back to the last opportunity, which is below every
/// exclusion.
pub fn find_layout_opportunity_for_float(
    opportunities: LayoutOpportunityIterator,
    margin_box_size: LogicalSize<Au>,
) -> LayoutOpportunity {
    let opportunities: SmallVec<[LayoutOpportunity; 8]> = opportunities.collect();
    assert!(
        !opportunities.is_empty(),
        "There is always at least one layout opportunity"
    );

    for (index, opportunity) in opportunities.iter().enumerate() {
        let mut inline_start = opportunity.offset.inline;
        let mut inline_end = opportunity.inline_end();
        let mut block_size = Some(Au::zero());

        for band in &opportunities[index..] {
            // A skipped band between two opportunities is full.
            if block_size.is_some_and(|block_size| {
                band.offset.block != opportunity.offset.block + block_size
            }) {
                break;
            }
            inline_start = inline_start.max(band.offset.inline);
            inline_end = inline_end.min(band.inline_end());
            block_size = match (block_size, band.block_size) {
                (Some(accumulated), Some(band_block_size)) => Some(accumulated + band_block_size),
                _ => None,
            };
            if block_size.is_none_or(|block_size| block_size >= margin_box_size.block) {
                break;
            }
        }

        let is_tall_enough = block_size.is_none_or(|block_size| block_size >= margin_box_size.block);
        if is_tall_enough && inline_end - inline_start >= margin_box_size.inline {
            return LayoutOpportunity {
                offset: LogicalOffset::new(inline_start, opportunity.offset.block),
                inline_size: inline_end - inline_start,
                block_size,
            };
        }
    }

    opportunities[opportunities.len() - 1]
}

/// Places a float whose border box has `size` and adds its margin box to
/// `exclusions`. `origin` is the highest, inline-start-most position the
/// float's margin box may take. Returns the offset of the float's border box.
pub fn position_float(
    exclusions: &mut ExclusionSpace,
    origin: LogicalOffset,
    available_inline_size: Au,
    size: LogicalSize<Au>,
    margins: &BoxStrut,
    side: FloatSide,
) -> LogicalOffset {
    let margin_box_size = LogicalSize::new(
        size.inline + margins.inline_sum(),
        size.block + margins.block_sum(),
    );
    let opportunity = find_layout_opportunity_for_float(
        exclusions.layout_opportunities(origin, available_inline_size),
        margin_box_size,
    );

    let margin_box_inline_start = match side {
        FloatSide::InlineStart => opportunity.offset.inline,
        FloatSide::InlineEnd => opportunity.inline_end() - margin_box_size.inline,
    };
    let margin_box_offset = LogicalOffset::new(margin_box_inline_start, opportunity.offset.block);

    exclusions.add(Exclusion {
        rect: LogicalRect::new(
            margin_box_offset,
            margin_box_size.map(|size| size.max(Au::zero())),
        ),
        side,
    });

    trace!(
        "Placed {:?} float of size {:?} at {:?}",
        side, margin_box_size, margin_box_offset
    );
    margin_box_offset + margins.start_offset()
}
