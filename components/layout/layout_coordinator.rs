/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::formatting_contexts::LegacyLayoutTask;
use crate::fragment_tree::PhysicalFragment;

/// The outcome of one step of a legacy layout task.
pub enum LayoutStep {
    NotFinished,
    Finished(Arc<PhysicalFragment>),
}

impl fmt::Debug for LayoutStep {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFinished => formatter.write_str("NotFinished"),
            Self::Finished(fragment) => formatter
                .debug_tuple("Finished")
                .field(&fragment.size())
                .finish(),
        }
    }
}

/// Drives a [`LegacyLayoutTask`] until it produces a fragment.
pub struct LayoutCoordinator {
    task: Box<dyn LegacyLayoutTask>,
    ticks: usize,
}

impl LayoutCoordinator {
    pub fn new(task: Box<dyn LegacyLayoutTask>) -> Self {
        Self { task, ticks: 0 }
    }

    /// The number of steps taken so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn step(&mut self) -> LayoutStep {
        self.ticks += 1;
        self.task.step()
    }

    pub fn run_to_completion(mut self) -> Arc<PhysicalFragment> {
        loop {
            if let LayoutStep::Finished(fragment) = self.step() {
                debug!("Legacy layout finished after {} steps", self.ticks);
                return fragment;
            }
        }
    }
}
