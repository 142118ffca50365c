/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shared, interiorly mutable cells for the box tree.
//!
//! Box nodes are shared between their parent, their previous sibling, break
//! tokens and the caller that built the tree. Fragments point back at their box
//! through a [`WeakRefCell`], so that a node caching its own fragment never keeps
//! itself alive.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use atomic_refcell::AtomicRefCell;

pub(crate) struct ArcRefCell<T> {
    value: Arc<AtomicRefCell<T>>,
}

impl<T> ArcRefCell<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value: Arc::new(AtomicRefCell::new(value)),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakRefCell<T> {
        WeakRefCell {
            value: Arc::downgrade(&self.value),
        }
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// An address identifying the cell, stable for its lifetime. Used in debug
    /// output only.
    pub(crate) fn address(&self) -> usize {
        Arc::as_ptr(&self.value) as *const () as usize
    }
}

impl<T> Clone for ArcRefCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<T> Deref for ArcRefCell<T> {
    type Target = AtomicRefCell<T>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

pub(crate) struct WeakRefCell<T> {
    value: Weak<AtomicRefCell<T>>,
}

impl<T> Clone for WeakRefCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<T> Default for WeakRefCell<T> {
    fn default() -> Self {
        Self { value: Weak::new() }
    }
}

impl<T> fmt::Debug for WeakRefCell<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("(WeakRefCell)")
    }
}

impl<T> WeakRefCell<T> {
    pub(crate) fn upgrade(&self) -> Option<ArcRefCell<T>> {
        self.value.upgrade().map(|value| ArcRefCell { value })
    }
}
