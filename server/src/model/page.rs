// Truthful
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Page` data type.

/// Default number of items returned by listings when the caller does not specify one.
pub(crate) const DEFAULT_PAGE_COUNT: i64 = 10;

/// Maximum number of items returned by a listing.
pub(crate) const MAX_PAGE_COUNT: i64 = 30;

/// A window into a listing, expressed as an offset and a number of items.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Page {
    /// Number of items to skip.
    start: i64,

    /// Maximum number of items to return.
    count: i64,
}

impl Page {
    /// Creates a new page, clamping out of range values.
    ///
    /// Counts that are negative or above the maximum are replaced by the maximum, and negative
    /// offsets are replaced by zero.
    pub(crate) fn new(start: i64, count: i64) -> Self {
        let count = if !(0..=MAX_PAGE_COUNT).contains(&count) { MAX_PAGE_COUNT } else { count };
        Self { start: start.max(0), count }
    }

    /// Returns the number of items to skip.
    pub(crate) fn start(&self) -> i64 {
        self.start
    }

    /// Returns the maximum number of items to return.
    pub(crate) fn count(&self) -> i64 {
        self.count
    }
}
