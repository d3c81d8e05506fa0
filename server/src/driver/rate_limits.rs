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

//! Extends the driver with the request accounting per client address.

use crate::db;
use crate::driver::Driver;
use crate::model::RateLimit;
use truthful_core::driver::DriverResult;

impl Driver {
    /// Counts a request coming from `ip` and returns the updated counter.
    ///
    /// The counter starts over when it was last touched more than the configured window ago.
    /// Deciding on thresholds is up to the caller.
    pub(crate) async fn record_request(self, ip: String) -> DriverResult<RateLimit> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let current = db::get_rate_limit(tx.ex(), &ip, now).await?;
        let mut count = *current.request_count();
        if now - *current.last_updated() >= self.opts.rate_limit_window {
            db::reset_rate_limit(tx.ex(), &ip, now).await?;
            count = 0;
        }
        db::increment_rate_limit(tx.ex(), &ip, now).await?;

        tx.commit().await?;
        Ok(RateLimit::new(ip, count + 1, now))
    }
}
