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

//! Identifiers of the entities stored in the database.

use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// Defines a newtype over the integer primary key of a table.
macro_rules! entity_id [
    ( $name:ident, $what:literal ) => {
        #[doc = concat!("Identifier of ", $what, ".")]
        #[derive(
            Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq,
            PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub(crate) struct $name(i64);

        impl $name {
            /// Returns the raw value of the identifier for use in queries.
            #[allow(unused)]
            pub(crate) fn as_i64(self) -> i64 {
                self.0
            }
        }
    }
];

entity_id!(AnswerId, "an answer");
entity_id!(BanId, "a ban");
entity_id!(PardonId, "a pardon");
entity_id!(QuestionId, "a question");
entity_id!(UserId, "a user");
