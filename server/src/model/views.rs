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

//! Read-only views of the entities as returned to clients.

use crate::model::{AnswerId, QuestionId, UserId};
use derive_getters::Getters;
use derive_more::Constructor;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

/// Public summary of a user, suitable for embedding in other views.
#[derive(Clone, Constructor, Debug, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct UserPreview {
    /// Identifier of the user.
    pub(crate) id: UserId,

    /// Unique login name of the user.
    pub(crate) username: String,

    /// Name that the user chose to show to others.
    pub(crate) display_name: String,
}

/// A question as seen by its receiver.
#[derive(Debug, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct Question {
    /// Identifier of the question.
    pub(crate) id: QuestionId,

    /// Text of the question.
    pub(crate) text: String,

    /// Whether the author asked to remain anonymous.
    pub(crate) is_author_anonymous: bool,

    /// Author of the question, absent for anonymous questions and for questions asked by
    /// unauthenticated visitors.
    pub(crate) author: Option<UserPreview>,

    /// Identifier of the user the question was asked to.
    pub(crate) receiver_id: UserId,

    /// Time at which the question was asked.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,
}

/// An answer as shown in a user profile, together with the question it answers.
#[derive(Debug, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct ProfileAnswer {
    /// Identifier of the answer.
    pub(crate) id: AnswerId,

    /// Whether the author of the question asked to remain anonymous.
    pub(crate) is_author_anonymous: bool,

    /// Author of the question, hidden under the same rules as `Question::author`.
    pub(crate) author: Option<UserPreview>,

    /// Text of the question that was answered.
    pub(crate) question_text: String,

    /// Text of the answer.
    pub(crate) answer_text: String,

    /// Time at which the answer was posted.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) date_answered: OffsetDateTime,

    /// Number of likes that the answer has received.
    pub(crate) like_count: i64,

    /// Whether the user requesting the profile likes this answer.
    pub(crate) liked_by_requester: bool,
}

/// Public profile of a user.
#[derive(Debug, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct UserProfile {
    /// Identifier of the user.
    pub(crate) id: UserId,

    /// Unique login name of the user.
    pub(crate) username: String,

    /// Name that the user chose to show to others.
    pub(crate) display_name: String,

    /// Number of users that follow this user.
    pub(crate) follower_count: i64,

    /// Number of users that this user follows.
    pub(crate) following_count: i64,

    /// Number of questions that this user has answered.
    pub(crate) answer_count: i64,

    /// Whether the user requesting the profile follows this user.
    pub(crate) followed_by_requester: bool,

    /// Whether the user requesting the profile is the owner of the profile.
    pub(crate) requesting_user: bool,

    /// Most recent answers of the user.
    pub(crate) answers: Vec<ProfileAnswer>,
}

/// Request counter for a single client address.
#[derive(Constructor, Debug, Getters, PartialEq)]
pub(crate) struct RateLimit {
    /// Address of the client.
    ip_address: String,

    /// Number of requests counted since the last reset.
    request_count: i64,

    /// Time of the last modification to the counter.
    last_updated: OffsetDateTime,
}
