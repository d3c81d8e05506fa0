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

//! High-level data types of the question and answer service.

mod accesstoken;
pub(crate) use accesstoken::AccessToken;
mod birthdate;
pub(crate) use birthdate::Birthdate;
mod ids;
pub(crate) use ids::{AnswerId, BanId, PardonId, QuestionId, UserId};
mod page;
pub(crate) use page::{DEFAULT_PAGE_COUNT, Page};
mod passwords;
pub(crate) use passwords::{HashedPassword, Password};
mod roles;
pub(crate) use roles::{PromoteKind, UserRoles};
mod texts;
pub(crate) use texts::{AnswerText, DisplayName, QuestionText};
mod views;
pub(crate) use views::{ProfileAnswer, Question, RateLimit, UserPreview, UserProfile};
