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

//! Length-bounded free-form texts provided by users.

use truthful_core::model::{ModelError, ModelResult};

/// Defines a newtype over a string that must be non-empty and at most `$max` characters long.
macro_rules! bounded_text [
    ( $name:ident, $max:expr, $what:literal ) => {
        #[doc = concat!("A non-empty ", $what, " of at most ", stringify!($max), " characters.")]
        #[derive(Clone, Debug, Eq, PartialEq)]
        pub(crate) struct $name(String);

        impl $name {
            /// Maximum number of characters accepted.
            pub(crate) const MAX_LENGTH: usize = $max;

            /// Creates a new text from an untrusted string `s`, making sure it is valid.
            pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
                let s = s.into();
                if s.is_empty() {
                    return Err(ModelError(concat!($what, " is empty").to_owned()));
                }
                if s.chars().count() > Self::MAX_LENGTH {
                    return Err(ModelError(concat!($what, " is too long").to_owned()));
                }
                Ok(Self(s))
            }

            /// Returns a string view of the text.
            pub(crate) fn as_str(&self) -> &str {
                &self.0
            }
        }
    }
];

bounded_text!(AnswerText, 1000, "answer");
bounded_text!(DisplayName, 30, "display name");
bounded_text!(QuestionText, 500, "question");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_text_bounds() {
        assert_eq!(ModelError("question is empty".to_owned()), QuestionText::new("").unwrap_err());
        QuestionText::new("x".repeat(500)).unwrap();
        assert_eq!(
            ModelError("question is too long".to_owned()),
            QuestionText::new("x".repeat(501)).unwrap_err()
        );
    }

    #[test]
    fn test_answer_text_bounds() {
        assert_eq!(ModelError("answer is empty".to_owned()), AnswerText::new("").unwrap_err());
        AnswerText::new("x".repeat(1000)).unwrap();
        assert_eq!(
            ModelError("answer is too long".to_owned()),
            AnswerText::new("x".repeat(1001)).unwrap_err()
        );
    }

    #[test]
    fn test_display_name_counts_characters() {
        assert_eq!("Zoë", DisplayName::new("Zoë").unwrap().as_str());
        DisplayName::new("é".repeat(30)).unwrap();
        assert_eq!(
            ModelError("display name is too long".to_owned()),
            DisplayName::new("é".repeat(31)).unwrap_err()
        );
        assert_eq!(
            ModelError("display name is empty".to_owned()),
            DisplayName::new("").unwrap_err()
        );
    }
}
