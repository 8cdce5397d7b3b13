use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use super::interviewer::InterviewPolicy;
use super::session::Session;
use super::word_count;

const UNCERTAIN_PHRASES: &[&str] = &[
    "not sure",
    "don't know",
    "dont know",
    "no idea",
    "maybe",
    "i guess",
    "unsure",
];

const VERBOSE_WORDS: usize = 120;
const TERSE_WORDS: usize = 8;

/// Coarse label for how the candidate answers; only used to adjust prompt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Persona {
    Confident,
    Uncertain,
    Verbose,
    Terse,
    EdgeCase,
}

impl Persona {
    /// Uncertainty keywords win over length; `EdgeCase` is the fallback for
    /// answers without any alphabetic word.
    pub fn classify(answer: &str) -> Self {
        let lowered = answer.to_lowercase();
        if UNCERTAIN_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase))
        {
            return Persona::Uncertain;
        }

        let words = word_count(answer);
        if words >= VERBOSE_WORDS {
            Persona::Verbose
        } else if !has_alphabetic_word(answer) {
            Persona::EdgeCase
        } else if words < TERSE_WORDS {
            Persona::Terse
        } else {
            Persona::Confident
        }
    }
}

fn has_alphabetic_word(answer: &str) -> bool {
    answer
        .split_whitespace()
        .any(|word| word.chars().any(char::is_alphabetic))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NextAction {
    FollowUp,
    NextQuestion,
    End,
}

impl NextAction {
    /// Pick what the interviewer does after `answer`, which is not yet counted
    /// in `session.turn_count`.
    pub fn decide(session: &Session, answer: &str, policy: &InterviewPolicy) -> Self {
        if session.turn_count + 1 >= policy.max_turns {
            NextAction::End
        } else if word_count(answer) < policy.follow_up_threshold
            && session.follow_ups < policy.max_follow_ups
        {
            NextAction::FollowUp
        } else {
            NextAction::NextQuestion
        }
    }
}
