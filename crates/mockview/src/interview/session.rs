use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::persona::{NextAction, Persona};
use crate::models::message::ConversationMessage;

/// One interview's accumulated state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub role: String,
    /// Number of answered turns
    pub turn_count: u32,
    /// 1-based number of the question currently being asked
    pub question_index: u32,
    /// Follow-ups asked on the current question
    pub follow_ups: u32,
    pub persona: Option<Persona>,
    pub history: Vec<ConversationMessage>,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new<S: Into<String>>(role: S) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: role.into(),
            turn_count: 0,
            question_index: 1,
            follow_ups: 0,
            persona: None,
            history: Vec::new(),
            finished: false,
            created_at: Utc::now(),
        }
    }

    /// Append a message, dropping the oldest ones beyond `limit`
    pub fn push_message(&mut self, message: ConversationMessage, limit: usize) {
        self.history.push(message);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    /// Record an answered turn and the action taken for it
    pub fn advance(&mut self, action: NextAction, persona: Persona) {
        self.turn_count += 1;
        self.persona = Some(persona);
        match action {
            NextAction::FollowUp => self.follow_ups += 1,
            NextAction::NextQuestion => {
                self.question_index += 1;
                self.follow_ups = 0;
            }
            NextAction::End => self.finished = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let a = Session::new("QA Engineer");
        let b = Session::new("QA Engineer");
        assert_ne!(a.id, b.id);
        assert_eq!(a.turn_count, 0);
        assert_eq!(a.question_index, 1);
        assert!(a.history.is_empty());
        assert!(!a.finished);
    }

    #[test]
    fn test_history_is_capped_keeping_newest() {
        let mut session = Session::new("QA Engineer");
        for i in 0..5 {
            session.push_message(ConversationMessage::user(format!("answer {}", i)), 3);
        }
        let contents: Vec<&str> = session
            .history
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["answer 2", "answer 3", "answer 4"]);
    }

    #[test]
    fn test_advance() {
        let mut session = Session::new("QA Engineer");

        session.advance(NextAction::FollowUp, Persona::Terse);
        assert_eq!((session.turn_count, session.question_index, session.follow_ups), (1, 1, 1));
        assert_eq!(session.persona, Some(Persona::Terse));

        session.advance(NextAction::NextQuestion, Persona::Confident);
        assert_eq!((session.turn_count, session.question_index, session.follow_ups), (2, 2, 0));

        session.advance(NextAction::End, Persona::Confident);
        assert!(session.finished);
        assert_eq!(session.turn_count, 3);
    }
}
