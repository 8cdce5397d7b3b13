use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::persona::{NextAction, Persona};
use super::session::Session;
use crate::errors::CompletionError;
use crate::models::message::ConversationMessage;
use crate::models::request::CompletionRequest;
use crate::prompt_template::{
    load_prompt, CLOSING_PROMPT, FOLLOW_UP_PROMPT, NEXT_QUESTION_PROMPT, OPENING_PROMPT,
    SYSTEM_PROMPT,
};
use crate::providers::client::CompletionClient;

#[derive(Error, Debug)]
pub enum InterviewError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Interview {0} has already finished")]
    Finished(String),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Failed to render prompt: {0}")]
    Prompt(#[from] tera::Error),
}

/// Knobs for turn limits, history size and generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewPolicy {
    pub max_turns: u32,
    /// Answers with fewer words than this get a follow-up
    pub follow_up_threshold: usize,
    pub max_follow_ups: u32,
    pub history_limit: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for InterviewPolicy {
    fn default() -> Self {
        Self {
            max_turns: 6,
            follow_up_threshold: 25,
            max_follow_ups: 1,
            history_limit: 12,
            temperature: 0.7,
            max_tokens: 400,
        }
    }
}

/// Outcome of answering one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub message: String,
    pub action: NextAction,
    pub persona: Persona,
    pub turn: u32,
    pub finished: bool,
}

#[derive(Serialize)]
struct PromptContext<'a> {
    role: &'a str,
    persona: &'a str,
    question_number: u32,
    max_turns: u32,
}

/// Drives interview turns. Holds no session state; callers load a session,
/// hand it in, and persist it only when the call succeeds.
pub struct Interviewer {
    client: CompletionClient,
    policy: InterviewPolicy,
}

impl Interviewer {
    pub fn new(client: CompletionClient, policy: InterviewPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Open a new session for `role` and produce the first question
    pub async fn start(&self, role: &str) -> Result<(Session, String), InterviewError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(InterviewError::EmptyInput("role"));
        }

        let mut session = Session::new(role);
        let instruction = load_prompt(OPENING_PROMPT, &self.context(&session, None))?;
        let question = self.ask(&session, instruction).await?;
        session.push_message(
            ConversationMessage::assistant(question.clone()),
            self.policy.history_limit,
        );

        info!(session_id = %session.id, role = %session.role, "interview started");
        Ok((session, question))
    }

    /// Record `answer` and produce the interviewer's next message
    pub async fn respond(&self, session: &mut Session, answer: &str) -> Result<Turn, InterviewError> {
        if session.finished {
            return Err(InterviewError::Finished(session.id.clone()));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(InterviewError::EmptyInput("answer"));
        }

        let persona = Persona::classify(answer);
        let action = NextAction::decide(session, answer, &self.policy);

        session.push_message(
            ConversationMessage::user(answer),
            self.policy.history_limit,
        );
        session.advance(action, persona);

        let template = match action {
            NextAction::FollowUp => FOLLOW_UP_PROMPT,
            NextAction::NextQuestion => NEXT_QUESTION_PROMPT,
            NextAction::End => CLOSING_PROMPT,
        };
        let instruction = load_prompt(template, &self.context(session, Some(persona)))?;
        let message = self.ask(session, instruction).await?;
        session.push_message(
            ConversationMessage::assistant(message.clone()),
            self.policy.history_limit,
        );

        info!(
            session_id = %session.id,
            turn = session.turn_count,
            action = %action,
            persona = %persona,
            "interview turn completed"
        );

        Ok(Turn {
            message,
            action,
            persona,
            turn: session.turn_count,
            finished: session.finished,
        })
    }

    fn context<'a>(&self, session: &'a Session, persona: Option<Persona>) -> PromptContext<'a> {
        PromptContext {
            role: &session.role,
            persona: persona.map(<&'static str>::from).unwrap_or("unknown"),
            question_number: session.question_index,
            max_turns: self.policy.max_turns,
        }
    }

    /// System prompt, the stored history, then the instruction for this step
    async fn ask(&self, session: &Session, instruction: String) -> Result<String, InterviewError> {
        let system = load_prompt(SYSTEM_PROMPT, &self.context(session, session.persona))?;

        let mut messages = Vec::with_capacity(session.history.len() + 2);
        messages.push(ConversationMessage::system(system));
        messages.extend(session.history.iter().cloned());
        messages.push(ConversationMessage::system(instruction));

        let request =
            CompletionRequest::new(messages, self.policy.temperature, self.policy.max_tokens)?;
        Ok(self.client.complete(&request).await?)
    }
}
