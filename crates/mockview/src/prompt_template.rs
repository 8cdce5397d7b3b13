use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

pub const SYSTEM_PROMPT: &str = include_str!("prompts/system.md");
pub const OPENING_PROMPT: &str = include_str!("prompts/opening.md");
pub const FOLLOW_UP_PROMPT: &str = include_str!("prompts/follow_up.md");
pub const NEXT_QUESTION_PROMPT: &str = include_str!("prompts/next_question.md");
pub const CLOSING_PROMPT: &str = include_str!("prompts/closing.md");

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered.trim().to_string())
}
