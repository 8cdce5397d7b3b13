pub mod errors;
pub mod interview;
pub mod models;
pub mod prompt_template;
pub mod providers;
