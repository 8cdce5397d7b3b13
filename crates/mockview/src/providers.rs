pub mod base;
pub mod client;
pub mod configs;
pub mod openai;
