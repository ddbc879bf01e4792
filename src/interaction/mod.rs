//! Interaction module - target lock, questions, answer routing and the staff.

mod components;
mod plugin;
mod questions;
mod systems;

pub use components::*;
pub use plugin::InteractionPlugin;
pub use questions::{format_answer, Question, QuestionKind, QuestionState, ORB_COUNT};
pub use systems::next_lock;
