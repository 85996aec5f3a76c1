/// State management module
///
/// This module holds all application state:
/// - Image payloads shared by every other part (image.rs)
/// - The live edit session (edit.rs)
/// - Session history of successful edits (history.rs)
/// - The interaction controller that drives both (controller.rs)

pub mod controller;
pub mod edit;
pub mod history;
pub mod image;
