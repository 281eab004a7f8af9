//! Resume intake: everything between an uploaded file and a finished analysis.

pub mod analysis;
pub mod display;
pub mod documents;
pub mod export;
pub mod extraction;
pub mod handlers;
pub mod links;
pub mod recommendations;
pub mod resume_text;
pub mod upload;
pub mod validation;
