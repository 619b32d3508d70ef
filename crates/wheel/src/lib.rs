//! GTK front end for the [`drum`] category selector.

pub mod config;
pub mod events;
pub mod gui;
pub mod sys;
