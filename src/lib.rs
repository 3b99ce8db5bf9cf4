//! Anna: a conversational outfit intake wizard.

pub mod cli;
pub mod config;
pub mod error;
pub mod intake;
pub mod outfits;
pub mod settings;
