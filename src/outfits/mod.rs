//! The outfit generation service: wire types, HTTP client and rendering.
//!
//! The service itself lives elsewhere; this module only speaks its
//! `/api/meta` and `/api/generate` contract and turns the result into chat
//! messages.

pub mod client;
pub mod model;
pub mod render;

pub use client::{HttpOutfitService, OutfitService};
pub use model::{
    GenerateRequest, GenerateResponse, GenerationMode, Outfit, OutfitItem, Palette, ServiceMeta,
};
pub use render::{format_price, render_outfits};
