//! catalog-render
//!
//! Product catalog rendering: row normalization, category grouping, image
//! resolution, card planning and PDF/DOCX emission.

pub mod catalog;
pub mod docx;
mod emit;
pub mod flow;
pub mod group;
pub mod guide;
pub mod layout;
pub mod mockup;
pub mod normalize;
mod options;
pub mod resolve;
mod types;

pub use emit::{OutputKind, RenderRequest, generate, render, render_guide, render_mockup};
pub use group::group_by_category;
pub use normalize::{normalize_row, normalize_table};
pub use options::*;
pub use resolve::{HttpFetch, ImageAsset, ImageResolver, ReqwestFetcher};
pub use types::*;
