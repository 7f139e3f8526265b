//! URL handling module for Sumi-Sitemap
//!
//! This module provides URL normalization, relative reference resolution,
//! domain scoping, and page/resource/image classification. Everything here is
//! a pure function with no network access.

mod classify;
mod domain;
mod normalize;

// Re-export main functions
pub use classify::{
    classify_image, classify_page, classify_resource, IMAGE_EXTENSIONS, PAGE_EXTENSIONS,
    RESOURCE_EXTENSIONS,
};
pub use domain::{base_domain, is_same_domain};
pub use normalize::{normalize, parse_seed_url, resolve};

pub(crate) use classify::has_extension;
pub(crate) use normalize::normalize_parsed;
