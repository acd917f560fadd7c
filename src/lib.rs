//! # Category News
//!
//! Scrapes the newest articles of one news category from BBC, The Hindu or
//! Al Jazeera and returns headline, summary, link and publication date for
//! each.
//!
//! ## Architecture
//!
//! 1. **Registry**: map the category name to its listing page and variant
//! 2. **Discovery**: collect candidate article links from the listing page
//! 3. **Extraction**: fetch each candidate and run the variant's headline,
//!    summary and date cascades
//! 4. **Filtering**: keep articles inside the date window, up to the cap
//!
//! [`pipeline::get_articles`] is the plain entry point; [`pipeline::Pipeline`]
//! returns a [`pipeline::RunReport`] with skip counts as well.

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod registry;
pub mod scrapers;
pub mod utils;
