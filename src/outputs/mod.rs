//! Rendering and writing of a finished run.
//!
//! # Submodules
//!
//! - [`json`]: writes the article feed for one query as a JSON file
//! - [`markdown`]: renders the articles as a Markdown document
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── bbc-politics.json
//!     └── hindu-science.json
//!
//! markdown_output_dir/
//! ├── 2025-05-06_bbc-politics.md
//! └── 2025-05-06_hindu-science.md
//! ```

pub mod json;
pub mod markdown;
