//! Filesystem naming helpers.
//!
//! Turns entity field values into directory-safe names, derives image base
//! names and suffixes from URL paths, and normalizes joined directory paths.

mod normalize;
mod sanitize;
mod url_path;

pub use normalize::normalize_dir;
pub use sanitize::sanitize_dir_name;
pub use url_path::{filename_from_url_path, is_gif, split_suffix, suffix_of, suffix_not_equal};
