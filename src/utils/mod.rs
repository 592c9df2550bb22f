pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{host_matches_domain, host_of, is_valid_url, resolve_against};
