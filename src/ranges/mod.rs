//! CIDR range tables and their refresh.
//!
//! - [`table`] - compiled-in RFC1918, RFC6598 and Cloudflare tables
//! - [`fetch`] - fetching the published Cloudflare lists
//! - [`cache`] - dated cache files and the startup loader

mod cache;
mod fetch;
mod table;

// Re-export public types and functions
pub use cache::{cache_file_path, load_cloudflare_table, read_range_cache, write_range_cache};
pub use fetch::{fetch_cloudflare_table, fetch_range_list, parse_range_lines};
pub use table::{
    cloudflare_builtin, rfc1918, rfc6598, CidrRange, FamilyRanges, RangeSource, RangeTable,
    RangeTableInfo, CLOUDFLARE_IPV4_RANGES, CLOUDFLARE_IPV6_RANGES, CLOUDFLARE_TABLE_VERSION,
    RFC1918_RANGES, RFC6598_RANGES,
};
