//! Plain-text solution persistence.
//!
//! - [`write_routes`] — reconstructible route listing
//! - [`write_geometry`] — edge coordinates for plotting
//! - [`parse_routes`] — route listing parser, replayed by `Solution::from_routes`
//!
//! File-based entry points are methods on [`Solution`](crate::models::Solution):
//! `write_txt`, `write_geometry_txt`, `read_from_file`.

mod reader;
mod writer;

pub use reader::{parse_routes, HEADER_LINES};
pub use writer::{write_geometry, write_routes};
