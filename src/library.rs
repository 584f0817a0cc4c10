//! Finding playable files on disk and reading their tags for display.

mod model;
mod scan;

pub use model::LibraryTrack;
pub use scan::{collect, scan};

#[cfg(test)]
mod tests;
