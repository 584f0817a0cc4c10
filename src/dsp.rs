//! Signal processing applied between the decoder and the output device.
//!
//! `filter` holds the single-sample biquad stages, `equalizer` composes them
//! into independent per-channel chains over an interleaved buffer.

mod equalizer;
mod filter;

pub use equalizer::Equalizer;
pub use filter::{Biquad, Filter};

#[cfg(test)]
mod tests;
