//! Typed decoders for the individual chunk payloads.
//!
//! Each decoder starts right after the chunk header and may read fewer bytes
//! than the chunk declares; the dispatcher in [`crate::decoder`] always
//! resumes at the declared end.

pub mod cel;
pub mod color_profile;
pub mod layer;
pub mod palette;
pub mod tags;
pub mod user_data;
