//! Image reference handling

pub mod reference;

pub use reference::{matches, parse, parse_image_uuid, PullSpec, Reference, SegmentKind};
