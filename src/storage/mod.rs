//! On-disk storage for the local image index

pub mod images;
pub mod paths;
