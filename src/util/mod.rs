//! Various utilities

pub mod byte_size;
pub mod to_vk;
