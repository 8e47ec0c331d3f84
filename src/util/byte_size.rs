use std::mem::size_of;

use ash::vk;

/// Size in bytes of one element of a vertex attribute format.
pub trait ByteSize {
    /// Returns `None` for formats that cannot be used as vertex attributes here.
    fn byte_size(&self) -> Option<usize>;
}

impl ByteSize for vk::Format {
    fn byte_size(&self) -> Option<usize> {
        let size = match *self {
            vk::Format::R32_SFLOAT | vk::Format::R32_UINT | vk::Format::R32_SINT => size_of::<f32>(),
            vk::Format::R32G32_SFLOAT | vk::Format::R32G32_UINT | vk::Format::R32G32_SINT => 2 * size_of::<f32>(),
            vk::Format::R32G32B32_SFLOAT | vk::Format::R32G32B32_UINT | vk::Format::R32G32B32_SINT => 3 * size_of::<f32>(),
            vk::Format::R32G32B32A32_SFLOAT | vk::Format::R32G32B32A32_UINT | vk::Format::R32G32B32A32_SINT => {
                4 * size_of::<f32>()
            }
            vk::Format::R16G16_SFLOAT => 2 * size_of::<u16>(),
            vk::Format::R16G16B16A16_SFLOAT => 4 * size_of::<u16>(),
            vk::Format::R8_UNORM => 1,
            vk::Format::R8G8_UNORM => 2,
            vk::Format::R8G8B8_UNORM => 3,
            vk::Format::R8G8B8A8_UNORM | vk::Format::B8G8R8A8_UNORM => 4,
            _ => return None,
        };
        Some(size)
    }
}
