//! Resources are the attachments of the render pass. A resource carries nothing but its role, the image that
//! backs it is bound later through the framebuffer, using [`ResourceId::attachment_index`].

use anyhow::Result;
use ash::vk;

use crate::core::traits::DeviceInterface;
use crate::Error;

/// Depth formats probed when declaring a depth resource, in order of preference.
pub const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

/// Role of a resource in the render pass.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum ResourceType {
    /// Color attachment, possibly multisampled.
    Color,
    /// Single sampled attachment a multisampled color attachment is resolved into.
    Resolve,
    /// Depth/stencil attachment.
    Depth,
}

/// Opaque handle to a resource declared on a [`RenderGraphCompiler`](crate::RenderGraphCompiler).
/// Handles can only be obtained from the compiler's `add_*_resource` methods.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct ResourceId {
    index: usize,
    ty: ResourceType,
}

/// A pipeline stage mask together with the memory accesses that must be made available or visible in it.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct StageAccess {
    /// Pipeline stages to synchronize against.
    pub stage: vk::PipelineStageFlags,
    /// Memory accesses to synchronize.
    pub access: vk::AccessFlags,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Resource {
    pub ty: ResourceType,
    pub description: vk::AttachmentDescription,
}

impl ResourceType {
    /// Stage and access of an attachment with this role.
    pub fn stage_access(&self) -> StageAccess {
        match self {
            ResourceType::Color | ResourceType::Resolve => StageAccess {
                stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
                access: vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            },
            ResourceType::Depth => StageAccess {
                stage: vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
                access: vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            },
        }
    }

    /// Layout of the attachment while it is written by a subpass.
    pub fn attachment_layout(&self) -> vk::ImageLayout {
        match self {
            ResourceType::Color | ResourceType::Resolve => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            ResourceType::Depth => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        }
    }

    /// Layout the attachment ends up in after the render pass, unless overridden.
    pub fn default_final_layout(&self) -> vk::ImageLayout {
        match self {
            ResourceType::Color => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            ResourceType::Resolve => vk::ImageLayout::PRESENT_SRC_KHR,
            ResourceType::Depth => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        }
    }
}

impl ResourceId {
    pub(crate) fn new(index: usize, ty: ResourceType) -> Self {
        Self {
            index,
            ty,
        }
    }

    /// Index of this resource in the attachment list of the render pass. Framebuffer image views must be given
    /// in this order.
    pub fn attachment_index(&self) -> u32 {
        self.index as u32
    }

    /// Role of this resource.
    pub fn resource_type(&self) -> ResourceType {
        self.ty
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl StageAccess {
    /// Mask used for a pass side that touches no resource. The pass still has to be ordered against
    /// fragment work of neighbouring passes, but it accesses no attachment memory.
    pub fn fragment_shader() -> Self {
        Self {
            stage: vk::PipelineStageFlags::FRAGMENT_SHADER,
            access: vk::AccessFlags::empty(),
        }
    }

    /// External side of the dependency into the first subpass: color output of the previous frame.
    pub fn previous_frame() -> Self {
        Self {
            stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            access: vk::AccessFlags::empty(),
        }
    }

    /// External side of the dependency out of the last subpass: whoever consumes the color output next.
    pub fn external_consumer() -> Self {
        Self {
            stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            access: vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
        }
    }

    /// Combine the masks of every resource in `resources`. Returns `fallback` if `resources` is empty.
    pub fn from_resources<'a>(resources: impl IntoIterator<Item = &'a ResourceId>, fallback: StageAccess) -> Self {
        resources
            .into_iter()
            .map(|resource| resource.resource_type().stage_access())
            .reduce(|lhs, rhs| lhs | rhs)
            .unwrap_or(fallback)
    }
}

impl std::ops::BitOr for StageAccess {
    type Output = StageAccess;

    fn bitor(self, rhs: Self) -> Self::Output {
        StageAccess {
            stage: self.stage | rhs.stage,
            access: self.access | rhs.access,
        }
    }
}

fn supports_depth_attachment(properties: &vk::FormatProperties, tiling: vk::ImageTiling) -> bool {
    let features = match tiling {
        vk::ImageTiling::OPTIMAL => properties.optimal_tiling_features,
        vk::ImageTiling::LINEAR => properties.linear_tiling_features,
        _ => return false,
    };
    features.contains(vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT)
}

/// Pick the first format in [`DEPTH_FORMAT_CANDIDATES`] that can be used as a depth attachment with `tiling`.
/// # Errors
/// - Fails with [`Error::NoDepthFormat`] if no candidate qualifies. There is no fallback format.
pub fn find_depth_format<D: DeviceInterface>(device: &D, tiling: vk::ImageTiling) -> Result<vk::Format> {
    DEPTH_FORMAT_CANDIDATES
        .iter()
        .copied()
        .find(|&format| supports_depth_attachment(&device.format_properties(format), tiling))
        .ok_or_else(|| Error::NoDepthFormat(tiling).into())
}

impl Resource {
    pub fn new(
        ty: ResourceType,
        format: vk::Format,
        samples: vk::SampleCountFlags,
        load_op: vk::AttachmentLoadOp,
        store_op: vk::AttachmentStoreOp,
    ) -> Self {
        // Loaded contents must survive the transition into the render pass.
        let initial_layout = if load_op == vk::AttachmentLoadOp::LOAD {
            ty.attachment_layout()
        } else {
            vk::ImageLayout::UNDEFINED
        };
        let description = vk::AttachmentDescription::builder()
            .format(format)
            .samples(samples)
            .load_op(load_op)
            .store_op(store_op)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(initial_layout)
            .final_layout(ty.default_final_layout())
            .build();
        Self {
            ty,
            description,
        }
    }
}
