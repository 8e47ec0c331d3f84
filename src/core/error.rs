//! Exposes the render graph error type

use std::ffi::NulError;

use ash::vk;
use thiserror::Error;

/// Error type that the render graph compiler can return.
#[derive(Error, Debug)]
pub enum Error {
    /// Could not convert rust string to C-String because it has null bytes
    #[error("Invalid C string")]
    InvalidString(NulError),
    /// Generic Vulkan error type.
    #[error("Vulkan error: `{0}`")]
    VkError(vk::Result),
    /// Every declared subpass names a previous subpass, so the graph has no entry point.
    #[error("Render graph has no source subpass.")]
    NoSourcePass,
    /// More than one subpass was declared without a previous subpass.
    #[error("Render graph has {0} source subpasses, expected exactly one.")]
    MultipleSourcePasses(usize),
    /// Every subpass is named as previous by another subpass, so the graph has no exit point.
    #[error("Render graph has no sink subpass.")]
    NoSinkPass,
    /// More than one subpass has no dependent subpass.
    #[error("Render graph has {0} sink subpasses, expected exactly one.")]
    MultipleSinkPasses(usize),
    /// A subpass references more than one depth resource.
    #[error("Subpass {0} uses more than one depth attachment.")]
    MultipleDepthAttachments(u32),
    /// A subpass references more than one resolve resource.
    #[error("Subpass {0} uses more than one resolve attachment.")]
    MultipleResolveAttachments(u32),
    /// A subpass resolves into an attachment but has no color attachment to resolve from.
    #[error("Subpass {0} has a resolve attachment but no color attachment.")]
    ResolveWithoutColorAttachment(u32),
    /// A pipeline was declared but no subpass uses it.
    #[error("Pipeline {0} is not used by any subpass.")]
    UnattachedPipeline(usize),
    /// None of the depth format candidates support depth attachments with the requested tiling.
    #[error("No depth format supports depth/stencil attachments with tiling `{0:?}`.")]
    NoDepthFormat(vk::ImageTiling),
    /// Resource id does not belong to this compiler.
    #[error("Resource index {0} out of range.")]
    ResourceOutOfRange(usize),
    /// Resource id exists on this compiler with a different role, so it was declared on another compiler.
    #[error("Resource {0} was not declared on this compiler.")]
    ForeignResource(usize),
    /// Vertex index does not exist in the dependency graph.
    #[error("Vertex index {0} out of range.")]
    VertexOutOfRange(usize),
    /// Subpass id does not belong to this compiler.
    #[error("Subpass index {0} out of range.")]
    SubpassOutOfRange(usize),
    /// Pipeline id does not belong to this compiler.
    #[error("Pipeline index {0} out of range.")]
    PipelineOutOfRange(usize),
    /// Tried to add a vertex attribute to a vertex binding that does not exist.
    #[error("Tried to add a vertex attribute to a vertex binding that does not exist.")]
    NoVertexBinding,
    /// Vertex attribute format has no known size, so offsets cannot be computed.
    #[error("Unsupported vertex attribute format `{0:?}`.")]
    UnsupportedVertexFormat(vk::Format),
    /// The render graph was already compiled. Create a new compiler to rebuild.
    #[error("Render graph was already built.")]
    AlreadyBuilt,
    /// Compiled objects were requested before the render graph was built.
    #[error("Render graph has not been built yet.")]
    NotBuilt,
}

impl From<NulError> for Error {
    fn from(value: NulError) -> Self {
        Error::InvalidString(value)
    }
}

impl From<vk::Result> for Error {
    fn from(value: vk::Result) -> Self {
        Error::VkError(value)
    }
}

impl From<(Vec<vk::Pipeline>, vk::Result)> for Error {
    fn from((_, result): (Vec<vk::Pipeline>, vk::Result)) -> Self {
        Error::VkError(result)
    }
}
