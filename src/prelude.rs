pub use ash::vk;

pub use crate::core::device::Device;
pub use crate::core::error::Error;
pub use crate::core::settings::{RenderGraphBuilder, RenderGraphSettings};
pub use crate::core::traits::DeviceInterface;

pub use crate::graph::compiler::RenderGraphCompiler;
pub use crate::graph::dependency::{SubpassDependency, SubpassRef};
pub use crate::graph::dependency_graph::DependencyGraph;
pub use crate::graph::pass::{PassType, Subpass, SubpassId};
pub use crate::graph::resource::{ResourceId, ResourceType, StageAccess};
#[cfg(feature = "graphviz")]
pub use crate::graph::viz::GraphViz;

pub use crate::pipeline::builder::PipelineBuilder;
pub use crate::pipeline::create_info::PipelineCreateInfo;
pub use crate::pipeline::pipeline_layout::{PipelineLayoutCreateInfo, PushConstantRange};
pub use crate::pipeline::shader::ShaderCreateInfo;
pub use crate::pipeline::{Pipeline, PipelineId};

pub use crate::util::byte_size::ByteSize;
pub use crate::util::to_vk::AsVulkanType;
