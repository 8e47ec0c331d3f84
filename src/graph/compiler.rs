//! The render graph compiler turns resource, pipeline and subpass declarations into a single `VkRenderPass`
//! with all subpass dependencies filled in, plus one `VkPipeline` per declared pipeline.
//!
//! # Example
//! ```ignore
//! use subpass_graph::prelude::*;
//!
//! let settings = RenderGraphBuilder::new()
//!     .extent(swapchain_extent.width, swapchain_extent.height)
//!     .color_format(swapchain_format)
//!     .samples(vk::SampleCountFlags::TYPE_4)
//!     .build();
//! let mut compiler = RenderGraphCompiler::new(device.clone(), settings);
//!
//! let color = compiler.add_color_resource(vk::AttachmentLoadOp::CLEAR, vk::AttachmentStoreOp::DONT_CARE);
//! let depth = compiler.add_depth_resource(vk::AttachmentLoadOp::CLEAR, vk::AttachmentStoreOp::DONT_CARE)?;
//! let present = compiler.add_resolve_resource(vk::AttachmentLoadOp::DONT_CARE, vk::AttachmentStoreOp::STORE);
//!
//! let scene = compiler.add_graphics_pipeline(scene_pci);
//! let post = compiler.add_graphics_pipeline(post_pci);
//!
//! let first = compiler.add_graphics_subpass(&[], &[color, depth], scene, None)?;
//! compiler.add_graphics_subpass(&[color], &[color, present], post, Some(first))?;
//! compiler.build()?;
//!
//! let render_pass = compiler.render_pass()?;
//! let scene_pipeline = compiler.pipeline(scene)?;
//! ```

use anyhow::Result;
use ash::vk;

use crate::core::settings::RenderGraphSettings;
use crate::core::traits::DeviceInterface;
use crate::graph::dependency::{self, SubpassDependency};
use crate::graph::dependency_graph::DependencyGraph;
use crate::graph::pass::{PassType, Subpass, SubpassId};
use crate::graph::render_pass::RenderPass;
use crate::graph::resource::{find_depth_format, Resource, ResourceId, ResourceType};
use crate::pipeline::{Pipeline, PipelineId};
use crate::util::to_vk::AsVulkanType;
use crate::{Device, Error, PipelineCreateInfo};

/// Everything created by a successful build.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
struct CompiledGraph<D: DeviceInterface> {
    // Fields drop in declaration order, so pipelines are destroyed before the render pass they were created for.
    pipelines: Vec<Pipeline<D>>,
    render_pass: RenderPass<D>,
    attachments: Vec<vk::AttachmentDescription>,
    dependencies: Vec<SubpassDependency>,
}

/// Collects declarations and compiles them into a render pass and its pipelines.
/// For a usage example, see the [`compiler`](crate::graph::compiler) module documentation.
///
/// Every native object created by [`RenderGraphCompiler::build`] is owned by the compiler and destroyed together
/// with it. To change the render target (for example after a window resize), drop the compiler and build a new one.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct RenderGraphCompiler<D: DeviceInterface + Clone = Device> {
    // Declared first so compiled objects are gone before anything else.
    compiled: Option<CompiledGraph<D>>,
    #[derivative(Debug = "ignore")]
    device: D,
    settings: RenderGraphSettings,
    resources: Vec<Resource>,
    pipelines: Vec<PipelineCreateInfo>,
    subpasses: Vec<Subpass>,
}

impl<D: DeviceInterface + Clone> RenderGraphCompiler<D> {
    /// Create an empty compiler rendering to the target described by `settings`.
    pub fn new(device: D, settings: RenderGraphSettings) -> Self {
        Self {
            compiled: None,
            device,
            settings,
            resources: vec![],
            pipelines: vec![],
            subpasses: vec![],
        }
    }

    /// The settings this compiler was created with.
    pub fn settings(&self) -> &RenderGraphSettings {
        &self.settings
    }

    fn push_resource(&mut self, resource: Resource) -> ResourceId {
        let id = ResourceId::new(self.resources.len(), resource.ty);
        self.resources.push(resource);
        id
    }

    /// Declare a color attachment using the target color format and sample count.
    pub fn add_color_resource(&mut self, load_op: vk::AttachmentLoadOp, store_op: vk::AttachmentStoreOp) -> ResourceId {
        self.push_resource(Resource::new(
            ResourceType::Color,
            self.settings.color_format,
            self.settings.samples,
            load_op,
            store_op,
        ))
    }

    /// Declare a single sampled attachment that multisampled color output is resolved into. By default, it is left
    /// in `PRESENT_SRC_KHR` layout at the end of the render pass.
    pub fn add_resolve_resource(&mut self, load_op: vk::AttachmentLoadOp, store_op: vk::AttachmentStoreOp) -> ResourceId {
        self.push_resource(Resource::new(
            ResourceType::Resolve,
            self.settings.color_format,
            vk::SampleCountFlags::TYPE_1,
            load_op,
            store_op,
        ))
    }

    /// Declare a depth attachment. Its format is the first supported entry of
    /// [`DEPTH_FORMAT_CANDIDATES`](crate::graph::resource::DEPTH_FORMAT_CANDIDATES) for the configured tiling.
    /// # Errors
    /// - Fails with [`Error::NoDepthFormat`] if no candidate format can be used as depth attachment.
    pub fn add_depth_resource(
        &mut self,
        load_op: vk::AttachmentLoadOp,
        store_op: vk::AttachmentStoreOp,
    ) -> Result<ResourceId> {
        let format = find_depth_format(&self.device, self.settings.depth_tiling)?;
        Ok(self.push_resource(Resource::new(
            ResourceType::Depth,
            format,
            self.settings.samples,
            load_op,
            store_op,
        )))
    }

    fn check_resource(&self, resource: ResourceId) -> Result<()> {
        match self.resources.get(resource.index()) {
            Some(declared) if declared.ty == resource.resource_type() => Ok(()),
            Some(_) => Err(Error::ForeignResource(resource.index()).into()),
            None => Err(Error::ResourceOutOfRange(resource.index()).into()),
        }
    }

    /// Override the layout a resource is transitioned to at the end of the render pass.
    /// # Errors
    /// - Fails if the resource was not declared on this compiler.
    pub fn set_final_layout(&mut self, resource: ResourceId, layout: vk::ImageLayout) -> Result<()> {
        self.check_resource(resource)?;
        self.resources[resource.index()].description.final_layout = layout;
        Ok(())
    }

    /// Declare a graphics pipeline. It is created during [`RenderGraphCompiler::build`], for the subpass that uses it.
    pub fn add_graphics_pipeline(&mut self, info: PipelineCreateInfo) -> PipelineId {
        self.pipelines.push(info);
        PipelineId::new(self.pipelines.len() - 1)
    }

    /// Declare a graphics subpass that reads `inputs`, writes `outputs` and draws with `pipeline`.
    /// Pass the id of the subpass this one runs after as `previous`, or `None` for the first subpass.
    /// # Errors
    /// - Fails if any resource, the pipeline, or the previous subpass was not declared on this compiler.
    pub fn add_graphics_subpass(
        &mut self,
        inputs: &[ResourceId],
        outputs: &[ResourceId],
        pipeline: PipelineId,
        previous: Option<SubpassId>,
    ) -> Result<SubpassId> {
        for &resource in inputs.iter().chain(outputs) {
            self.check_resource(resource)?;
        }
        if pipeline.index() >= self.pipelines.len() {
            return Err(Error::PipelineOutOfRange(pipeline.index()).into());
        }
        if let Some(previous) = previous {
            if previous.as_usize() >= self.subpasses.len() {
                return Err(Error::SubpassOutOfRange(previous.as_usize()).into());
            }
        }

        let id = SubpassId::new(self.subpasses.len());
        self.subpasses.push(Subpass {
            index: id,
            ty: PassType::Graphics,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            previous,
            pipeline,
        });
        Ok(id)
    }

    /// Build the dependency graph of all declared subpasses.
    pub fn dependency_graph(&self) -> Result<DependencyGraph> {
        dependency::build_graph(&self.subpasses)
    }

    /// Find the subpass each pipeline is created for. If several subpasses use the same pipeline, the first one wins.
    fn pipeline_owners(&self) -> Result<Vec<SubpassId>> {
        (0..self.pipelines.len())
            .map(|index| {
                self.subpasses
                    .iter()
                    .find(|subpass| subpass.pipeline().index() == index)
                    .map(|subpass| subpass.id())
                    .ok_or_else(|| anyhow::Error::from(Error::UnattachedPipeline(index)))
            })
            .collect()
    }

    /// Compile all declarations into a render pass and its pipelines.
    ///
    /// Configuration errors are detected before any native object is created. If creating a native object fails,
    /// every object created so far is destroyed again and the compiler stays unbuilt.
    /// # Errors
    /// - Fails with [`Error::AlreadyBuilt`] if called again after a successful build.
    /// - Fails if the subpasses do not form a graph with exactly one source and one sink.
    /// - Fails if a subpass has more than one depth or resolve attachment, or a resolve attachment without color.
    /// - Fails if a declared pipeline is not used by any subpass.
    /// - Fails if the driver rejects the render pass, a pipeline layout, a shader module or a pipeline.
    pub fn build(&mut self) -> Result<()> {
        if self.compiled.is_some() {
            return Err(Error::AlreadyBuilt.into());
        }

        let graph = dependency::build_graph(&self.subpasses)?;
        let (source, sink) = dependency::find_endpoints(&graph).map_err(|err| {
            warn!("Rejecting render graph with {} subpasses: {err}", self.subpasses.len());
            err
        })?;
        let references = self
            .subpasses
            .iter()
            .map(|subpass| subpass.attachments())
            .collect::<Result<Vec<_>>>()?;
        let owners = self.pipeline_owners()?;
        let dependencies = dependency::synthesize(&graph, &self.subpasses, source, sink)?;

        let attachments = self
            .resources
            .iter()
            .map(|resource| resource.description)
            .collect::<Vec<_>>();
        let descriptions = self
            .subpasses
            .iter()
            .zip(&references)
            .map(|(subpass, refs)| refs.to_vk(subpass.pass_type().bind_point()))
            .collect::<Vec<_>>();
        let vk_dependencies = dependencies
            .iter()
            .map(|dependency| dependency.as_vulkan())
            .collect::<Vec<_>>();
        let render_pass = RenderPass::new(self.device.clone(), &attachments, &descriptions, &vk_dependencies)?;

        // On failure, pipelines created so far are dropped here, then the render pass when it goes out of scope.
        let pipelines = self
            .pipelines
            .iter()
            .zip(owners)
            .map(|(info, subpass)| {
                Pipeline::create(
                    &self.device,
                    info,
                    // SAFETY: The render pass outlives every pipeline, see CompiledGraph.
                    unsafe { render_pass.handle() },
                    subpass,
                    self.settings.samples,
                    references[subpass.as_usize()].color.len(),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Built render graph: {} subpasses, {} attachments, {} dependencies, {} pipelines",
            self.subpasses.len(),
            attachments.len(),
            dependencies.len(),
            pipelines.len()
        );

        self.compiled = Some(CompiledGraph {
            pipelines,
            render_pass,
            attachments,
            dependencies,
        });
        Ok(())
    }

    fn compiled(&self) -> Result<&CompiledGraph<D>> {
        self.compiled.as_ref().ok_or_else(|| Error::NotBuilt.into())
    }

    /// Whether [`RenderGraphCompiler::build`] completed successfully.
    pub fn is_built(&self) -> bool {
        self.compiled.is_some()
    }

    /// The compiled render pass. The handle stays owned by the compiler and must not be destroyed.
    /// # Errors
    /// - Fails with [`Error::NotBuilt`] before a successful build.
    pub fn render_pass(&self) -> Result<vk::RenderPass> {
        // SAFETY: The handle is returned by value, callers are told not to destroy it.
        Ok(unsafe { self.compiled()?.render_pass.handle() })
    }

    /// The compiled pipeline for a declared pipeline id.
    /// # Errors
    /// - Fails with [`Error::PipelineOutOfRange`] if the id was not declared on this compiler.
    /// - Fails with [`Error::NotBuilt`] before a successful build.
    pub fn pipeline(&self, id: PipelineId) -> Result<&Pipeline<D>> {
        if id.index() >= self.pipelines.len() {
            return Err(Error::PipelineOutOfRange(id.index()).into());
        }
        Ok(&self.compiled()?.pipelines[id.index()])
    }

    /// Synthesized subpass dependencies: the dependency into the first subpass, the dependency out of the last
    /// subpass, then one dependency per graph edge in breadth-first order.
    /// # Errors
    /// - Fails with [`Error::NotBuilt`] before a successful build.
    pub fn dependencies(&self) -> Result<&[SubpassDependency]> {
        Ok(&self.compiled()?.dependencies)
    }

    /// Attachment descriptions of the compiled render pass, indexed by [`ResourceId::attachment_index`].
    /// # Errors
    /// - Fails with [`Error::NotBuilt`] before a successful build.
    pub fn attachments(&self) -> Result<&[vk::AttachmentDescription]> {
        Ok(&self.compiled()?.attachments)
    }

    /// Number of declared subpasses.
    pub fn subpass_count(&self) -> usize {
        self.subpasses.len()
    }

    /// All declared subpasses, in declaration order.
    pub fn subpasses(&self) -> &[Subpass] {
        &self.subpasses
    }
}
