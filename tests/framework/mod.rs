#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use ash::vk;
use ash::vk::Handle;

use subpass_graph::prelude::*;

/// A native object handed out by the mock device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    RenderPass(u64),
    ShaderModule(u64),
    PipelineLayout(u64),
    Pipeline(u64),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    Created(Object),
    Destroyed(Object),
}

/// Copy of a subpass description, taken while the pointed-to arrays are still alive.
#[derive(Debug, Clone)]
pub struct CapturedSubpass {
    pub color: Vec<vk::AttachmentReference>,
    pub resolve: Vec<vk::AttachmentReference>,
    pub depth: Option<vk::AttachmentReference>,
}

#[derive(Debug, Clone)]
pub struct CapturedRenderPass {
    pub handle: vk::RenderPass,
    pub attachments: Vec<vk::AttachmentDescription>,
    pub subpasses: Vec<CapturedSubpass>,
    pub dependencies: Vec<vk::SubpassDependency>,
}

#[derive(Debug, Clone)]
pub struct CapturedPipeline {
    pub handle: vk::Pipeline,
    pub render_pass: vk::RenderPass,
    pub layout: vk::PipelineLayout,
    pub subpass: u32,
    pub stages: Vec<vk::ShaderStageFlags>,
    pub samples: vk::SampleCountFlags,
    pub blend_attachments: u32,
    pub dynamic_states: Vec<vk::DynamicState>,
    pub vertex_bindings: Vec<vk::VertexInputBindingDescription>,
    pub vertex_attributes: Vec<vk::VertexInputAttributeDescription>,
}

#[derive(Debug, Default)]
pub struct MockState {
    next_handle: u64,
    pub events: Vec<Event>,
    /// Formats that support depth attachments with optimal tiling.
    pub depth_formats: Vec<vk::Format>,
    /// Fail the n-th graphics pipeline creation (zero based).
    pub fail_pipeline: Option<usize>,
    pub fail_render_pass: bool,
    pipelines_requested: usize,
    pub render_passes: Vec<CapturedRenderPass>,
    pub pipelines: Vec<CapturedPipeline>,
}

/// Device that creates fake handles and records everything it is asked to do.
#[derive(Debug, Clone)]
pub struct MockDevice {
    state: Arc<Mutex<MockState>>,
}

unsafe fn copy_slice<T: Copy>(ptr: *const T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        vec![]
    } else {
        std::slice::from_raw_parts(ptr, len as usize).to_vec()
    }
}

impl MockDevice {
    /// Mock device on which every depth format candidate is supported.
    pub fn new() -> Self {
        Self::with_depth_formats(&[
            vk::Format::D32_SFLOAT,
            vk::Format::D32_SFLOAT_S8_UINT,
            vk::Format::D24_UNORM_S8_UINT,
        ])
    }

    pub fn with_depth_formats(formats: &[vk::Format]) -> Self {
        let _ = pretty_env_logger::try_init();
        Self {
            state: Arc::new(Mutex::new(MockState {
                next_handle: 1,
                depth_formats: formats.to_vec(),
                ..Default::default()
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    /// Objects that were created but not destroyed yet.
    pub fn live_objects(&self) -> Vec<Object> {
        let mut live = vec![];
        for event in self.events() {
            match event {
                Event::Created(object) => live.push(object),
                Event::Destroyed(object) => live.retain(|o| *o != object),
            }
        }
        live
    }

    pub fn created_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Created(_)))
            .count()
    }

    pub fn last_render_pass(&self) -> CapturedRenderPass {
        self.state().render_passes.last().cloned().unwrap()
    }

    fn next_handle(&self) -> u64 {
        let mut state = self.state();
        let handle = state.next_handle;
        state.next_handle += 1;
        handle
    }

    fn record(&self, event: Event) {
        self.state().events.push(event);
    }
}

impl DeviceInterface for MockDevice {
    fn format_properties(&self, format: vk::Format) -> vk::FormatProperties {
        let mut properties = vk::FormatProperties::default();
        if self.state().depth_formats.contains(&format) {
            properties.optimal_tiling_features = vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
        }
        properties
    }

    fn create_render_pass(&self, info: &vk::RenderPassCreateInfo) -> Result<vk::RenderPass> {
        if self.state().fail_render_pass {
            return Err(Error::VkError(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY).into());
        }
        let raw = self.next_handle();
        let handle = vk::RenderPass::from_raw(raw);
        let captured = unsafe {
            CapturedRenderPass {
                handle,
                attachments: copy_slice(info.p_attachments, info.attachment_count),
                subpasses: copy_slice(info.p_subpasses, info.subpass_count)
                    .iter()
                    .map(|subpass| CapturedSubpass {
                        color: copy_slice(subpass.p_color_attachments, subpass.color_attachment_count),
                        resolve: copy_slice(subpass.p_resolve_attachments, subpass.color_attachment_count),
                        depth: subpass.p_depth_stencil_attachment.as_ref().copied(),
                    })
                    .collect(),
                dependencies: copy_slice(info.p_dependencies, info.dependency_count),
            }
        };
        self.state().render_passes.push(captured);
        self.record(Event::Created(Object::RenderPass(raw)));
        Ok(handle)
    }

    fn destroy_render_pass(&self, handle: vk::RenderPass) {
        self.record(Event::Destroyed(Object::RenderPass(handle.as_raw())));
    }

    fn create_shader_module(&self, _info: &vk::ShaderModuleCreateInfo) -> Result<vk::ShaderModule> {
        let raw = self.next_handle();
        self.record(Event::Created(Object::ShaderModule(raw)));
        Ok(vk::ShaderModule::from_raw(raw))
    }

    fn destroy_shader_module(&self, handle: vk::ShaderModule) {
        self.record(Event::Destroyed(Object::ShaderModule(handle.as_raw())));
    }

    fn create_pipeline_layout(&self, _info: &vk::PipelineLayoutCreateInfo) -> Result<vk::PipelineLayout> {
        let raw = self.next_handle();
        self.record(Event::Created(Object::PipelineLayout(raw)));
        Ok(vk::PipelineLayout::from_raw(raw))
    }

    fn destroy_pipeline_layout(&self, handle: vk::PipelineLayout) {
        self.record(Event::Destroyed(Object::PipelineLayout(handle.as_raw())));
    }

    fn create_graphics_pipeline(&self, info: &vk::GraphicsPipelineCreateInfo) -> Result<vk::Pipeline> {
        {
            let mut state = self.state();
            let index = state.pipelines_requested;
            state.pipelines_requested += 1;
            if state.fail_pipeline == Some(index) {
                return Err(Error::VkError(vk::Result::ERROR_INITIALIZATION_FAILED).into());
            }
        }
        let raw = self.next_handle();
        let handle = vk::Pipeline::from_raw(raw);
        let captured = unsafe {
            let multisample = &*info.p_multisample_state;
            let blend = &*info.p_color_blend_state;
            let dynamic = &*info.p_dynamic_state;
            let vertex = &*info.p_vertex_input_state;
            CapturedPipeline {
                handle,
                render_pass: info.render_pass,
                layout: info.layout,
                subpass: info.subpass,
                stages: copy_slice(info.p_stages, info.stage_count)
                    .iter()
                    .map(|stage| stage.stage)
                    .collect(),
                samples: multisample.rasterization_samples,
                blend_attachments: blend.attachment_count,
                dynamic_states: copy_slice(dynamic.p_dynamic_states, dynamic.dynamic_state_count),
                vertex_bindings: copy_slice(
                    vertex.p_vertex_binding_descriptions,
                    vertex.vertex_binding_description_count,
                ),
                vertex_attributes: copy_slice(
                    vertex.p_vertex_attribute_descriptions,
                    vertex.vertex_attribute_description_count,
                ),
            }
        };
        self.state().pipelines.push(captured);
        self.record(Event::Created(Object::Pipeline(raw)));
        Ok(handle)
    }

    fn destroy_pipeline(&self, handle: vk::Pipeline) {
        self.record(Event::Destroyed(Object::Pipeline(handle.as_raw())));
    }
}

pub fn shader(stage: vk::ShaderStageFlags) -> ShaderCreateInfo {
    // SPIR-V magic number followed by an empty module header. The mock device never parses it.
    ShaderCreateInfo::from_spirv(stage, vec![0x0723_0203, 0x0001_0000, 0, 1, 0])
}

/// A pipeline with a vertex and a fragment shader and no vertex input.
pub fn simple_pipeline(name: &str) -> PipelineCreateInfo {
    PipelineBuilder::new(name)
        .attach_shader(shader(vk::ShaderStageFlags::VERTEX))
        .attach_shader(shader(vk::ShaderStageFlags::FRAGMENT))
        .build()
}

pub fn make_compiler(device: &MockDevice) -> RenderGraphCompiler<MockDevice> {
    RenderGraphCompiler::new(device.clone(), RenderGraphSettings::default())
}

pub fn make_compiler_with_settings(device: &MockDevice, settings: RenderGraphSettings) -> RenderGraphCompiler<MockDevice> {
    RenderGraphCompiler::new(device.clone(), settings)
}

/// Declare a chain of `count` subpasses, each writing `color` and reading what the previous one wrote.
pub fn add_chain(
    compiler: &mut RenderGraphCompiler<MockDevice>,
    count: usize,
    color: ResourceId,
) -> Result<Vec<SubpassId>> {
    let mut ids: Vec<SubpassId> = vec![];
    for i in 0..count {
        let pipeline = compiler.add_graphics_pipeline(simple_pipeline(&format!("chain_{i}")));
        let inputs = if i == 0 { vec![] } else { vec![color] };
        let id = compiler.add_graphics_subpass(&inputs, &[color], pipeline, ids.last().copied())?;
        ids.push(id);
    }
    Ok(ids)
}

pub fn error_of(err: &anyhow::Error) -> &Error {
    err.downcast_ref::<Error>().expect("not a render graph error")
}
