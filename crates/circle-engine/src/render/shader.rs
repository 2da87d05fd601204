use crate::geometry::Vertex;

use super::{ShaderError, ShaderStage};

/// Entry point the vertex source must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point the fragment source must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A compiled vertex/fragment pair, linked into a render pipeline.
///
/// Construction fails if either stage does not compile or the pair does not
/// link; there is no "constructed but invalid" state.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Compiles both WGSL stages, links them and builds a pipeline that
    /// renders [`Vertex`] triangle lists into `format` targets.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, ShaderError> {
        if let Err(err) = check_program(vertex_src, fragment_src) {
            log::error!("shader error of type {}:\n{}", err.stage_name(), err.log());
            return Err(err);
        }

        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("circle vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("circle fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("circle pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("circle pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("shader program ready ({format:?})");
        Ok(Self { pipeline })
    }

    /// Makes this program the active pipeline for subsequent draws on `pass`.
    pub fn activate(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

/// Compiles and links a vertex/fragment pair without touching the GPU.
pub fn check_program(vertex_src: &str, fragment_src: &str) -> Result<(), ShaderError> {
    let vertex = compile_stage(ShaderStage::Vertex, vertex_src)?;
    let fragment = compile_stage(ShaderStage::Fragment, fragment_src)?;
    link_stages(&vertex, &fragment)
}

/// Parses and validates one WGSL stage.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Compile {
        stage,
        log: e.as_inner().to_string(),
    })?;

    Ok(module)
}

/// Checks that the two stages fit together: both entry points exist with the
/// right stage, and the vertex stage reads positions from location 0.
pub fn link_stages(vertex: &naga::Module, fragment: &naga::Module) -> Result<(), ShaderError> {
    let vs = find_entry(vertex, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
    find_entry(fragment, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

    if !reads_location(vertex, vs, 0) {
        return Err(ShaderError::Link {
            log: format!("vertex entry point `{VERTEX_ENTRY}` has no input at @location(0)"),
        });
    }

    Ok(())
}

fn find_entry<'m>(
    module: &'m naga::Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    match module.entry_points.iter().find(|ep| ep.name == name) {
        Some(ep) if ep.stage == stage => Ok(ep),
        Some(ep) => Err(ShaderError::Link {
            log: format!("entry point `{name}` is a {:?} shader, expected {stage:?}", ep.stage),
        }),
        None => Err(ShaderError::Link {
            log: format!("missing {stage:?} entry point `{name}`"),
        }),
    }
}

fn reads_location(module: &naga::Module, ep: &naga::EntryPoint, location: u32) -> bool {
    let at = |b: &Option<naga::Binding>| {
        matches!(b, Some(naga::Binding::Location { location: l, .. }) if *l == location)
    };

    ep.function.arguments.iter().any(|arg| {
        if at(&arg.binding) {
            return true;
        }
        match &module.types[arg.ty].inner {
            naga::TypeInner::Struct { members, .. } => members.iter().any(|m| at(&m.binding)),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
        @vertex
        fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(pos, 0.0, 1.0);
        }
    "#;

    const FS: &str = r#"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    #[test]
    fn valid_pair_compiles_and_links() {
        assert_eq!(check_program(VS, FS), Ok(()));
    }

    #[test]
    fn struct_input_counts_as_location_zero() {
        let vs = r#"
            struct In {
                @location(0) pos: vec2<f32>,
            }

            @vertex
            fn vs_main(v: In) -> @builtin(position) vec4<f32> {
                return vec4<f32>(v.pos, 0.0, 1.0);
            }
        "#;
        assert_eq!(check_program(vs, FS), Ok(()));
    }

    #[test]
    fn syntax_error_reports_vertex_stage() {
        let broken = "@vertex fn vs_main( -> {";
        let err = check_program(broken, FS).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
        assert_eq!(err.stage_name(), "VERTEX");
        assert!(!err.log().is_empty());
    }

    #[test]
    fn type_error_reports_fragment_stage() {
        let broken = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return 1.0;
            }
        "#;
        let err = check_program(VS, broken).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
        assert_eq!(err.stage_name(), "FRAGMENT");
    }

    #[test]
    fn missing_fragment_entry_is_link_error() {
        let renamed = FS.replace("fs_main", "main");
        let err = check_program(VS, &renamed).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert_eq!(err.stage_name(), "PROGRAM");
        assert!(err.log().contains("fs_main"));
    }

    #[test]
    fn swapped_stages_do_not_link() {
        let err = check_program(FS, VS).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn vertex_without_position_input_does_not_link() {
        let vs = r#"
            @vertex
            fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
                return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
            }
        "#;
        let err = check_program(vs, FS).unwrap_err();
        assert!(err.log().contains("@location(0)"));
    }
}
