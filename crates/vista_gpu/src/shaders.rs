//! WGSL sources
//!
//! Scene shaders share the declarations in `common.wgsl` (camera, lights,
//! model, material bindings and the shadow/equirect helpers).

/// Lit mesh shader for basic, phong, and standard materials
pub const LIT_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/lit.wgsl")
);

/// Procedural shader programs; entry points `vs_plasma`/`fs_plasma` and
/// `vs_ripple`/`fs_ripple`
pub const PROCEDURAL_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/procedural.wgsl")
);

/// Helper line shader
pub const LINE_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/line.wgsl")
);

/// Equirectangular environment background
pub const BACKGROUND_SHADER: &str = concat!(
    include_str!("../shaders/common.wgsl"),
    include_str!("../shaders/background.wgsl")
);

/// Depth-only shadow map shader
pub const SHADOW_SHADER: &str = include_str!("../shaders/shadow.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(name: &str, source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{name}: {}", e.emit_to_string(source)));
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
            .validate(&module)
            .unwrap_or_else(|e| panic!("{name}: {e:?}"));
        module
    }

    fn entry_points(module: &naga::Module) -> Vec<&str> {
        module.entry_points.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_lit_shader() {
        let module = validate("lit", LIT_SHADER);
        assert_eq!(entry_points(&module), vec!["vs_main", "fs_main"]);
    }

    #[test]
    fn test_procedural_shader() {
        let module = validate("procedural", PROCEDURAL_SHADER);
        let names = entry_points(&module);
        for program in vista_3d::materials::ShaderProgram::ALL {
            let (vs, fs) = crate::pipelines::procedural_entry_points(program);
            assert!(names.contains(&vs), "missing {vs}");
            assert!(names.contains(&fs), "missing {fs}");
        }
    }

    #[test]
    fn test_line_background_shadow_shaders() {
        validate("line", LINE_SHADER);
        validate("background", BACKGROUND_SHADER);
        let module = validate("shadow", SHADOW_SHADER);
        assert_eq!(entry_points(&module), vec!["vs_main"]);
    }

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        let module = validate("lit", LIT_SHADER);
        let size_of = |name: &str| {
            module
                .types
                .iter()
                .find(|(_, ty)| ty.name.as_deref() == Some(name))
                .map(|(_, ty)| ty.inner.size(module.to_ctx()))
        };
        assert_eq!(size_of("Camera"), Some(std::mem::size_of::<crate::uniforms::CameraUniform>() as u32));
        assert_eq!(size_of("Lights"), Some(std::mem::size_of::<vista_3d::lights::LightUniforms>() as u32));
        assert_eq!(size_of("Model"), Some(std::mem::size_of::<crate::uniforms::ModelUniform>() as u32));
        assert_eq!(size_of("Material"), Some(std::mem::size_of::<crate::uniforms::MaterialUniform>() as u32));
    }
}
