//! Validates every embedded WGSL module without touching a GPU.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use phosphor_engine::pipeline::beam_pass::{
    BEAM_LINE_EXTRACTED_SHADER, BEAM_LINE_SHADER, BEAM_MESH_SHADER,
};
use phosphor_engine::pipeline::compose_pass::COMPOSE_SHADER;
use phosphor_engine::pipeline::extract_pass::EXTRACT_SHADER;
use phosphor_engine::pipeline::tonemap_pass::TONEMAP_SHADER;

fn validate(name: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|err| panic!("{name} failed to parse:\n{}", err.emit_to_string(source)));
    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .unwrap_or_else(|err| panic!("{name} failed validation: {err:?}"));
    module
}

#[test]
fn extract_shader_is_valid() {
    let module = validate("extract", EXTRACT_SHADER);
    assert!(module
        .entry_points
        .iter()
        .any(|ep| ep.name == "cs_main" && ep.stage == naga::ShaderStage::Compute));
}

#[test]
fn beam_mesh_shader_is_valid() {
    validate("beam mesh", BEAM_MESH_SHADER);
}

#[test]
fn beam_line_shader_is_valid() {
    validate("beam line", BEAM_LINE_SHADER);
}

#[test]
fn beam_line_extracted_shader_is_valid() {
    validate("beam line extracted", BEAM_LINE_EXTRACTED_SHADER);
}

#[test]
fn compose_shader_is_valid() {
    validate("compose", COMPOSE_SHADER);
}

#[test]
fn tonemap_shader_is_valid() {
    validate("tonemap", TONEMAP_SHADER);
}

#[test]
fn render_shaders_expose_both_entry_points() {
    for (name, source) in [
        ("beam mesh", BEAM_MESH_SHADER),
        ("beam line", BEAM_LINE_SHADER),
        ("beam line extracted", BEAM_LINE_EXTRACTED_SHADER),
        ("compose", COMPOSE_SHADER),
        ("tonemap", TONEMAP_SHADER),
    ] {
        let module = validate(name, source);
        let names: Vec<_> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
        assert!(names.contains(&"vs_main"), "{name}: {names:?}");
        assert!(names.contains(&"fs_main"), "{name}: {names:?}");
    }
}
