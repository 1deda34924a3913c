//! Procedural shader materials
//!
//! The renderer ships one pipeline per [`ShaderProgram`]; a material picks
//! the program and feeds it [`ShaderUniforms`]. `time` is advanced every
//! frame by `ShaderTimeSystem`.

use super::Side;
use crate::math::Color;

/// Built-in procedural programs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    /// Animated color field blended between two colors
    #[default]
    Plasma,
    /// Radial sine wave displacing vertices along their normals
    Ripple,
}

impl ShaderProgram {
    pub const ALL: [ShaderProgram; 2] = [ShaderProgram::Plasma, ShaderProgram::Ripple];

    pub fn name(&self) -> &'static str {
        match self {
            ShaderProgram::Plasma => "plasma",
            ShaderProgram::Ripple => "ripple",
        }
    }
}

/// Values fed to a procedural program
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderUniforms {
    /// Seconds since the scene started
    pub time: f32,
    /// Displacement or intensity scale
    pub amplitude: f32,
    /// Spatial frequency
    pub frequency: f32,
    pub color_a: Color,
    pub color_b: Color,
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            amplitude: 0.2,
            frequency: 4.0,
            color_a: Color::from_hex(0xff0080),
            color_b: Color::from_hex(0x00c0ff),
        }
    }
}

/// Material rendered by a built-in procedural program
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderMaterial {
    pub program: ShaderProgram,
    pub uniforms: ShaderUniforms,
    pub side: Side,
}

impl ShaderMaterial {
    pub fn new(program: ShaderProgram) -> Self {
        Self {
            program,
            uniforms: ShaderUniforms::default(),
            side: Side::Double,
        }
    }

    pub fn with_colors(mut self, a: Color, b: Color) -> Self {
        self.uniforms.color_a = a;
        self.uniforms.color_b = b;
        self
    }

    pub fn with_wave(mut self, amplitude: f32, frequency: f32) -> Self {
        self.uniforms.amplitude = amplitude;
        self.uniforms.frequency = frequency;
        self
    }
}
