use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Highest icosphere subdivision level the panel allows.
pub const MAX_TESSELLATION: u32 = 8;

/// Which mesh the frame driver draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Sphere,
    Square,
    #[default]
    Cube,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Sphere, Shape::Square, Shape::Cube];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Sphere => "Sphere",
            Shape::Square => "Square",
            Shape::Cube => "Cube",
        }
    }
}

/// Vertex stage presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexShader {
    /// Plain transform with a point light vector.
    #[default]
    Lambert,
    /// Sine displacement along the normal.
    Wave,
}

impl VertexShader {
    pub const ALL: [VertexShader; 2] = [VertexShader::Lambert, VertexShader::Wave];

    pub fn label(self) -> &'static str {
        match self {
            VertexShader::Lambert => "None",
            VertexShader::Wave => "Wave",
        }
    }
}

/// Fragment stage presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentShader {
    Lambert,
    PerlinStatic,
    #[default]
    PulsingGlow,
}

impl FragmentShader {
    pub const ALL: [FragmentShader; 3] = [
        FragmentShader::Lambert,
        FragmentShader::PerlinStatic,
        FragmentShader::PulsingGlow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FragmentShader::Lambert => "Lambert",
            FragmentShader::PerlinStatic => "Perlin with static",
            FragmentShader::PulsingGlow => "Inner pulsing glow",
        }
    }
}

/// Panel color: RGB on a 0-255 scale, alpha on 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [f32; 4]);

impl Default for Rgba {
    fn default() -> Self {
        Self([72.0, 160.0, 255.0, 1.0])
    }
}

impl Rgba {
    /// Color with every channel on 0-1, as shaders consume it.
    pub fn to_unit(self) -> Vec4 {
        let [r, g, b, a] = self.0;
        Vec4::new(r / 255.0, g / 255.0, b / 255.0, a)
    }

    /// Build from a 0-1 color (what color pickers hand back).
    pub fn from_unit(c: [f32; 4]) -> Self {
        Self([c[0] * 255.0, c[1] * 255.0, c[2] * 255.0, c[3]]).clamped()
    }

    pub fn clamped(self) -> Self {
        let [r, g, b, a] = self.0;
        Self([
            r.clamp(0.0, 255.0),
            g.clamp(0.0, 255.0),
            b.clamp(0.0, 255.0),
            a.clamp(0.0, 1.0),
        ])
    }
}

/// User-adjustable demo parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub tessellation: u32,
    pub shape: Shape,
    pub vertex_shader: VertexShader,
    pub fragment_shader: FragmentShader,
    pub color: Rgba,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            tessellation: 5,
            shape: Shape::default(),
            vertex_shader: VertexShader::default(),
            fragment_shader: FragmentShader::default(),
            color: Rgba::default(),
        }
    }
}

impl Controls {
    /// Clamp every bounded field into its allowed range.
    pub fn sanitized(self) -> Self {
        Self {
            tessellation: self.tessellation.min(MAX_TESSELLATION),
            color: self.color.clamped(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_scene() {
        let c = Controls::default();
        assert_eq!(c.tessellation, 5);
        assert_eq!(c.shape, Shape::Cube);
        assert_eq!(c.vertex_shader, VertexShader::Lambert);
        assert_eq!(c.fragment_shader, FragmentShader::PulsingGlow);
        assert_eq!(c.color, Rgba([72.0, 160.0, 255.0, 1.0]));
    }

    #[test]
    fn color_to_unit_scales_rgb_only() {
        let c = Rgba([255.0, 0.0, 51.0, 0.5]).to_unit();
        assert!((c.x - 1.0).abs() < 1e-6);
        assert_eq!(c.y, 0.0);
        assert!((c.z - 0.2).abs() < 1e-6);
        assert_eq!(c.w, 0.5);
    }

    #[test]
    fn color_from_unit_roundtrips_through_panel_scale() {
        let c = Rgba::from_unit([1.0, 0.5, 0.0, 0.25]);
        assert_eq!(c.0, [255.0, 127.5, 0.0, 0.25]);
    }

    #[test]
    fn sanitized_clamps_out_of_range_fields() {
        let c = Controls {
            tessellation: 42,
            color: Rgba([300.0, -4.0, 10.0, 2.0]),
            ..Controls::default()
        }
        .sanitized();
        assert_eq!(c.tessellation, MAX_TESSELLATION);
        assert_eq!(c.color.0, [255.0, 0.0, 10.0, 1.0]);
    }

    #[test]
    fn selector_tables_cover_every_variant() {
        assert_eq!(Shape::ALL.len(), 3);
        assert_eq!(VertexShader::ALL.len(), 2);
        assert_eq!(FragmentShader::ALL.len(), 3);
        assert_eq!(VertexShader::Lambert.label(), "None");
    }
}
