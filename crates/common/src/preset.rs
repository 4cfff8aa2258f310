use crate::types::Controls;
use std::path::Path;

/// Errors from loading a controls preset.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Controls {
    /// Parse a YAML preset. Missing fields take their defaults; bounded
    /// fields are clamped.
    pub fn from_yaml_str(text: &str) -> Result<Self, PresetError> {
        let controls: Controls = serde_yaml::from_str(text)?;
        Ok(controls.sanitized())
    }

    pub fn to_yaml_string(&self) -> Result<String, PresetError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a YAML preset from disk.
    pub fn load_preset(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let controls = Self::from_yaml_str(&text)?;
        tracing::debug!("loaded controls preset from {}", path.display());
        Ok(controls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FragmentShader, Rgba, Shape, VertexShader};

    #[test]
    fn partial_preset_fills_defaults() {
        let c = Controls::from_yaml_str("shape: sphere\ntessellation: 3\n").unwrap();
        assert_eq!(c.shape, Shape::Sphere);
        assert_eq!(c.tessellation, 3);
        assert_eq!(c.fragment_shader, FragmentShader::PulsingGlow);
    }

    #[test]
    fn preset_is_clamped() {
        let c = Controls::from_yaml_str("tessellation: 99\ncolor: [512, 0, 0, 3]\n").unwrap();
        assert_eq!(c.tessellation, 8);
        assert_eq!(c.color, Rgba([255.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn preset_selectors_use_readable_names() {
        let c = Controls::from_yaml_str(
            "vertex_shader: wave\nfragment_shader: perlin-static\n",
        )
        .unwrap();
        assert_eq!(c.vertex_shader, VertexShader::Wave);
        assert_eq!(c.fragment_shader, FragmentShader::PerlinStatic);
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let err = Controls::from_yaml_str("shape: torus\n").unwrap_err();
        assert!(matches!(err, PresetError::Yaml(_)));
    }

    #[test]
    fn load_preset_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.yaml");
        let original = Controls {
            tessellation: 2,
            shape: Shape::Square,
            ..Controls::default()
        };
        std::fs::write(&path, original.to_yaml_string().unwrap()).unwrap();

        let loaded = Controls::load_preset(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_preset_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Controls::load_preset(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, PresetError::Io(_)));
    }
}
