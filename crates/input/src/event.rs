use facet_common::{FragmentShader, Rgba, Shape, VertexShader};

/// A change the control panel reports to the frame driver.
///
/// The driver consumes events, never raw panel state diffs. Each variant
/// carries the new value so the driver does not need to read the panel back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Icosphere subdivision level changed (already clamped).
    TessellationChanged(u32),
    /// A different mesh should be drawn.
    ShapeChanged(Shape),
    /// Either shader selector changed; carries the full pair.
    ShaderChanged {
        vertex: VertexShader,
        fragment: FragmentShader,
    },
    /// Draw color changed.
    ColorChanged(Rgba),
    /// Regenerate every mesh from the current parameters.
    ReloadScene,
}

impl ControlEvent {
    /// Events of the same kind replace each other while pending.
    pub(crate) fn same_kind(&self, other: &ControlEvent) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_kind_ignores_payload() {
        let a = ControlEvent::TessellationChanged(1);
        let b = ControlEvent::TessellationChanged(7);
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&ControlEvent::ShapeChanged(Shape::Cube)));
    }

    #[test]
    fn shader_event_carries_both_stages() {
        let e = ControlEvent::ShaderChanged {
            vertex: VertexShader::Wave,
            fragment: FragmentShader::Lambert,
        };
        assert!(matches!(
            e,
            ControlEvent::ShaderChanged {
                vertex: VertexShader::Wave,
                ..
            }
        ));
    }
}
