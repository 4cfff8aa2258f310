use crate::event::ControlEvent;
use facet_common::{Controls, FragmentShader, MAX_TESSELLATION, Rgba, Shape, VertexShader};

/// Owner of the user-adjustable [`Controls`].
///
/// Every setter validates its input, updates the record and queues a
/// [`ControlEvent`] when the value actually changed. Pending events of the
/// same kind coalesce, so the driver sees at most one tessellation rebuild and
/// one shader rebuild per frame no matter how many edits happened in between.
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    controls: Controls,
    pending: Vec<ControlEvent>,
}

impl ControlPanel {
    pub fn new(controls: Controls) -> Self {
        Self {
            controls: controls.sanitized(),
            pending: Vec::new(),
        }
    }

    /// Current values.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn set_tessellation(&mut self, level: u32) {
        let level = level.min(MAX_TESSELLATION);
        if level != self.controls.tessellation {
            self.controls.tessellation = level;
            self.push(ControlEvent::TessellationChanged(level));
        }
    }

    pub fn set_shape(&mut self, shape: Shape) {
        if shape != self.controls.shape {
            self.controls.shape = shape;
            self.push(ControlEvent::ShapeChanged(shape));
        }
    }

    pub fn set_vertex_shader(&mut self, vertex: VertexShader) {
        if vertex != self.controls.vertex_shader {
            self.controls.vertex_shader = vertex;
            self.push_shader_change();
        }
    }

    pub fn set_fragment_shader(&mut self, fragment: FragmentShader) {
        if fragment != self.controls.fragment_shader {
            self.controls.fragment_shader = fragment;
            self.push_shader_change();
        }
    }

    pub fn set_color(&mut self, color: Rgba) {
        let color = color.clamped();
        if color != self.controls.color {
            self.controls.color = color;
            self.push(ControlEvent::ColorChanged(color));
        }
    }

    /// Ask the driver to regenerate every mesh ("Load Scene").
    pub fn request_reload(&mut self) {
        self.push(ControlEvent::ReloadScene);
    }

    /// Apply a whole record at once, emitting one event per changed field.
    pub fn apply(&mut self, controls: Controls) {
        let controls = controls.sanitized();
        self.set_tessellation(controls.tessellation);
        self.set_shape(controls.shape);
        self.set_vertex_shader(controls.vertex_shader);
        self.set_fragment_shader(controls.fragment_shader);
        self.set_color(controls.color);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Hand pending events to the caller in the order they were first raised.
    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.pending)
    }

    fn push_shader_change(&mut self) {
        self.push(ControlEvent::ShaderChanged {
            vertex: self.controls.vertex_shader,
            fragment: self.controls.fragment_shader,
        });
    }

    fn push(&mut self, event: ControlEvent) {
        tracing::trace!(?event, "control changed");
        if let Some(slot) = self.pending.iter_mut().find(|e| e.same_kind(&event)) {
            *slot = event;
        } else {
            self.pending.push(event);
        }
    }
}
