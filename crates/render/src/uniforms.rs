use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Per-draw uniform block, laid out to match `struct Globals` in the WGSL
/// library (group 0, binding 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub model: [[f32; 4]; 4],
    pub model_inv_tr: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub time: f32,
    pub _pad: [f32; 3],
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            model_inv_tr: Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
            time: 0.0,
            _pad: [0.0; 3],
        }
    }
}

/// Named members of [`Globals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    Model,
    ModelInvTr,
    ViewProj,
    Color,
    Time,
}

impl Uniform {
    pub const ALL: [Uniform; 5] = [
        Uniform::Model,
        Uniform::ModelInvTr,
        Uniform::ViewProj,
        Uniform::Color,
        Uniform::Time,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Uniform::Model => "model",
            Uniform::ModelInvTr => "model_inv_tr",
            Uniform::ViewProj => "view_proj",
            Uniform::Color => "color",
            Uniform::Time => "time",
        }
    }

    /// Byte offset inside the uniform block.
    pub fn offset(self) -> u64 {
        match self {
            Uniform::Model => 0,
            Uniform::ModelInvTr => 64,
            Uniform::ViewProj => 128,
            Uniform::Color => 192,
            Uniform::Time => 208,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.name() == name)
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Where a uniform lives on the GPU side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindPoint {
    pub group: u32,
    pub binding: u32,
    pub offset: u64,
}

/// Vertex attributes and their shader locations.
pub const VERTEX_ATTRIBUTES: [(&str, u32); 3] = [("position", 0), ("normal", 1), ("color", 2)];

/// The uniforms a set of stage sources actually reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformSet(u8);

impl UniformSet {
    /// Collect every `globals.<name>` reference across the sources.
    pub fn scan<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = UniformSet::default();
        for source in sources {
            for u in Uniform::ALL {
                if references(source, u.name()) {
                    set.0 |= u.bit();
                }
            }
        }
        set
    }

    pub fn contains(self, u: Uniform) -> bool {
        self.0 & u.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Uniform> {
        Uniform::ALL.into_iter().filter(move |u| self.contains(*u))
    }
}

fn references(source: &str, member: &str) -> bool {
    let needle = format!("globals.{member}");
    source.match_indices(&needle).any(|(at, _)| {
        source[at + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}

/// Staged uniform values for one program.
///
/// Setters for uniforms the program does not read are no-ops, so shaders may
/// leave out whatever they do not need.
#[derive(Debug, Clone)]
pub struct ProgramUniforms {
    present: UniformSet,
    staged: Globals,
    dirty: bool,
}

impl ProgramUniforms {
    pub fn new(present: UniformSet) -> Self {
        Self {
            present,
            staged: Globals::default(),
            dirty: true,
        }
    }

    pub fn present(&self) -> UniformSet {
        self.present
    }

    /// Bind point of a named uniform, if the program reads it.
    pub fn binding(&self, name: &str) -> Option<BindPoint> {
        let u = Uniform::from_name(name)?;
        self.present.contains(u).then(|| BindPoint {
            group: 0,
            binding: 0,
            offset: u.offset(),
        })
    }

    pub fn staged(&self) -> &Globals {
        &self.staged
    }

    pub fn set_time(&mut self, time: f32) {
        if self.present.contains(Uniform::Time) {
            self.staged.time = time;
            self.dirty = true;
        }
    }

    pub fn set_color(&mut self, color: Vec4) {
        if self.present.contains(Uniform::Color) {
            self.staged.color = color.to_array();
            self.dirty = true;
        }
    }

    pub fn set_camera_matrices(&mut self, view: Mat4, projection: Mat4) {
        if self.present.contains(Uniform::ViewProj) {
            self.staged.view_proj = (projection * view).to_cols_array_2d();
            self.dirty = true;
        }
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        if self.present.contains(Uniform::Model) {
            self.staged.model = model.to_cols_array_2d();
            self.dirty = true;
        }
        if self.present.contains(Uniform::ModelInvTr) {
            self.staged.model_inv_tr = model.inverse().transpose().to_cols_array_2d();
            self.dirty = true;
        }
    }

    /// Staged block if anything changed since the last flush.
    pub fn flush(&mut self) -> Option<&Globals> {
        if std::mem::take(&mut self.dirty) {
            Some(&self.staged)
        } else {
            None
        }
    }
}
