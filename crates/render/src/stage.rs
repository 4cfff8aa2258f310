use std::fmt;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    /// Entry point every source of this kind must define.
    pub fn entry_point(self) -> &'static str {
        match self {
            StageKind::Vertex => "vs_main",
            StageKind::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// One shader stage: its kind, a label for diagnostics, and WGSL source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderStage {
    pub kind: StageKind,
    pub label: &'static str,
    pub source: &'static str,
}

impl ShaderStage {
    /// Whether the source defines this stage's entry point.
    pub fn declares_entry_point(&self) -> bool {
        self.source
            .contains(&format!("fn {}(", self.kind.entry_point()))
    }
}

/// Errors from building a shader program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} stage '{label}' failed to compile: {log}")]
    Compilation {
        stage: StageKind,
        label: String,
        log: String,
    },
    #[error("program failed to link: {log}")]
    Link { log: String },
    #[error("no {0} stage supplied")]
    MissingStage(StageKind),
}

/// Pick the vertex and fragment stage out of a stage list.
///
/// When a kind appears more than once the last one wins.
pub fn split_stages(
    stages: &[ShaderStage],
) -> Result<(&ShaderStage, &ShaderStage), ShaderError> {
    let find = |kind| {
        stages
            .iter()
            .rev()
            .find(|s| s.kind == kind)
            .ok_or(ShaderError::MissingStage(kind))
    };
    Ok((find(StageKind::Vertex)?, find(StageKind::Fragment)?))
}
