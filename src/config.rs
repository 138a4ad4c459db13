use crate::{export::MeshFormat, types::Value};

/// Runtime configuration for one marching cubes run.
///
/// ```rust,ignore
/// let config = MarchConfig::default().with_strict(true).with_parallel(false);
/// isomesh::march_with(&config, [33, 33, 33], min, max, "sphere.obj", sphere)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchConfig {
    /// Iso-surface level. Corners strictly below it are "inside". Default: `0.0`.
    pub iso_level: Value,
    /// Escalate the first non-finite field sample to
    /// [`FieldEvaluation`](crate::error::MarchingCubesError::FieldEvaluation)
    /// instead of treating it as outside. Default: `false`.
    pub strict: bool,
    /// Sample the field and walk the cells on Rayon's thread pool. Output is
    /// identical either way. Default: `true`.
    pub parallel: bool,
    /// Output format. `None` picks one from the output path's extension.
    pub format: Option<MeshFormat>,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            iso_level: 0.,
            strict: false,
            parallel: true,
            format: None,
        }
    }
}

impl MarchConfig {
    /// Sets the iso-surface level.
    pub fn with_iso_level(mut self, iso_level: Value) -> Self {
        self.iso_level = iso_level;
        self
    }

    /// Enables or disables strict handling of non-finite field values.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Forces an output format regardless of the path's extension.
    pub fn with_format(mut self, format: MeshFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = MarchConfig::default()
            .with_iso_level(0.25)
            .with_strict(true)
            .with_parallel(false)
            .with_format(MeshFormat::Stl);
        assert_eq!(config.iso_level, 0.25);
        assert!(config.strict);
        assert!(!config.parallel);
        assert_eq!(config.format, Some(MeshFormat::Stl));
        assert_eq!(MarchConfig::default().format, None);
    }
}
