//! Pipeline-wide tuning values supplied by the reconciler

/// Values shared by every pipeline's generated output section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineDefaults {
    /// Ceiling for each output's on-disk retry buffer
    pub fs_buffer_limit: String,
}

impl Default for PipelineDefaults {
    fn default() -> Self {
        Self {
            fs_buffer_limit: "1G".to_string(),
        }
    }
}
