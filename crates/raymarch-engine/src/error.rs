use thiserror::Error;

/// Errors produced by the marshalling and dispatch pipeline.
///
/// Layout and kernel errors are startup failures. Allocation errors abort the
/// current frame; the host is expected to log them and move on to the next one.
/// An empty scene is never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error(
        "layout mismatch for `{record}`: CPU stride is {cpu_stride} bytes, kernel declares {kernel_stride}"
    )]
    LayoutMismatch {
        record: &'static str,
        cpu_stride: u64,
        kernel_stride: u64,
    },

    #[error("kernel source does not declare struct `{0}`")]
    MissingKernelStruct(&'static str),

    #[error("failed to parse kernel source: {0}")]
    KernelSource(String),

    #[error("failed to allocate {resource}: {reason}")]
    ResourceAllocation {
        resource: &'static str,
        reason: String,
    },

    #[error("unknown {0} handle (already released or never created)")]
    UnknownHandle(&'static str),
}

impl RenderError {
    pub(crate) fn allocation(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::ResourceAllocation {
            resource,
            reason: reason.into(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
