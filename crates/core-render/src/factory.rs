//! Row artifact seam.
//!
//! The factory owns whatever surface a row is drawn into (texture, bitmap,
//! text grid). The stream only needs the row's size; the artifact itself is
//! opaque. Ownership of an artifact moves into the stream on enqueue and is
//! handed back to `dispose` exactly once.

use crate::row::RowLayout;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("could not allocate a {width}x{height} row surface: {reason}")]
    Allocation {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("drawing row for `{call_sign}` failed: {reason}")]
    Draw {
        call_sign: String,
        reason: String,
    },
}

pub trait RowFactory {
    type Artifact;

    /// Draw `layout` into a fresh artifact of `layout.width` x `layout.height`.
    fn create_row(&mut self, layout: &RowLayout) -> Result<Self::Artifact, ArtifactError>;

    /// Release an artifact. Default: drop it.
    fn dispose(&mut self, artifact: Self::Artifact) {
        drop(artifact);
    }
}

/// A row owned by the stream buffer.
#[derive(Debug)]
pub struct RenderedRow<A> {
    pub width: u32,
    pub height: u32,
    pub call_sign: String,
    pub artifact: A,
}
