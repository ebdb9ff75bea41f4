//! Persistence of fitted models.
//!
//! Artifacts are plain JSON documents written atomically by the trainer and
//! read once by the inference service.

pub mod artifacts;

pub use artifacts::{
    ArtifactBundle, ArtifactMetadata, ArtifactPaths, ClassifierArtifact, ScalerArtifact,
};
