//! Source and generated image data.

mod types;

pub use types::{
    GeneratedImage, GenerationMetadata, ImageFormat, SourceImage, DEFAULT_SOURCE_MIME,
};
