// Adapters layer: concrete implementations for external systems (decoders, asset sources).

pub mod exif_decoder;
pub mod mock_bucket;
pub mod sidecar;

pub use exif_decoder::ExifTagDecoder;
pub use mock_bucket::{MockBucketSource, MOCK_BUCKET_PATH};
pub use sidecar::SidecarTagDecoder;
