pub mod coupang;
pub mod error;
pub mod image;
pub mod naver;
pub mod normalize;
pub mod parse;
pub mod types;
pub mod upstream;

pub use coupang::CoupangClient;
pub use error::{ProxyError, UpstreamError};
pub use image::{ImageProxy, ProxiedImage, MAX_IMAGE_BYTES};
pub use naver::NaverClient;
pub use normalize::{normalize_item, NormalizeContext};
pub use types::RawItem;
pub use upstream::{Accumulated, UpstreamClient};
