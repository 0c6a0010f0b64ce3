use async_trait::async_trait;
use tracing::{debug, warn};

pub mod bounding_box;
pub mod detect;
mod errors;
pub mod input;
pub mod params;
pub mod queue;
pub mod raster;

pub use bounding_box::BoundingBox;
pub use detect::BbxOptions;
pub use errors::ImageError;
pub use input::InputDescriptor;
pub use queue::{BbxQueue, Counters};

use params::BbxParams;

/// Storage the bbx flow reads images from and writes cached results to.
#[async_trait]
pub trait ImageAccess: Clone + Send + Sync + 'static {
    async fn get_img(self, tag: &str, key: &str) -> Result<Vec<u8>, ImageError>;
    async fn save_img(self, tag: &str, key: &str, body: Vec<u8>) -> Result<(), ImageError>;
}

pub async fn bbx(input: InputDescriptor, options: BbxOptions) -> Result<BoundingBox, ImageError> {
    queue::default_queue().bbx(input, options).await
}

pub async fn handle_bbx<A: ImageAccess>(
    image_access: A,
    queue: &BbxQueue,
    bucket_name: &str,
    cache_bucket_name: &str,
    img_key: &str,
    cached_key: &str,
    params: &BbxParams,
) -> Result<BoundingBox, ImageError> {
    match get_cached_bbx(image_access.clone(), cache_bucket_name, cached_key).await {
        Some(bbx) => {
            debug!(cached_key, "bbx cache hit");
            Ok(bbx)
        }
        None => {
            compute_cache_bbx(
                image_access,
                queue,
                bucket_name,
                cache_bucket_name,
                img_key,
                cached_key,
                params,
            )
            .await
        }
    }
}

async fn get_cached_bbx<A: ImageAccess>(
    image_access: A,
    cache_bucket_name: &str,
    cached_key: &str,
) -> Option<BoundingBox> {
    let body = image_access
        .get_img(cache_bucket_name, cached_key)
        .await
        .ok()?;
    serde_json::from_slice(&body)
        .map_err(|err| warn!(cached_key, "ignoring unreadable cached bbx | {}", err))
        .ok()
}

async fn compute_cache_bbx<A: ImageAccess>(
    image_access: A,
    queue: &BbxQueue,
    bucket_name: &str,
    cache_bucket_name: &str,
    img_key: &str,
    cached_key: &str,
    params: &BbxParams,
) -> Result<BoundingBox, ImageError> {
    let img_bytes = image_access.clone().get_img(bucket_name, img_key).await?;
    let bbx = queue
        .bbx(InputDescriptor::Buffer(img_bytes), params.options())
        .await?;

    let body = serde_json::to_vec(&bbx).map_err(|err| ImageError::ImgWriteError(err.to_string()))?;
    let cloned_cache_bucket_name = cache_bucket_name.to_owned();
    let cloned_cached_key = cached_key.to_owned();

    tokio::spawn(async move {
        if let Err(err) = image_access
            .save_img(&cloned_cache_bucket_name, &cloned_cached_key, body)
            .await
        {
            warn!(cached_key = %cloned_cached_key, "couldn't cache bbx | {}", err);
        }
    });

    Ok(bbx)
}
