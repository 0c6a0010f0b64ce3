use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, DefaultBodyLimit, Path, Query, State},
    routing::{get, post},
    Router,
};
use trimbox::{params::BbxParams, BbxQueue, ImageAccess, ImageError, InputDescriptor};

use crate::{
    app_error::AppError,
    bbx_result::BbxResult,
    settings::ImgSource,
    state::{BucketConfig, ImgState},
};

const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

pub fn create_image_router<A: ImageAccess>(
    img_sources: Vec<ImgSource>,
    image_access: A,
    queue: BbxQueue,
) -> Router {
    let mut img_router = Router::new();

    for img_source in img_sources.iter() {
        img_router = img_router.route(
            &format!("/{}/*img_key", img_source.path),
            get(handle_img::<A>).with_state(ImgState {
                bucket: BucketConfig {
                    bucket_name: img_source.bucket.clone(),
                    cache_bucket_name: img_source.cache_bucket.clone(),
                },
                image_access: image_access.clone(),
                queue: queue.clone(),
            }),
        );
    }

    img_router.route(
        "/bbx",
        post(handle_upload)
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
            .with_state(queue),
    )
}

async fn handle_img<A: ImageAccess>(
    State(ImgState {
        bucket:
            BucketConfig {
                bucket_name,
                cache_bucket_name,
            },
        image_access,
        queue,
    }): State<ImgState<A>>,
    Path(img_key): Path<String>,
    params: Result<Query<BbxParams>, QueryRejection>,
) -> Result<BbxResult, AppError> {
    let params = bbx_params(params)?;
    let cached_key = format!("{:x}/{}.json", params.cacheable_param_key(), img_key);
    let bbx = trimbox::handle_bbx(
        image_access,
        &queue,
        &bucket_name,
        &cache_bucket_name,
        &img_key,
        &cached_key,
        &params,
    )
    .await?;

    Ok(BbxResult(bbx))
}

async fn handle_upload(
    State(queue): State<BbxQueue>,
    params: Result<Query<BbxParams>, QueryRejection>,
    body: Bytes,
) -> Result<BbxResult, AppError> {
    let params = bbx_params(params)?;
    let bbx = queue
        .bbx(InputDescriptor::Buffer(body.to_vec()), params.options())
        .await?;
    Ok(BbxResult(bbx))
}

fn bbx_params(params: Result<Query<BbxParams>, QueryRejection>) -> Result<BbxParams, ImageError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ImageError::InvalidParams(rejection.body_text()))
}
