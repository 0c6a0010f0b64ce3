use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::operation::get_object::GetObjectError;

use trimbox::{ImageAccess, ImageError};

#[derive(Clone)]
pub struct AwsImageAccess {
    pub s3_client: s3::Client,
}

#[async_trait]
impl ImageAccess for AwsImageAccess {
    async fn get_img(self, tag: &str, key: &str) -> Result<Vec<u8>, ImageError> {
        let aws_img = self
            .s3_client
            .get_object()
            .bucket(tag)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                GetObjectError::NoSuchKey(_) => ImageError::NotFound(format!("{}/{}", tag, key)),
                err => ImageError::ImgReadError(format!("{:?}", err)),
            })?
            .body;
        let img_bytes = aws_img
            .collect()
            .await
            .map_err(|err| ImageError::ImgReadError(format!("{:?}", err)))?
            .into_bytes()
            .to_vec();
        Ok(img_bytes)
    }

    async fn save_img(self, tag: &str, key: &str, body: Vec<u8>) -> Result<(), ImageError> {
        let body_stream = s3::primitives::ByteStream::from(body);
        let _ = self
            .s3_client
            .put_object()
            .bucket(tag)
            .key(key)
            .content_type("application/json")
            .body(body_stream)
            .send()
            .await
            .map_err(|err| ImageError::ImgWriteError(format!("{:?}", err)))?;
        Ok(())
    }
}
