use trimbox::BbxQueue;

#[derive(Clone)]
pub struct BucketConfig {
    pub bucket_name: String,
    pub cache_bucket_name: String,
}

#[derive(Clone)]
pub struct ImgState<A> {
    pub bucket: BucketConfig,
    pub image_access: A,
    pub queue: BbxQueue,
}
