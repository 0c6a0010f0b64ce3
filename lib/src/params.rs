use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;

use crate::detect::BbxOptions;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BbxParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tolerance: Option<u32>,
}

impl BbxParams {
    pub fn options(&self) -> BbxOptions {
        self.tolerance
            .map(BbxOptions::with_tolerance)
            .unwrap_or_default()
    }

    /// Digest of the normalized params, so an omitted tolerance shares a cache entry with the default.
    pub fn cacheable_param_key(&self) -> md5::Digest {
        md5::compute(format!("tolerance={}", self.options().tolerance))
    }
}

fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}
