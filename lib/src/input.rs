use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{errors::ImageError, raster::Raster};

/// Where the pixels of a bbx request come from.
#[derive(Debug, Clone)]
pub enum InputDescriptor {
    File(PathBuf),
    Buffer(Vec<u8>),
    /// Uncompressed 8-bit interleaved pixels.
    Raw {
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    },
}

impl InputDescriptor {
    pub fn open(self) -> Result<Raster, ImageError> {
        match self {
            InputDescriptor::File(path) => {
                let bytes = std::fs::read(&path).map_err(|err| match err.kind() {
                    io::ErrorKind::NotFound => ImageError::MissingInput(path.clone()),
                    _ => ImageError::ImgReadError(format!("{}: {}", path.display(), err)),
                })?;
                decode(&bytes)
            }
            InputDescriptor::Buffer(bytes) => decode(&bytes),
            InputDescriptor::Raw {
                data,
                width,
                height,
                channels,
            } => Raster::from_raw(data, width, height, channels),
        }
    }
}

fn decode(bytes: &[u8]) -> Result<Raster, ImageError> {
    let format = image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|err| ImageError::DecodeError(err.to_string()))?;
    Raster::from_dynamic(image)
}

impl From<Vec<u8>> for InputDescriptor {
    fn from(bytes: Vec<u8>) -> Self {
        InputDescriptor::Buffer(bytes)
    }
}

impl From<PathBuf> for InputDescriptor {
    fn from(path: PathBuf) -> Self {
        InputDescriptor::File(path)
    }
}

impl From<&Path> for InputDescriptor {
    fn from(path: &Path) -> Self {
        InputDescriptor::File(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{codecs::png::PngEncoder, ImageEncoder, RgbImage};

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| image::Rgb([(x % 256) as u8, 0, 0]));
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    #[test]
    fn buffer_decodes_png() {
        let raster = InputDescriptor::from(make_test_png(12, 7)).open().unwrap();
        assert_eq!((raster.width(), raster.height(), raster.channels()), (12, 7, 3));
        assert_eq!(raster.pixel(5, 3), vec![5, 0, 0]);
    }

    #[test]
    fn garbage_buffer_is_unsupported() {
        let err = InputDescriptor::Buffer(b"not an image".to_vec())
            .open()
            .unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedFormat));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let mut png = make_test_png(40, 40);
        png.truncate(40);
        let err = InputDescriptor::Buffer(png).open().unwrap_err();
        assert!(matches!(err, ImageError::DecodeError(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = std::env::temp_dir().join("trimbox-does-not-exist.png");
        let err = InputDescriptor::from(path.as_path()).open().unwrap_err();
        assert!(matches!(err, ImageError::MissingInput(p) if p == path));
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = std::env::temp_dir();
        let err = InputDescriptor::File(dir).open().unwrap_err();
        assert!(matches!(err, ImageError::ImgReadError(_)));
    }

    #[test]
    fn file_decodes_png() {
        let path = std::env::temp_dir().join(format!("trimbox-input-{}.png", std::process::id()));
        std::fs::write(&path, make_test_png(9, 4)).unwrap();
        let raster = InputDescriptor::File(path.clone()).open();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(raster.unwrap().width(), 9);
    }

    #[test]
    fn raw_input_is_validated() {
        let ok = InputDescriptor::Raw {
            data: vec![0; 2 * 3 * 4],
            width: 2,
            height: 3,
            channels: 4,
        }
        .open()
        .unwrap();
        assert_eq!(ok.channels(), 4);

        let err = InputDescriptor::Raw {
            data: vec![0; 5],
            width: 2,
            height: 3,
            channels: 1,
        }
        .open()
        .unwrap_err();
        assert!(matches!(err, ImageError::InvalidRawInput(_)));
    }
}
