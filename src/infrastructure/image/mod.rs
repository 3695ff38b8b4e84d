mod jpeg_image_stager;

pub use jpeg_image_stager::JpegImageStager;

pub(crate) use jpeg_image_stager::mime_for;
