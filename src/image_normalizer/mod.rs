pub mod letterbox;
pub mod normalized_image;
