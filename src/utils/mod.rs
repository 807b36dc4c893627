pub mod html;
pub mod multipart;
pub mod upload;
