pub mod codec;
pub mod mask;

// Re-export commonly used items
pub use codec::{decode, encode, png_bytes, ImageSource};
pub use mask::{binarize, EDITABLE, PRESERVED};
