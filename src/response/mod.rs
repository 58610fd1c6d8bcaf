//! Response helpers - HTML views and flash messages

pub mod flash;
pub mod views;

pub use flash::{Flash, FlashMessages};
pub use views::{FormValues, Views};
