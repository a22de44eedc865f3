pub mod popup;
pub mod spinner;

pub use popup::{Popup, PopupType};
pub use spinner::Spinner;
