mod card;
pub use card::Card;

mod header;
pub use header::Header;

mod modal;
pub use modal::DetailModal;

mod route;
pub use route::Route;

pub mod snackbar;

mod spinner;
pub use spinner::Spinner;

pub mod theme;
pub use theme::{Theme, ThemeSettings};
