pub mod draft;
pub mod record;
pub mod session;

pub use draft::*;
pub use record::*;
pub use session::*;
