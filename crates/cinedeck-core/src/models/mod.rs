mod movie;
mod session;

pub use movie::Movie;
pub use session::{Session, User};
