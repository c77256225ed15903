//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Post, PostAuthor, PostPatch};
pub use user::User;
