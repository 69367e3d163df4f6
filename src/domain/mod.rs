pub mod blog;
pub mod order;
pub mod product;
pub mod testimonial;
pub mod user;

pub use blog::*;
pub use order::*;
pub use product::*;
pub use testimonial::*;
pub use user::*;
