mod browser;
mod list;
mod pick;
mod status;
mod switch;

pub use browser::execute as browser;
pub use list::execute as list;
pub use pick::execute as pick;
pub use status::execute as status;
pub use switch::execute as switch;
