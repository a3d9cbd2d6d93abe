pub mod export;
pub mod list;
pub mod stat;

pub use export::run as export;
pub use list::run as list;
pub use stat::run as stat;
