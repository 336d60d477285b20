pub mod command;
pub mod ops;

pub use command::EditCommand;
pub use ops::{delete_clip, place, trim_in, trim_out};
