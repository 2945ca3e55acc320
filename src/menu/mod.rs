mod screens;
pub use screens::*;

mod cursor;
pub use cursor::*;

mod machine;
pub use machine::*;
