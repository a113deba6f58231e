mod clear;
mod init;
mod inspect;
mod load;

pub use clear::cmd_clear;
pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use load::cmd_load;
