mod check;
mod init;
mod lookup;

pub use check::cmd_check;
pub use init::cmd_init;
pub use lookup::cmd_lookup;
