pub mod check;
pub mod export;
pub mod import;
pub mod init;

pub use check::{check, CheckArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use init::{init, InitArgs};
