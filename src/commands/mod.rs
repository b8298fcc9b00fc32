pub mod abort;
pub mod branch;
pub mod config_select;
pub mod menu;
pub mod rebase;
pub mod release;
pub mod reset;
pub mod stash;
pub mod status;
pub mod sync;

pub use abort::*;
pub use branch::*;
pub use config_select::*;
pub use menu::*;
pub use rebase::*;
pub use release::*;
pub use reset::*;
pub use stash::*;
pub use status::*;
pub use sync::*;
