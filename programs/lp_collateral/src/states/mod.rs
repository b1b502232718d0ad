pub mod collateral_config;
pub use collateral_config::*;

pub mod default_state;
pub use default_state::*;

pub mod collateral_state;
pub use collateral_state::*;
