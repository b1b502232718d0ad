pub mod init_collateral;
pub use init_collateral::*;

pub mod market_accounts;
pub use market_accounts::*;

pub mod refresh_collateral;
pub use refresh_collateral::*;

pub mod query_collateral;
pub use query_collateral::*;

pub mod read_status;
pub use read_status::*;

pub mod claim_rewards;
pub use claim_rewards::*;
