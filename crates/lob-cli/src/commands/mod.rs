pub mod dispatch;
pub mod generate;
pub mod growth;
pub mod reopen;
pub mod reset;
pub mod seed;
