pub mod dispatch;
pub mod enrich;
