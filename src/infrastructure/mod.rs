pub mod persistence;
pub mod replies;
