pub mod payment;
pub mod request;
