pub mod scenarios;
pub mod sip;
pub mod suggestions;
