pub mod conference;
pub mod suggestion;
