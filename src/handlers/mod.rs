pub mod browse_handlers;
pub mod calendar_handlers;
pub mod conference_handlers;
pub mod suggestion_handlers;
