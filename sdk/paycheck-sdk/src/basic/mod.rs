pub mod actions;
pub mod builder;
pub mod classify;
pub mod dispatcher;
pub mod reconcile;
pub mod session;
pub mod submit;
