//! Startup failure conditions. Once the event loop is running, handlers
//! recover with defaults instead of propagating errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open display")]
    OpenDisplay,

    #[error("another window manager is already running")]
    OtherWm,

    #[error("cannot allocate color `{0}`")]
    ColorAlloc(String),

    #[error("failed to query the keyboard modifier mapping")]
    Keyboard,
}
