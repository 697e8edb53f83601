use thiserror::Error;

use crate::window::WindowId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum WmError {
    #[error("window pool exhausted ({capacity} slots in use)")]
    ResourceExhausted { capacity: usize },
    #[error("window {0} is not live")]
    InvalidHandle(WindowId),
}
