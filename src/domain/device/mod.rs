//! Device module - connection status of the paired therapy device.

mod connection_status;
mod handle;

pub use connection_status::ConnectionStatus;
pub use handle::DeviceHandle;
