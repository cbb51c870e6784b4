//! Transport to the advertising API.

pub mod transport {
    pub use crate::transport::*;
}

pub mod http_transport {
    pub use crate::http_transport::*;
}
