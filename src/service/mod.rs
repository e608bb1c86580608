//! Boarding pass backends
//!
//! The form controller talks to a backend through [`BoardingPassService`]. The only backend
//! shipped today is [`SimulatedService`], which waits a fixed delay and fabricates demo data.

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::errors::ServiceError;
use crate::models::{BoardingPass, BoardingPassRequest};

pub mod simulated;

pub use simulated::SimulatedService;

/// A backend able to turn a booking into a boarding pass
#[async_trait]
pub trait BoardingPassService: Send + Sync {
    /// Generate a boarding pass for the given booking
    async fn generate(&self, request: BoardingPassRequest) -> Result<BoardingPass, ServiceError>;
}

/// Call the service, failing with [`ServiceError::Timeout`] once `timeout` elapses
pub async fn generate_with_timeout(
    service: &dyn BoardingPassService,
    request: BoardingPassRequest,
    timeout: Duration,
) -> Result<BoardingPass, ServiceError> {
    match tokio::time::timeout(timeout, service.generate(request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Boarding pass request exceeded {:?}", timeout);
            Err(ServiceError::Timeout(timeout))
        }
    }
}
