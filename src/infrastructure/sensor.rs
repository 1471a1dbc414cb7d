// Indoor sensor implementations
use crate::application::provider::IndoorSensor;
use crate::domain::error::PanelError;
use crate::domain::weather::IndoorReading;

/// Placeholder for deployments without a wired sensor. The read fails the
/// same way a fetch does, so the cycle simply leaves the indoor fields
/// empty. The hardware driver itself is an external collaborator.
pub struct NullSensor;

impl IndoorSensor for NullSensor {
    fn read(&self) -> Result<IndoorReading, PanelError> {
        Err(PanelError::SensorUnavailable)
    }
}
