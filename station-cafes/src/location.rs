//! Events reported by the device's geolocation provider.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

/// Location permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    /// The error a UI should keep showing for this status, if any.
    pub fn error(&self) -> Option<LocationError> {
        match self {
            AuthorizationStatus::Denied => Some(LocationError::AuthorizationDenied),
            AuthorizationStatus::Restricted => Some(LocationError::AuthorizationRestricted),
            AuthorizationStatus::NotDetermined | AuthorizationStatus::Authorized => None,
        }
    }
}

/// Failures reported by the geolocation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("Location access denied.")]
    AuthorizationDenied,
    #[error("Location access restricted.")]
    AuthorizationRestricted,
    #[error("Unknown location.")]
    LocationUnknown,
    #[error("Access denied.")]
    AccessDenied,
    #[error("Network failed.")]
    Network,
    #[error("Operation failed.")]
    OperationFailed,
}

/// One event from the geolocation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationEvent {
    /// A new position fix.
    Update(Coordinate),
    /// The user changed location permissions.
    Authorization { status: AuthorizationStatus },
    /// The provider could not determine a position.
    Error { error: LocationError },
}
