use std::sync::Arc;

use crate::auth::{repo::UserStore, services::RegistrationService};

#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<RegistrationService>,
}

impl AppState {
    /// Builds request state around a store that is already connected.
    pub fn with_store(store: Arc<dyn UserStore>) -> Self {
        Self {
            registration: Arc::new(RegistrationService::new(store)),
        }
    }
}
