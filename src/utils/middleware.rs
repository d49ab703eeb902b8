use salvo::prelude::*;

use crate::utils::error::AppError;
use crate::utils::state::AppState;

/// Hoop that puts a clone of the shared [`AppState`] into every request's depot.
pub struct StateInjector {
    state: AppState,
}

impl StateInjector {
    pub fn new(state: AppState) -> Self {
        StateInjector { state }
    }
}

#[async_trait]
impl Handler for StateInjector {
    async fn handle(&self, _req: &mut Request, depot: &mut Depot, _res: &mut Response, _ctrl: &mut FlowCtrl) {
        depot.inject(self.state.clone());
    }
}

pub fn inject_state(state: AppState) -> StateInjector {
    StateInjector::new(state)
}

/// Fetches the injected state, or fails the request if the router was built
/// without the injector.
pub fn app_state(depot: &Depot) -> Result<&AppState, AppError> {
    depot
        .obtain::<AppState>()
        .map_err(|_| AppError::Internal("AppState not injected into depot".to_string()))
}
