use std::time::Duration;

use ecoroute_core::optimizer::ProviderOptimizer;

pub struct AppState {
    pub optimizer: ProviderOptimizer,
    pub request_deadline: Duration,
}
