use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

/// Periodically deletes expired session rows. Runs until the process exits.
pub async fn start_session_sweeper(state: Arc<AppState>) {
    let interval = Duration::from_secs(state.config.session_sweep_interval_secs.max(1));
    info!("Starting session sweeper, interval {:?}", interval);

    loop {
        sleep(interval).await;

        let span = info_span!("session_sweep");
        async {
            match state.auth_service.sweep_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => info!("Removed {} expired sessions", removed),
                Err(e) => error!("Failed to sweep expired sessions: {:?}", e),
            }
        }
            .instrument(span)
            .await;
    }
}
