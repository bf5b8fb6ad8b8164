use std::sync::Arc;

use crate::{error, info, server::start_api_server, service::TitledService, warning};

pub async fn serve(service: Arc<TitledService>, open: bool) {
    let base_url = service.config().base_url.clone();
    info!(
        "Serving Titled on {} (public URL {})",
        service.config().server_address,
        base_url
    );

    if open {
        tokio::spawn(async move {
            // give the listener a moment to bind
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            if webbrowser::open(&base_url).is_err() {
                warning!(
                    "Failed to open browser. Please navigate to the following URL manually:\n{}",
                    base_url
                );
            }
        });
    }

    if let Err(e) = start_api_server(service).await {
        error!("Server stopped: {}", e);
    }
}
