use std::sync::Arc;

use tako_core::client::{ClientError, TakoClient, TakoClientConfig};
use tako_core::control::TakoControlPlane;

use crate::config::TakoConfig;

pub fn build_control_plane(config: &TakoConfig) -> Result<Arc<TakoControlPlane>, ClientError> {
    let client = TakoClient::new(
        TakoClientConfig::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.request_timeout),
    )?;
    Ok(Arc::new(TakoControlPlane::new(client)))
}
