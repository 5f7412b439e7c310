//! Placeholder teleport service.
//!
//! Movement between bases belongs to the zone transfer service, which this
//! server does not host. Requests are validated and logged so redeemed
//! vouchers stay traceable.

use async_trait::async_trait;
use tracing::info;

use runtime::api::keys;
use runtime::{Precondition, Request, RequestHandler, RequestRouter, Result};

pub struct TeleportService;

#[async_trait]
impl RequestHandler for TeleportService {
    async fn handle(&self, request: Request, _router: &RequestRouter) -> Result<()> {
        let base = request
            .get_u64(keys::ID)
            .ok_or(Precondition::MissingArgument(keys::ID))?;

        info!(
            target: "server::teleport",
            session = %request.session,
            base,
            "teleport requested"
        );
        Ok(())
    }
}
