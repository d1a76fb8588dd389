use std::sync::Arc;
use actix_web::guard::{Guard, GuardContext};
use log::warn;
use super::helpers::is_allowed_ip;

// A guard just makes the router not match the route,
// so clients that aren't allowed get the regular 404.
#[derive(Clone)]
pub struct IPRestrictedGuard {
  allowed_ip_addresses: Arc<Vec<String>>
}

impl IPRestrictedGuard {
  pub fn new(allowed_ips: Arc<Vec<String>>) -> Self {
    Self {
      allowed_ip_addresses: allowed_ips
    }
  }
}

impl Guard for IPRestrictedGuard {
  fn check(&self, ctx: &GuardContext<'_>) -> bool {
    let head = ctx.head();
    let peer_ip = head.peer_addr.map(|sock_addr| sock_addr.ip());
    if is_allowed_ip(peer_ip, &self.allowed_ip_addresses) {
      true
    } else {
      warn!("IP address {:?} attempted to reach protected \
        endpoint at {}", peer_ip, head.uri);
      false
    }
  }
}
