use fast_web::{Envelope, RequestContext};

/// Liveness probe.
/// @router /health [get]
pub async fn health() -> Envelope {
    Envelope::ok("up")
}

/// Raw answer for load balancers that do not parse envelopes.
/// @router /ping [GET]
pub async fn ping(ctx: RequestContext) {
    ctx.respond("pong");
}
