use crate::{api::timesheet, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-IP limiter. A rate of zero is treated as one request per minute.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_timesheet_per_min)) // rate limiting
            .configure(timesheet::configure),
    );
}

// POST   /timesheets/user/{user_id}   submit (PENDING)
// GET    /timesheets/user/{user_id}   list
// GET    /timesheets/{id}             fetch
// PATCH  /timesheets/{id}/user        owner edit
// PATCH  /timesheets/{id}/manager     approve / reject
// DELETE /timesheets/{id}             delete
// POST   /timesheets/{new,edited}/{overlap,exceed}   pre-submit checks

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_still_builds_a_limiter() {
        build_limiter(0);
        build_limiter(1);
        build_limiter(120_000);
    }
}
