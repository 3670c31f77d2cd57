use crate::{
    api::{attendance, health, payslip, worker},
    config::Config,
    error::AppError,
    store::Store,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / requests_per_min as u64;
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero period and burst always build a quota");
    Governor::new(&cfg)
}

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig, config: &Config) {
    // Malformed bodies, query strings and path ids answer with the same JSON shape
    // as every other validation failure
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(format!("Invalid JSON body: {err}")).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::validation(format!("Invalid query: {err}")).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::validation(format!("Invalid path: {err}")).into()),
    );

    cfg.service(health::health_check);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Condition::new(
                config.rate_per_min > 0,
                build_limiter(config.rate_per_min),
            ))
            .service(
                web::scope("/workers")
                    // /workers
                    .service(
                        web::resource("")
                            .route(web::get().to(worker::list_workers::<S>))
                            .route(web::post().to(worker::create_worker::<S>)),
                    )
                    // /workers/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(worker::get_worker::<S>))
                            .route(web::put().to(worker::update_worker::<S>))
                            .route(web::delete().to(worker::delete_worker::<S>)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance::<S>))
                            .route(web::post().to(attendance::record_attendance::<S>)),
                    ),
            )
            .service(
                web::scope("/payslip")
                    // /payslip
                    .service(
                        web::resource("")
                            .route(web::get().to(payslip::generate_payslip::<S>))
                            .route(web::post().to(payslip::save_payslip::<S>)),
                    )
                    // /payslip/text
                    .service(
                        web::resource("/text").route(web::get().to(payslip::payslip_text::<S>)),
                    ),
            ),
    );
}
