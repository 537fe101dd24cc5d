use crate::{
    api::{employee, leave, monthly_attendance, shift},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::anyhow;
use std::sync::Arc;

pub type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min} requests/min"))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<Limiter>) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(limiter)
            .service(
                web::scope("/hr")
                    // /hr/monthly-attendance
                    .service(
                        web::resource("/monthly-attendance")
                            .route(web::get().to(monthly_attendance::get_monthly_attendance))
                            .route(web::post().to(monthly_attendance::edit_attendance_day)),
                    )
                    // /hr/employees
                    .service(
                        web::resource("/employees")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /hr/employees/{emp_code}
                    .service(
                        web::resource("/employees/{emp_code}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    // /hr/shifts
                    .service(
                        web::resource("/shifts")
                            .route(web::get().to(shift::list_shifts))
                            .route(web::post().to(shift::create_shift)),
                    )
                    // /hr/shifts/{code}
                    .service(
                        web::resource("/shifts/{code}")
                            .route(web::put().to(shift::update_shift))
                            .route(web::delete().to(shift::delete_shift)),
                    )
                    // /hr/leaves
                    .service(
                        web::resource("/leaves")
                            .route(web::get().to(leave::paid_leave_quarters))
                            .route(web::post().to(leave::allocate_paid_leave)),
                    ),
            ),
    );
}

// API REQUEST
//  └─ Authorization: Bearer access_token (issued by the identity service)
//       └─ auth_middleware → AuthUser in request extensions
//            └─ handler role gate (HR/Admin or own empCode)
