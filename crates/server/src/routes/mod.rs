pub mod api;
pub mod entries;
pub mod page;
pub mod system;

use actix_web::web;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(page::index)
        .service(page::submit)
        .service(page::query)
        .service(entries::compose)
        .service(entries::select)
        .service(entries::delete)
        .service(api::list_entries)
        .service(api::rank_newest)
        .service(api::rank_entries)
        .service(system::health);
}
