use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(crate::health::configure_routes)
        .route("/ws", web::get().to(crate::ws::session::upgrade));
}
