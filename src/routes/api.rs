use actix_web::web;

use crate::handlers;

pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health::health)))
        .service(
            web::scope("/auth")
                .service(web::resource("/signup").route(web::post().to(handlers::auth::signup)))
                .service(web::resource("/login").route(web::post().to(handlers::auth::login)))
                .service(web::resource("/profile").route(web::get().to(handlers::auth::profile))),
        )
        .service(
            web::scope("/payments")
                .service(
                    web::resource("/create-payment")
                        .route(web::post().to(handlers::payments::create)),
                )
                .service(
                    web::resource("/webhook").route(web::post().to(handlers::payments::webhook)),
                )
                .service(
                    web::resource("/transactions")
                        .route(web::get().to(handlers::transactions::all)),
                )
                .service(
                    web::resource("/transactions/school/{school_id}")
                        .route(web::get().to(handlers::transactions::by_school)),
                )
                .service(
                    web::resource("/transaction-status/{custom_order_id}")
                        .route(web::get().to(handlers::transactions::status)),
                )
                .service(
                    web::resource("/schools").route(web::get().to(handlers::transactions::schools)),
                ),
        );
}
