//! Route configuration
//!
//! Centralized route setup; each domain manages its own routes.

use actix_web::web;

use crate::handlers;
use crate::middleware::{JwtAuthMiddleware, RateLimitMiddleware};

/// Configure all routes for the application. The rate limiter guards the
/// /api scope only; the service endpoints stay unmetered.
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimitMiddleware) {
    cfg
        // Service endpoints
        .route("/", web::get().to(handlers::health::index))
        .route("/health", web::get().to(handlers::health::health_check))
        // API routes
        .service(
            web::scope("/api")
                .wrap(rate_limit)
                .configure(routes::auth::configure)
                .configure(routes::users::configure)
                .configure(routes::content::configure)
                .configure(routes::events::configure)
                .configure(routes::societies::configure)
                .configure(routes::work::configure)
                .configure(routes::blogs::configure)
                .configure(routes::alumni::configure)
                .configure(routes::products::configure)
                .configure(routes::sports::configure)
                .configure(routes::academics::configure),
        )
        // 404 for everything else
        .default_service(web::route().to(handlers::health::not_found));
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route(
                        "/register/student",
                        web::post().to(handlers::auth::register_student),
                    )
                    .route(
                        "/register/teacher",
                        web::post().to(handlers::auth::register_teacher),
                    )
                    .route("/login", web::post().to(handlers::auth::login))
                    .route("/verify-email", web::post().to(handlers::auth::verify_email))
                    .route("/resend-code", web::post().to(handlers::auth::resend_code))
                    .route("/logout", web::post().to(handlers::auth::logout))
                    .route("/refresh", web::post().to(handlers::auth::refresh_token))
                    .route(
                        "/forgot-password",
                        web::post().to(handlers::auth::forgot_password),
                    )
                    .route(
                        "/reset-password",
                        web::post().to(handlers::auth::reset_password),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("/me", web::get().to(handlers::auth::get_me))
                            .route(
                                "/change-password",
                                web::post().to(handlers::auth::change_password),
                            ),
                    ),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .route("/faculty", web::get().to(handlers::users::get_faculty))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("", web::get().to(handlers::users::list_users))
                            .route(
                                "/bulk-create",
                                web::post().to(handlers::users::bulk_create_users),
                            )
                            .route("/students", web::get().to(handlers::users::get_students))
                            .route("/me", web::patch().to(handlers::users::update_my_profile))
                            .route(
                                "/{id}/status",
                                web::patch().to(handlers::users::update_user_status),
                            )
                            .route("/{id}", web::patch().to(handlers::users::update_user))
                            .route("/{id}", web::delete().to(handlers::users::delete_user)),
                    ),
            );
        }
    }

    pub mod content {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/content")
                    .route("/homepage", web::get().to(handlers::content::get_homepage))
                    .route("/notices", web::get().to(handlers::content::get_notices))
                    .route(
                        "/notices/{id}",
                        web::get().to(handlers::content::get_notice_by_id),
                    )
                    .route(
                        "/achievements",
                        web::get().to(handlers::content::get_achievements),
                    )
                    .route(
                        "/achievements/{id}",
                        web::get().to(handlers::content::get_achievement_by_id),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route(
                                "/homepage",
                                web::put().to(handlers::content::update_homepage),
                            )
                            .route(
                                "/notices",
                                web::post().to(handlers::content::create_notice),
                            )
                            .route(
                                "/notices/{id}",
                                web::delete().to(handlers::content::delete_notice),
                            )
                            .route(
                                "/achievements",
                                web::post().to(handlers::content::create_achievement),
                            )
                            .route(
                                "/achievements/{id}",
                                web::delete().to(handlers::content::delete_achievement),
                            )
                            .route(
                                "/send-message",
                                web::post().to(handlers::content::send_message),
                            ),
                    ),
            );
        }
    }

    pub mod events {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/events")
                    .route("", web::get().to(handlers::events::get_events))
                    .route(
                        "/upcoming",
                        web::get().to(handlers::events::get_upcoming_events),
                    )
                    .route(
                        "/ongoing",
                        web::get().to(handlers::events::get_ongoing_events),
                    )
                    .route("/{id}", web::get().to(handlers::events::get_event_by_id))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("", web::post().to(handlers::events::create_event))
                            .route("/{id}", web::put().to(handlers::events::update_event))
                            .route("/{id}", web::delete().to(handlers::events::delete_event)),
                    ),
            );
        }
    }

    pub mod societies {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/societies")
                    .route("", web::get().to(handlers::societies::get_societies))
                    .route(
                        "/{id}/members",
                        web::get().to(handlers::societies::get_members),
                    )
                    .route(
                        "/{id}",
                        web::get().to(handlers::societies::get_society_by_id),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("", web::post().to(handlers::societies::create_society))
                            .route(
                                "/members/{member_id}",
                                web::patch().to(handlers::societies::update_member),
                            )
                            .route(
                                "/members/{member_id}",
                                web::delete().to(handlers::societies::remove_member),
                            )
                            .route(
                                "/{id}/members",
                                web::post().to(handlers::societies::add_member),
                            )
                            .route(
                                "/{id}",
                                web::patch().to(handlers::societies::update_society),
                            ),
                    ),
            );
        }
    }

    pub mod work {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/work")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::post().to(handlers::work::create_assignment))
                    .route("", web::get().to(handlers::work::get_all_assignments))
                    .route("/my", web::get().to(handlers::work::get_my_assignments))
                    .route(
                        "/society/{society_id}",
                        web::get().to(handlers::work::get_society_assignments),
                    )
                    .route(
                        "/{id}/status",
                        web::patch().to(handlers::work::update_assignment_status),
                    ),
            );
        }
    }

    pub mod blogs {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/blogs")
                    .route("", web::get().to(handlers::blogs::get_published_blogs))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("", web::post().to(handlers::blogs::create_blog))
                            .route(
                                "/pending",
                                web::get().to(handlers::blogs::get_pending_blogs),
                            )
                            .route("/my", web::get().to(handlers::blogs::get_my_blogs))
                            .route(
                                "/{id}/verify",
                                web::patch().to(handlers::blogs::verify_blog),
                            )
                            .route("/{id}", web::delete().to(handlers::blogs::delete_blog)),
                    )
                    .route("/{id}", web::get().to(handlers::blogs::get_blog_by_id)),
            );
        }
    }

    pub mod alumni {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/alumni")
                    .route("", web::get().to(handlers::alumni::get_alumni))
                    .route("/{id}", web::get().to(handlers::alumni::get_alumni_by_id))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("", web::post().to(handlers::alumni::create_alumni))
                            .route("/{id}", web::patch().to(handlers::alumni::update_alumni))
                            .route("/{id}", web::delete().to(handlers::alumni::delete_alumni)),
                    ),
            );
        }
    }

    pub mod products {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/products")
                    .route("", web::get().to(handlers::products::get_products))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("/all", web::get().to(handlers::products::get_all_products))
                            .route("", web::post().to(handlers::products::create_product))
                            .route(
                                "/{id}",
                                web::patch().to(handlers::products::update_product),
                            )
                            .route(
                                "/{id}",
                                web::delete().to(handlers::products::delete_product),
                            ),
                    ),
            );
        }
    }

    pub mod sports {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/sports")
                    .route(
                        "/tournaments",
                        web::get().to(handlers::sports::get_tournaments),
                    )
                    .route(
                        "/tournaments/{id}",
                        web::get().to(handlers::sports::get_tournament_by_id),
                    )
                    .route("/players", web::get().to(handlers::sports::get_showcases))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route(
                                "/tournaments",
                                web::post().to(handlers::sports::create_tournament),
                            )
                            .route(
                                "/tournaments/{id}",
                                web::put().to(handlers::sports::update_tournament),
                            )
                            .route(
                                "/tournaments/{id}",
                                web::delete().to(handlers::sports::delete_tournament),
                            )
                            .route(
                                "/players",
                                web::post().to(handlers::sports::create_showcase),
                            )
                            .route(
                                "/players/{id}",
                                web::patch().to(handlers::sports::update_showcase),
                            )
                            .route(
                                "/players/{id}",
                                web::delete().to(handlers::sports::delete_showcase),
                            ),
                    ),
            );
        }
    }

    pub mod academics {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/academic")
                    .route("/courses", web::get().to(handlers::academics::get_courses))
                    .route(
                        "/achievements",
                        web::get().to(handlers::academics::get_academic_achievements),
                    )
                    .route("/stats", web::get().to(handlers::academics::get_stats))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route(
                                "/courses",
                                web::post().to(handlers::academics::create_course),
                            )
                            .route(
                                "/courses/{id}",
                                web::patch().to(handlers::academics::update_course),
                            )
                            .route(
                                "/courses/{id}",
                                web::delete().to(handlers::academics::delete_course),
                            )
                            .route(
                                "/achievements",
                                web::post().to(handlers::academics::create_academic_achievement),
                            )
                            .route(
                                "/stats",
                                web::post().to(handlers::academics::upsert_stat),
                            ),
                    ),
            );
        }
    }
}
