//! Code generated by fast-wgen. DO NOT EDIT.
#![allow(non_snake_case)]

use axum::Router;
use axum::routing::{delete, get, post};
use fast_web::{RateLimiter, method, plain, wrap};

use crate::api::health as CrateApiHealth;
use crate::api::user as CrateApiUser;

/// Register every annotated route on `router`.
pub fn load_routers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let limit_user = RateLimiter::new(100, 200);

    let router = router.route("/health", get(wrap(CrateApiHealth::health)));
    let router = router.route("/ping", get(plain(CrateApiHealth::ping)));
    let router = router.route("/user/{id}", get(wrap(CrateApiUser::get_user)));
    let router = router.route("/user/list", post(wrap(CrateApiUser::list_users)).route_layer(limit_user.layer()));
    let router = router.route("/user/add", post(wrap(CrateApiUser::add_user)).route_layer(limit_user.layer()));
    let router = router.route("/user/delete/{id}", delete(wrap(CrateApiUser::delete_user)));
    let router = router.route("/user/me", get(wrap(CrateApiUser::me)));
    let router = router.route("/user/search", post(wrap(method(CrateApiUser::UserApi::search))).route_layer(RateLimiter::new(5, 5).layer()));
    router
}
