use rocket::Route;

mod common;
mod polls;
mod session;
mod votes;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(polls::routes());
    routes.extend(votes::routes());
    routes.extend(session::routes());
    routes
}
