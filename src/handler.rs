// HTTP handler bindings
//
// Thin wrappers that bind Rocket routes to the Bot. Handlers only deserialize,
// delegate and map errors to status codes.

use log::warn;
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket};
use serde_json::{json, Value};

use crate::bot::Bot;
use crate::types::{MoveResponse, Snapshot};

/// GET / endpoint
/// Returns planner metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /move endpoint
/// Called each tick with the server snapshot; returns one direction per controlled snake
#[post("/move", format = "json", data = "<snapshot>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    snapshot: Json<Snapshot>,
) -> Result<Json<MoveResponse>, status::Custom<Json<Value>>> {
    bot.get_move(&snapshot).await.map(Json).map_err(|e| {
        warn!("Rejected snapshot for tick {}: {}", snapshot.turn, e);
        status::Custom(
            Status::UnprocessableEntity,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

/// Rocket instance serving `bot`, with the `Server` header on every response
pub fn server(bot: Bot) -> Rocket<Build> {
    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "snake3d-planner");
            })
        }))
        .mount("/", routes![index, get_move])
}
