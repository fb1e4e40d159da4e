//! Demonstration route table.

use ruta_router::{
    Controller, HandlerArgs, Method, MethodHandler, MethodSet, Request, Response, Result, RouteData,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Controller behind the `/home/{path}/some` route.
#[derive(Default)]
pub struct HomeCtrl {
    greeting: Option<String>,
}

impl Controller for HomeCtrl {
    fn call_action(
        &mut self,
        action: &str,
        _req: &Request,
        res: &mut Response,
        args: &HandlerArgs,
    ) -> bool {
        match action {
            "index" => {
                let greeting = self.greeting.as_deref().unwrap_or("GET /home/{path}/some");
                res.text(format!("{greeting}\npath: {}\n", args.get("path").unwrap_or("")));
                true
            }
            _ => false,
        }
    }

    fn set_route_data(&mut self, data: &RouteData) {
        self.greeting = data
            .get("greeting")
            .and_then(Value::as_str)
            .map(str::to_string);
    }
}

#[derive(Serialize)]
struct UserBody<'a> {
    id: u64,
    uri: &'a str,
}

#[derive(Serialize)]
struct NotFoundBody<'a> {
    error: &'static str,
    uri: &'a str,
}

fn log_request(req: &Request, _res: &mut Response, _args: &HandlerArgs) {
    info!(method = %req.method(), uri = %req.uri(), "Incoming request");
}

fn hola(_req: &Request, res: &mut Response, _args: &HandlerArgs) {
    res.text("GET /home/hola\n");
}

fn home_path(_req: &Request, res: &mut Response, args: &HandlerArgs) {
    res.text(format!("GET /home/{{path}}\npath: {}\n", args.get("path").unwrap_or("")));
}

fn user(req: &Request, res: &mut Response, args: &HandlerArgs) {
    match args.args.parse::<u64>("id") {
        Some(id) => res.json(&UserBody { id, uri: req.uri() }),
        None => {
            res.status(400);
            res.text("invalid user id");
        }
    }
}

fn echo(req: &Request, res: &mut Response, _args: &HandlerArgs) {
    match req.json::<Value>() {
        Some(Ok(value)) => res.json(&value),
        Some(Err(err)) => {
            res.status(400);
            res.text(format!("invalid JSON body: {err}"));
        }
        None => {
            res.status(415);
            res.text("expected application/json");
        }
    }
}

fn not_found(req: &Request, res: &mut Response, _args: &HandlerArgs) {
    res.status(404);
    res.json(&NotFoundBody {
        error: "not found",
        uri: req.uri(),
    });
}

/// Builds the route table served by the binary.
pub fn build() -> Result<Router> {
    let mut greeting = RouteData::new();
    greeting.insert(
        "greeting".to_string(),
        Value::from("GET /home/{path}/some (controller)"),
    );

    Ok(Router::new()
        .middleware(MethodSet::any(), log_request)
        .get("/home/hola", hola)?
        .route_with_data(
            Method::Get,
            "/home/{path}/some",
            MethodHandler::<HomeCtrl>::new("index")?,
            greeting,
        )?
        .get("/home/{path}", home_path)?
        .get("/users/regex(id=^[0-9]+$)", user)?
        .post("/echo", echo)?
        .not_found(not_found))
}
