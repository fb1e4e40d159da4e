//! ruta-cgi
//!
//! Dispatches a single CGI request through the demonstration route table and
//! writes the response to stdout.

mod routes;

use std::collections::HashMap;
use std::io::{self, Read, Write};

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use ruta_router::{headers_from_cgi, parse_query_string, status, Method, RequestContext, Response};

/// Serve one HTTP request from the CGI environment.
#[derive(Parser)]
#[command(name = "ruta-cgi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Request target, including the query string.
    #[arg(long, env = "REQUEST_URI")]
    uri: String,

    /// Request method.
    #[arg(long, env = "REQUEST_METHOD")]
    method: String,

    /// Query string, without the leading `?`.
    #[arg(long, env = "QUERY_STRING", default_value = "")]
    query: String,

    /// Content type of the request body.
    #[arg(long, env = "CONTENT_TYPE", default_value = "")]
    content_type: String,

    /// Protocol reported by the server.
    #[arg(long, env = "SERVER_PROTOCOL", default_value = "HTTP/1.1")]
    protocol: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout carries the response.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut body = Vec::new();
    if matches!(
        cli.method.trim().parse::<Method>(),
        Ok(Method::Post | Method::Put | Method::Delete)
    ) {
        io::stdin().read_to_end(&mut body)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serve(&cli, headers_from_cgi(std::env::vars()), body, &mut out)
}

/// Routes one request and writes the CGI reply to `out`.
///
/// Every failure is answered with a `500 Internal Server Error` before it is
/// returned.
fn serve<W: Write>(
    cli: &Cli,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    out: &mut W,
) -> anyhow::Result<()> {
    let ctx = match RequestContext::new(&cli.uri, &cli.method, parse_query_string(&cli.query)) {
        Ok(ctx) => ctx
            .with_headers(headers)
            .with_content_type(&cli.content_type)
            .with_proto(&cli.protocol)
            .with_body(body),
        Err(err) => {
            error!(error = %err, "Invalid CGI environment");
            internal_error(out, &cli.method)?;
            return Err(err.into());
        }
    };

    let dispatched = routes::build().and_then(|router| router.dispatch(&ctx));
    match dispatched {
        Ok(dispatch) => dispatch.write_cgi(out)?,
        Err(err) => {
            error!(error = %err, uri = %ctx.uri(), "Dispatch failed");
            internal_error(out, ctx.method())?;
            return Err(err.into());
        }
    }

    Ok(())
}

/// Answers with a `500 Internal Server Error`.
fn internal_error<W: Write>(out: &mut W, method: &str) -> io::Result<()> {
    let mut res = Response::for_method(method);
    res.status(status::INTERNAL_SERVER_ERROR)
        .text(status::status_text(status::INTERNAL_SERVER_ERROR));
    res.write_cgi(out)
}
