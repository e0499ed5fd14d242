/*!
Interoperation between the client (user) and server.

(Not the application and the database; that's covered by `store`.)
*/
use std::{
    fmt::Debug,
    path::Path,
    sync::Arc,
};

use axum::{
    extract::Extension,
    http::{header, Request, StatusCode},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use handlebars::Handlebars;
use once_cell::sync::OnceCell;
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::config::Glob;

pub mod material;

static TEMPLATES: OnceCell<Handlebars> = OnceCell::new();

static HTML_500: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>MO-100 | Error</title>
<link rel="stylesheet" href="/static/mo100.css">
</head>
<body>
<h1>Internal Server Error</h1>
<p>(Error 500)</p>
<p>Something went wrong on our end. No further or more
helpful information is available about the problem.</p>
</body>
</html>"#;

static HTML_DB_ERROR: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>MO-100 | Service Unavailable</title>
<link rel="stylesheet" href="/static/mo100.css">
</head>
<body>
<h1>Course Materials Unavailable</h1>
<p>We were unable to reach the course database, so your access to this
material can't be checked right now.</p>
<p>Please try again in a few minutes. If the problem persists, contact
the help desk.</p>
</body>
</html>"#;

static HTML_404: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>MO-100 | Not Found</title>
<link rel="stylesheet" href="/static/mo100.css">
</head>
<body>
<h1>Not Found</h1>
<p>(Error 404)</p>
<p>There is no course material at this address.</p>
</body>
</html>"#;

trait AddHeaders: IntoResponse + Sized {
    fn add_headers(self, mut new_headers: Vec<(HeaderName, HeaderValue)>) -> Response {
        let mut r = self.into_response();
        let r_headers = r.headers_mut();
        for (name, value) in new_headers.drain(..) {
            r_headers.insert(name, value);
        }

        r
    }
}

impl<T: IntoResponse + Sized> AddHeaders for T {}

/**
Initializes the resources used in this module. This function should be called
before any functionality of this module or any of its submodules is used.

Currently the only thing that happens here is loading the templates used by
`serve_template()`, which will respond with an error page until `init()` has
been called. Only the first successful call loads anything; later calls
(from any thread) are no-ops.

The argument is the path to the directory where the templates can be found.
*/
pub fn init<P: AsRef<Path>>(template_dir: P) -> Result<(), String> {
    let template_dir = template_dir.as_ref();

    TEMPLATES.get_or_try_init(|| {
        log::trace!("Registering templates in {}.", template_dir.display());

        let mut h = Handlebars::new();
        #[cfg(debug_assertions)]
        h.set_dev_mode(true);
        h.register_templates_directory(".html", template_dir)
            .map_err(|e| format!(
                "Error registering templates directory {}: {}",
                template_dir.display(), &e
            ))?;
        Ok::<_, String>(h)
    })?;

    Ok(())
}

/// Builds the application's routes around the global state.
pub fn router(glob: Arc<Glob>) -> Router {
    let static_dir = glob.cfg.static_dir.clone();

    Router::new()
        .route("/materials/:slug", get(material::serve))
        .route_layer(middleware::from_fn(require_session))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(Extension(glob))
}

/**
Return an HTML response in the case of an unrecoverable* error.

(*"Unrecoverable" from the perspective of fielding the current request,
not from the perspective of the program crashing.)
*/
pub fn html_500() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(HTML_500)
    ).into_response()
}

/// The terminal page for when the database can't be used.
pub fn respond_db_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(HTML_DB_ERROR)
    ).add_headers(vec![no_store()])
}

pub fn respond_404() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(HTML_404)
    ).into_response()
}

pub fn respond_redirect(location: &str) -> Response {
    log::trace!("respond_redirect( {:?} ) called.", location);

    Redirect::to(location).into_response()
}

fn no_store() -> (HeaderName, HeaderValue) {
    (header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
}

/// Render template `template_name` into a `String`.
pub fn render_template<S>(template_name: &str, data: &S) -> Result<String, String>
where
    S: Serialize + Debug
{
    log::trace!("render_template( {:?}, ... ) called.", template_name);

    let templates = TEMPLATES.get()
        .ok_or_else(|| "Templates not initialized.".to_owned())?;

    templates.render(template_name, data).map_err(|e| format!(
        "Error rendering template {:?} with data {:?}:\n{}",
        template_name, data, &e
    ))
}

pub fn serve_template<S>(
    code: StatusCode,
    template_name: &str,
    data: &S,
    mut addl_headers: Vec<(HeaderName, HeaderValue)>
) -> Response
where
    S: Serialize + Debug
{
    log::trace!("serve_template( {}, {:?}, ... ) called.", &code, template_name);

    match render_template(template_name, data) {
        Ok(response_body) => {
            addl_headers.push(no_store());
            (
                code,
                Html(response_body)
            ).add_headers(addl_headers)
        },
        Err(e) => {
            log::error!("{}", &e);
            html_500()
        },
    }
}

/// Value of cookie `name` among the request's `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE).iter() {
        let value = match value.to_str() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Ignoring unreadable Cookie header: {}", &e);
                continue;
            },
        };

        for pair in value.split(';') {
            if let Some((k, v)) = pair.trim().split_once('=') {
                if k.trim() == name {
                    let v = v.trim().trim_matches('"');
                    if !v.is_empty() {
                        return Some(v.to_owned());
                    }
                }
            }
        }
    }

    None
}

/**
Middleware function ensuring the request comes from a logged-in student or
instructor.

The session is found by the key in the session cookie. Requests without
a session, or whose session has no allowed role, are redirected to the
login page; otherwise the `Session` is placed in the request's extensions
for the handlers.
*/
pub async fn require_session<B>(
    mut req: Request<B>,
    next: Next<B>,
) -> Response {
    let glob: Arc<Glob> = match req.extensions().get::<Arc<Glob>>() {
        Some(glob) => glob.clone(),
        None => {
            log::error!("Global state missing from request extensions.");
            return html_500();
        },
    };
    let login = glob.cfg.login_path.as_str();

    let key = match cookie_value(req.headers(), &glob.cfg.session_cookie) {
        Some(key) => key,
        None => {
            log::trace!("No session cookie; redirecting to login.");
            return respond_redirect(login);
        },
    };

    let session = match glob.records.session(&key).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            log::trace!("No session for presented key; redirecting to login.");
            return respond_redirect(login);
        },
        Err(e) => {
            log::error!("Error looking up session: {}", &e);
            return respond_db_error();
        },
    };

    if session.role().is_none() {
        log::warn!(
            "User {} has role {:?}, which may not view materials.",
            &session.user_id, &session.user_role
        );
        return respond_redirect(login);
    }

    req.extensions_mut().insert(session);
    next.run(req).await
}
