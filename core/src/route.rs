//! Method + path-template matchers.
//!
//! [`route`] builds a pipeline step that matches one HTTP method against
//! one path template (`/users/:id` style, compiled with [`matchit`]). On a
//! match the context is extended with exactly the named captures; on a
//! mismatch the step misses with the original request method and path so a
//! [`crate::router`] composition can try the next branch.
//!
//! Matching is pure: a function of the method, the template and the
//! request path, with no side effects.

use crate::context::Context;
use crate::outcome::Outcome;
use crate::pipeline::Pipeline;
use crate::reply::NotFound;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// A step matching `method` and a path template.
///
/// The template supports literal segments and named parameters
/// (`/users/:id`). Trailing slashes are normalized away on both the
/// template and the request path. An invalid template does not panic:
/// the step reports it as a `Failure` at run time (and warns once at
/// construction).
#[must_use]
pub fn route(method: Method, pattern: &str) -> Pipeline {
    let compiled = compile(pattern);
    if let Err(error) = &compiled {
        tracing::warn!(pattern, %error, "route pattern failed to compile");
    }
    let compiled = Arc::new(compiled);
    let pattern: Arc<str> = Arc::from(pattern);

    Pipeline::new(move |ctx: Context| {
        let compiled = Arc::clone(&compiled);
        let pattern = Arc::clone(&pattern);
        let method = method.clone();
        async move {
            let table = match compiled.as_ref() {
                Ok(table) => table,
                Err(error) => {
                    return Outcome::Failure(anyhow::anyhow!(
                        "invalid route pattern `{pattern}`: {error}"
                    ));
                },
            };

            let request = ctx.request();
            // `http::Method` is normalized, so this comparison is already
            // case-insensitive with respect to the raw request line.
            if request.method() != &method {
                return Outcome::Miss(NotFound::new(request.method().clone(), request.path()));
            }

            match table.at(normalize(request.path())) {
                Ok(matched) => {
                    let captured: HashMap<String, String> = matched
                        .params
                        .iter()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect();
                    Outcome::Next(ctx.with_params(captured))
                },
                Err(_) => Outcome::Miss(NotFound::new(request.method().clone(), request.path())),
            }
        }
    })
}

/// Match a `GET` request against a path template.
pub fn get(pattern: &str) -> Pipeline {
    route(Method::GET, pattern)
}

/// Match a `POST` request against a path template.
pub fn post(pattern: &str) -> Pipeline {
    route(Method::POST, pattern)
}

/// Match a `PUT` request against a path template.
pub fn put(pattern: &str) -> Pipeline {
    route(Method::PUT, pattern)
}

/// Match a `PATCH` request against a path template.
pub fn patch(pattern: &str) -> Pipeline {
    route(Method::PATCH, pattern)
}

/// Match a `DELETE` request against a path template.
pub fn del(pattern: &str) -> Pipeline {
    route(Method::DELETE, pattern)
}

/// Match an `OPTIONS` request against a path template.
pub fn options(pattern: &str) -> Pipeline {
    route(Method::OPTIONS, pattern)
}

/// Match a `HEAD` request against a path template.
pub fn head(pattern: &str) -> Pipeline {
    route(Method::HEAD, pattern)
}

fn compile(pattern: &str) -> Result<matchit::Router<()>, matchit::InsertError> {
    let mut table = matchit::Router::new();
    table.insert(normalize(pattern).to_string(), ())?;
    Ok(table)
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
