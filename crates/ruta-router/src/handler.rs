//! Route handlers.
//!
//! A handler is either a plain function or closure, or an action on a
//! [`Controller`] that is constructed fresh for every invocation. Both are
//! called through the [`Handler`] trait with the same three arguments, and
//! handlers simply ignore what they don't need:
//!
//! ```
//! use ruta_router::{HandlerArgs, Request, Response};
//!
//! fn show_user(_req: &Request, res: &mut Response, args: &HandlerArgs) {
//!     res.text(format!("user {}", args.get("id").unwrap_or("?")));
//! }
//! ```

use std::any::type_name;
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::error::{Result, RouterError};
use crate::path::PathArgs;
use crate::request::Request;
use crate::response::Response;

/// Extra data attached to a registration and passed to its handler.
pub type RouteData = Map<String, Value>;

/// Arguments passed to a handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerArgs {
    /// Arguments captured from the request path.
    pub args: PathArgs,
    /// Data attached to the registration.
    pub data: RouteData,
}

impl HandlerArgs {
    /// Creates handler arguments.
    pub fn new(args: PathArgs, data: RouteData) -> Self {
        Self { args, data }
    }

    /// Gets a captured path argument.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args.get(key)
    }

    /// Gets a registration data entry.
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Something the router can invoke for a matched request.
pub trait Handler {
    /// Invokes the handler.
    fn invoke(&self, req: &Request, res: &mut Response, args: &HandlerArgs) -> Result<()>;

    /// Returns a short description used in log events.
    fn name(&self) -> String {
        "fn".to_string()
    }
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response, &HandlerArgs),
{
    fn invoke(&self, req: &Request, res: &mut Response, args: &HandlerArgs) -> Result<()> {
        self(req, res, args);
        Ok(())
    }
}

/// A type whose named actions can handle requests.
///
/// # Example
///
/// ```
/// use ruta_router::{Controller, HandlerArgs, Request, Response};
///
/// #[derive(Default)]
/// struct HomeCtrl;
///
/// impl Controller for HomeCtrl {
///     fn call_action(
///         &mut self,
///         action: &str,
///         _req: &Request,
///         res: &mut Response,
///         args: &HandlerArgs,
///     ) -> bool {
///         match action {
///             "index" => res.text(format!("home {}", args.get("path").unwrap_or(""))),
///             _ => return false,
///         }
///         true
///     }
/// }
/// ```
pub trait Controller: Default {
    /// Runs `action`. Returns `false` if the controller has no such action.
    fn call_action(
        &mut self,
        action: &str,
        req: &Request,
        res: &mut Response,
        args: &HandlerArgs,
    ) -> bool;

    /// Receives the registration data before the action runs.
    fn set_route_data(&mut self, _data: &RouteData) {}
}

/// Invokes an action on a freshly constructed controller.
pub struct MethodHandler<C> {
    action: String,
    controller: PhantomData<fn() -> C>,
}

impl<C: Controller> MethodHandler<C> {
    /// Creates a handler for `action` on `C`.
    ///
    /// Fails with [`RouterError::InvalidHandler`] if `action` is empty.
    /// Whether `C` actually has the action is only known when it is called.
    pub fn new(action: impl Into<String>) -> Result<Self> {
        let action = action.into();
        if action.trim().is_empty() {
            return Err(RouterError::InvalidHandler {
                controller: type_name::<C>(),
                action,
            });
        }
        Ok(Self {
            action,
            controller: PhantomData,
        })
    }

    /// Returns the action name.
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl<C: Controller> Handler for MethodHandler<C> {
    fn invoke(&self, req: &Request, res: &mut Response, args: &HandlerArgs) -> Result<()> {
        let mut controller = C::default();
        controller.set_route_data(&args.data);
        if controller.call_action(&self.action, req, res, args) {
            Ok(())
        } else {
            Err(RouterError::InvalidHandler {
                controller: type_name::<C>(),
                action: self.action.clone(),
            })
        }
    }

    fn name(&self) -> String {
        format!("{}::{}", type_name::<C>(), self.action)
    }
}
