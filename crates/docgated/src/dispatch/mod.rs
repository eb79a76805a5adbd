//! JSONL request dispatch.
//!
//! Clients send a single request line naming a route:
//!
//! ```json
//! {"route":"/docs/list","body":{"limit":10,"offset":0}}
//! ```
//!
//! The daemon answers with one line, either a success envelope carrying the
//! route's response or an error envelope with a stable code:
//!
//! ```json
//! {"kind":"ok","body":{"docs":[]}}
//! {"kind":"error","code":"validation","message":"limit 0 is outside [1, 100]"}
//! ```

mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::errors::DispatchError;
pub use self::handler::DispatchConnectionHandler;
pub use self::router::{ROUTES, RouteEntry, RouteTable};
