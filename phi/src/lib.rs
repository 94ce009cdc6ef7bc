//! # Phi — runtime dependency injection for Rust
//!
//! Register how to build things, then ask for them by name. Phi walks
//! each type's constructor signature and fills it from the caller's
//! arguments, from bindings, and by recursively building typed
//! dependencies.
//!
//! ```rust
//! use phi::prelude::*;
//! use std::sync::Arc;
//!
//! struct Clock;
//! struct Scheduler {
//!     clock: Arc<Clock>,
//!     name: String,
//! }
//!
//! let container = Container::new();
//! container.register_type(TypeDescriptor::new("Clock").constructor(|_| Ok(Clock)));
//! container.register_type(
//!     TypeDescriptor::new("Scheduler")
//!         .param_typed("clock", "Clock")
//!         .param("name")
//!         .constructor(|v| Ok(Scheduler { clock: v.object(0)?, name: v.str(1)?.to_string() })),
//! );
//!
//! let clock = container.resolve("Clock").unwrap();
//! container.bind("Clock", clock.clone());
//!
//! let scheduler: Arc<Scheduler> = container
//!     .make_as("Scheduler", Arguments::new().with_named("name", "nightly"))
//!     .unwrap();
//!
//! assert_eq!(scheduler.name, "nightly");
//! assert!(Arc::ptr_eq(&scheduler.clock, &clock.downcast::<Clock>().unwrap()));
//! ```

pub use phi_container::*;
pub use phi_support;
