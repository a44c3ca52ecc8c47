//! # dockyard_templates
//!
//! Template discovery and environment-template resolution for Dockyard.
//!
//! A template is a directory holding a `docker-compose.yml` and an
//! environment template (`.env.template`, or `.env`). Values written as
//! `<name>` are placeholders; each distinct placeholder name is asked for
//! once through a [`ValueSource`] and shared by every key that uses it.
//!
//! ## Example
//!
//! ```rust
//! use dockyard_templates::{EnvResolver, ScriptedValueSource};
//!
//! let mut answers = ScriptedValueSource::new(["8080"]);
//! let env = EnvResolver::new()
//!     .resolve("PORT=<port>\nDEBUG=false", &mut answers)
//!     .unwrap();
//!
//! assert_eq!(env.get("PORT"), Some("8080"));
//! assert_eq!(env.render(), "PORT=8080\nDEBUG=false\n");
//! ```

pub mod envfile;
pub mod error;
pub mod names;
pub mod registry;
pub mod resolver;
pub mod source;

pub use envfile::{
    is_valid_key, is_valid_value, parse_entries, parse_env, EnvTemplateEntry, EnvValue,
    ResolvedEnvironment,
};
pub use error::{TemplateError, TemplateResult};
pub use names::validate_name;
pub use registry::{compose_dirs, TemplateRegistry, COMPOSE_FILE, ENV_FILE, ENV_TEMPLATE_FILE};
pub use resolver::EnvResolver;
pub use source::{MapValueSource, ScriptedValueSource, StdinValueSource, ValueSource};
