//! The `#[tool]` attribute.
//!
//! ```ignore
//! use agent_tools::tool;
//!
//! /// Adds two numbers.
//! /// :param a: first
//! /// :param b: second
//! /// :return: the sum
//! #[tool]
//! fn add(a: i64, b: i64) -> i64 {
//!     a + b
//! }
//!
//! let binding = add_tool();
//! assert_eq!(binding.descriptor().required(), &["a", "b"]);
//! ```
//!
//! The annotated function is left untouched. Parameters of type `Option<T>`
//! or marked `#[default]` are optional. A `Result<T, E>` return maps `Err`
//! into a tool execution error.

pub use agent_tools_macros::tool;
