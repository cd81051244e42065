//! Read and inspect JVM classes
//!
//! ### Simple example
//!
//! Consider the following simple Java class:
//!
//! ```java,ignore,no_run
//! public class Point {
//!     public final int x;
//!     public final int y;
//!
//!     public Point(int x, int y) {
//!         this.x = x;
//!         this.y = y;
//!     }
//! }
//! ```
//!
//! Parsing the compiled `Point.class` back into a structural model can be
//! done as follows:
//!
//! ```no_run
//! use classcompat::jvm::class_file::parse_class;
//! use classcompat::jvm::{ClassFileError, Name};
//!
//! # fn inspect_class() -> Result<(), ClassFileError> {
//! let class_bytes: Vec<u8> = std::fs::read("Point.class")?;
//! let class = parse_class(&class_bytes)?;
//!
//! assert_eq!(class.name.as_str(), "me/alec/Point");
//! assert_eq!(
//!     class.super_class.as_ref().map(|name| name.as_str()),
//!     Some("java/lang/Object"),
//! );
//!
//! for field in &class.fields {
//!     println!("field {} : {}", field.name.as_str(), field.descriptor);
//! }
//! for method in &class.methods {
//!     println!("method {}{}", method.name.as_str(), method.descriptor);
//! }
//! # Ok(())
//! # }
//! ```

mod access_flags;
pub mod class_file;
mod descriptors;
mod errors;
pub mod model;
mod names;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
