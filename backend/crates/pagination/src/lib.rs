//! Page-number pagination primitives shared by Yatube feed endpoints.
//!
//! Feeds are sliced into fixed-size pages selected by a 1-based page
//! number taken from the request query string:
//!
//! - [`PageRequest`] parses the raw `page` value. Anything that is not a
//!   positive integer selects the first page.
//! - [`Paginator`] knows the item total and page size, and resolves a
//!   request into a [`PageWindow`]. Requests past the end clamp to the
//!   last page instead of failing.
//! - [`Page`] pairs a window with the items loaded for it.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, Paginator};
//!
//! let paginator = Paginator::new(13, 10)?;
//! let window = paginator.window(PageRequest::from_query(Some("3")));
//! assert_eq!(window.number(), 2);
//! assert_eq!(window.offset(), 10);
//! assert_eq!(window.limit(), 3);
//! # Ok::<(), pagination::PaginationError>(())
//! ```

mod page;
mod request;
mod window;

pub use page::Page;
pub use request::PageRequest;
pub use window::{PageWindow, PaginationError, Paginator};
