//! Utility modules behind the tools.
//!
//! - [`normalize_phone`]: canonical phone form used to match salesmen
//! - [`format_social_link`]: Instagram handles to profile URLs
//! - [`flatten_order`]: one order into primary + companion participants
//! - [`fetch_up_to`]: offset-paginated fetch with a hard cap
//! - [`fetch_participants_with_hidden`]: visible + hidden orders in one call
//! - [`participant_statistics`], [`summarize_salesmen`]: counters for tool output
//! - [`HttpClient`]: shared reqwest client with auth headers and timeout
//!
//! # Pagination
//!
//! ```rust,no_run
//! use go_out_mcp::utils::{fetch_up_to, Page, PageWindow};
//!
//! # async fn example() -> Result<(), String> {
//! let window = PageWindow { limit: 12, skip: 0, page_size: 5, hard_cap: 200 };
//! let page: Page<u32> = fetch_up_to(window, |offset| async move {
//!     Ok::<_, String>((offset as u32..offset as u32 + 5).collect())
//! })
//! .await?;
//! assert_eq!(page.items.len(), 12);
//! # Ok(())
//! # }
//! ```

mod flatten;
mod http;
mod links;
mod pagination;
mod participants;
mod phone;
mod salesman;
mod stats;
mod validate;

pub use flatten::{extract_dynamic_fields, flatten_order, flatten_orders, is_truthy};
pub use http::{HttpClient, HttpClientBuilder};
pub use links::{format_social_link, trimmed_link};
pub use pagination::{fetch_up_to, Page, PageWindow};
pub use participants::{fetch_participants_with_hidden, ParticipantQuery};
pub use phone::{normalize_phone, same_phone};
pub use salesman::{
    collect_salesmen, salesman_from_tracking_link, salesman_from_user_role,
    sort_by_registrations, summarize_salesmen, TICKET_PRICE,
};
pub use stats::{hidden_percentage, participant_statistics, ParticipantStatistics};
pub use validate::{
    optional_bool, optional_str, optional_usize, required_str, validate_required, validate_url,
    ValidationError,
};
