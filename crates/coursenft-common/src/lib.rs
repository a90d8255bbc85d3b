//! Coursenft-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across coursenft:
//!
//! - **Token IDs**: A validated, non-negative NFT token identifier
//! - **Path Utilities**: Functions to detect asset types by URL extension
//! - **Error Handling**: The error taxonomy of the metadata pipeline
//!
//! # Examples
//!
//! ```
//! use coursenft_common::{Error, Result, TokenId};
//! use coursenft_common::paths::is_video_file;
//!
//! // Check a token id from user input
//! let token = TokenId::try_from(7i64).unwrap();
//! assert_eq!(token.get(), 7);
//! assert!(TokenId::try_from(-1i64).is_err());
//!
//! // Check asset types
//! assert!(is_video_file("https://ipfs.io/ipfs/Qm123/lesson.mp4"));
//!
//! // Use common error types
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("URI must start with ipfs://"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{AttemptFailure, AttemptStage, Error, Result};
pub use ids::TokenId;
