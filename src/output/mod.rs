//! Output formatting for calculator results.
//!
//! This module handles turning results into something a caller can use:
//! - [`contract`] - JSON request/response contract and operation dispatch
//! - [`terminal`] - Terminal output with colors

pub mod contract;
mod terminal;

pub use contract::{
    AddressRequest, CloudflareResponse, ContractError, Handler, Operation, PrivacyResponse,
    SubnetInfoRequest,
};
pub use terminal::{
    format_field, render_cloudflare, render_privacy, render_range_table, render_subnet_info,
    render_validation,
};
