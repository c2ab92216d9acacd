//! Defines the Stagecraft runtime macro.

extern crate proc_macro;

use proc_macro::TokenStream;

use crate::internals::runtime_macro;

mod internals;

/// Runs an `async fn main` on a multi-threaded tokio runtime, then waits for every background
/// task started through `stagecraft::utils::task::run` (clock loops included) before returning.
///
/// Use it instead of `#[tokio::main]`: a running clock keeps the program alive until stopped.
#[proc_macro_attribute]
pub fn runtime(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro(item.into()).into()
}
