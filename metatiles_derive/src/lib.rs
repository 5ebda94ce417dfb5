//! Procedural macros shared by the metatiles crates.
//!
//! [`macro@context`] wraps the body of a function returning `anyhow::Result` so that every error
//! leaving the function carries an additional, formatted context message.

mod args;

use crate::args::Args;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{ToTokens, quote};
use syn::parse_macro_input;

/// Attach a formatted context message to any error returned by the annotated function.
///
/// ```ignore
/// #[context("reading metatile '{}'", path.display())]
/// fn open_path(path: &Path) -> Result<MetatileReader> { ... }
/// ```
///
/// Prefix the format arguments with `move,` when the body has to take ownership of captured
/// arguments.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let Args(move_token, format_args) = parse_macro_input!(args);
	let mut input = parse_macro_input!(input as syn::ItemFn);

	let body = &input.block;
	let return_type = &input.sig.output;
	let err = Ident::new("err", Span::mixed_site());

	if let syn::ReturnType::Default = return_type {
		return syn::Error::new_spanned(input, "function should return Result")
			.to_compile_error()
			.into();
	}

	let force_fn_once = Ident::new("force_fn_once", Span::mixed_site());
	let new_body = quote! {
		// dropping a captured non-Copy value makes the closure FnOnce
		let #force_fn_once = ::core::iter::empty::<()>();
		(#move_token || #return_type {
			::core::mem::drop(#force_fn_once);
			#body
		})().map_err(|#err| #err.context(format!(#format_args)).into())
	};
	input.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	input.into_token_stream().into()
}
