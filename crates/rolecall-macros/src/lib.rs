//! Procedural macros for Rolecall.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::{parse_macro_input, Ident, ItemFn};

/// Turns a function into a composable.
///
/// The body runs inside a slot-table group keyed by the location the function
/// was called from, so two calls from different lines get independent state
/// while calls from a loop are matched by position.
///
/// ```rust,ignore
/// #[composable]
/// fn Greeting(name: String) {
///     Text(format!("Hello {name}"), Modifier::empty());
/// }
/// ```
#[proc_macro_attribute]
pub fn composable(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(Span::call_site(), "#[composable] takes no arguments")
            .to_compile_error()
            .into();
    }
    let function = parse_macro_input!(item as ItemFn);
    if function.sig.asyncness.is_some() {
        return syn::Error::new_spanned(&function.sig, "composables cannot be async")
            .to_compile_error()
            .into();
    }

    let runtime = runtime_path();
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = function;

    quote! {
        #(#attrs)*
        #[track_caller]
        #vis #sig {
            let __rolecall_key = #runtime::caller_key(::std::panic::Location::caller());
            #runtime::with_group(__rolecall_key, move || #block)
        }
    }
    .into()
}

fn runtime_path() -> TokenStream2 {
    match crate_name("rolecall-core") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        // rolecall-core aliases itself with `extern crate self`.
        Ok(FoundCrate::Itself) | Err(_) => quote!(::rolecall_core),
    }
}
