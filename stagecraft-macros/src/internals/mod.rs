use proc_macro2::TokenStream;
use quote::quote;
use syn::{ItemFn, Signature};

/// Expands `#[stagecraft::runtime]` (see the crate docs).
///
/// The body runs as an `async move` block, so `return` and `?` keep their meaning, and its
/// output is handed back once the background tasks are done.
pub fn runtime_macro(item: TokenStream) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = match syn::parse2::<ItemFn>(item) {
        Ok(function) => function,
        Err(err) => return err.to_compile_error(),
    };

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(sig.fn_token, "#[stagecraft::runtime] expects an async fn")
            .to_compile_error();
    }
    let sig = Signature {
        asyncness: None,
        ..sig
    };

    quote! {
        #(#attrs)*
        #vis #sig {
            ::stagecraft::utils::tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to build the stagecraft runtime")
                .block_on(async {
                    let output = async move #block.await;
                    ::stagecraft::utils::task::wait_all().await;
                    output
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use crate::internals::runtime_macro;

    #[test]
    fn test_runtime_macro() {
        let input = quote! {
            async fn main() -> Result<(), Error> {
                let clock = FrameClock::default();
                clock.start()?;
                Ok(())
            }
        };

        let control = quote! {
            fn main() -> Result<(), Error> {
                ::stagecraft::utils::tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .expect("Failed to build the stagecraft runtime")
                    .block_on(async {
                        let output = async move {
                            let clock = FrameClock::default();
                            clock.start()?;
                            Ok(())
                        }.await;
                        ::stagecraft::utils::task::wait_all().await;
                        output
                    })
            }
        };

        let output = runtime_macro(input);
        assert_eq!(output.to_string(), control.to_string());
    }

    #[test]
    fn test_runtime_macro_keeps_attributes() {
        let input = quote! {
            #[allow(unused)]
            pub async fn demo() {}
        };

        let output = runtime_macro(input).to_string();
        assert!(output.contains("allow"), "{}", output);
        assert!(output.contains("pub fn demo"), "{}", output);
        assert!(!output.contains("async fn"));
        assert!(output.contains("wait_all"));
    }

    #[test]
    fn test_runtime_macro_requires_async() {
        let input = quote! {
            fn main() {}
        };

        let output = runtime_macro(input).to_string();
        assert!(output.contains("compile_error"), "{}", output);
        assert!(output.contains("expects an async fn"));
    }

    #[test]
    fn test_runtime_macro_invalid_item() {
        let input = quote! {
            struct Main;
        };
        assert!(runtime_macro(input).to_string().contains("compile_error"));
    }
}
