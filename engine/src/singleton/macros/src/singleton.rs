use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, LitStr, parse_macro_input};

pub fn derive_singleton(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // Get the struct name we are annotating
    let struct_name = &ast.ident;

    // Declaration knobs collected from #[singleton(...)], all optional.
    let mut name: Option<LitStr> = None;
    let mut resource: Option<LitStr> = None;
    let mut persist = false;
    let mut modes: Vec<TokenStream2> = Vec::new();
    let mut order: Option<TokenStream2> = None;
    let mut visibility: Vec<TokenStream2> = Vec::new();

    for attr in ast
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("singleton"))
    {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("resource") {
                resource = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("persist") {
                persist = true;
                Ok(())
            } else if meta.path.is_ident("modes") {
                meta.parse_nested_meta(|mode| {
                    if mode.path.is_ident("create_new") {
                        modes.push(quote! {
                            ::solo_engine::singleton::CreationMode::CREATE_NEW
                        });
                        Ok(())
                    } else if mode.path.is_ident("load_resource") {
                        modes.push(quote! {
                            ::solo_engine::singleton::CreationMode::LOAD_RESOURCE
                        });
                        Ok(())
                    } else {
                        Err(mode.error("expected `create_new` or `load_resource`"))
                    }
                })
            } else if meta.path.is_ident("order") {
                meta.parse_nested_meta(|choice| {
                    if choice.path.is_ident("resource_first") {
                        order = Some(quote! {
                            ::solo_engine::singleton::StrategyOrder::ResourceFirst
                        });
                        Ok(())
                    } else if choice.path.is_ident("create_first") {
                        order = Some(quote! {
                            ::solo_engine::singleton::StrategyOrder::CreateFirst
                        });
                        Ok(())
                    } else {
                        Err(choice.error("expected `resource_first` or `create_first`"))
                    }
                })
            } else if meta.path.is_ident("visibility") {
                meta.parse_nested_meta(|flag| {
                    if flag.path.is_ident("hidden") {
                        visibility.push(quote! {
                            ::solo_engine::stage::Visibility::HIDDEN
                        });
                        Ok(())
                    } else if flag.path.is_ident("locked") {
                        visibility.push(quote! {
                            ::solo_engine::stage::Visibility::LOCKED
                        });
                        Ok(())
                    } else if flag.path.is_ident("skip_save") {
                        visibility.push(quote! {
                            ::solo_engine::stage::Visibility::SKIP_SAVE
                        });
                        Ok(())
                    } else {
                        Err(flag.error("expected `hidden`, `locked` or `skip_save`"))
                    }
                })
            } else {
                Err(meta.error("unknown singleton attribute"))
            }
        });
        if let Err(error) = parsed {
            return error.to_compile_error().into();
        }
    }

    // The declared name defaults to the type name.
    let name = name
        .map(|lit| lit.value())
        .unwrap_or_else(|| struct_name.to_string());

    // Assemble the declaration as the same builder chain a hand-written
    // impl would use. Order matters: with_modes replaces the mode set, so
    // it comes first and from_resource last for the implied load mode.
    let mut config = quote! {
        ::solo_engine::singleton::CreationConfig::new(#name)
    };
    if let Some((head, tail)) = modes.split_first() {
        config = quote! { #config.with_modes(#head #( .union(#tail) )*) };
    }
    if let Some(order) = order {
        config = quote! { #config.with_order(#order) };
    }
    if persist {
        config = quote! { #config.persist() };
    }
    if let Some((head, tail)) = visibility.split_first() {
        config = quote! { #config.with_visibility(#head #( .union(#tail) )*) };
    }
    if let Some(resource) = resource {
        config = quote! { #config.from_resource(#resource) };
    }

    // Use ::solo_engine::singleton::Singleton which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as solo_engine;` in lib.rs
    // Outside the crate, this naturally resolves to the solo_engine dependency.
    TokenStream::from(quote! {
        impl ::solo_engine::singleton::Singleton for #struct_name {
            fn creation() -> ::solo_engine::singleton::CreationConfig {
                #config
            }
        }
    })
}
