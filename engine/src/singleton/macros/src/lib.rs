mod singleton;

use proc_macro::TokenStream;

#[proc_macro_derive(Singleton, attributes(singleton))]
pub fn derive_singleton(item: TokenStream) -> TokenStream {
    singleton::derive_singleton(item)
}
