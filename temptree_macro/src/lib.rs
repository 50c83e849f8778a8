extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse::Parser, parse_macro_input, Expr, ItemFn};

#[derive(Default)]
struct TreeAttrs {
    tree: Option<Expr>,
    config: Option<Expr>,
    base_dir: Option<Expr>,
}

fn parse_attrs(stream: TokenStream2) -> Result<TreeAttrs, syn::Error> {
    let mut attrs = TreeAttrs::default();

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("tree") {
            attrs.tree = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("config") {
            attrs.config = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("base_dir") {
            attrs.base_dir = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unsupported attribute, expected `tree`, `config` or `base_dir`"));
        }
        Ok(())
    });

    parser.parse2(stream)?;
    Ok(attrs)
}

/// Turns `fn name(root: &Path) -> std::io::Result<()>` into a test which runs
/// against a freshly materialized temporary tree and removes it afterwards.
///
/// The tree is given either as a descriptor (`tree = "+ root\n  - a"`) or as a
/// YAML/JSON configuration (`config = "..."`), as a literal or a `&str` constant.
/// `base_dir` picks the directory the sandbox is created in.
#[proc_macro_attribute]
pub fn temptree_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);
    let fn_name = &input_fn.sig.ident;
    let fn_attrs = &input_fn.attrs;
    let fn_inputs = &input_fn.sig.inputs;
    let fn_output = &input_fn.sig.output;
    let fn_block = &input_fn.block;

    let attrs = match parse_attrs(attr.into()) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };

    let builder = match &attrs.base_dir {
        Some(base_dir) => quote! { ::temptree::EphemeralTree::builder().base_dir(#base_dir) },
        None => quote! { ::temptree::EphemeralTree::builder() },
    };

    let materialize = match (&attrs.tree, &attrs.config) {
        (Some(tree), None) => quote! { #builder.materialize_descriptor(#tree) },
        (None, Some(config)) => quote! { #builder.materialize_config(#config) },
        _ => {
            return syn::Error::new_spanned(
                fn_name,
                "exactly one of `tree` or `config` must be given",
            )
            .to_compile_error()
            .into()
        }
    };

    let expanded = quote! {
        #[test]
        #(#fn_attrs)*
        fn #fn_name() {
            fn inner(#fn_inputs) #fn_output #fn_block

            let tree = #materialize.expect("failed to create the temporary tree");
            tree.run(inner);
            tree.remove().expect("failed to remove the temporary tree");
        }
    };

    TokenStream::from(expanded)
}
