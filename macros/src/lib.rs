//! Internal proc-macros shared across `valkey-glide-core`.
//!
//! Two macros, mirroring the builder-returns-self pattern called out in the
//! source project's design notes: [`request_impl`] wires a deferred command
//! builder up to `IntoFuture` without hand-writing the future boilerplate for
//! every one of the ~200 command builders, and [`option_setters`] generates
//! the repetitive `Option<T>` setter methods on those same builders.

extern crate proc_macro;

use quote::quote;
use syn::{
    braced,
    parse::{Parse, ParseStream},
    parse_macro_input,
    parse_quote_spanned,
    spanned::Spanned,
    Block,
    Error,
    Generics,
    Ident,
    Lifetime,
    Token,
    Type,
};

/// Generates the `IntoFuture` impl (plus an opaque future wrapper type) for a
/// deferred command builder.
///
/// ```text
/// request_impl! {
///     impl Action for Get<'_> {
///         type Future = GetFuture;
///         async fn execute(self) -> Result<Option<Bytes>> { ... }
///     }
/// }
/// ```
#[proc_macro]
pub fn request_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let RequestImpl {
        generics,
        lifetime,
        action,
        future_name,
        exec_self_mut,
        exec_output,
        exec_body,
    } = parse_macro_input!(input as RequestImpl);

    let mut unbounded_generics = generics.clone();
    for lt in unbounded_generics.lifetimes_mut() {
        lt.bounds.clear();
    }
    for ty in unbounded_generics.type_params_mut() {
        ty.bounds.clear();
    }

    quote! {
        impl #generics crate::client::action::private::Sealed for #action {}

        impl #generics crate::client::action::Action for #action {}

        impl #generics std::future::IntoFuture for #action {
            type Output = #exec_output;
            type IntoFuture = #future_name #unbounded_generics;

            fn into_future(#exec_self_mut self) -> Self::IntoFuture {
                #future_name(Box::pin(async move { #exec_body }))
            }
        }

        #[doc(hidden)]
        pub struct #future_name #generics (
            std::pin::Pin<Box<dyn std::future::Future<Output = #exec_output> + Send + #lifetime>>,
        );

        impl #generics std::future::Future for #future_name #unbounded_generics {
            type Output = #exec_output;

            fn poll(
                mut self: std::pin::Pin<&mut Self>,
                cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<Self::Output> {
                self.0.as_mut().poll(cx)
            }
        }
    }
    .into()
}

struct RequestImpl {
    generics: Generics,
    lifetime: Lifetime,
    action: Type,
    future_name: Ident,
    exec_self_mut: Option<Token![mut]>,
    exec_output: Type,
    exec_body: Block,
}

impl Parse for RequestImpl {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        input.parse::<Token![impl]>()?;
        let generics: Generics = input.parse()?;
        let mut lifetime = None;
        for lt in generics.lifetimes() {
            if lifetime.is_some() {
                return Err(input.error("only one lifetime argument permitted"));
            }
            lifetime = Some(lt);
        }
        let lifetime = match lifetime {
            Some(lt) => lt.lifetime.clone(),
            None => parse_quote_spanned! { generics.span() => 'static },
        };
        parse_name(input, "Action")?;
        input.parse::<Token![for]>()?;
        let action = input.parse()?;

        let impl_body;
        braced!(impl_body in input);

        impl_body.parse::<Token![type]>()?;
        parse_name(&impl_body, "Future")?;
        impl_body.parse::<Token![=]>()?;
        let future_name = impl_body.parse()?;
        impl_body.parse::<Token![;]>()?;

        impl_body.parse::<Token![async]>()?;
        impl_body.parse::<Token![fn]>()?;
        parse_name(&impl_body, "execute")?;
        let exec_args;
        syn::parenthesized!(exec_args in impl_body);
        let exec_self_mut = exec_args.parse()?;
        exec_args.parse::<Token![self]>()?;
        if !exec_args.is_empty() {
            return Err(exec_args.error("unexpected token"));
        }
        impl_body.parse::<Token![->]>()?;
        let exec_output = impl_body.parse()?;
        let exec_body = impl_body.parse()?;

        if !impl_body.is_empty() {
            return Err(impl_body.error("unexpected trailing token"));
        }

        Ok(RequestImpl {
            generics,
            lifetime,
            action,
            future_name,
            exec_self_mut,
            exec_output,
            exec_body,
        })
    }
}

fn parse_name(input: ParseStream, name: &str) -> syn::Result<()> {
    let ident = input.parse::<Ident>()?;
    if ident != name {
        return Err(Error::new(
            ident.span(),
            format!("expected '{name}', got '{ident}'"),
        ));
    }
    Ok(())
}

/// Generates `Option<T>` setter methods on a builder struct for a list of
/// `name: Type` pairs. Each setter takes its value by `impl Into<T>` (or
/// `impl IntoIterator<Item = T>` for `Vec<T>` fields) and returns `Self` for
/// chaining, matching the rest of this crate's builder-returns-self pattern.
///
/// ```text
/// option_setters! {
///     options: SetOptions;
///     conditional_set: ConditionalSet,
///     get: bool,
///     expiry: Expiry,
/// }
/// ```
#[proc_macro]
pub fn option_setters(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let OptionSettersList {
        field_name,
        field_type,
        setters,
    } = parse_macro_input!(input as OptionSettersList);

    let with_options = quote! {
        /// Set all options at once. Replaces any values set through individual setters.
        pub fn with_options(mut self, value: impl Into<Option<#field_type>>) -> Self {
            self.#field_name = value.into();
            self
        }
    };

    let setters = setters.into_iter().map(|OptionSetter { name, ty }| {
        let (accept, value) = if let Some(inner) = vec_inner(&ty) {
            (
                quote! { impl IntoIterator<Item = #inner> },
                quote! { value.into_iter().collect() },
            )
        } else if ty_is(&ty, "String") {
            (quote! { impl Into<String> }, quote! { value.into() })
        } else {
            (quote! { #ty }, quote! { value })
        };
        quote! {
            pub fn #name(mut self, value: #accept) -> Self {
                self.#field_name
                    .get_or_insert_with(<#field_type>::default)
                    .#name = Some(#value);
                self
            }
        }
    });

    quote! {
        #with_options
        #(#setters)*
    }
    .into()
}

struct OptionSettersList {
    field_name: Ident,
    field_type: Type,
    setters: Vec<OptionSetter>,
}

struct OptionSetter {
    name: Ident,
    ty: Type,
}

impl Parse for OptionSettersList {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let field_name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let field_type: Type = input.parse()?;
        input.parse::<Token![;]>()?;

        let mut setters = Vec::new();
        while !input.is_empty() {
            let name: Ident = input.parse()?;
            input.parse::<Token![:]>()?;
            let ty: Type = input.parse()?;
            setters.push(OptionSetter { name, ty });
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(OptionSettersList {
            field_name,
            field_type,
            setters,
        })
    }
}

fn ty_is(ty: &Type, name: &str) -> bool {
    matches!(ty, Type::Path(p) if p.path.is_ident(name))
}

fn vec_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(p) = ty else { return None };
    let seg = p.path.segments.last()?;
    if seg.ident != "Vec" {
        return None;
    }
    match &seg.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|a| match a {
            syn::GenericArgument::Type(t) => Some(t),
            _ => None,
        }),
        _ => None,
    }
}
