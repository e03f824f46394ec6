//! xwt Macros
//!
//! This crate provides `#[derive(Claims)]` for user-composed claims.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, Ident, Type, parse_macro_input};

/// Implements `xwt::Claims` for a struct embedding registered claims.
///
/// Struct attributes pick the wire codec:
/// - `#[claims(json)]` (default): serde JSON, header `typ` "JWT". The struct
///   must implement `Serialize` and `Deserialize`, usually with the
///   registered field marked `#[serde(flatten)]`.
/// - `#[claims(protobuf)]`: prost, header `typ` "PWT". The struct must derive
///   `prost::Message`.
///
/// Exactly one field carries `#[claims(registered)]`. Its type implements
/// `xwt::Claims` (`RegisteredClaims`, `PwtClaims`, ...) and may be wrapped in
/// `Option`, in which case a missing value reads as absent claims.
#[proc_macro_derive(Claims, attributes(claims))]
pub fn derive_claims(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

enum Codec {
    Json,
    Protobuf,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    // Extract named fields
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[derive(Claims)] can only be applied to structs with named fields",
            ));
        }
    };

    let codec = struct_codec(input)?;

    let mut registered: Option<(&Ident, &Type)> = None;
    for field in fields {
        let mut marked = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("claims")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("registered") {
                    marked = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `registered`"))
                }
            })?;
        }
        if !marked {
            continue;
        }
        if registered.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "only one field may be marked #[claims(registered)]",
            ));
        }
        // Named fields always have an ident
        if let Some(ident) = &field.ident {
            registered = Some((ident, &field.ty));
        }
    }

    let Some((field, field_ty)) = registered else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "#[derive(Claims)] needs one field marked #[claims(registered)]",
        ));
    };
    let optional = is_option(field_ty);

    let delegate = |method: TokenStream2, absent: TokenStream2| {
        if optional {
            quote! {
                match &self.#field {
                    ::core::option::Option::Some(registered) => ::xwt::Claims::#method(registered),
                    ::core::option::Option::None => ::core::result::Result::Ok(#absent),
                }
            }
        } else {
            quote! { ::xwt::Claims::#method(&self.#field) }
        }
    };

    let none = quote! { ::core::option::Option::None };
    let expiration_time = delegate(quote!(expiration_time), none.clone());
    let not_before = delegate(quote!(not_before), none.clone());
    let issued_at = delegate(quote!(issued_at), none.clone());
    let issuer = delegate(quote!(issuer), none.clone());
    let subject = delegate(quote!(subject), none.clone());
    let jwt_id = delegate(quote!(jwt_id), none);
    let audience = delegate(
        quote!(audience),
        quote! { <::xwt::ClaimStrings as ::core::default::Default>::default() },
    );

    let (claims_type, marshal, unmarshal) = match codec {
        Codec::Json => (
            quote! { ::xwt::ClaimsType::Jwt },
            quote! { ::xwt::codec::json::marshal(self) },
            quote! {
                *self = ::xwt::codec::json::unmarshal(data)?;
                ::core::result::Result::Ok(())
            },
        ),
        Codec::Protobuf => (
            quote! { ::xwt::ClaimsType::Pwt },
            quote! { ::xwt::codec::protobuf::marshal(self) },
            quote! { ::xwt::codec::protobuf::unmarshal_into(self, data) },
        ),
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::xwt::Claims for #struct_name #ty_generics #where_clause {
            fn expiration_time(&self) -> ::xwt::Result<::core::option::Option<::xwt::NumericDate>> {
                #expiration_time
            }

            fn not_before(&self) -> ::xwt::Result<::core::option::Option<::xwt::NumericDate>> {
                #not_before
            }

            fn issued_at(&self) -> ::xwt::Result<::core::option::Option<::xwt::NumericDate>> {
                #issued_at
            }

            fn issuer(&self) -> ::xwt::Result<::core::option::Option<&str>> {
                #issuer
            }

            fn subject(&self) -> ::xwt::Result<::core::option::Option<&str>> {
                #subject
            }

            fn audience(&self) -> ::xwt::Result<::xwt::ClaimStrings> {
                #audience
            }

            fn jwt_id(&self) -> ::xwt::Result<::core::option::Option<&str>> {
                #jwt_id
            }

            fn claims_type(&self) -> ::xwt::ClaimsType {
                #claims_type
            }

            fn marshal(&self) -> ::xwt::Result<::std::vec::Vec<u8>> {
                #marshal
            }

            fn unmarshal(&mut self, data: &[u8]) -> ::xwt::Result<()> {
                #unmarshal
            }
        }
    })
}

/// `#[claims(json)]` or `#[claims(protobuf)]` on the struct, JSON when absent
fn struct_codec(input: &DeriveInput) -> syn::Result<Codec> {
    let mut codec = Codec::Json;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("claims")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("json") {
                codec = Codec::Json;
                Ok(())
            } else if meta.path.is_ident("protobuf") {
                codec = Codec::Protobuf;
                Ok(())
            } else {
                Err(meta.error("expected `json` or `protobuf`"))
            }
        })?;
    }
    Ok(codec)
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
