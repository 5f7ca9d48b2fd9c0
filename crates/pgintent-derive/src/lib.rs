//! Derive macro describing entity properties for `pgintent-core`.
//!
//! `#[derive(Entity)]` lists a struct's fields as entity properties together
//! with their value kind, so the convention resolver can derive a schema
//! without runtime reflection.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta, Type, parse_macro_input};

/// Derives `pgintent_core::schema::Entity` for a struct with named fields.
///
/// # Attributes
///
/// - `#[entity(name = "TypeName")]` - Overrides the type name the table name
///   is derived from (optional, defaults to the struct name)
///
/// # Field Attributes
///
/// - `#[property(rename = "Name")]` - Overrides the property name (optional,
///   defaults to the PascalCase field name)
/// - `#[property(skip)]` - Leaves the field out of the entity
///
/// Every other field must implement `SqlType`, `ToSqlValue` and `Clone`.
///
/// # Example
///
/// ```ignore
/// use pgintent_derive::Entity;
///
/// #[derive(Entity)]
/// struct FooEntity {
///     id: uuid::Uuid,
///     template_key: String,
///     #[property(skip)]
///     cached: bool,
/// }
///
/// // FooEntity::properties() == [Id: Uuid, TemplateKey: Text]
/// ```
#[proc_macro_derive(Entity, attributes(entity, property))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Entity derive does not support generic structs",
        ));
    }
    let type_name = get_type_name(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut properties: Vec<PropertyField> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let attrs = parse_property_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        properties.push(PropertyField {
            field_name: field_name.clone(),
            field_type: field.ty.clone(),
            property_name: attrs
                .rename
                .unwrap_or_else(|| to_pascal_case(&field_name.to_string())),
        });
    }

    let property_infos = properties.iter().map(|p| {
        let name = &p.property_name;
        let ty = &p.field_type;
        quote! {
            ::pgintent_core::schema::PropertyInfo::new(
                #name,
                <#ty as ::pgintent_core::SqlType>::KIND,
            )
        }
    });

    let values = properties.iter().map(|p| {
        let name = &p.property_name;
        let field = &p.field_name;
        quote! {
            .with(#name, ::core::clone::Clone::clone(&self.#field))
        }
    });

    Ok(quote! {
        impl ::pgintent_core::schema::Entity for #struct_name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn properties() -> &'static [::pgintent_core::schema::PropertyInfo] {
                const PROPERTIES: &[::pgintent_core::schema::PropertyInfo] = &[
                    #(#property_infos),*
                ];
                PROPERTIES
            }

            fn values(&self) -> ::pgintent_core::schema::EntityValues {
                ::pgintent_core::schema::EntityValues::new()
                    #(#values)*
            }
        }
    })
}

struct PropertyField {
    field_name: Ident,
    field_type: Type,
    property_name: String,
}

#[derive(Default)]
struct PropertyAttrs {
    rename: Option<String>,
    skip: bool,
}

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn get_type_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    let mut type_name = None;
    for attr in attrs {
        if attr.path().is_ident("entity") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    type_name = Some(string_value(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("unknown entity attribute"))
                }
            })?;
        }
    }
    Ok(type_name.unwrap_or_else(|| struct_name.to_string()))
}

fn parse_property_attrs(attrs: &[Attribute]) -> syn::Result<PropertyAttrs> {
    let mut result = PropertyAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("property") {
            // #[property] alone changes nothing
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("rename") {
                    result.rename = Some(string_value(&meta)?);
                } else {
                    return Err(meta.error("unknown property attribute"));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
