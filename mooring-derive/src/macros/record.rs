//! Derive macro for the `Record` trait
//!
//! Generates the static attribute list, the naming overrides and name-keyed
//! `get`/`set` accessors. Declared types and nullability come from each field's
//! `ColumnValue` implementation, so unsupported field types fail to compile
//! unless the field is cargo.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

use crate::attributes;

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(syn::DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let type_name = struct_name.to_string();
    let entity_name = option_str(attributes::extract_table_name(&input.attrs));
    let primary_key_name = option_str(attributes::extract_primary_key_name(&input.attrs));
    let primary_key_not_identity = attributes::has_marker(&input.attrs, "primary_key_not_identity");

    let mut defs = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let parsed = attributes::parse_field_attributes(field, ident);
        let name = parsed.name.as_str();

        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("attribute name {name} is used twice (names are case-insensitive)"),
            ));
        }
        seen.push(parsed.name.clone());

        if parsed.is_cargo() {
            let writable = !parsed.read_only;
            defs.push(quote! {
                ::mooring::AttributeDef {
                    name: #name,
                    column_type: ::mooring::ColumnType::Object,
                    nullable: false,
                    writable: #writable,
                }
            });
            set_arms.push(quote! {
                #name => ::core::result::Result::Err(::mooring::MappingError::ReadOnlyAttribute {
                    attribute: ::std::string::String::from(#name),
                }),
            });
            continue;
        }

        defs.push(quote! {
            ::mooring::AttributeDef {
                name: #name,
                column_type: <#ty as ::mooring::ColumnValue>::COLUMN_TYPE,
                nullable: <#ty as ::mooring::ColumnValue>::NULLABLE,
                writable: true,
            }
        });
        get_arms.push(quote! {
            #name => ::core::option::Option::Some(::mooring::ColumnValue::into_value(
                ::core::clone::Clone::clone(&self.#ident),
            )),
        });
        set_arms.push(quote! {
            #name => {
                self.#ident = <#ty as ::mooring::ColumnValue>::from_value(value).map_err(|rejected| {
                    ::mooring::MappingError::type_mismatch(
                        #name,
                        <#ty as ::mooring::ColumnValue>::COLUMN_TYPE,
                        rejected.column_type(),
                    )
                })?;
                ::core::result::Result::Ok(())
            }
        });
    }

    Ok(quote! {
        impl ::mooring::Record for #struct_name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn attributes() -> &'static [::mooring::AttributeDef] {
                const ATTRIBUTES: &[::mooring::AttributeDef] = &[#(#defs),*];
                ATTRIBUTES
            }

            fn overrides() -> ::mooring::RecordOverrides {
                ::mooring::RecordOverrides {
                    entity_name: #entity_name,
                    primary_key_name: #primary_key_name,
                    primary_key_not_identity: #primary_key_not_identity,
                }
            }

            fn get(&self, name: &str) -> ::core::option::Option<::mooring::Value> {
                match name {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set(
                &mut self,
                name: &str,
                value: ::mooring::Value,
            ) -> ::core::result::Result<(), ::mooring::MappingError> {
                let _ = &value;
                match name {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(::mooring::MappingError::unknown_attribute(#type_name, name)),
                }
            }
        }
    })
}

fn option_str(value: Option<String>) -> TokenStream2 {
    match value {
        Some(s) => quote!(::core::option::Option::Some(#s)),
        None => quote!(::core::option::Option::None),
    }
}
