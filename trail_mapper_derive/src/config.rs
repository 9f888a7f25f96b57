use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, GenericArgument, LitStr, PathArguments, Type};

/// How a configuration value gets assigned onto a struct field
enum ParamKind<'a> {
    String,
    OptionalString,
    Bool,
    Float(&'a Type),
    Integer(&'a Type),
}

impl ParamKind<'_> {
    fn getter(&self) -> proc_macro2::Ident {
        let name = match self {
            ParamKind::String | ParamKind::OptionalString => "get_parameter_as_string",
            ParamKind::Bool => "get_parameter_as_bool",
            ParamKind::Float(_) => "get_parameter_as_f64",
            ParamKind::Integer(_) => "get_parameter_as_i64",
        };
        format_ident!("{}", name)
    }
}

/// Options parsed from a `#[service_config(...)]` attribute
#[derive(Default)]
struct FieldOptions {
    skip: bool,
    rename: Option<String>,
}

pub fn expand_derive_from_service_config(
    input: &DeriveInput,
) -> Result<TokenStream, Vec<syn::Error>> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(vec![syn::Error::new(
                    input.span(),
                    "FromServiceConfig requires a struct with named fields",
                )])
            }
        },
        _ => {
            return Err(vec![syn::Error::new(
                input.span(),
                "FromServiceConfig can only be derived for structs",
            )])
        }
    };

    let mut errors = Vec::new();
    let mut setters = Vec::new();
    for field in fields {
        match field_options(field).and_then(|opts| generate_setter(field, opts)) {
            Ok(Some(setter)) => setters.push(setter),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(quote! {
        impl crate::config::FromServiceConfig for #name {
            #[allow(unused_mut)]
            fn from_config(
                config: &crate::config::ServiceConfig,
            ) -> ::std::result::Result<Self, crate::Error> {
                let mut base = Self::default();
                for key in config.parameters() {
                    match key.as_str() {
                        #(#setters)*
                        _ => log::warn!(
                            "unknown configuration parameter for {}: {}={:?}",
                            stringify!(#name),
                            key,
                            config.get_parameter(key)
                        ),
                    }
                }
                Ok(base)
            }
        }
    })
}

fn field_options(field: &Field) -> Result<FieldOptions, syn::Error> {
    let mut opts = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("service_config") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                opts.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                opts.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }
    Ok(opts)
}

fn generate_setter(field: &Field, opts: FieldOptions) -> Result<Option<TokenStream>, syn::Error> {
    if opts.skip {
        return Ok(None);
    }
    let ident = match field.ident.as_ref() {
        Some(ident) => ident,
        None => return Err(syn::Error::new(field.span(), "expected a named field")),
    };
    let key = opts.rename.unwrap_or_else(|| ident.to_string());
    let kind = param_kind(&field.ty)?;
    let get_fn = kind.getter();

    let assignment = match kind {
        ParamKind::String | ParamKind::Bool => {
            quote_spanned! { field.span() => base.#ident = val? }
        }
        ParamKind::OptionalString => {
            quote_spanned! { field.span() => base.#ident = Some(val?) }
        }
        ParamKind::Float(ty) | ParamKind::Integer(ty) => {
            quote_spanned! { field.span() => base.#ident = val? as #ty }
        }
    };

    Ok(Some(quote_spanned! { field.span() =>
        #key => {
            if let Some(val) = config.#get_fn(#key) {
                #assignment
            }
        }
    }))
}

fn param_kind(ty: &Type) -> Result<ParamKind<'_>, syn::Error> {
    let path = match ty {
        Type::Path(p) if p.qself.is_none() => &p.path,
        _ => return Err(unsupported(ty)),
    };
    let segment = match path.segments.last() {
        Some(segment) => segment,
        None => return Err(unsupported(ty)),
    };
    let kind = match segment.ident.to_string().as_str() {
        "String" => ParamKind::String,
        "bool" => ParamKind::Bool,
        "f32" | "f64" => ParamKind::Float(ty),
        "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64" | "isize" => {
            ParamKind::Integer(ty)
        }
        "Option" if is_option_of_string(&segment.arguments) => ParamKind::OptionalString,
        _ => return Err(unsupported(ty)),
    };
    Ok(kind)
}

fn is_option_of_string(args: &PathArguments) -> bool {
    if let PathArguments::AngleBracketed(args) = args {
        if let Some(GenericArgument::Type(Type::Path(inner))) = args.args.first() {
            return inner.path.is_ident("String");
        }
    }
    false
}

fn unsupported(ty: &Type) -> syn::Error {
    syn::Error::new(
        ty.span(),
        format!(
            "FromServiceConfig doesn't support fields of type `{}`",
            quote!(#ty)
        ),
    )
}
