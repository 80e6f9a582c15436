use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Token, Type,
    Visibility, parse_macro_input,
};

/// Derive `envconf::Spec` for a struct with named fields.
///
/// Every `pub` field becomes one entry of the descriptor, in declaration order.
/// Field options, all optional:
///
/// - `#[envconf(vudou = "NAME")]` (or `override_name = "NAME"`): look the field up
///   as `PREFIX_NAME`, then as plain `NAME`
/// - `#[envconf(default = "literal")]`: used when the environment has no value
/// - `#[envconf(required = "true")]` or `#[envconf(required)]`: fail when no value
///   is found at all
#[proc_macro_derive(EnvConf, attributes(envconf))]
pub fn derive_env_conf(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_spec(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_spec(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "invalid specification must be a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "invalid specification must be a struct",
            ));
        }
    };

    let mut descriptor_fields = Vec::new();
    let mut slot_arms = Vec::new();

    // Only pub fields are settable
    let settable = fields
        .into_iter()
        .filter(|field| matches!(field.vis, Visibility::Public(_)));

    for (index, field) in settable.enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let name = ident.unraw().to_string();
        let attrs = parse_field_attrs(&field.attrs)?;
        let class = classify(&field.ty);

        let kind = class.kind_tokens();
        let type_name = class.type_name(&field.ty);
        let bits = class.bits_tokens().map(|bits| quote!(.bits(#bits)));
        let override_name = attrs
            .override_name
            .as_ref()
            .map(|name| quote!(.override_name(#name)));
        let default_value = attrs
            .default_value
            .as_ref()
            .map(|value| quote!(.default_value(#value)));
        let required = attrs.required;

        descriptor_fields.push(quote! {
            ::envconf::FieldDescriptor::new(#name, #kind)
                #bits
                .type_name(#type_name)
                #override_name
                #default_value
                .required(#required)
        });

        if !matches!(class, TypeClass::Unsupported) {
            slot_arms.push(quote! {
                #index => ::core::option::Option::Some(::envconf::Slot::from(&mut self.#ident)),
            });
        }
    }

    Ok(quote! {
        impl #impl_generics ::envconf::Spec for #struct_name #ty_generics #where_clause {
            fn descriptor() -> ::envconf::RecordDescriptor {
                ::envconf::RecordDescriptor::new()
                    #(.field(#descriptor_fields))*
            }

            #[allow(unused_variables)]
            fn slot(&mut self, index: usize) -> ::core::option::Option<::envconf::Slot<'_>> {
                match index {
                    #(#slot_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

#[derive(Debug, Default)]
struct FieldAttrs {
    override_name: Option<String>,
    default_value: Option<String>,
    required: bool,
}

/// Parse every `#[envconf(...)]` on a field. Later attributes override earlier ones.
fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("envconf")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("vudou") || meta.path.is_ident("override_name") {
                let value: LitStr = meta.value()?.parse()?;
                out.override_name = Some(value.value()).filter(|s| !s.is_empty());
            } else if meta.path.is_ident("default") {
                let value: LitStr = meta.value()?.parse()?;
                out.default_value = Some(value.value()).filter(|s| !s.is_empty());
            } else if meta.path.is_ident("required") {
                // Only the literal "true" turns it on
                out.required = if meta.input.peek(Token![=]) {
                    let value: LitStr = meta.value()?.parse()?;
                    value.value() == "true"
                } else {
                    true
                };
            } else {
                return Err(meta.error(
                    "unsupported envconf attribute, expected `vudou`, `default` or `required`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(out)
}

/// How a declared field type maps onto `envconf::Kind`
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeClass {
    String,
    Integer(&'static str),
    Boolean,
    Float(&'static str),
    StringList,
    Unsupported,
}

impl TypeClass {
    fn kind_tokens(&self) -> TokenStream2 {
        match self {
            TypeClass::String => quote!(::envconf::Kind::String),
            TypeClass::Integer(_) => quote!(::envconf::Kind::Integer),
            TypeClass::Boolean => quote!(::envconf::Kind::Boolean),
            TypeClass::Float(_) => quote!(::envconf::Kind::Float),
            TypeClass::StringList => quote!(::envconf::Kind::StringList),
            TypeClass::Unsupported => quote!(::envconf::Kind::Unsupported),
        }
    }

    fn bits_tokens(&self) -> Option<TokenStream2> {
        match self {
            TypeClass::Integer("isize") => Some(quote!(::core::primitive::isize::BITS)),
            TypeClass::Integer(prim) | TypeClass::Float(prim) => {
                let bits: u32 = prim[1..].parse().ok()?;
                Some(quote!(#bits))
            }
            _ => None,
        }
    }

    fn type_name(&self, ty: &Type) -> String {
        match self {
            TypeClass::String => "String".to_string(),
            TypeClass::Integer(prim) | TypeClass::Float(prim) => prim.to_string(),
            TypeClass::Boolean => "bool".to_string(),
            TypeClass::StringList => "Vec<String>".to_string(),
            TypeClass::Unsupported => ty.to_token_stream().to_string().replace(' ', ""),
        }
    }
}

/// Recognise a field type by the last segment of its path
fn classify(ty: &Type) -> TypeClass {
    let segment = match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            match type_path.path.segments.last() {
                Some(segment) => segment,
                None => return TypeClass::Unsupported,
            }
        }
        _ => return TypeClass::Unsupported,
    };

    let no_args = matches!(segment.arguments, PathArguments::None);
    match segment.ident.to_string().as_str() {
        "String" if no_args => TypeClass::String,
        "i8" if no_args => TypeClass::Integer("i8"),
        "i16" if no_args => TypeClass::Integer("i16"),
        "i32" if no_args => TypeClass::Integer("i32"),
        "i64" if no_args => TypeClass::Integer("i64"),
        "isize" if no_args => TypeClass::Integer("isize"),
        "bool" if no_args => TypeClass::Boolean,
        "f32" if no_args => TypeClass::Float("f32"),
        "f64" if no_args => TypeClass::Float("f64"),
        "Vec" => match vec_element(&segment.arguments) {
            Some(inner) if classify(inner) == TypeClass::String => TypeClass::StringList,
            _ => TypeClass::Unsupported,
        },
        _ => TypeClass::Unsupported,
    }
}

fn vec_element(arguments: &PathArguments) -> Option<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}
