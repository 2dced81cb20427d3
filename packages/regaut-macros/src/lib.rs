use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Attribute, Expr, GenericArgument, Ident, PathArguments, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
};

/// How a field is filled in when its key is missing from the TOML input.
enum Fallback {
    /// `name: Type = default`
    Value(Expr),
    /// `#[section] name: Type`, a nested config table. `Type` must itself be
    /// generated by `config!`.
    Section,
}

struct Setting {
    docs: Vec<Attribute>,
    name: Ident,
    ty: Type,
    fallback: Fallback,
}

impl Setting {
    /// The field type of the partial struct.
    fn partial_type(&self) -> TokenStream2 {
        let ty = &self.ty;
        match &self.fallback {
            Fallback::Section => {
                let partial = section_partial_type(ty);
                quote! { Option<#partial> }
            }
            Fallback::Value(_) if option_inner(ty).is_some() => quote! { #ty },
            Fallback::Value(_) => quote! { Option<#ty> },
        }
    }

    /// The expression that turns `partial.<name>` into the full value.
    fn resolve(&self) -> TokenStream2 {
        let name = &self.name;
        let ty = &self.ty;
        match &self.fallback {
            Fallback::Section => quote! {
                partial.#name.map(<#ty>::from_partial).unwrap_or_default()
            },
            Fallback::Value(default) if option_inner(ty).is_some() => quote! {
                partial.#name.or(#default)
            },
            Fallback::Value(default) => quote! {
                partial.#name.unwrap_or_else(|| #default)
            },
        }
    }

    fn default_value(&self) -> TokenStream2 {
        match &self.fallback {
            Fallback::Section => quote! { Default::default() },
            Fallback::Value(default) => quote! { #default },
        }
    }
}

impl Parse for Setting {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut docs = input.call(Attribute::parse_outer)?;
        let section = docs.iter().any(|a| a.path().is_ident("section"));
        docs.retain(|a| !a.path().is_ident("section"));

        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;

        let fallback = if section {
            Fallback::Section
        } else {
            input.parse::<Token![=]>()?;
            Fallback::Value(input.parse()?)
        };

        Ok(Setting {
            docs,
            name,
            ty,
            fallback,
        })
    }
}

struct ConfigStruct {
    docs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    settings: Punctuated<Setting, Token![,]>,
}

impl Parse for ConfigStruct {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let docs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name = input.parse()?;

        let body;
        syn::braced!(body in input);
        let settings = body.parse_terminated(Setting::parse, Token![,])?;

        Ok(ConfigStruct {
            docs,
            vis,
            name,
            settings,
        })
    }
}

/// `T` if `ty` is spelled `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// `PartialFoo` for a section of type `Foo`.
fn section_partial_type(ty: &Type) -> TokenStream2 {
    match ty {
        Type::Path(path) => match path.path.segments.last() {
            Some(last) => {
                let partial = format_ident!("Partial{}", last.ident);
                quote! { #partial }
            }
            None => quote! { #ty },
        },
        _ => syn::Error::new_spanned(ty, "a section must be a named config type")
            .to_compile_error(),
    }
}

/// Declares a configuration struct that can be read from TOML with every key
/// optional.
///
/// Besides the struct itself this generates a `Partial*` struct used for
/// deserialization, a `Default` impl built from the declared defaults,
/// `get_*` and `with_*` accessors per field and the loaders `from_toml_str`,
/// `from_file` and `from_optional_file`.
///
/// ```ignore
/// config! {
///     /// Settings for the elimination engine.
///     pub struct EliminationConfig {
///         /// Which state to rip next.
///         order: EliminationOrder = EliminationOrder::Heuristic,
///     }
/// }
///
/// config! {
///     pub struct RegautConfig {
///         #[section]
///         elimination: EliminationConfig,
///     }
/// }
/// ```
#[proc_macro]
pub fn config(input: TokenStream) -> TokenStream {
    let ConfigStruct {
        docs,
        vis,
        name,
        settings,
    } = parse_macro_input!(input as ConfigStruct);
    let partial_name = format_ident!("Partial{}", name);

    let names: Vec<_> = settings.iter().map(|s| &s.name).collect();
    let types: Vec<_> = settings.iter().map(|s| &s.ty).collect();
    let field_docs: Vec<_> = settings.iter().map(|s| s.docs.clone()).collect();
    let partial_types: Vec<_> = settings.iter().map(Setting::partial_type).collect();
    let resolved: Vec<_> = settings.iter().map(Setting::resolve).collect();
    let defaults: Vec<_> = settings.iter().map(Setting::default_value).collect();
    let getters: Vec<_> = names.iter().map(|n| format_ident!("get_{}", n)).collect();
    let builders: Vec<_> = names.iter().map(|n| format_ident!("with_{}", n)).collect();

    quote! {
        #( #docs )*
        #[derive(Debug, Clone, serde::Serialize)]
        #vis struct #name {
            #( #( #field_docs )* #names: #types, )*
        }

        #[derive(Debug, Clone, Default, serde::Deserialize)]
        #vis struct #partial_name {
            #( #[serde(default)] #names: #partial_types, )*
        }

        impl Default for #name {
            fn default() -> Self {
                #name {
                    #( #names: #defaults, )*
                }
            }
        }

        impl #name {
            pub fn from_partial(partial: #partial_name) -> Self {
                #name {
                    #( #names: #resolved, )*
                }
            }

            pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
                let partial: #partial_name = toml::from_str(content)?;
                Ok(Self::from_partial(partial))
            }

            pub fn from_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
                Self::from_toml_str(&std::fs::read_to_string(path)?)
            }

            pub fn from_optional_file(
                path: Option<impl AsRef<std::path::Path>>,
            ) -> anyhow::Result<Self> {
                match path {
                    Some(path) => Self::from_file(path),
                    None => Ok(Self::default()),
                }
            }

            #(
                pub fn #getters(&self) -> &#types {
                    &self.#names
                }

                pub fn #builders(mut self, value: #types) -> Self {
                    self.#names = value;
                    self
                }
            )*
        }
    }
    .into()
}
