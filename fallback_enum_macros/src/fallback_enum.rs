use std::collections::HashMap;

use darling::{ast::Data, util::Ignored, Error, FromDeriveInput, FromMeta, FromVariant, Result};
use proc_macro2::{Literal, TokenStream};
use quote::{quote, ToTokens};
use syn::{DeriveInput, Expr, ExprLit, ExprUnary, Generics, Ident, Lit, LitStr, UnOp};

const REPRS: &str = r#""str", "int", "float" or "opaque""#;
const CAST_TYPES: &str = r#""str", "int" or "float""#;

#[derive(FromDeriveInput)]
#[darling(attributes(fallback), supports(enum_unit))]
struct FallbackEnumInput {
    ident: Ident,
    generics: Generics,
    data: Data<FallbackVariant, Ignored>,
    #[darling(default)]
    repr: Option<LitStr>,
    #[darling(default)]
    unknown_name: Option<LitStr>,
    #[darling(default)]
    type_casting: Option<bool>,
    #[darling(default)]
    casting_type: Option<LitStr>,
}

#[derive(FromVariant)]
#[darling(attributes(fallback))]
struct FallbackVariant {
    ident: Ident,
    #[darling(default)]
    value: Option<ValueExpr>,
    #[darling(default)]
    name: Option<LitStr>,
}

/// A `value = ..` expression taken as written.
///
/// darling parses the contents of string literals into expressions for
/// `syn::Expr`, which would turn `"1"` into `1`.
struct ValueExpr(Expr);

impl FromMeta for ValueExpr {
    fn from_expr(expr: &Expr) -> Result<Self> {
        Ok(Self(expr.clone()))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Repr {
    Str,
    Int,
    Float,
    Opaque,
}

impl Repr {
    fn variant(self) -> Ident {
        let name = match self {
            Self::Str => "Str",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Opaque => "Opaque",
        };

        Ident::new(name, proc_macro2::Span::call_site())
    }

    /// Whether a literal of `kind` is a valid value for the representation.
    fn accepts(self, kind: LitKind) -> bool {
        match self {
            Self::Str => kind == LitKind::Str,
            Self::Int => kind == LitKind::Int,
            Self::Float => matches!(kind, LitKind::Int | LitKind::Float),
            Self::Opaque => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum LitKind {
    Str,
    Int,
    Float,
    Other,
}

/// Kind of a literal expression, looking through negations, groups and parentheses.
fn literal_kind(expr: &Expr) -> LitKind {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(_) => LitKind::Str,
            Lit::Int(_) => LitKind::Int,
            Lit::Float(_) => LitKind::Float,
            _ => LitKind::Other,
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match literal_kind(expr) {
            kind @ (LitKind::Int | LitKind::Float) => kind,
            _ => LitKind::Other,
        },
        Expr::Group(group) => literal_kind(&group.expr),
        Expr::Paren(paren) => literal_kind(&paren.expr),
        _ => LitKind::Other,
    }
}

/// Key under which two canonical values collide.
///
/// Numbers compare by value, so `1`, `0x1` and `1.0` share a key. Other
/// expressions fall back to their token text.
fn value_key(expr: &Expr) -> String {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => format!("{:?}", s.value()),
        Expr::Group(group) => value_key(&group.expr),
        Expr::Paren(paren) => value_key(&paren.expr),
        _ => numeric_value(expr).map_or_else(|| expr.to_token_stream().to_string(), number_key),
    }
}

enum Number {
    Int(i128),
    Float(f64),
}

fn numeric_value(expr: &Expr) -> Option<Number> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse().ok().map(Number::Int),
        Expr::Lit(ExprLit {
            lit: Lit::Float(lit),
            ..
        }) => lit.base10_parse().ok().map(Number::Float),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match numeric_value(expr)? {
            Number::Int(i) => Some(Number::Int(-i)),
            Number::Float(f) => Some(Number::Float(-f)),
        },
        Expr::Group(group) => numeric_value(&group.expr),
        Expr::Paren(paren) => numeric_value(&paren.expr),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn number_key(number: Number) -> String {
    match number {
        Number::Int(i) => i.to_string(),
        Number::Float(f) if f.fract() == 0.0 && f.abs() < 1e38 => (f as i128).to_string(),
        Number::Float(f) => format!("{f:?}"),
    }
}

fn parse_repr(lit: &LitStr) -> Result<Repr> {
    match lit.value().as_str() {
        "str" => Ok(Repr::Str),
        "int" => Ok(Repr::Int),
        "float" => Ok(Repr::Float),
        "opaque" => Ok(Repr::Opaque),
        _ => Err(Error::custom(format!("expecting {REPRS}")).with_span(lit)),
    }
}

fn parse_cast_type(lit: &LitStr) -> Result<Ident> {
    let name = match lit.value().as_str() {
        "str" => "Str",
        "int" => "Int",
        "float" => "Float",
        _ => return Err(Error::custom(format!("expecting {CAST_TYPES}")).with_span(lit)),
    };

    Ok(Ident::new(name, lit.span()))
}

pub fn fallback_enum_impl(input: &DeriveInput) -> Result<TokenStream> {
    let input = FallbackEnumInput::from_derive_input(input)?;
    let mut errors = Error::accumulator();

    if !input.generics.params.is_empty() {
        errors.push(Error::custom("generic enums are not supported").with_span(&input.generics));
    }

    let repr = match &input.repr {
        Some(lit) => errors.handle(parse_repr(lit)).unwrap_or(Repr::Opaque),
        None => Repr::Opaque,
    };

    let casting_type = input
        .casting_type
        .as_ref()
        .and_then(|lit| errors.handle(parse_cast_type(lit)));

    // `supports(enum_unit)` already rejected anything else
    let variants = input.data.take_enum().unwrap_or_default();

    if variants.is_empty() {
        errors.push(Error::custom("enum must have at least one variant").with_span(&input.ident));
    }

    let mut idents = Vec::with_capacity(variants.len());
    let mut names = Vec::with_capacity(variants.len());
    let mut values = Vec::with_capacity(variants.len());
    let mut seen_names: HashMap<String, Ident> = HashMap::new();
    let mut seen_values: HashMap<String, Ident> = HashMap::new();

    for variant in variants {
        let name = variant
            .name
            .as_ref()
            .map_or_else(|| variant.ident.to_string(), LitStr::value);

        if let Some(other) = seen_names.get(&name) {
            let error = Error::custom(format!("name `{name}` is already used by `{other}`"));
            errors.push(match &variant.name {
                Some(lit) => error.with_span(lit),
                None => error.with_span(&variant.ident),
            });
        } else {
            seen_names.insert(name.clone(), variant.ident.clone());
        }

        let value = match (variant.value, repr) {
            (Some(ValueExpr(value)), _) => value,
            (None, Repr::Str) => {
                let lit = LitStr::new(&variant.ident.to_string(), variant.ident.span());
                syn::parse_quote!(#lit)
            }
            (None, _) => {
                errors.push(
                    Error::custom("missing `value`, e.g. #[fallback(value = 1)]")
                        .with_span(&variant.ident),
                );
                continue;
            }
        };

        if !repr.accepts(literal_kind(&value)) {
            errors.push(
                Error::custom("value is not a literal matching the enum `repr`").with_span(&value),
            );
        }

        let key = value_key(&value);
        if let Some(other) = seen_values.get(&key) {
            let written = value.to_token_stream().to_string();
            errors.push(
                Error::custom(format!("value `{written}` is already used by `{other}`"))
                    .with_span(&value),
            );
        } else {
            seen_values.insert(key, variant.ident.clone());
        }

        idents.push(variant.ident);
        names.push(name);
        values.push(value);
    }

    errors.finish()?;

    let ident = &input.ident;
    let enum_name = ident.to_string();
    let repr = repr.variant();
    let indices: Vec<_> = (0..idents.len()).map(Literal::usize_unsuffixed).collect();

    let mut overrides = Vec::new();
    if let Some(enable) = input.type_casting {
        overrides.push(quote! { enable_type_casting: #enable });
    }
    if let Some(cast) = casting_type {
        overrides.push(quote! {
            casting_type: ::std::option::Option::Some(::fallback_enum::CastType::#cast)
        });
    }
    if let Some(unknown_name) = &input.unknown_name {
        overrides.push(quote! { unknown_name: ::std::string::String::from(#unknown_name) });
    }

    let with_config = if overrides.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            .with_config(::fallback_enum::ResolveConfig {
                #(#overrides,)*
                ..::std::default::Default::default()
            })
        }
    };

    let expanded = quote! {
        impl ::fallback_enum::FallbackEnum for #ident {
            fn descriptor() -> &'static ::fallback_enum::EnumDescriptor {
                ::fallback_enum::__private::lazy_static! {
                    static ref DESCRIPTOR: ::fallback_enum::EnumDescriptor =
                        ::fallback_enum::EnumDescriptor::new(
                            #enum_name,
                            ::fallback_enum::Repr::#repr,
                            [#((#names, ::fallback_enum::__private::serde_json::json!(#values))),*],
                        )
                        #with_config;
                }

                &DESCRIPTOR
            }

            fn from_index(index: usize) -> ::std::option::Option<Self> {
                match index {
                    #(#indices => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn index(self) -> usize {
                match self {
                    #(Self::#idents => #indices,)*
                }
            }
        }
    };

    Ok(expanded)
}
