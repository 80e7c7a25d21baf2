mod fallback_enum;

use fallback_enum::fallback_enum_impl;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro binding a unit-only enum to a canonical table, implementing
/// `fallback_enum::FallbackEnum` for it.
///
/// Container attributes, all optional:
/// - `repr`: `"str"`, `"int"`, `"float"` or `"opaque"` (default).
/// - `unknown_name`: name of the pseudo-members, `"UNKNOWN"` by default.
/// - `type_casting`: whether unknown values get cast before giving up, `true` by default.
/// - `casting_type`: `"str"`, `"int"` or `"float"`; inferred from `repr` when missing.
///
/// Variant attributes:
/// - `value`: the canonical value, as a JSON literal. Defaults to the variant name
///   for `"str"` enums and is required otherwise.
/// - `name`: the member name, the variant identifier by default.
///
/// ``` ignore
/// use fallback_enum::FallbackEnum;
///
/// #[derive(Clone, Copy, Debug, PartialEq, FallbackEnum)]
/// #[fallback(repr = "int", unknown_name = "MISSING")]
/// enum UserStatus {
///     #[fallback(value = 1, name = "ACTIVE")]
///     Active,
///     #[fallback(value = 2, name = "INACTIVE")]
///     Inactive,
/// }
/// ```
#[proc_macro_derive(FallbackEnum, attributes(fallback))]
pub fn fallback_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    fallback_enum_impl(&input)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}
