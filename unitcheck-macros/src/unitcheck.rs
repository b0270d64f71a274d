use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{
    Error, Expr, ExprLit, FnArg, GenericArgument, Ident, ItemFn, Lit, LitStr, MetaNameValue, Pat,
    PathArguments, Result, ReturnType, Token, Type, parse::Parser, punctuated::Punctuated,
};

use crate::utils::IdentExt;

/// The attribute key naming the result unit.
const RESULT_KEY: &str = "res_unit";

#[derive(Debug)]
pub(crate) struct Parsed {
    item: ItemFn,
    parameters: Vec<Ident>,
    contract: Vec<(Ident, LitStr)>,
    result_unit: LitStr,
    error_type: Option<Type>,
}

impl Parsed {
    /// Parses the attribute arguments and the function they decorate.
    ///
    /// Every configuration problem becomes a compile error here, so a contract
    /// that reaches code generation is known to be valid.
    pub(crate) fn new(attr: TokenStream, item: TokenStream) -> Result<Self> {
        let item: ItemFn = syn::parse2(item)?;
        let parameters = parse_parameters(&item)?;
        let error_type = parse_return(&item)?;

        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(attr)?;

        let mut contract: Vec<(Ident, LitStr)> = Vec::new();
        let mut result_unit = None;

        for pair in pairs {
            let Some(key) = pair.path.get_ident().cloned() else {
                return Err(Error::new_spanned(
                    &pair.path,
                    "Expected a parameter name, e.g. `L = \"kg/s\"`.",
                ));
            };
            let unit = parse_unit(&key, &pair.value)?;

            if key == RESULT_KEY {
                if result_unit.replace(unit).is_some() {
                    return Err(Error::new_spanned(key, "`res_unit` is declared more than once."));
                }
                continue;
            }

            if contract.iter().any(|(existing, _)| *existing == key) {
                return Err(Error::new_spanned(
                    &key,
                    format!("Parameter `{key}` is declared more than once."),
                ));
            }

            if !parameters.contains(&key) {
                let fn_name = &item.sig.ident;
                return Err(Error::new_spanned(
                    &key,
                    format!("`{key}` is not a parameter of `{fn_name}`."),
                ));
            }

            contract.push((key, unit));
        }

        let Some(result_unit) = result_unit else {
            return Err(Error::new_spanned(
                &item.sig.ident,
                "Missing result unit. Add `res_unit = \"...\"` to the attribute.",
            ));
        };

        if contract.is_empty() {
            return Err(Error::new_spanned(
                &item.sig.ident,
                "At least one parameter unit is required, e.g. `L = \"kg/s\"`.",
            ));
        }

        Ok(Self {
            item,
            parameters,
            contract,
            result_unit,
            error_type,
        })
    }

    /// Generates the full token stream for the macro expansion.
    pub(crate) fn expand(self) -> TokenStream {
        let formula_struct = self.generate_formula_struct();
        let formula_impl = self.generate_formula_impl();
        let item = &self.item;

        quote! {
            #item
            #formula_struct
            #formula_impl
        }
    }

    /// Generates the formula type and its `checked()` constructor.
    fn generate_formula_struct(&self) -> TokenStream {
        let vis = &self.item.vis;
        let fn_name = &self.item.sig.ident;
        let struct_name = fn_name.upper_camel_case();
        let doc = format!(" Unit-checked form of [`{fn_name}`].");

        let names = self.parameters.iter().map(Ident::to_string);
        let units = self.contract.iter().map(|(key, unit)| {
            let key = key.to_string();
            quote! { (#key, #unit) }
        });
        let result_unit = &self.result_unit;

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            #vis struct #struct_name;

            impl #struct_name {
                /// Parameter names, in call order.
                pub const PARAMETERS: &'static [&'static str] = &[#(#names),*];

                /// Declared parameter units.
                pub const PARAMETER_UNITS: &'static [(&'static str, &'static str)] = &[#(#units),*];

                /// Declared result unit.
                pub const RESULT_UNIT: &'static str = #result_unit;

                /// Returns this formula paired with its unit contract.
                #[must_use]
                pub fn checked() -> ::unitcheck_core::Checked<Self> {
                    ::unitcheck_core::Checked::__declared(
                        Self,
                        Self::PARAMETER_UNITS,
                        Self::RESULT_UNIT,
                    )
                }
            }
        }
    }

    /// Generates the `Formula` implementation that forwards to the function.
    fn generate_formula_impl(&self) -> TokenStream {
        let fn_name = &self.item.sig.ident;
        let struct_name = fn_name.upper_camel_case();

        let indices = (0..self.parameters.len()).map(Literal::usize_unsuffixed);

        let (error_type, body) = match &self.error_type {
            Some(error_type) => (
                quote! { #error_type },
                quote! { #fn_name(#(__values[#indices]),*) },
            ),
            None => (
                quote! { ::core::convert::Infallible },
                quote! { ::core::result::Result::Ok(#fn_name(#(__values[#indices]),*)) },
            ),
        };

        quote! {
            impl ::unitcheck_core::Formula for #struct_name {
                type Error = #error_type;

                fn parameters(&self) -> &[&'static str] {
                    Self::PARAMETERS
                }

                fn compute(&self, __values: &[f64]) -> ::core::result::Result<f64, Self::Error> {
                    #body
                }
            }
        }
    }
}

/// Extracts the parameter names, requiring a plain `f64` function.
fn parse_parameters(item: &ItemFn) -> Result<Vec<Ident>> {
    let sig = &item.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(Error::new_spanned(
            asyncness,
            "Async functions are not supported. Formulas must be plain functions.",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &sig.generics,
            "Generic parameters are not allowed. Remove them to use this macro.",
        ));
    }

    if let Some(variadic) = &sig.variadic {
        return Err(Error::new_spanned(variadic, "Variadic functions are not supported."));
    }

    sig.inputs
        .iter()
        .map(|input| match input {
            FnArg::Receiver(receiver) => Err(Error::new_spanned(
                receiver,
                "Methods are not supported. Formulas must be free functions.",
            )),
            FnArg::Typed(pat_type) => {
                let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
                    return Err(Error::new_spanned(
                        &pat_type.pat,
                        "Parameters must be plain identifiers.",
                    ));
                };
                if !is_f64(&pat_type.ty) {
                    return Err(Error::new_spanned(
                        &pat_type.ty,
                        "Formula parameters must be `f64`.",
                    ));
                }
                Ok(pat_ident.ident.clone())
            }
        })
        .collect()
}

/// Returns the error type for `Result<f64, E>` or `None` for plain `f64`.
fn parse_return(item: &ItemFn) -> Result<Option<Type>> {
    let unsupported = |span: &dyn quote::ToTokens| {
        Error::new_spanned(span, "Formulas must return `f64` or `Result<f64, E>`.")
    };

    let ReturnType::Type(_, ty) = &item.sig.output else {
        return Err(unsupported(&item.sig.ident));
    };

    if is_f64(ty) {
        return Ok(None);
    }

    let Type::Path(type_path) = ty.as_ref() else {
        return Err(unsupported(ty));
    };
    let Some(last) = type_path.path.segments.last() else {
        return Err(unsupported(ty));
    };
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return Err(unsupported(ty));
    };

    match (last.ident == "Result", args.args.len(), args.args.first(), args.args.last()) {
        (true, 2, Some(GenericArgument::Type(ok)), Some(GenericArgument::Type(err)))
            if is_f64(ok) =>
        {
            Ok(Some(err.clone()))
        }
        _ => Err(unsupported(ty)),
    }
}

/// Reads a non-empty string literal unit label.
fn parse_unit(key: &Ident, value: &Expr) -> Result<LitStr> {
    let Expr::Lit(ExprLit {
        lit: Lit::Str(unit),
        ..
    }) = value
    else {
        return Err(Error::new_spanned(
            value,
            format!("The unit for `{key}` must be a string literal."),
        ));
    };

    if unit.value().trim().is_empty() {
        return Err(Error::new_spanned(
            unit,
            format!("The unit for `{key}` must not be empty."),
        ));
    }

    Ok(unit.clone())
}

fn is_f64(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Path(type_path) if type_path.qself.is_none() && type_path.path.is_ident("f64")
    )
}
