use heck::ToUpperCamelCase;
use quote::format_ident;
use syn::Ident;

/// Extension trait for `Ident` to simplify common naming transformations.
pub(crate) trait IdentExt {
    /// Returns a new identifier in `UpperCamelCase`.
    fn upper_camel_case(&self) -> Ident;
}

impl IdentExt for Ident {
    fn upper_camel_case(&self) -> Ident {
        format_ident!("{}", self.to_string().to_upper_camel_case())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident {
        format_ident!("{}", name)
    }

    #[test]
    fn upper_camel_case_works() {
        assert_eq!(ident("w_column").upper_camel_case(), ident("WColumn"));
        assert_eq!(ident("calc_Ucoef").upper_camel_case(), ident("CalcUcoef"));
        assert_eq!(
            ident("calc_Diffcoef20").upper_camel_case(),
            ident("CalcDiffcoef20")
        );
        assert_eq!(ident("MuLiq").upper_camel_case(), ident("MuLiq"));
    }
}
