//! Parsing logic for cpu_kernel attribute arguments.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Ident, ItemFn, LitStr, Path, Token,
};

/// Arguments as written in the attribute; `op` is not required yet.
pub(crate) struct AttributeArgs {
    op: Option<Path>,
    name: Option<Ident>,
}

/// Arguments to the cpu_kernel attribute
pub(crate) struct CpuKernelArgs {
    /// Operation the kernel implements
    pub(crate) op: Path,
    /// Override for the generated kernel type name
    pub(crate) name: Option<Ident>,
}

/// Individual argument parsed from the attribute
enum KernelArg {
    Op(Path),
    Name(Ident),
}

impl Parse for AttributeArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut op = None;
        let mut name = None;

        let args = Punctuated::<KernelArg, Token![,]>::parse_terminated(input)?;
        for arg in args {
            match arg {
                KernelArg::Op(path) => op = Some(path),
                KernelArg::Name(ident) => name = Some(ident),
            }
        }

        Ok(AttributeArgs { op, name })
    }
}

impl AttributeArgs {
    /// Require `op`; its absence is reported on the function name.
    pub(crate) fn for_function(self, func: &ItemFn) -> syn::Result<CpuKernelArgs> {
        let op = self.op.ok_or_else(|| {
            syn::Error::new_spanned(
                &func.sig.ident,
                "missing `op = <operation type>` argument to #[cpu_kernel]",
            )
        })?;
        Ok(CpuKernelArgs {
            op,
            name: self.name,
        })
    }
}

impl Parse for KernelArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident: Ident = input.parse()?;
        match ident.to_string().as_str() {
            "op" => {
                input.parse::<Token![=]>()?;
                Ok(KernelArg::Op(input.parse()?))
            }
            "name" => {
                input.parse::<Token![=]>()?;
                let lit: LitStr = input.parse()?;
                let name = syn::parse_str::<Ident>(&lit.value()).map_err(|_| {
                    syn::Error::new(lit.span(), "`name` must be a valid type identifier")
                })?;
                Ok(KernelArg::Name(Ident::new(&name.to_string(), lit.span())))
            }
            other => Err(syn::Error::new(
                ident.span(),
                format!("unknown argument `{other}`; expected `op` or `name`"),
            )),
        }
    }
}
