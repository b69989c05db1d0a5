use proc_macro::TokenStream as TokenStream1;
use quote::ToTokens;
use syn;

/// This macro is added before a method of the `Simulator` struct in the impl
/// block. Use this macro to first check if the current round phase is exactly
/// the phase in the attribute.
///
/// For example, `#[allowed_phase(Deal)]` will make a method first check if
/// the current round phase is `Deal`. If not, the method will return a
/// `WrongPhase` error.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast: syn::ImplItemFn = syn::parse(item).unwrap();
    let phase = attr.to_string();
    let method = ast.sig.ident.to_string();
    let code = format!(
        r#"
    if self.phase != RoundPhase::{} {{
        return Err(SimError::WrongPhase {{
            method: "{}",
            phase: "{}",
        }});
    }}
"#,
        phase, method, phase
    );
    let guard: TokenStream1 = code.parse().unwrap();
    let guard: syn::Stmt = syn::parse(guard).unwrap();
    ast.block.stmts.insert(0, guard);
    ast.into_token_stream().into()
}
