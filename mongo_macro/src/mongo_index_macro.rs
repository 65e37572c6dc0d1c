use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Attribute, DeriveInput, LitStr, Token};

/// 单条 `#[mongo_index(...)]` 声明
struct IndexSpec {
    fields: Vec<String>,
    unique: bool,
    order: i32,
    name: Option<String>,
}

impl IndexSpec {
    fn parse(attr: &Attribute) -> syn::Result<Self> {
        let mut spec = IndexSpec { fields: vec![], unique: false, order: 1, name: None };
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("fields") {
                let content;
                syn::bracketed!(content in meta.input);
                let list = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                spec.fields = list.into_iter().map(|lit| lit.value()).collect();
            } else if meta.path.is_ident("unique") {
                spec.unique = true;
            } else if meta.path.is_ident("order") {
                let content;
                syn::parenthesized!(content in meta.input);
                let lit: LitStr = content.parse()?;
                if lit.value().eq_ignore_ascii_case("desc") {
                    spec.order = -1;
                }
            } else if meta.path.is_ident("name") {
                let content;
                syn::parenthesized!(content in meta.input);
                let lit: LitStr = content.parse()?;
                spec.name = Some(lit.value());
            } else {
                return Err(meta.error("unsupported mongo_index property"));
            }
            Ok(())
        })?;
        if spec.fields.is_empty() {
            return Err(syn::Error::new_spanned(attr, "mongo_index requires fields[..]"));
        }
        Ok(spec)
    }

    /// 未指定名称时与 MongoDB 默认命名一致，例如 `email_1`
    fn index_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .fields
                .iter()
                .map(|field| format!("{}_{}", field, self.order))
                .collect::<Vec<_>>()
                .join("_"),
        }
    }

    fn to_model(&self) -> proc_macro2::TokenStream {
        let fields = &self.fields;
        let orders = std::iter::repeat(self.order).take(fields.len());
        let unique = self.unique;
        let name = self.index_name();
        quote! {
            mongodb::IndexModel::builder()
                .keys(mongodb::bson::doc! { #(#fields: #orders),* })
                .options(Some(
                    mongodb::options::IndexOptions::builder()
                        .unique(#unique)
                        .name(#name.to_string())
                        .build(),
                ))
                .build()
        }
    }
}

pub fn expand_index_model_provider(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let specs = ast
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("mongo_index"))
        .map(IndexSpec::parse)
        .collect::<syn::Result<Vec<_>>>();
    let specs = match specs {
        Ok(specs) => specs,
        Err(e) => return e.to_compile_error().into(),
    };
    let models = specs.iter().map(IndexSpec::to_model);

    let gen = quote! {
        impl MongoIndexModelProvider for #name {
            fn index_models() -> Vec<mongodb::IndexModel> {
                vec![
                    #(#models),*
                ]
            }
        }
    };

    gen.into()
}
