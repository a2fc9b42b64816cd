use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DataStruct, DeriveInput, Fields, Meta};

/// 生成 IntoValues trait 的实现
///
/// 按字段声明顺序生成 列名 -> 值 映射，可直接传给 `insert` / `update`。
/// 字段类型需要实现 `Into<BindValue>`，`Option<T>` 的 `None` 绑定为 NULL。
///
/// 使用示例：
/// ```ignore
/// #[derive(Values)]
/// struct NewUser {
///     name: String,
///     #[column = "user_age"]
///     age: i32,
///     #[skip]
///     password_confirm: String,
/// }
///
/// let stmt = StatementBuilder::new("users").insert(new_user)?.build()?;
/// // INSERT INTO users (name,user_age) VALUES (?,?)
/// ```
#[proc_macro_derive(Values, attributes(skip, column))]
pub fn derive_values(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // 获取字段列表（必须是具名字段的结构体）
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return syn::Error::new_spanned(
                name,
                "Values derive only supports structs with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut field_idents: Vec<&syn::Ident> = Vec::new();
    let mut field_columns: Vec<syn::LitStr> = Vec::new();
    let mut field_types: Vec<&syn::Type> = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        let mut skip = false;
        let mut column: Option<syn::LitStr> = None;
        for attr in &field.attrs {
            if attr.path().is_ident("skip") {
                skip = true;
            } else if attr.path().is_ident("column") {
                match parse_column(&attr.meta) {
                    Ok(lit) => column = Some(lit),
                    Err(err) => return err.to_compile_error().into(),
                }
            }
        }

        if skip {
            continue;
        }

        // 没有指定列名时使用字段名
        let column = column.unwrap_or_else(|| {
            syn::LitStr::new(&field_ident.to_string(), proc_macro2::Span::call_site())
        });
        field_idents.push(field_ident);
        field_columns.push(column);
        field_types.push(&field.ty);
    }

    // 每个参与映射的字段类型都需要能转换为 BindValue（泛型字段同样适用）
    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for ty in &field_types {
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::std::convert::Into<::sqlchain::BindValue>));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::sqlchain::IntoValues for #name #ty_generics #where_clause {
            fn into_column_values(
                self,
            ) -> ::std::vec::Vec<(::std::string::String, ::sqlchain::BindValue)> {
                ::std::vec![
                    #((
                        ::std::string::String::from(#field_columns),
                        ::std::convert::Into::<::sqlchain::BindValue>::into(self.#field_idents),
                    )),*
                ]
            }
        }
    };

    TokenStream::from(expanded)
}

/// 解析 `#[column = "name"]`
fn parse_column(meta: &Meta) -> syn::Result<syn::LitStr> {
    if let Meta::NameValue(nv) = meta {
        if let syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(s),
            ..
        }) = &nv.value
        {
            return Ok(s.clone());
        }
    }
    Err(syn::Error::new_spanned(
        meta,
        "expected #[column = \"column_name\"]",
    ))
}
