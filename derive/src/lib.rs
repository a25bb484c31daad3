// Copyright (C) 2018-2026 Daniel Mueller (deso@posteo.net)
// SPDX-License-Identifier: GPL-3.0-or-later

#![deny(
  missing_copy_implementations,
  missing_debug_implementations,
  trivial_casts,
  trivial_numeric_casts,
  unsafe_code,
  unstable_features,
  unused_import_braces,
  unused_qualifications,
  unused_results,
)]
#![warn(
  future_incompatible,
  rust_2018_compatibility,
  rust_2018_idioms,
)]

//! A crate providing custom derive functionality for the `entity_merge`
//! crate.

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as Tokens;
use proc_macro2::TokenTree;
use quote::quote;
use syn::parse2;
use syn::parse_quote;
use syn::Attribute;
use syn::Data;
use syn::DeriveInput;
use syn::Field;
use syn::Fields;
use syn::GenericParam;
use syn::Generics;
use syn::Ident;
use syn::Index;
use syn::Lit;
use syn::LitStr;
use syn::Member;
use syn::Meta;
use syn::MetaList;
use syn::NestedMeta;
use syn::Type;
use syn::WherePredicate;


/// An enum to decide whether the record type owns its merge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Capability {
  /// The type implements `entity_merge::Mergeable`.
  Mergeable,
  None,
}

/// A property exposed through accessor functions, declared at the
/// container level via `#[merge(property(...))]`.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Accessor {
  name: String,
  get: Ident,
  set: Option<Ident>,
  /// Whether every value read counts as present.
  always_present: bool,
}

/// The container level attributes of a record.
#[derive(Clone, Debug, Eq, PartialEq)]
struct RecordAttrs {
  capability: Capability,
  accessors: Vec<Accessor>,
}

/// How a field takes part in a merge.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Write {
  /// The field is assigned directly.
  Assign,
  /// The field is written through the given setter.
  Setter(Ident),
  /// The field is never written.
  ReadOnly,
}

/// The attributes of a single field.
#[derive(Clone, Debug, Eq, PartialEq)]
struct FieldAttrs {
  /// Whether the field is excluded from the property table.
  skip: bool,
  rename: Option<String>,
  write: Write,
  /// Whether every value of the field counts as present, which lifts
  /// the `Presence` requirement from its type.
  always_present: bool,
}

impl Default for FieldAttrs {
  fn default() -> Self {
    Self {
      skip: false,
      rename: None,
      write: Write::Assign,
      always_present: false,
    }
  }
}


/// The error type used internally by this module.
#[derive(Debug)]
enum Error {
  Error(String),
  Syn(syn::Error),
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match *self {
      Error::Error(ref e) => write!(f, "{}", e),
      Error::Syn(ref e) => write!(f, "{}", e),
    }
  }
}

impl From<String> for Error {
  fn from(string: String) -> Error {
    Error::Error(string)
  }
}

impl From<&'static str> for Error {
  fn from(string: &'static str) -> Error {
    Error::Error(string.to_string())
  }
}

impl From<syn::Error> for Error {
  fn from(error: syn::Error) -> Error {
    Error::Syn(error)
  }
}

type Result<T> = std::result::Result<T, Error>;


/// Derive the name of the setter belonging to the given getter, along
/// with the name of the property they expose.
///
/// A `get_` or `is_` prefix of the getter is replaced with `set_`. A
/// getter without any of these prefixes is assumed to be named after
/// the property itself.
fn setter_for(getter: &str) -> (String, String) {
  let property = getter
    .strip_prefix("get_")
    .or_else(|| getter.strip_prefix("is_"))
    .filter(|property| !property.is_empty())
    .unwrap_or(getter);

  (property.to_string(), format!("set_{}", property))
}


/// Condense the stringified tokens of a type into its usual textual
/// representation, e.g., `Option < String >` into `Option<String>`.
fn type_name(tokens: &str) -> String {
  let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '\'';
  let mut name = String::with_capacity(tokens.len());
  let mut chars = tokens.chars().peekable();

  while let Some(c) = chars.next() {
    if c == ' ' {
      let prev = name.chars().last().map_or(false, is_word);
      let next = chars.peek().copied().map_or(false, is_word);
      if !(prev && next) {
        continue
      }
    }
    name.push(c)
  }
  name
}


/// Custom derive functionality for the `entity_merge::Record` trait.
///
/// Using this macro the property descriptor table of a struct is
/// generated. Every named (or positional) field makes up one property,
/// declared in order, which is merged by assigning a clone of the
/// updated value to the original, provided the value is present. Field
/// types therefore need to implement `Clone` and
/// `entity_merge::Presence`. For a generic record these bounds are
/// added to the generated implementation for each field type that
/// mentions a type parameter.
///
/// Field attributes:
/// - `#[merge(skip)]` excludes the field from the table.
/// - `#[merge(base)]` marks a field holding an embedded "base" record.
///   Properties of such a base are not declared on the deriving record
///   and hence not merged. The field is excluded just like a skipped
///   one.
/// - `#[merge(read_only)]` declares the property without a write
///   operation.
/// - `#[merge(set = "set_foo")]` writes the property through the given
///   method, which may return `()` or a `Result<(), E>`.
/// - `#[merge(rename = "foo")]` changes the reported property name.
/// - `#[merge(always_present)]` treats every value of the field as
///   present, so that it is always written. The field's type then does
///   not need to implement `entity_merge::Presence`, which allows for
///   using types of other crates.
///
/// Container attributes:
/// - `#[merge(mergeable)]` declares that the type implements
///   `entity_merge::Mergeable` and owns its merge.
/// - `#[merge(property(get = "get_foo"))]` declares an additional
///   property exposed through accessor methods. Unless given via `set`,
///   the setter is named after the getter, with a `get_` or `is_`
///   prefix replaced by `set_`. `read_only` declares the property
///   without setter and `name` overrides the property name.
///   `always_present` treats every value read as present. Getters
///   have to return owned values.
///
/// For a struct
///
/// ```rust
/// # use entity_merge::derive::Record;
/// #[derive(Record)]
/// struct User {
///   name: String,
///   #[merge(read_only)]
///   id: u64,
/// }
/// ```
///
/// this macro roughly expands to the following code:
///
/// ```rust
/// # struct User {
/// #   name: String,
/// #   id: u64,
/// # }
/// impl entity_merge::Record for User {
///   const PROPERTIES: &'static [entity_merge::Property<Self>] = &[
///     entity_merge::Property::typed("name", "String", |original: &mut Self, updated: &Self| {
///       entity_merge::resolve::field(&mut original.name, &updated.name)
///     }),
///     entity_merge::Property::typed("id", "u64", |_original: &mut Self, updated: &Self| {
///       entity_merge::resolve::read_only(&updated.id)
///     }),
///   ];
/// }
/// ```
#[proc_macro_derive(Record, attributes(merge))]
pub fn record(input: TokenStream) -> TokenStream {
  match expand_record(input) {
    Ok(tokens) => tokens,
    Err(error) => panic!("{}", error),
  }
}

fn expand_record(input: TokenStream) -> Result<TokenStream> {
  let input = parse2::<DeriveInput>(input.into())
    .map_err(|_| Error::from("unable to parse input"))?;
  let attrs = parse_record_attributes(&input.attrs)?;
  let tokens = expand_record_input(&attrs, &input)?;
  Ok(tokens.into())
}


/// Retrieve the contents of all #[merge(list...)] attributes.
fn merge_attributes(attributes: &[Attribute]) -> Result<Vec<NestedMeta>> {
  let mut items = Vec::new();

  // We don't care about the other meta data elements, inner/outer,
  // doc/non-doc, it's all fine by us.
  for attribute in attributes {
    if !attribute.path.is_ident("merge") {
      continue
    }

    match attribute.parse_meta()? {
      Meta::List(list) => items.extend(list.nested),
      _ => return Err(Error::from("expected attribute of the form #[merge(...)]")),
    }
  }
  Ok(items)
}

/// Retrieve the name of a meta item, for error reporting purposes.
fn meta_name(meta: &Meta) -> String {
  let path = meta.path();
  quote!(#path).to_string()
}

/// Retrieve the string value of a `key = "value"` item.
fn string_value(meta: &Meta) -> Result<LitStr> {
  match *meta {
    Meta::NameValue(ref name_value) => match name_value.lit {
      Lit::Str(ref string) => Ok(string.clone()),
      _ => Err(Error::from(format!("{} expects a string literal", meta_name(meta)))),
    },
    _ => Err(Error::from(format!("{} expects a value", meta_name(meta)))),
  }
}

/// Parse a string literal as an identifier.
fn ident_value(meta: &Meta) -> Result<Ident> {
  let string = string_value(meta)?;
  string
    .parse::<Ident>()
    .map_err(|_| Error::from(format!("invalid identifier for {}: {}", meta_name(meta), string.value())))
}


/// Parse the macro's container attributes.
fn parse_record_attributes(attributes: &[Attribute]) -> Result<RecordAttrs> {
  let mut attrs = RecordAttrs {
    capability: Capability::None,
    accessors: Vec::new(),
  };

  for item in merge_attributes(attributes)? {
    match item {
      NestedMeta::Meta(Meta::Path(ref path)) if path.is_ident("mergeable") => {
        attrs.capability = Capability::Mergeable
      },
      NestedMeta::Meta(Meta::List(ref list)) if list.path.is_ident("property") => {
        attrs.accessors.push(parse_accessor(list)?)
      },
      NestedMeta::Meta(ref meta) => {
        return Err(Error::from(format!("unsupported attribute: {}", meta_name(meta))))
      },
      NestedMeta::Lit(_) => return Err(Error::from("unsupported literal")),
    }
  }
  Ok(attrs)
}

/// Parse a #[merge(property(list...))] item.
fn parse_accessor(list: &MetaList) -> Result<Accessor> {
  let mut get = None;
  let mut set = None;
  let mut name = None;
  let mut read_only = false;
  let mut always_present = false;

  for item in &list.nested {
    match *item {
      NestedMeta::Meta(ref meta) if meta.path().is_ident("get") => get = Some(ident_value(meta)?),
      NestedMeta::Meta(ref meta) if meta.path().is_ident("set") => set = Some(ident_value(meta)?),
      NestedMeta::Meta(ref meta) if meta.path().is_ident("name") => {
        name = Some(string_value(meta)?.value())
      },
      NestedMeta::Meta(Meta::Path(ref path)) if path.is_ident("read_only") => read_only = true,
      NestedMeta::Meta(Meta::Path(ref path)) if path.is_ident("always_present") => {
        always_present = true
      },
      NestedMeta::Meta(ref meta) => {
        return Err(Error::from(format!("unsupported property attribute: {}", meta_name(meta))))
      },
      NestedMeta::Lit(_) => return Err(Error::from("unsupported literal")),
    }
  }

  let get = get.ok_or_else(|| Error::from("property(...) requires a getter: get = \"...\""))?;
  if read_only && set.is_some() {
    return Err(Error::from(format!("property {} cannot be read_only and have a setter", get)))
  }

  let (property, setter) = setter_for(&get.to_string());
  let set = if read_only {
    None
  } else {
    Some(set.unwrap_or_else(|| Ident::new(&setter, get.span())))
  };

  Ok(Accessor {
    name: name.unwrap_or(property),
    get,
    set,
    always_present,
  })
}

/// Parse the #[merge(list...)] attributes of a field.
fn parse_field_attributes(field: &Field) -> Result<FieldAttrs> {
  let mut attrs = FieldAttrs::default();

  for item in merge_attributes(&field.attrs)? {
    match item {
      NestedMeta::Meta(Meta::Path(ref path)) if path.is_ident("skip") || path.is_ident("base") => {
        attrs.skip = true
      },
      NestedMeta::Meta(Meta::Path(ref path)) if path.is_ident("read_only") => {
        attrs.write = Write::ReadOnly
      },
      NestedMeta::Meta(Meta::Path(ref path)) if path.is_ident("always_present") => {
        attrs.always_present = true
      },
      NestedMeta::Meta(ref meta) if meta.path().is_ident("set") => {
        attrs.write = Write::Setter(ident_value(meta)?)
      },
      NestedMeta::Meta(ref meta) if meta.path().is_ident("rename") => {
        attrs.rename = Some(string_value(meta)?.value())
      },
      NestedMeta::Meta(ref meta) => {
        return Err(Error::from(format!("unsupported field attribute: {}", meta_name(meta))))
      },
      NestedMeta::Lit(_) => return Err(Error::from("unsupported literal")),
    }
  }
  Ok(attrs)
}


/// Expand the input with the implementation of the required traits.
fn expand_record_input(attrs: &RecordAttrs, input: &DeriveInput) -> Result<Tokens> {
  match input.data {
    Data::Struct(ref data) => {
      let mut generics = record_generics(&input.generics)?;
      let mut properties = expand_field_properties(&data.fields, &mut generics)?;
      properties.extend(attrs.accessors.iter().map(expand_accessor_property));
      Ok(expand_record_trait(attrs.capability, input, &generics, &properties))
    },
    _ => Err(Error::from("#[derive(Record)] is only defined for structs")),
  }
}

/// Create the generics of the trait implementation.
///
/// Records have to be `'static`, so we bound all type parameters
/// accordingly. Lifetime parameters cannot be supported at all.
fn record_generics(generics: &Generics) -> Result<Generics> {
  let mut generics = generics.clone();
  let params = generics
    .params
    .iter()
    .filter_map(|param| match param {
      GenericParam::Type(ty) => Some(Ok(ty.ident.clone())),
      GenericParam::Lifetime(_) => {
        Some(Err(Error::from("#[derive(Record)] is not defined for types with lifetime parameters")))
      },
      GenericParam::Const(_) => None,
    })
    .collect::<Result<Vec<_>>>()?;

  let where_clause = generics.make_where_clause();
  for param in params {
    where_clause.predicates.push(parse_quote! { #param: 'static });
  }
  Ok(generics)
}

/// Check whether the given tokens mention any of the given type
/// parameters.
fn mentions_param(tokens: Tokens, params: &HashSet<Ident>) -> bool {
  tokens.into_iter().any(|tree| match tree {
    TokenTree::Ident(ref ident) => params.contains(ident),
    TokenTree::Group(ref group) => mentions_param(group.stream(), params),
    TokenTree::Punct(_) | TokenTree::Literal(_) => false,
  })
}

/// Create the bound a field's type has to satisfy for the field to be
/// merged, if any.
fn field_bound(ty: &Type, attrs: &FieldAttrs) -> Option<WherePredicate> {
  match (&attrs.write, attrs.always_present) {
    (Write::Assign, false) | (Write::Setter(_), false) => Some(parse_quote! {
      #ty: ::std::clone::Clone + ::entity_merge::Presence
    }),
    (Write::Assign, true) | (Write::Setter(_), true) => Some(parse_quote! {
      #ty: ::std::clone::Clone
    }),
    (Write::ReadOnly, false) => Some(parse_quote! {
      #ty: ::entity_merge::Presence
    }),
    (Write::ReadOnly, true) => None,
  }
}

/// Expand the property descriptors of all fields.
///
/// Fields whose type mentions a type parameter have their bounds added
/// to `generics`.
fn expand_field_properties(fields: &Fields, generics: &mut Generics) -> Result<Vec<Tokens>> {
  let params = generics
    .type_params()
    .map(|param| param.ident.clone())
    .collect::<HashSet<_>>();
  let mut properties = Vec::new();

  for (index, field) in fields.iter().enumerate() {
    let attrs = parse_field_attributes(field)?;
    if attrs.skip {
      continue
    }

    let member = match field.ident {
      Some(ref ident) => Member::Named(ident.clone()),
      None => Member::Unnamed(Index::from(index)),
    };
    let name = attrs.rename.clone().unwrap_or_else(|| match member {
      Member::Named(ref ident) => ident.to_string(),
      Member::Unnamed(ref index) => index.index.to_string(),
    });
    properties.push(expand_field_property(&name, &member, field, &attrs));

    let ty = &field.ty;
    if mentions_param(quote!(#ty), &params) {
      if let Some(bound) = field_bound(ty, &attrs) {
        generics.make_where_clause().predicates.push(bound)
      }
    }
  }
  Ok(properties)
}

/// Retrieve the names of the `entity_merge::resolve` functions merging
/// a plain field, an accessor pair, and a read-only property.
fn resolvers(always_present: bool) -> (Ident, Ident, Ident) {
  let names = if always_present {
    ["field_always", "accessor_always", "read_only_always"]
  } else {
    ["field", "accessor", "read_only"]
  };
  let [assign, accessor, read_only] = names.map(|name| Ident::new(name, proc_macro2::Span::call_site()));
  (assign, accessor, read_only)
}

/// Expand the property descriptor of a single field.
fn expand_field_property(name: &str, member: &Member, field: &Field, attrs: &FieldAttrs) -> Tokens {
  let ty = &field.ty;
  let type_name = type_name(&quote!(#ty).to_string());
  let (assign, accessor, read_only) = resolvers(attrs.always_present);

  let merge = match attrs.write {
    Write::Assign => quote! {
      |original: &mut Self, updated: &Self| {
        ::entity_merge::resolve::#assign(&mut original.#member, &updated.#member)
      }
    },
    Write::Setter(ref set) => quote! {
      |original: &mut Self, updated: &Self| {
        ::entity_merge::resolve::#accessor(
          original,
          updated,
          |record: &Self| ::std::clone::Clone::clone(&record.#member),
          Self::#set,
        )
      }
    },
    Write::ReadOnly => quote! {
      |_original: &mut Self, updated: &Self| {
        ::entity_merge::resolve::#read_only(&updated.#member)
      }
    },
  };

  quote! {
    ::entity_merge::Property::typed(#name, #type_name, #merge)
  }
}

/// Expand the property descriptor of an accessor property.
fn expand_accessor_property(accessor: &Accessor) -> Tokens {
  let name = &accessor.name;
  let get = &accessor.get;
  let (_, resolve, read_only) = resolvers(accessor.always_present);

  let merge = match accessor.set {
    Some(ref set) => quote! {
      |original: &mut Self, updated: &Self| {
        ::entity_merge::resolve::#resolve(original, updated, Self::#get, Self::#set)
      }
    },
    None => quote! {
      |_original: &mut Self, updated: &Self| {
        ::entity_merge::resolve::#read_only(&Self::#get(updated))
      }
    },
  };

  quote! {
    ::entity_merge::Property::new(#name, #merge)
  }
}

/// Expand an implementation for the `entity_merge::Record` trait.
fn expand_record_trait(
  capability: Capability,
  input: &DeriveInput,
  generics: &Generics,
  properties: &[Tokens],
) -> Tokens {
  let name = &input.ident;
  let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

  let capability = match capability {
    Capability::Mergeable => quote! {
      #[inline]
      fn merge_capability() -> ::std::option::Option<::entity_merge::MergeFn<Self>> {
        ::std::option::Option::Some(<Self as ::entity_merge::Mergeable>::merge_with)
      }
    },
    Capability::None => quote! {},
  };

  quote! {
    impl #impl_generics ::entity_merge::Record for #name #ty_generics #where_clause {
      const PROPERTIES: &'static [::entity_merge::Property<Self>] = &[
        #(#properties),*
      ];

      #capability
    }
  }
}
